#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Theft and sighting report types.
//!
//! These are the document shapes stored in the `theftmarkers` and
//! `sightingmarkers` collections. A sighting relates to a theft through a
//! shared license plate; there is no foreign key.

pub mod date;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use date::ReportDate;

/// Opaque document identifier assigned by the data store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(pub String);

impl ReportId {
    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ReportId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ReportId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Which collection a report belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportType {
    /// A stolen vehicle report.
    Theft,
    /// An observation of a previously reported vehicle.
    Sighting,
}

impl ReportType {
    /// Name of the document store collection holding this report type.
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Theft => "theftmarkers",
            Self::Sighting => "sightingmarkers",
        }
    }
}

/// WGS84 coordinate pair.
///
/// Equality is exact floating-point equality; no tolerance is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinates {
    /// Creates a coordinate pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// `(longitude, latitude)` ordering used by map and `GeoJSON` APIs.
    #[must_use]
    pub const fn lng_lat(self) -> (f64, f64) {
        (self.longitude, self.latitude)
    }
}

/// Where a report was made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Free-form address as typed by the reporter.
    #[serde(default)]
    pub address: String,
    /// Resolved coordinates.
    pub coordinates: Coordinates,
}

/// Optional reporter contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Reporter name.
    #[serde(default)]
    pub name: String,
    /// Reporter phone number.
    #[serde(default)]
    pub phone: String,
    /// Free-text circumstances of the theft or sighting.
    #[serde(default)]
    pub context: String,
}

/// Vehicle descriptors attached to a theft report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TheftInfo {
    /// Manufacturer ("make").
    #[serde(default)]
    pub brand: String,
    /// Model name.
    #[serde(default)]
    pub model: String,
    /// Exterior color.
    #[serde(default)]
    pub color: String,
    /// Model year.
    #[serde(default)]
    pub year: Option<u32>,
    /// License plate, the join key to sightings.
    pub license_plate: String,
    /// Issuing state or province.
    #[serde(default)]
    pub plate_province: String,
    /// Body type (sedan, SUV, ...).
    #[serde(default, rename = "type")]
    pub vehicle_type: String,
    /// When the theft happened.
    #[serde(default)]
    pub date: ReportDate,
    /// Photo URL.
    #[serde(default)]
    pub photo: Option<String>,
}

/// Details attached to a sighting report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SightingInfo {
    /// License plate as observed.
    pub license_plate: String,
    /// When the vehicle was seen.
    #[serde(default)]
    pub date: ReportDate,
    /// Photo URL.
    #[serde(default)]
    pub photo: Option<String>,
}

/// A stolen vehicle report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TheftReport {
    /// Store-assigned identifier.
    pub id: ReportId,
    /// Reporter contact.
    #[serde(default)]
    pub contact: Contact,
    /// Vehicle details.
    pub info: TheftInfo,
    /// Where the theft happened.
    pub location: Location,
}

/// An observation of a previously reported vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SightingReport {
    /// Store-assigned identifier.
    pub id: ReportId,
    /// Reporter contact.
    #[serde(default)]
    pub contact: Contact,
    /// Sighting details.
    pub info: SightingInfo,
    /// Where the vehicle was seen.
    pub location: Location,
}

/// The report currently selected on the map, tagged with its type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reportType", rename_all = "lowercase")]
pub enum SelectedReport {
    /// A selected theft.
    Theft(TheftReport),
    /// A selected sighting.
    Sighting(SightingReport),
}

impl SelectedReport {
    /// Report type tag.
    #[must_use]
    pub const fn report_type(&self) -> ReportType {
        match self {
            Self::Theft(_) => ReportType::Theft,
            Self::Sighting(_) => ReportType::Sighting,
        }
    }

    /// Store identifier.
    #[must_use]
    pub const fn id(&self) -> &ReportId {
        match self {
            Self::Theft(r) => &r.id,
            Self::Sighting(r) => &r.id,
        }
    }

    /// License plate.
    #[must_use]
    pub fn license_plate(&self) -> &str {
        match self {
            Self::Theft(r) => &r.info.license_plate,
            Self::Sighting(r) => &r.info.license_plate,
        }
    }

    /// Location coordinates.
    #[must_use]
    pub const fn coordinates(&self) -> Coordinates {
        match self {
            Self::Theft(r) => r.location.coordinates,
            Self::Sighting(r) => r.location.coordinates,
        }
    }
}

/// Location as submitted; coordinates are geocoded from `address` when
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLocation {
    /// Free-form address.
    #[serde(default)]
    pub address: String,
    /// Coordinates captured by the client, if any.
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

impl NewLocation {
    /// Resolves into a stored [`Location`] with the given coordinates.
    #[must_use]
    pub fn resolve(self, coordinates: Coordinates) -> Location {
        Location {
            address: self.address,
            coordinates,
        }
    }
}

/// A theft report as submitted, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTheftReport {
    /// Reporter contact.
    #[serde(default)]
    pub contact: Contact,
    /// Vehicle details.
    pub info: TheftInfo,
    /// Where the theft happened.
    pub location: NewLocation,
}

/// A sighting report as submitted, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSightingReport {
    /// Reporter contact.
    #[serde(default)]
    pub contact: Contact,
    /// Sighting details.
    pub info: SightingInfo,
    /// Where the vehicle was seen.
    pub location: NewLocation,
}

/// Vehicle details carried from a theft into a new sighting form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePrefill {
    /// License plate.
    pub license_plate: String,
    /// Manufacturer.
    pub make: String,
    /// Model name.
    pub model: String,
    /// Exterior color.
    pub color: String,
    /// Model year.
    pub year: Option<u32>,
}

impl From<&TheftReport> for VehiclePrefill {
    fn from(theft: &TheftReport) -> Self {
        Self {
            license_plate: theft.info.license_plate.clone(),
            make: theft.info.brand.clone(),
            model: theft.info.model.clone(),
            color: theft.info.color.clone(),
            year: theft.info.year,
        }
    }
}
