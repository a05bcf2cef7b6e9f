#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! API request and response types for the auto watch server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the stored report documents so the wire contract can evolve on its
//! own.

use auto_watch_pipeline::distance::haversine_km;
use auto_watch_pipeline::selection::{MapCommand, MarkerClick, MarkerStyle};
use auto_watch_pipeline::session::{MapSession, ViewCriteria};
use auto_watch_pipeline::time::format_time_ago;
use auto_watch_pipeline::ReportRef;
use auto_watch_report_models::{
    Coordinates, ReportId, ReportType, SelectedReport, VehiclePrefill,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
    /// Name of the report store backend.
    pub store: String,
}

/// Report totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStats {
    /// Number of theft reports.
    pub thefts: usize,
    /// Number of sighting reports.
    pub sightings: usize,
}

/// Response to a successful report submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCreated {
    /// Id assigned by the store.
    pub id: ReportId,
}

/// Validation failure tied to one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFieldError {
    /// Offending field name.
    pub field: String,
    /// Message shown next to the field.
    pub error: String,
}

/// Request body for `POST /api/sessions`.
///
/// The client reports the outcome of its geolocation attempt: either a
/// position or an error message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateSessionRequest {
    /// The user's position.
    pub location: Option<Coordinates>,
    /// Why geolocation failed.
    pub geolocation_error: Option<String>,
}

/// Initial camera for a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMapView {
    /// Map center.
    pub center: Coordinates,
    /// Zoom level.
    pub zoom: f64,
}

/// Short vehicle description on a theft card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiVehicle {
    /// Manufacturer.
    pub brand: String,
    /// Model name.
    pub model: String,
    /// Exterior color.
    pub color: String,
    /// Model year.
    pub year: Option<u32>,
    /// Issuing state or province.
    pub plate_province: String,
    /// Body type.
    pub vehicle_type: String,
}

/// One entry of the sidebar list, also used to style its map marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiReportCard {
    /// Collection.
    pub report_type: ReportType,
    /// Store id.
    pub id: ReportId,
    /// License plate.
    pub license_plate: String,
    /// Address text.
    pub address: String,
    /// Marker position.
    pub coordinates: Coordinates,
    /// Normalized report time in epoch milliseconds.
    pub date: i64,
    /// Relative time label.
    pub time_ago: String,
    /// Distance from the user, when the user's location is known.
    pub distance_km: Option<f64>,
    /// Sightings with the same plate (thefts only).
    pub sighting_count: Option<usize>,
    /// Vehicle details (thefts only).
    pub vehicle: Option<ApiVehicle>,
    /// Photo URL.
    pub photo: Option<String>,
    /// Marker appearance.
    pub marker: MarkerStyle,
}

impl ApiReportCard {
    /// Builds the card for `report` within `session`.
    #[must_use]
    pub fn new(session: &MapSession, report: ReportRef<'_>, now: DateTime<Utc>) -> Self {
        let (sighting_count, vehicle, photo) = match report {
            ReportRef::Theft(theft) => (
                Some(session.sighting_count(theft)),
                Some(ApiVehicle {
                    brand: theft.info.brand.clone(),
                    model: theft.info.model.clone(),
                    color: theft.info.color.clone(),
                    year: theft.info.year,
                    plate_province: theft.info.plate_province.clone(),
                    vehicle_type: theft.info.vehicle_type.clone(),
                }),
                theft.info.photo.clone(),
            ),
            ReportRef::Sighting(sighting) => (None, None, sighting.info.photo.clone()),
        };

        Self {
            report_type: report.report_type(),
            id: report.id().clone(),
            license_plate: report.license_plate().to_string(),
            address: report.address().to_string(),
            coordinates: report.coordinates(),
            date: report.date().to_millis(),
            time_ago: format_time_ago(report.date(), now),
            distance_km: session
                .user_location()
                .map(|user| haversine_km(user, report.coordinates())),
            sighting_count,
            vehicle,
            photo,
            marker: session.marker_style(report),
        }
    }
}

/// Reference to the selected report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSelection {
    /// Collection.
    pub report_type: ReportType,
    /// Store id.
    pub id: ReportId,
    /// License plate driving the overlay and marker fading.
    pub license_plate: String,
}

impl From<&SelectedReport> for ApiSelection {
    fn from(selected: &SelectedReport) -> Self {
        Self {
            report_type: selected.report_type(),
            id: selected.id().clone(),
            license_plate: selected.license_plate().to_string(),
        }
    }
}

/// The derived view of a map session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSessionView {
    /// Session id.
    pub id: Uuid,
    /// Whether the initial fetch succeeded.
    pub loaded: bool,
    /// Current list criteria.
    pub criteria: ViewCriteria,
    /// Selected report, if any.
    pub selection: Option<ApiSelection>,
    /// Totals over the whole snapshot.
    pub stats: ApiStats,
    /// Filtered and sorted list.
    pub reports: Vec<ApiReportCard>,
}

impl ApiSessionView {
    /// Derives the view of `session`.
    #[must_use]
    pub fn new(id: Uuid, loaded: bool, session: &MapSession, now: DateTime<Utc>) -> Self {
        Self {
            id,
            loaded,
            criteria: session.criteria().clone(),
            selection: session.selection().map(ApiSelection::from),
            stats: ApiStats {
                thefts: session.snapshot().thefts.len(),
                sightings: session.snapshot().sightings.len(),
            },
            reports: session
                .visible_reports()
                .into_iter()
                .map(|report| ApiReportCard::new(session, report, now))
                .collect(),
        }
    }
}

/// Response to `POST /api/sessions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSessionCreated {
    /// Initial camera.
    pub map: ApiMapView,
    /// Initial derived view.
    pub session: ApiSessionView,
}

/// Request body for `POST /api/sessions/{id}/selection`.
pub type SelectRequest = MarkerClick;

/// Commands to apply after a selection change, plus the refreshed view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSelectionResponse {
    /// Map, sidebar and overlay commands in application order.
    pub commands: Vec<MapCommand>,
    /// View after the change.
    pub session: ApiSessionView,
}

/// Popup content for one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiReportDetail {
    /// Collection, shown as the popup badge.
    pub report_type: ReportType,
    /// Store id.
    pub id: ReportId,
    /// License plate.
    pub license_plate: String,
    /// Vehicle details (thefts only).
    pub vehicle: Option<ApiVehicle>,
    /// Photo URL.
    pub photo: Option<String>,
    /// Address text.
    pub address: String,
    /// Reporter name, when given.
    pub contact_name: Option<String>,
    /// Reporter phone, when given.
    pub contact_phone: Option<String>,
    /// Circumstances, when given.
    pub context: Option<String>,
    /// Relative time label.
    pub time_ago: String,
    /// Sightings with the same plate (thefts only).
    pub sighting_count: Option<usize>,
    /// Values to prefill a sighting form with (thefts only).
    pub prefill: Option<VehiclePrefill>,
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl ApiReportDetail {
    /// Builds the popup detail for `report`.
    #[must_use]
    pub fn new(session: &MapSession, report: ReportRef<'_>, now: DateTime<Utc>) -> Self {
        let card = ApiReportCard::new(session, report, now);
        let (contact, prefill) = match report {
            ReportRef::Theft(theft) => (&theft.contact, Some(VehiclePrefill::from(theft))),
            ReportRef::Sighting(sighting) => (&sighting.contact, None),
        };

        Self {
            report_type: card.report_type,
            id: card.id,
            license_plate: card.license_plate,
            vehicle: card.vehicle,
            photo: card.photo,
            address: card.address,
            contact_name: non_empty(&contact.name),
            contact_phone: non_empty(&contact.phone),
            context: non_empty(&contact.context),
            time_ago: card.time_ago,
            sighting_count: card.sighting_count,
            prefill,
        }
    }
}
