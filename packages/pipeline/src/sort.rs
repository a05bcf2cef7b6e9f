//! Ordering of the visible report list.

use std::cmp::Ordering;

use auto_watch_report_models::Coordinates;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::distance::haversine_km;
use crate::report_ref::ReportRef;

/// Sort key for the report list.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortKey {
    /// Normalized report date.
    #[default]
    Time,
    /// License plate, case-insensitive. Compares Unicode-lowercased plates
    /// by code point; no locale collation.
    Alphabetical,
    /// Distance from the user's location.
    Distance,
}

/// Sort direction.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

/// Returns a newly ordered copy of `reports`.
///
/// The sort is stable, so records with equal keys keep their input order in
/// both directions. Distance sorting without a `user_location` leaves the
/// order untouched.
#[must_use]
pub fn sort_reports<'a>(
    reports: &[ReportRef<'a>],
    key: SortKey,
    order: SortOrder,
    user_location: Option<Coordinates>,
) -> Vec<ReportRef<'a>> {
    let mut sorted = reports.to_vec();

    sorted.sort_by(|a, b| {
        let ordering = compare(*a, *b, key, user_location);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    sorted
}

fn compare(
    a: ReportRef<'_>,
    b: ReportRef<'_>,
    key: SortKey,
    user_location: Option<Coordinates>,
) -> Ordering {
    match key {
        SortKey::Time => a.date().to_millis().cmp(&b.date().to_millis()),
        SortKey::Alphabetical => a
            .license_plate()
            .to_lowercase()
            .cmp(&b.license_plate().to_lowercase()),
        SortKey::Distance => user_location.map_or(Ordering::Equal, |user| {
            haversine_km(user, a.coordinates()).total_cmp(&haversine_km(user, b.coordinates()))
        }),
    }
}
