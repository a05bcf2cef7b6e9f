//! Marker resolution, marker styling and the commands that keep the map,
//! its markers and the sidebar in step with the selected report.

use auto_watch_report_models::{
    Coordinates, ReportId, ReportType, SelectedReport, SightingReport, TheftReport,
};
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

use crate::relation::PlateMatch;
use crate::report_ref::ReportRef;

/// Opacity of markers whose plate differs from the selected plate.
pub const FADED_OPACITY: f32 = 0.3;

/// Scale of the selected report's marker.
pub const SELECTED_SCALE: f32 = 1.25;

/// Visual state of one marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    /// Marker opacity, `0.0..=1.0`.
    pub opacity: f32,
    /// Marker scale factor.
    pub scale: f32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            scale: 1.0,
        }
    }
}

/// Computes a marker's style from the current selection.
///
/// Faded when a report with a different plate is selected; scaled up when
/// the marker is the selected report itself.
#[must_use]
pub fn marker_style(
    marker: ReportRef<'_>,
    selection: Option<&SelectedReport>,
    mode: PlateMatch,
) -> MarkerStyle {
    let Some(selected) = selection else {
        return MarkerStyle::default();
    };

    let opacity = if mode.matches(marker.license_plate(), selected.license_plate()) {
        1.0
    } else {
        FADED_OPACITY
    };
    let scale = if marker.is(selected) {
        SELECTED_SCALE
    } else {
        1.0
    };

    MarkerStyle { opacity, scale }
}

/// A marker or sidebar card click.
///
/// Carries the record id when the client has it; otherwise the marker's
/// source coordinates are used to find the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerClick {
    /// Collection of the clicked marker.
    pub report_type: ReportType,
    /// Record id from the marker payload.
    #[serde(default)]
    pub id: Option<ReportId>,
    /// Marker source coordinates.
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

/// Finds the record a click refers to.
///
/// An id, when present, takes precedence over coordinates.
#[must_use]
pub fn resolve_click<'a>(
    click: &MarkerClick,
    thefts: &'a [TheftReport],
    sightings: &'a [SightingReport],
) -> Option<ReportRef<'a>> {
    if let Some(id) = &click.id {
        return resolve_by_id(click.report_type, id, thefts, sightings);
    }
    click
        .coordinates
        .and_then(|c| resolve_by_coordinates(click.report_type, c, thefts, sightings))
}

/// Finds a record by store id.
#[must_use]
pub fn resolve_by_id<'a>(
    report_type: ReportType,
    id: &ReportId,
    thefts: &'a [TheftReport],
    sightings: &'a [SightingReport],
) -> Option<ReportRef<'a>> {
    match report_type {
        ReportType::Theft => thefts.iter().find(|r| &r.id == id).map(ReportRef::Theft),
        ReportType::Sighting => sightings
            .iter()
            .find(|r| &r.id == id)
            .map(ReportRef::Sighting),
    }
}

/// Finds a record whose stored coordinates exactly equal `coordinates`.
///
/// No tolerance is applied: a coordinate that differs in the last bit does
/// not resolve.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn resolve_by_coordinates<'a>(
    report_type: ReportType,
    coordinates: Coordinates,
    thefts: &'a [TheftReport],
    sightings: &'a [SightingReport],
) -> Option<ReportRef<'a>> {
    match report_type {
        ReportType::Theft => thefts
            .iter()
            .find(|r| r.location.coordinates == coordinates)
            .map(ReportRef::Theft),
        ReportType::Sighting => sightings
            .iter()
            .find(|r| r.location.coordinates == coordinates)
            .map(ReportRef::Sighting),
    }
}

/// An instruction for the map client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum MapCommand {
    /// Animate the camera to `center` at `zoom`.
    FlyTo {
        /// Camera center.
        center: Coordinates,
        /// Target zoom level.
        zoom: f64,
    },
    /// Scroll the sidebar card for this report into view.
    ScrollIntoView {
        /// Report collection.
        report_type: ReportType,
        /// Report id.
        id: ReportId,
    },
    /// Open the detail popup anchored at the report.
    OpenPopup {
        /// Report collection.
        report_type: ReportType,
        /// Report id.
        id: ReportId,
        /// Popup anchor.
        coordinates: Coordinates,
    },
    /// Replace the relation overlay source with `data`.
    SetRelationOverlay {
        /// Line features, one per sighting.
        data: FeatureCollection,
    },
    /// Remove the relation overlay layer and source.
    RemoveRelationOverlay,
}
