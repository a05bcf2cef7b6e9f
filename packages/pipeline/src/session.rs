//! One map view's state: the fetched snapshot, the list criteria, the
//! user's location and the current selection.
//!
//! Derived state (the visible list, marker styles, the relation overlay) is
//! recomputed from the snapshot on demand and never cached, except for the
//! last overlay handed to the map, which is kept so unchanged geometry is
//! not re-sent.

use auto_watch_report_models::{
    Coordinates, SelectedReport, SightingReport, TheftReport,
};
use serde::{Deserialize, Serialize};

use crate::filter::{ReportFilter, filter_reports};
use crate::relation::{
    OverlayTracker, OverlayUpdate, PlateMatch, build_relation_overlay, count_sightings,
};
use crate::report_ref::ReportRef;
use crate::selection::{MapCommand, MarkerClick, MarkerStyle, marker_style, resolve_click};
use crate::sort::{SortKey, SortOrder, sort_reports};

/// Zoom level the camera flies to when a report is selected.
pub const DEFAULT_SELECT_ZOOM: f64 = 15.0;

/// All reports fetched when the session started.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportSnapshot {
    /// Theft reports in fetch order.
    pub thefts: Vec<TheftReport>,
    /// Sighting reports in fetch order.
    pub sightings: Vec<SightingReport>,
}

/// Filter, search and sort inputs for the sidebar list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewCriteria {
    /// Report-type filter.
    pub filter: ReportFilter,
    /// Fuzzy plate query.
    pub search: String,
    /// Sort key.
    pub sort_by: SortKey,
    /// Sort direction.
    pub sort_order: SortOrder,
}

/// Per-session tunables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    /// Zoom used by the fly-to on selection.
    pub select_zoom: f64,
    /// Plate comparison for relations and marker fading.
    pub plate_match: PlateMatch,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            select_zoom: DEFAULT_SELECT_ZOOM,
            plate_match: PlateMatch::Exact,
        }
    }
}

/// State of a single map view.
#[derive(Debug, Clone)]
pub struct MapSession {
    snapshot: ReportSnapshot,
    criteria: ViewCriteria,
    user_location: Option<Coordinates>,
    selection: Option<SelectedReport>,
    overlay: OverlayTracker,
    settings: SessionSettings,
}

impl MapSession {
    /// Starts a session over `snapshot`.
    #[must_use]
    pub fn new(
        snapshot: ReportSnapshot,
        user_location: Option<Coordinates>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            snapshot,
            criteria: ViewCriteria::default(),
            user_location,
            selection: None,
            overlay: OverlayTracker::new(),
            settings,
        }
    }

    /// The fetched reports.
    #[must_use]
    pub const fn snapshot(&self) -> &ReportSnapshot {
        &self.snapshot
    }

    /// Current list criteria.
    #[must_use]
    pub const fn criteria(&self) -> &ViewCriteria {
        &self.criteria
    }

    /// Replaces the list criteria. The selection is kept.
    pub fn set_criteria(&mut self, criteria: ViewCriteria) {
        self.criteria = criteria;
    }

    /// The user's location, if geolocation succeeded.
    #[must_use]
    pub const fn user_location(&self) -> Option<Coordinates> {
        self.user_location
    }

    /// Session tunables.
    #[must_use]
    pub const fn settings(&self) -> SessionSettings {
        self.settings
    }

    /// The selected report.
    #[must_use]
    pub const fn selection(&self) -> Option<&SelectedReport> {
        self.selection.as_ref()
    }

    /// The plate of interest, taken from the selection.
    #[must_use]
    pub fn selected_plate(&self) -> Option<&str> {
        self.selection.as_ref().map(SelectedReport::license_plate)
    }

    /// Filtered and sorted reports for the sidebar and markers.
    #[must_use]
    pub fn visible_reports(&self) -> Vec<ReportRef<'_>> {
        let filtered = filter_reports(
            &self.snapshot.thefts,
            &self.snapshot.sightings,
            self.criteria.filter,
            &self.criteria.search,
        );
        sort_reports(
            &filtered.combined(),
            self.criteria.sort_by,
            self.criteria.sort_order,
            self.user_location,
        )
    }

    /// Style of `marker` under the current selection.
    #[must_use]
    pub fn marker_style(&self, marker: ReportRef<'_>) -> MarkerStyle {
        marker_style(marker, self.selection.as_ref(), self.settings.plate_match)
    }

    /// Number of sightings sharing `theft`'s plate.
    #[must_use]
    pub fn sighting_count(&self, theft: &TheftReport) -> usize {
        count_sightings(
            &theft.info.license_plate,
            &self.snapshot.sightings,
            self.settings.plate_match,
        )
    }

    /// Selects the report a click refers to.
    ///
    /// Returns the camera, sidebar, popup and overlay commands to apply.
    /// A click that resolves to no record changes nothing and returns no
    /// commands.
    pub fn select(&mut self, click: &MarkerClick) -> Vec<MapCommand> {
        let Some(selected) = resolve_click(click, &self.snapshot.thefts, &self.snapshot.sightings)
            .map(ReportRef::to_selected)
        else {
            log::debug!("Click on {:?} did not resolve to a report", click.report_type);
            return Vec::new();
        };

        let center = selected.coordinates();
        let report_type = selected.report_type();
        let id = selected.id().clone();
        log::debug!(
            "Selected {report_type} {id} ({})",
            selected.license_plate()
        );
        self.selection = Some(selected);

        let mut commands = vec![
            MapCommand::FlyTo {
                center,
                zoom: self.settings.select_zoom,
            },
            MapCommand::ScrollIntoView {
                report_type,
                id: id.clone(),
            },
            MapCommand::OpenPopup {
                report_type,
                id,
                coordinates: center,
            },
        ];
        commands.extend(self.sync_overlay());
        commands
    }

    /// Clears the selection and removes any overlay.
    pub fn deselect(&mut self) -> Vec<MapCommand> {
        self.selection = None;
        self.sync_overlay().into_iter().collect()
    }

    /// Recomputes the relation overlay for the selected plate.
    ///
    /// Returns `None` when the map already shows the right geometry.
    pub fn sync_overlay(&mut self) -> Option<MapCommand> {
        let next = self.selected_plate().and_then(|plate| {
            build_relation_overlay(
                plate,
                &self.snapshot.thefts,
                &self.snapshot.sightings,
                self.settings.plate_match,
            )
        });

        match self.overlay.apply(next) {
            OverlayUpdate::Unchanged => None,
            OverlayUpdate::Set(data) => Some(MapCommand::SetRelationOverlay { data }),
            OverlayUpdate::Remove => Some(MapCommand::RemoveRelationOverlay),
        }
    }
}
