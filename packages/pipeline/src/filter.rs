//! Report-type filter and plate search.

use auto_watch_report_models::{SightingReport, TheftReport};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::report_ref::ReportRef;
use crate::search::fuzzy_search;

/// Which report types to show.
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
pub enum ReportFilter {
    /// Thefts and sightings.
    #[default]
    All,
    /// Thefts only.
    Thefts,
    /// Sightings only.
    Sightings,
}

impl ReportFilter {
    const fn includes_thefts(self) -> bool {
        matches!(self, Self::All | Self::Thefts)
    }

    const fn includes_sightings(self) -> bool {
        matches!(self, Self::All | Self::Sightings)
    }
}

/// The subsets of each list left after filtering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredReports<'a> {
    /// Visible thefts in fetch order.
    pub thefts: Vec<&'a TheftReport>,
    /// Visible sightings in fetch order.
    pub sightings: Vec<&'a SightingReport>,
}

impl<'a> FilteredReports<'a> {
    /// Thefts followed by sightings, each in fetch order.
    #[must_use]
    pub fn combined(&self) -> Vec<ReportRef<'a>> {
        self.thefts
            .iter()
            .copied()
            .map(ReportRef::Theft)
            .chain(self.sightings.iter().copied().map(ReportRef::Sighting))
            .collect()
    }

    /// Total number of visible reports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.thefts.len() + self.sightings.len()
    }

    /// Whether nothing is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.thefts.is_empty() && self.sightings.is_empty()
    }
}

/// Applies the type filter, then the fuzzy plate search, to both lists.
#[must_use]
pub fn filter_reports<'a>(
    thefts: &'a [TheftReport],
    sightings: &'a [SightingReport],
    filter: ReportFilter,
    query: &str,
) -> FilteredReports<'a> {
    let thefts = if filter.includes_thefts() {
        thefts
            .iter()
            .filter(|r| fuzzy_search(query, &r.info.license_plate))
            .collect()
    } else {
        Vec::new()
    };

    let sightings = if filter.includes_sightings() {
        sightings
            .iter()
            .filter(|r| fuzzy_search(query, &r.info.license_plate))
            .collect()
    } else {
        Vec::new()
    };

    FilteredReports { thefts, sightings }
}
