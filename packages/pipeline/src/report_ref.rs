//! Borrowed, type-tagged view over either report kind.

use auto_watch_report_models::{
    Coordinates, ReportDate, ReportId, ReportType, SelectedReport, SightingReport, TheftReport,
};

/// A reference to a theft or sighting held in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportRef<'a> {
    /// A theft report.
    Theft(&'a TheftReport),
    /// A sighting report.
    Sighting(&'a SightingReport),
}

impl<'a> ReportRef<'a> {
    /// Report type tag.
    #[must_use]
    pub const fn report_type(self) -> ReportType {
        match self {
            Self::Theft(_) => ReportType::Theft,
            Self::Sighting(_) => ReportType::Sighting,
        }
    }

    /// Store identifier.
    #[must_use]
    pub const fn id(self) -> &'a ReportId {
        match self {
            Self::Theft(r) => &r.id,
            Self::Sighting(r) => &r.id,
        }
    }

    /// License plate.
    #[must_use]
    pub fn license_plate(self) -> &'a str {
        match self {
            Self::Theft(r) => &r.info.license_plate,
            Self::Sighting(r) => &r.info.license_plate,
        }
    }

    /// Report date in its stored shape.
    #[must_use]
    pub const fn date(self) -> &'a ReportDate {
        match self {
            Self::Theft(r) => &r.info.date,
            Self::Sighting(r) => &r.info.date,
        }
    }

    /// Location coordinates as stored.
    #[must_use]
    pub const fn coordinates(self) -> Coordinates {
        match self {
            Self::Theft(r) => r.location.coordinates,
            Self::Sighting(r) => r.location.coordinates,
        }
    }

    /// Free-form address.
    #[must_use]
    pub fn address(self) -> &'a str {
        match self {
            Self::Theft(r) => &r.location.address,
            Self::Sighting(r) => &r.location.address,
        }
    }

    /// Clones the referenced report into an owned [`SelectedReport`].
    #[must_use]
    pub fn to_selected(self) -> SelectedReport {
        match self {
            Self::Theft(r) => SelectedReport::Theft(r.clone()),
            Self::Sighting(r) => SelectedReport::Sighting(r.clone()),
        }
    }

    /// Whether this reference points at the given selection.
    #[must_use]
    pub fn is(self, selected: &SelectedReport) -> bool {
        self.report_type() == selected.report_type() && self.id() == selected.id()
    }
}
