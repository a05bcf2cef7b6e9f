//! Theft-to-sighting relation overlay.
//!
//! A theft and its sightings share a license plate. For the selected plate
//! the overlay is one line per sighting, drawn from the theft's location to
//! the sighting's location, and handed to the map as a single `GeoJSON`
//! source.

use auto_watch_report_models::{Coordinates, SightingReport, TheftReport};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// How plates are compared when relating sightings to a theft.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PlateMatch {
    /// Exact, case-sensitive string equality.
    #[default]
    Exact,
    /// Equality after Unicode lowercasing.
    CaseInsensitive,
}

impl PlateMatch {
    /// Compares two plates under this mode.
    #[must_use]
    pub fn matches(self, a: &str, b: &str) -> bool {
        match self {
            Self::Exact => a == b,
            Self::CaseInsensitive => a.to_lowercase() == b.to_lowercase(),
        }
    }
}

/// Line geometry connecting one theft to each of its sightings.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationOverlay {
    /// Plate the overlay was built for.
    pub license_plate: String,
    /// Theft location, the start of every segment.
    pub theft: Coordinates,
    /// Sighting locations in fetch order.
    pub sightings: Vec<Coordinates>,
}

impl RelationOverlay {
    /// `(theft, sighting)` pairs, one per sighting.
    pub fn segments(&self) -> impl Iterator<Item = (Coordinates, Coordinates)> + '_ {
        self.sightings.iter().map(|s| (self.theft, *s))
    }

    /// Whether the same segments would be drawn.
    #[must_use]
    pub fn same_geometry(&self, other: &Self) -> bool {
        self.theft == other.theft && self.sightings == other.sightings
    }

    /// One `LineString` feature per segment.
    #[must_use]
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let features = self
            .segments()
            .enumerate()
            .map(|(index, (from, to))| {
                let line = geo::LineString::from(vec![from.lng_lat(), to.lng_lat()]);

                let mut properties = JsonObject::new();
                properties.insert(
                    "licensePlate".to_string(),
                    serde_json::Value::String(self.license_plate.clone()),
                );
                properties.insert("sightingIndex".to_string(), serde_json::Value::from(index));

                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(geojson::Value::from(&line))),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

/// Builds the overlay for `plate`.
///
/// Uses the first theft with a matching plate. Returns `None` when no theft
/// or no sighting matches.
#[must_use]
pub fn build_relation_overlay(
    plate: &str,
    thefts: &[TheftReport],
    sightings: &[SightingReport],
    mode: PlateMatch,
) -> Option<RelationOverlay> {
    let theft = thefts
        .iter()
        .find(|t| mode.matches(&t.info.license_plate, plate))?;

    let related: Vec<Coordinates> = sightings
        .iter()
        .filter(|s| mode.matches(&s.info.license_plate, plate))
        .map(|s| s.location.coordinates)
        .collect();

    if related.is_empty() {
        return None;
    }

    Some(RelationOverlay {
        license_plate: theft.info.license_plate.clone(),
        theft: theft.location.coordinates,
        sightings: related,
    })
}

/// Number of sightings reported for `plate`.
#[must_use]
pub fn count_sightings(plate: &str, sightings: &[SightingReport], mode: PlateMatch) -> usize {
    sightings
        .iter()
        .filter(|s| mode.matches(&s.info.license_plate, plate))
        .count()
}

/// What the map layer has to do after an overlay recomputation.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayUpdate {
    /// Geometry is identical to what is already drawn.
    Unchanged,
    /// Replace (or create) the overlay source with this data.
    Set(FeatureCollection),
    /// Remove the overlay layer and source.
    Remove,
}

/// Remembers the last overlay handed to the map so identical recomputations
/// are skipped.
#[derive(Debug, Clone, Default)]
pub struct OverlayTracker {
    applied: Option<RelationOverlay>,
}

impl OverlayTracker {
    /// Creates a tracker with nothing applied.
    #[must_use]
    pub const fn new() -> Self {
        Self { applied: None }
    }

    /// The overlay currently drawn, if any.
    #[must_use]
    pub const fn applied(&self) -> Option<&RelationOverlay> {
        self.applied.as_ref()
    }

    /// Records `next` as the desired overlay and returns the map update.
    pub fn apply(&mut self, next: Option<RelationOverlay>) -> OverlayUpdate {
        let Some(next) = next else {
            return if self.applied.take().is_some() {
                OverlayUpdate::Remove
            } else {
                OverlayUpdate::Unchanged
            };
        };

        if self
            .applied
            .as_ref()
            .is_some_and(|current| current.same_geometry(&next))
        {
            return OverlayUpdate::Unchanged;
        }

        let data = next.to_feature_collection();
        log::debug!(
            "Applying relation overlay for {} ({} segments)",
            next.license_plate,
            next.sightings.len()
        );
        self.applied = Some(next);
        OverlayUpdate::Set(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sighting, theft};
    use serde_json::json;

    fn fixture() -> (Vec<TheftReport>, Vec<SightingReport>) {
        (
            vec![theft("t1", "ABC123", 0.0, 0.0, 0)],
            vec![
                sighting("s1", "ABC123", 1.0, 1.0, 0),
                sighting("s2", "ABC123", 2.0, 2.0, 0),
                sighting("s3", "OTHER", 3.0, 3.0, 0),
            ],
        )
    }

    #[test]
    fn one_line_per_matching_sighting() {
        let (thefts, sightings) = fixture();
        let overlay =
            build_relation_overlay("ABC123", &thefts, &sightings, PlateMatch::Exact).unwrap();

        let fc = overlay.to_feature_collection();
        assert_eq!(fc.features.len(), 2);
        for feature in &fc.features {
            let value = serde_json::to_value(feature).unwrap();
            assert_eq!(value["geometry"]["type"], "LineString");
            assert_eq!(value["geometry"]["coordinates"][0], json!([0.0, 0.0]));
        }

        let ends: Vec<Coordinates> = overlay.segments().map(|(_, to)| to).collect();
        assert_eq!(ends, [Coordinates::new(1.0, 1.0), Coordinates::new(2.0, 2.0)]);
    }

    #[test]
    fn unrelated_plate_has_no_overlay() {
        let (thefts, sightings) = fixture();
        assert!(build_relation_overlay("ZZZ999", &thefts, &sightings, PlateMatch::Exact).is_none());
        // sightings without a theft
        assert!(build_relation_overlay("OTHER", &thefts, &sightings, PlateMatch::Exact).is_none());
    }

    #[test]
    fn theft_without_sightings_has_no_overlay() {
        let thefts = vec![theft("t1", "LONELY", 0.0, 0.0, 0)];
        assert!(build_relation_overlay("LONELY", &thefts, &[], PlateMatch::Exact).is_none());
    }

    #[test]
    fn case_sensitivity_is_configurable() {
        let thefts = vec![theft("t1", "ABC123", 0.0, 0.0, 0)];
        let sightings = vec![sighting("s1", "abc123", 1.0, 1.0, 0)];

        assert!(build_relation_overlay("ABC123", &thefts, &sightings, PlateMatch::Exact).is_none());
        let overlay =
            build_relation_overlay("ABC123", &thefts, &sightings, PlateMatch::CaseInsensitive)
                .unwrap();
        assert_eq!(overlay.sightings.len(), 1);
        assert_eq!(count_sightings("ABC123", &sightings, PlateMatch::Exact), 0);
        assert_eq!(count_sightings("ABC123", &sightings, PlateMatch::CaseInsensitive), 1);
    }

    #[test]
    fn longitude_comes_first_in_geometry() {
        let thefts = vec![theft("t1", "P", 10.0, 20.0, 0)];
        let sightings = vec![sighting("s1", "P", 11.0, 21.0, 0)];
        let overlay = build_relation_overlay("P", &thefts, &sightings, PlateMatch::Exact).unwrap();

        let value = serde_json::to_value(&overlay.to_feature_collection().features[0]).unwrap();
        assert_eq!(
            value["geometry"]["coordinates"],
            json!([[20.0, 10.0], [21.0, 11.0]])
        );
        assert_eq!(value["properties"]["licensePlate"], "P");
    }

    #[test]
    fn tracker_skips_identical_geometry() {
        let (thefts, sightings) = fixture();
        let mut tracker = OverlayTracker::new();

        let first = build_relation_overlay("ABC123", &thefts, &sightings, PlateMatch::Exact);
        assert!(matches!(tracker.apply(first.clone()), OverlayUpdate::Set(_)));
        assert_eq!(tracker.apply(first), OverlayUpdate::Unchanged);

        assert_eq!(tracker.apply(None), OverlayUpdate::Remove);
        assert!(tracker.applied().is_none());
        assert_eq!(tracker.apply(None), OverlayUpdate::Unchanged);
    }

    #[test]
    fn tracker_replaces_changed_geometry() {
        let (thefts, mut sightings) = fixture();
        let mut tracker = OverlayTracker::new();
        tracker.apply(build_relation_overlay(
            "ABC123",
            &thefts,
            &sightings,
            PlateMatch::Exact,
        ));

        sightings.push(sighting("s4", "ABC123", 4.0, 4.0, 0));
        let update = tracker.apply(build_relation_overlay(
            "ABC123",
            &thefts,
            &sightings,
            PlateMatch::Exact,
        ));
        match update {
            OverlayUpdate::Set(fc) => assert_eq!(fc.features.len(), 3),
            other => panic!("expected Set, got {other:?}"),
        }
    }
}
