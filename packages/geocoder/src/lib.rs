#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Address geocoding for report submission.
//!
//! Reports submitted without coordinates are placed on the map by looking
//! up their free-form address. The lookup goes through the [`Geocoder`]
//! trait so the server can swap the hosted provider for a stub in tests.
//!
//! The only bundled provider is Nominatim / `OpenStreetMap`
//! ([`nominatim::NominatimGeocoder`]), configured from the embedded TOML in
//! `services/` via [`service_registry`].

pub mod nominatim;
pub mod service_registry;

use async_trait::async_trait;
use auto_watch_report_models::Coordinates;
use thiserror::Error;

/// A geocoding result.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedAddress {
    /// Resolved coordinates.
    pub coordinates: Coordinates,
    /// The canonical address returned by the provider.
    pub matched_address: Option<String>,
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,
}

/// Resolves free-form addresses to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Looks up `query`, returning `None` when the provider has no match.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the provider cannot be reached or its
    /// response cannot be parsed.
    async fn geocode(&self, query: &str) -> Result<Option<GeocodedAddress>, GeocodeError>;
}
