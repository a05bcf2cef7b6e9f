//! Nominatim / `OpenStreetMap` geocoder client.
//!
//! The public instance allows at most **1 request per second**; the client
//! spaces its own requests by the configured `rate_limit_ms`.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use std::time::Duration;

use async_trait::async_trait;
use auto_watch_report_models::Coordinates;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::service_registry::{GeocodingService, ProviderConfig};
use crate::{GeocodeError, GeocodedAddress, Geocoder};

/// Geocoder backed by a Nominatim search endpoint.
#[derive(Debug)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl NominatimGeocoder {
    /// Creates a client for `base_url`.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: String, min_interval: Duration) -> Self {
        Self {
            client,
            base_url,
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Builds a client from an embedded service configuration, optionally
    /// overriding its base URL.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the HTTP client cannot be built.
    pub fn from_service(
        service: &GeocodingService,
        base_url_override: Option<String>,
    ) -> Result<Self, GeocodeError> {
        let ProviderConfig::Nominatim {
            base_url,
            rate_limit_ms,
            user_agent,
        } = &service.provider;

        let mut builder = reqwest::Client::builder();
        if let Some(agent) = user_agent {
            builder = builder.user_agent(agent.clone());
        }

        Ok(Self::new(
            builder.build()?,
            base_url_override.unwrap_or_else(|| base_url.clone()),
            Duration::from_millis(*rate_limit_ms),
        ))
    }

    async fn wait_turn(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<GeocodedAddress>, GeocodeError> {
        self.wait_turn().await;
        geocode_freeform(&self.client, &self.base_url, query).await
    }
}

/// Geocodes a free-form query (street address, intersection or landmark).
///
/// # Errors
///
/// Returns [`GeocodeError`] if the HTTP request or response parsing fails.
pub async fn geocode_freeform(
    client: &reqwest::Client,
    base_url: &str,
    query: &str,
) -> Result<Option<GeocodedAddress>, GeocodeError> {
    log::debug!("Nominatim lookup: {query}");

    let resp = client
        .get(base_url)
        .query(&[("q", query), ("format", "jsonv2"), ("limit", "1")])
        .send()
        .await?;

    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(GeocodeError::RateLimited);
    }

    let body: serde_json::Value = resp.error_for_status()?.json().await?;
    parse_response(&body)
}

/// Parses Nominatim JSON response.
fn parse_response(body: &serde_json::Value) -> Result<Option<GeocodedAddress>, GeocodeError> {
    let results = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim response is not an array".to_string(),
    })?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let lat = parse_coordinate(first, "lat")?;
    let lon = parse_coordinate(first, "lon")?;

    Ok(Some(GeocodedAddress {
        coordinates: Coordinates::new(lat, lon),
        matched_address: first["display_name"].as_str().map(String::from),
    }))
}

fn parse_coordinate(result: &serde_json::Value, key: &str) -> Result<f64, GeocodeError> {
    result[key]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: format!("Missing {key} in Nominatim response"),
        })
}
