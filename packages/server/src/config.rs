//! Server configuration read from environment variables.

use std::path::PathBuf;

use auto_watch_database::sqlite::DEFAULT_DB_PATH;
use auto_watch_pipeline::relation::PlateMatch;
use auto_watch_pipeline::session::{DEFAULT_SELECT_ZOOM, SessionSettings};
use auto_watch_report_models::Coordinates;
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Map center used when the user's location is unknown (Los Angeles).
pub const DEFAULT_FALLBACK_CENTER: Coordinates = Coordinates::new(34.0522, -118.2437);

/// Zoom of a freshly opened map.
pub const DEFAULT_INITIAL_ZOOM: f64 = 12.0;

/// Errors from reading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable holds a value that cannot be parsed.
    #[error("Invalid value for {name}: {value:?}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
    },

    /// A variable required by the chosen setup is not set.
    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Which document store holds the reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum StoreBackend {
    /// Local `SQLite` file.
    #[default]
    Sqlite,
    /// Hosted Firestore project.
    Firestore,
}

/// Everything the server reads from its environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Interface to bind (`BIND_ADDR`).
    pub bind_addr: String,
    /// Port to listen on (`PORT`).
    pub port: u16,
    /// Report store backend (`REPORT_STORE`).
    pub store: StoreBackend,
    /// `SQLite` file path (`DATABASE_PATH`).
    pub database_path: PathBuf,
    /// Firestore project (`FIRESTORE_PROJECT_ID`).
    pub firestore_project_id: Option<String>,
    /// Firestore web API key (`FIRESTORE_API_KEY`).
    pub firestore_api_key: Option<String>,
    /// Geocoder endpoint override (`GEOCODER_URL`).
    pub geocoder_url: Option<String>,
    /// Map center without a user location
    /// (`FALLBACK_LATITUDE`, `FALLBACK_LONGITUDE`).
    pub fallback_center: Coordinates,
    /// Zoom of a freshly opened map (`INITIAL_ZOOM`).
    pub initial_zoom: f64,
    /// Zoom the camera flies to on selection (`SELECT_ZOOM`).
    pub select_zoom: f64,
    /// Plate comparison mode (`PLATE_MATCH`).
    pub plate_match: PlateMatch,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            store: StoreBackend::default(),
            database_path: PathBuf::from(DEFAULT_DB_PATH),
            firestore_project_id: None,
            firestore_api_key: None,
            geocoder_url: None,
            fallback_center: DEFAULT_FALLBACK_CENTER,
            initial_zoom: DEFAULT_INITIAL_ZOOM,
            select_zoom: DEFAULT_SELECT_ZOOM,
            plate_match: PlateMatch::default(),
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    ///
    /// Unset variables fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable cannot be parsed, or if the
    /// Firestore backend is selected without a project id.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let text = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let config = Self {
            bind_addr: text("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: parse(&lookup, "PORT")?.unwrap_or(defaults.port),
            store: parse(&lookup, "REPORT_STORE")?.unwrap_or(defaults.store),
            database_path: text("DATABASE_PATH").map_or(defaults.database_path, PathBuf::from),
            firestore_project_id: text("FIRESTORE_PROJECT_ID"),
            firestore_api_key: text("FIRESTORE_API_KEY"),
            geocoder_url: text("GEOCODER_URL"),
            fallback_center: Coordinates::new(
                parse(&lookup, "FALLBACK_LATITUDE")?.unwrap_or(defaults.fallback_center.latitude),
                parse(&lookup, "FALLBACK_LONGITUDE")?
                    .unwrap_or(defaults.fallback_center.longitude),
            ),
            initial_zoom: parse(&lookup, "INITIAL_ZOOM")?.unwrap_or(defaults.initial_zoom),
            select_zoom: parse(&lookup, "SELECT_ZOOM")?.unwrap_or(defaults.select_zoom),
            plate_match: parse(&lookup, "PLATE_MATCH")?.unwrap_or(defaults.plate_match),
        };

        if config.store == StoreBackend::Firestore && config.firestore_project_id.is_none() {
            return Err(ConfigError::Missing("FIRESTORE_PROJECT_ID"));
        }

        Ok(config)
    }

    /// Per-session tunables derived from this configuration.
    #[must_use]
    pub const fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            select_zoom: self.select_zoom,
            plate_match: self.plate_match,
        }
    }
}

fn parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::Invalid { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(config(&[]).unwrap(), ServerConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("PORT", "9000"),
            ("PLATE_MATCH", "case_insensitive"),
            ("SELECT_ZOOM", "17"),
            ("FALLBACK_LATITUDE", "40.7"),
            ("DATABASE_PATH", "/tmp/r.db"),
        ])
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.plate_match, PlateMatch::CaseInsensitive);
        assert!((config.session_settings().select_zoom - 17.0).abs() < f64::EPSILON);
        assert!((config.fallback_center.latitude - 40.7).abs() < f64::EPSILON);
        assert!((config.fallback_center.longitude - -118.2437).abs() < f64::EPSILON);
        assert_eq!(config.database_path, PathBuf::from("/tmp/r.db"));
    }

    #[test]
    fn rejects_unparseable_values() {
        assert!(matches!(
            config(&[("PORT", "eighty")]),
            Err(ConfigError::Invalid { name: "PORT", .. })
        ));
        assert!(config(&[("REPORT_STORE", "postgres")]).is_err());
    }

    #[test]
    fn firestore_needs_a_project() {
        assert!(matches!(
            config(&[("REPORT_STORE", "firestore")]),
            Err(ConfigError::Missing("FIRESTORE_PROJECT_ID"))
        ));
        let config = config(&[
            ("REPORT_STORE", "firestore"),
            ("FIRESTORE_PROJECT_ID", "demo"),
        ])
        .unwrap();
        assert_eq!(config.store, StoreBackend::Firestore);
    }
}
