#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Actix-Web API server for the auto watch theft map.
//!
//! Accepts theft and sighting submissions, and hosts map sessions: each
//! session takes one snapshot of both report collections and derives the
//! sidebar list, marker styles, selection commands and the relation
//! overlay from it. Sessions live in process memory only.

pub mod config;
mod handlers;
pub mod interactive;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use auto_watch_database::ReportStore;
use auto_watch_database::firestore::FirestoreReportStore;
use auto_watch_database::sqlite::SqliteReportStore;
use auto_watch_geocoder::Geocoder;
use auto_watch_geocoder::nominatim::NominatimGeocoder;
use auto_watch_geocoder::service_registry;
use auto_watch_pipeline::session::MapSession;
use uuid::Uuid;

use crate::config::{ServerConfig, StoreBackend};

/// A hosted map session.
#[derive(Debug)]
pub struct SessionEntry {
    /// Derived map state.
    pub session: MapSession,
    /// Whether the initial fetch succeeded.
    pub loaded: bool,
}

/// Shared application state.
pub struct AppState {
    /// Report document store.
    pub store: Arc<dyn ReportStore>,
    /// Address lookup for submissions without coordinates.
    pub geocoder: Arc<dyn Geocoder>,
    /// Open map sessions keyed by id.
    pub sessions: Mutex<BTreeMap<Uuid, SessionEntry>>,
    /// Startup configuration.
    pub config: ServerConfig,
}

impl AppState {
    /// Creates state with no open sessions.
    #[must_use]
    pub fn new(
        store: Arc<dyn ReportStore>,
        geocoder: Arc<dyn Geocoder>,
        config: ServerConfig,
    ) -> Self {
        Self {
            store,
            geocoder,
            sessions: Mutex::new(BTreeMap::new()),
            config,
        }
    }

    /// Locks the session table.
    ///
    /// Sessions are plain data, so a poisoned lock is recovered rather than
    /// propagated.
    pub fn lock_sessions(&self) -> MutexGuard<'_, BTreeMap<Uuid, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Registers every `/api` route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/stats", web::get().to(handlers::stats))
            .route("/thefts", web::post().to(handlers::create_theft))
            .route("/thefts/{id}/prefill", web::get().to(handlers::prefill))
            .route("/sightings", web::post().to(handlers::create_sighting))
            .route("/sessions", web::post().to(handlers::create_session))
            .route("/sessions/{id}", web::get().to(handlers::get_session))
            .route("/sessions/{id}", web::delete().to(handlers::delete_session))
            .route(
                "/sessions/{id}/criteria",
                web::put().to(handlers::update_criteria),
            )
            .route("/sessions/{id}/selection", web::post().to(handlers::select))
            .route(
                "/sessions/{id}/selection",
                web::delete().to(handlers::deselect),
            )
            .route(
                "/sessions/{id}/reports/{report_type}/{report_id}",
                web::get().to(handlers::report_detail),
            ),
    );
}

async fn open_store(config: &ServerConfig) -> std::io::Result<Arc<dyn ReportStore>> {
    match config.store {
        StoreBackend::Sqlite => {
            log::info!("Opening report database...");
            let store = SqliteReportStore::open(&config.database_path)
                .await
                .map_err(std::io::Error::other)?;
            Ok(Arc::new(store))
        }
        StoreBackend::Firestore => {
            let project_id = config.firestore_project_id.clone().ok_or_else(|| {
                std::io::Error::other(config::ConfigError::Missing("FIRESTORE_PROJECT_ID"))
            })?;
            log::info!("Using Firestore project {project_id}");
            Ok(Arc::new(FirestoreReportStore::new(
                reqwest::Client::new(),
                project_id,
                config.firestore_api_key.clone(),
            )))
        }
    }
}

fn open_geocoder(config: &ServerConfig) -> std::io::Result<Arc<dyn Geocoder>> {
    let service = service_registry::default_service()
        .ok_or_else(|| std::io::Error::other("No geocoding service is enabled"))?;
    log::info!("Geocoding with {}", service.name);

    let geocoder = NominatimGeocoder::from_service(&service, config.geocoder_url.clone())
        .map_err(std::io::Error::other)?;
    Ok(Arc::new(geocoder))
}

/// Starts the auto watch API server.
///
/// Reads [`ServerConfig`] from the environment, opens the report store and
/// the geocoder, and starts the Actix-Web HTTP server. This is a regular
/// async function; the caller provides the runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the configuration is invalid, the
/// store cannot be opened, or the HTTP server fails to bind or run.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    let config = ServerConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let store = open_store(&config).await?;
    let geocoder = open_geocoder(&config)?;

    let bind_addr = config.bind_addr.clone();
    let port = config.port;
    let state = web::Data::new(AppState::new(store, geocoder, config));

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
