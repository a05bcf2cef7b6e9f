//! HTTP request handlers for the API endpoints.

use actix_web::{HttpResponse, web};
use auto_watch_database::documents;
use auto_watch_geocoder::GeocodeError;
use auto_watch_pipeline::selection::resolve_by_id;
use auto_watch_pipeline::session::{MapSession, ReportSnapshot, ViewCriteria};
use auto_watch_report_models::{
    Location, NewLocation, NewSightingReport, NewTheftReport, ReportDate, ReportId, ReportType,
    VehiclePrefill,
};
use auto_watch_server_models::{
    ApiCreated, ApiFieldError, ApiHealth, ApiMapView, ApiReportDetail, ApiSelectionResponse,
    ApiSessionCreated, ApiSessionView, ApiStats, CreateSessionRequest, SelectRequest,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{AppState, SessionEntry};

/// Message shown when the geocoder has no match for an address.
const NO_RESULTS: &str = "No results found for this address";

fn error_response(mut builder: actix_web::HttpResponseBuilder, message: &str) -> HttpResponse {
    builder.json(serde_json::json!({ "error": message }))
}

fn session_not_found(id: Uuid) -> HttpResponse {
    error_response(HttpResponse::NotFound(), &format!("Session {id} not found"))
}

fn field_error(field: &str, error: &str) -> HttpResponse {
    HttpResponse::UnprocessableEntity().json(ApiFieldError {
        field: field.to_string(),
        error: error.to_string(),
    })
}

fn require(field: &str, label: &str, value: &str) -> Result<(), HttpResponse> {
    if value.trim().is_empty() {
        return Err(field_error(field, &format!("{label} is required")));
    }
    Ok(())
}

/// Uses the submitted coordinates, or geocodes the address when there are
/// none.
async fn resolve_location(
    state: &AppState,
    location: NewLocation,
) -> Result<Location, HttpResponse> {
    if let Some(coordinates) = location.coordinates {
        return Ok(location.resolve(coordinates));
    }

    require("address", "Address", &location.address)?;

    match state.geocoder.geocode(location.address.trim()).await {
        Ok(Some(found)) => {
            log::debug!(
                "Geocoded {:?} to {:?} ({})",
                location.address,
                found.coordinates,
                found.matched_address.as_deref().unwrap_or("no match text")
            );
            Ok(location.resolve(found.coordinates))
        }
        Ok(None) => {
            log::info!("No geocoding results for {:?}", location.address);
            Err(field_error("address", NO_RESULTS))
        }
        Err(e @ GeocodeError::RateLimited) => {
            log::warn!("Geocoder refused {:?}: {e}", location.address);
            Err(error_response(HttpResponse::BadGateway(), "Geocoder is busy"))
        }
        Err(e) => {
            log::error!("Failed to geocode {:?}: {e}", location.address);
            Err(error_response(
                HttpResponse::BadGateway(),
                "Failed to geocode address",
            ))
        }
    }
}

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.store.name().to_string(),
    })
}

/// `GET /api/stats`
///
/// Counts every stored theft and sighting.
pub async fn stats(state: web::Data<AppState>) -> HttpResponse {
    match documents::fetch_all_reports(state.store.as_ref()).await {
        Ok((thefts, sightings)) => HttpResponse::Ok().json(ApiStats {
            thefts: thefts.len(),
            sightings: sightings.len(),
        }),
        Err(e) => {
            log::error!("Failed to fetch reports: {e}");
            error_response(
                HttpResponse::InternalServerError(),
                "Failed to fetch reports",
            )
        }
    }
}

/// `POST /api/thefts`
///
/// Stores a theft report. The location is geocoded when the client sent
/// no coordinates, and a missing date becomes the submission time.
pub async fn create_theft(
    state: web::Data<AppState>,
    body: web::Json<NewTheftReport>,
) -> HttpResponse {
    let NewTheftReport {
        contact,
        mut info,
        location,
    } = body.into_inner();

    if let Err(resp) = require("licensePlate", "License plate", &info.license_plate)
        .and_then(|()| require("brand", "Make", &info.brand))
        .and_then(|()| require("model", "Model", &info.model))
    {
        return resp;
    }

    let location = match resolve_location(&state, location).await {
        Ok(location) => location,
        Err(resp) => return resp,
    };

    if info.date.is_missing() {
        info.date = ReportDate::now();
    }

    match documents::insert_theft(state.store.as_ref(), contact, info, location).await {
        Ok(report) => HttpResponse::Created().json(ApiCreated { id: report.id }),
        Err(e) => {
            log::error!("Failed to store theft report: {e}");
            error_response(
                HttpResponse::InternalServerError(),
                "Failed to store theft report",
            )
        }
    }
}

/// `POST /api/sightings`
///
/// Stores a sighting report; location and date are completed the same way
/// as for thefts.
pub async fn create_sighting(
    state: web::Data<AppState>,
    body: web::Json<NewSightingReport>,
) -> HttpResponse {
    let NewSightingReport {
        contact,
        mut info,
        location,
    } = body.into_inner();

    if let Err(resp) = require("licensePlate", "License plate", &info.license_plate) {
        return resp;
    }

    let location = match resolve_location(&state, location).await {
        Ok(location) => location,
        Err(resp) => return resp,
    };

    if info.date.is_missing() {
        info.date = ReportDate::now();
    }

    match documents::insert_sighting(state.store.as_ref(), contact, info, location).await {
        Ok(report) => HttpResponse::Created().json(ApiCreated { id: report.id }),
        Err(e) => {
            log::error!("Failed to store sighting report: {e}");
            error_response(
                HttpResponse::InternalServerError(),
                "Failed to store sighting report",
            )
        }
    }
}

/// `GET /api/thefts/{id}/prefill`
///
/// Vehicle details to carry into a new sighting form.
pub async fn prefill(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let id = ReportId(path.into_inner());

    match documents::fetch_thefts(state.store.as_ref()).await {
        Ok(thefts) => thefts.iter().find(|t| t.id == id).map_or_else(
            || error_response(HttpResponse::NotFound(), &format!("Theft {id} not found")),
            |theft| HttpResponse::Ok().json(VehiclePrefill::from(theft)),
        ),
        Err(e) => {
            log::error!("Failed to fetch thefts: {e}");
            error_response(
                HttpResponse::InternalServerError(),
                "Failed to fetch thefts",
            )
        }
    }
}

/// `POST /api/sessions`
///
/// Opens a map session over a fresh snapshot of both collections. A failed
/// fetch still opens the session, empty and marked as not loaded.
pub async fn create_session(
    state: web::Data<AppState>,
    body: web::Json<CreateSessionRequest>,
) -> HttpResponse {
    let request = body.into_inner();

    if request.location.is_none() {
        log::warn!(
            "Geolocation unavailable ({}), centering on fallback",
            request
                .geolocation_error
                .as_deref()
                .unwrap_or("no position sent")
        );
    }
    let center = request.location.unwrap_or(state.config.fallback_center);

    let (snapshot, loaded) = match documents::fetch_all_reports(state.store.as_ref()).await {
        Ok((thefts, sightings)) => (ReportSnapshot { thefts, sightings }, true),
        Err(e) => {
            log::error!("Failed to fetch reports for new session: {e}");
            (ReportSnapshot::default(), false)
        }
    };

    let session = MapSession::new(
        snapshot,
        request.location,
        state.config.session_settings(),
    );
    let id = Uuid::new_v4();
    let view = ApiSessionView::new(id, loaded, &session, Utc::now());

    state
        .lock_sessions()
        .insert(id, SessionEntry { session, loaded });
    log::info!("Opened session {id} (loaded: {loaded})");

    HttpResponse::Created().json(ApiSessionCreated {
        map: ApiMapView {
            center,
            zoom: state.config.initial_zoom,
        },
        session: view,
    })
}

/// `GET /api/sessions/{id}`
pub async fn get_session(state: web::Data<AppState>, path: web::Path<Uuid>) -> HttpResponse {
    let id = path.into_inner();
    let sessions = state.lock_sessions();

    sessions.get(&id).map_or_else(
        || session_not_found(id),
        |entry| {
            HttpResponse::Ok().json(ApiSessionView::new(
                id,
                entry.loaded,
                &entry.session,
                Utc::now(),
            ))
        },
    )
}

/// `DELETE /api/sessions/{id}`
pub async fn delete_session(state: web::Data<AppState>, path: web::Path<Uuid>) -> HttpResponse {
    let id = path.into_inner();

    if state.lock_sessions().remove(&id).is_some() {
        log::info!("Closed session {id}");
        HttpResponse::NoContent().finish()
    } else {
        session_not_found(id)
    }
}

/// `PUT /api/sessions/{id}/criteria`
///
/// Replaces the filter, search and sort inputs and returns the new list.
pub async fn update_criteria(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<ViewCriteria>,
) -> HttpResponse {
    let id = path.into_inner();
    let mut sessions = state.lock_sessions();

    let Some(entry) = sessions.get_mut(&id) else {
        return session_not_found(id);
    };

    entry.session.set_criteria(body.into_inner());
    HttpResponse::Ok().json(ApiSessionView::new(
        id,
        entry.loaded,
        &entry.session,
        Utc::now(),
    ))
}

/// `POST /api/sessions/{id}/selection`
///
/// Selects the report a marker or card click refers to. A click that
/// matches no report yields no commands.
pub async fn select(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<SelectRequest>,
) -> HttpResponse {
    let id = path.into_inner();
    let mut sessions = state.lock_sessions();

    let Some(entry) = sessions.get_mut(&id) else {
        return session_not_found(id);
    };

    let commands = entry.session.select(&body);
    HttpResponse::Ok().json(ApiSelectionResponse {
        commands,
        session: ApiSessionView::new(id, entry.loaded, &entry.session, Utc::now()),
    })
}

/// `DELETE /api/sessions/{id}/selection`
pub async fn deselect(state: web::Data<AppState>, path: web::Path<Uuid>) -> HttpResponse {
    let id = path.into_inner();
    let mut sessions = state.lock_sessions();

    let Some(entry) = sessions.get_mut(&id) else {
        return session_not_found(id);
    };

    let commands = entry.session.deselect();
    HttpResponse::Ok().json(ApiSelectionResponse {
        commands,
        session: ApiSessionView::new(id, entry.loaded, &entry.session, Utc::now()),
    })
}

/// `GET /api/sessions/{id}/reports/{report_type}/{report_id}`
///
/// Popup content for one report in the session's snapshot.
pub async fn report_detail(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, ReportType, String)>,
) -> HttpResponse {
    let (id, report_type, report_id) = path.into_inner();
    let report_id = ReportId(report_id);
    let sessions = state.lock_sessions();

    let Some(entry) = sessions.get(&id) else {
        return session_not_found(id);
    };

    let snapshot = entry.session.snapshot();
    resolve_by_id(report_type, &report_id, &snapshot.thefts, &snapshot.sightings).map_or_else(
        || {
            error_response(
                HttpResponse::NotFound(),
                &format!("No {report_type} report {report_id}"),
            )
        },
        |report| {
            HttpResponse::Ok().json(ApiReportDetail::new(&entry.session, report, Utc::now()))
        },
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test};
    use async_trait::async_trait;
    use auto_watch_database::memory::MemoryReportStore;
    use auto_watch_database::{ReportStore as _, documents};
    use auto_watch_geocoder::{GeocodeError, GeocodedAddress, Geocoder};
    use auto_watch_report_models::{
        Contact, Coordinates, Location, ReportType, SightingInfo, TheftInfo,
    };
    use serde_json::{Value, json};

    use crate::config::ServerConfig;
    use crate::{AppState, configure};

    use super::*;

    struct StubGeocoder;

    #[async_trait]
    impl Geocoder for StubGeocoder {
        async fn geocode(&self, query: &str) -> Result<Option<GeocodedAddress>, GeocodeError> {
            match query {
                "nowhere" => Ok(None),
                "offline" => Err(GeocodeError::Parse {
                    message: "connection reset".to_string(),
                }),
                _ => Ok(Some(GeocodedAddress {
                    coordinates: Coordinates::new(10.0, 20.0),
                    matched_address: Some(query.to_string()),
                })),
            }
        }
    }

    fn state(store: Arc<MemoryReportStore>) -> web::Data<AppState> {
        web::Data::new(AppState::new(
            store,
            Arc::new(StubGeocoder),
            ServerConfig::default(),
        ))
    }

    fn theft_body(address: &str) -> Value {
        json!({
            "contact": {"name": "Ana", "phone": "555-0100", "context": ""},
            "info": {
                "brand": "Toyota",
                "model": "Camry",
                "color": "White",
                "year": 2020,
                "licensePlate": "ABC123",
                "plateProvince": "CA",
                "type": "sedan"
            },
            "location": {"address": address}
        })
    }

    async fn seed(store: &MemoryReportStore) -> (ReportId, ReportId, ReportId) {
        let location = |lat, lng| Location {
            address: "Somewhere".to_string(),
            coordinates: Coordinates::new(lat, lng),
        };
        let theft = |plate: &str, millis| TheftInfo {
            brand: "Honda".to_string(),
            model: "Civic".to_string(),
            color: "Blue".to_string(),
            year: None,
            license_plate: plate.to_string(),
            plate_province: String::new(),
            vehicle_type: String::new(),
            date: ReportDate::EpochMillis(millis),
            photo: None,
        };

        let t1 = documents::insert_theft(
            store,
            Contact::default(),
            theft("ABC123", 100),
            location(0.0, 0.0),
        )
        .await
        .unwrap();
        let t2 = documents::insert_theft(
            store,
            Contact::default(),
            theft("XYZ789", 300),
            location(5.0, 5.0),
        )
        .await
        .unwrap();
        let s1 = documents::insert_sighting(
            store,
            Contact::default(),
            SightingInfo {
                license_plate: "ABC123".to_string(),
                date: ReportDate::EpochMillis(200),
                photo: None,
            },
            location(1.0, 1.0),
        )
        .await
        .unwrap();

        (t1.id, t2.id, s1.id)
    }

    fn command_types(body: &Value) -> Vec<String> {
        body["commands"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["type"].as_str().unwrap().to_string())
            .collect()
    }

    #[actix_web::test]
    async fn health_reports_store_backend() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(MemoryReportStore::new())))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], true);
        assert_eq!(body["store"], "memory");
    }

    #[actix_web::test]
    async fn theft_submission_is_geocoded_and_dated() {
        let store = Arc::new(MemoryReportStore::new());
        let app =
            test::init_service(App::new().app_data(state(store.clone())).configure(configure))
                .await;

        let req = test::TestRequest::post()
            .uri("/api/thefts")
            .set_json(theft_body("100 Main St"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        let id = created["id"].as_str().unwrap().to_string();

        let thefts = documents::fetch_thefts(store.as_ref()).await.unwrap();
        assert_eq!(thefts.len(), 1);
        assert_eq!(thefts[0].id.as_str(), id);
        assert_eq!(thefts[0].location.coordinates, Coordinates::new(10.0, 20.0));
        assert!(thefts[0].info.date.is_recognized());

        let req = test::TestRequest::get()
            .uri(&format!("/api/thefts/{id}/prefill"))
            .to_request();
        let prefill: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            prefill,
            json!({
                "licensePlate": "ABC123",
                "make": "Toyota",
                "model": "Camry",
                "color": "White",
                "year": 2020
            })
        );

        let req = test::TestRequest::get().uri("/api/stats").to_request();
        let stats: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stats, json!({"thefts": 1, "sightings": 0}));
    }

    #[actix_web::test]
    async fn submitted_coordinates_skip_geocoding() {
        let store = Arc::new(MemoryReportStore::new());
        let app =
            test::init_service(App::new().app_data(state(store.clone())).configure(configure))
                .await;

        let req = test::TestRequest::post()
            .uri("/api/sightings")
            .set_json(json!({
                "info": {"licensePlate": "ABC123", "date": {"seconds": 5}},
                "location": {"address": "nowhere", "coordinates": {"latitude": 1.5, "longitude": 2.5}}
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let sightings = documents::fetch_sightings(store.as_ref()).await.unwrap();
        assert_eq!(sightings[0].location.coordinates, Coordinates::new(1.5, 2.5));
        assert_eq!(sightings[0].info.date, ReportDate::Seconds { seconds: 5 });
    }

    #[actix_web::test]
    async fn geocoding_miss_is_an_inline_address_error() {
        let store = Arc::new(MemoryReportStore::new());
        let app =
            test::init_service(App::new().app_data(state(store.clone())).configure(configure))
                .await;

        let req = test::TestRequest::post()
            .uri("/api/thefts")
            .set_json(theft_body("nowhere"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({"field": "address", "error": "No results found for this address"})
        );

        let req = test::TestRequest::post()
            .uri("/api/thefts")
            .set_json(theft_body("offline"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        assert!(store.fetch_all(ReportType::Theft).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn required_fields_are_checked() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(MemoryReportStore::new())))
                .configure(configure),
        )
        .await;

        let mut body = theft_body("100 Main St");
        body["info"]["licensePlate"] = json!("  ");
        let req = test::TestRequest::post()
            .uri("/api/thefts")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let error: Value = test::read_body_json(resp).await;
        assert_eq!(error["field"], "licensePlate");

        let req = test::TestRequest::post()
            .uri("/api/sightings")
            .set_json(json!({
                "info": {"licensePlate": "ABC123"},
                "location": {"address": ""}
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let error: Value = test::read_body_json(resp).await;
        assert_eq!(error["field"], "address");
    }

    #[actix_web::test]
    async fn session_selection_lifecycle() {
        let store = Arc::new(MemoryReportStore::new());
        let (t1, _t2, s1) = seed(&store).await;
        let app =
            test::init_service(App::new().app_data(state(store.clone())).configure(configure))
                .await;

        let req = test::TestRequest::post()
            .uri("/api/sessions")
            .set_json(json!({"location": {"latitude": 0.0, "longitude": 0.0}}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["map"]["center"]["latitude"], 0.0);
        assert_eq!(created["session"]["loaded"], true);
        let session_id = created["session"]["id"].as_str().unwrap().to_string();

        let plates: Vec<&str> = created["session"]["reports"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["licensePlate"].as_str().unwrap())
            .collect();
        assert_eq!(plates, vec!["XYZ789", "ABC123", "ABC123"]);

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{session_id}/selection"))
            .set_json(json!({"reportType": "theft", "id": t1.as_str()}))
            .to_request();
        let selected: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            command_types(&selected),
            vec!["flyTo", "scrollIntoView", "openPopup", "setRelationOverlay"]
        );
        assert_eq!(
            selected["commands"][3]["data"]["features"]
                .as_array()
                .unwrap()
                .len(),
            1
        );
        let faded: Vec<f64> = selected["session"]["reports"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["marker"]["opacity"].as_f64().unwrap())
            .collect();
        assert!((faded[0] - 0.3).abs() < 1e-6);
        assert!((faded[1] - 1.0).abs() < 1e-6);

        let req = test::TestRequest::get()
            .uri(&format!(
                "/api/sessions/{session_id}/reports/sighting/{}",
                s1.as_str()
            ))
            .to_request();
        let detail: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(detail["reportType"], "sighting");
        assert!(detail["prefill"].is_null());

        let req = test::TestRequest::put()
            .uri(&format!("/api/sessions/{session_id}/criteria"))
            .set_json(json!({"filter": "thefts", "sortBy": "alphabetical", "sortOrder": "asc"}))
            .to_request();
        let view: Value = test::call_and_read_body_json(&app, req).await;
        let plates: Vec<&str> = view["reports"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["licensePlate"].as_str().unwrap())
            .collect();
        assert_eq!(plates, vec!["ABC123", "XYZ789"]);
        assert_eq!(view["selection"]["id"], t1.as_str());

        let req = test::TestRequest::delete()
            .uri(&format!("/api/sessions/{session_id}/selection"))
            .to_request();
        let cleared: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(command_types(&cleared), vec!["removeRelationOverlay"]);
        assert!(cleared["session"]["selection"].is_null());

        let req = test::TestRequest::delete()
            .uri(&format!("/api/sessions/{session_id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::get()
            .uri(&format!("/api/sessions/{session_id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn unresolved_click_changes_nothing() {
        let store = Arc::new(MemoryReportStore::new());
        seed(&store).await;
        let app =
            test::init_service(App::new().app_data(state(store.clone())).configure(configure))
                .await;

        let req = test::TestRequest::post()
            .uri("/api/sessions")
            .set_json(json!({}))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let session_id = created["session"]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{session_id}/selection"))
            .set_json(json!({
                "reportType": "sighting",
                "coordinates": {"latitude": 1.000_000_1, "longitude": 1.0}
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["commands"].as_array().unwrap().is_empty());
        assert!(body["session"]["selection"].is_null());
    }

    #[actix_web::test]
    async fn failed_fetch_opens_empty_session_at_fallback() {
        let store = Arc::new(MemoryReportStore::new());
        seed(&store).await;
        store.set_unavailable(true);
        let app =
            test::init_service(App::new().app_data(state(store.clone())).configure(configure))
                .await;

        let req = test::TestRequest::post()
            .uri("/api/sessions")
            .set_json(json!({"geolocationError": "User denied Geolocation"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;

        assert_eq!(created["session"]["loaded"], false);
        assert!(created["session"]["reports"].as_array().unwrap().is_empty());
        assert_eq!(created["map"]["center"]["latitude"], 34.0522);
        assert_eq!(created["map"]["zoom"], 12.0);

        let req = test::TestRequest::get().uri("/api/stats").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn unknown_sessions_and_reports_are_not_found() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(MemoryReportStore::new())))
                .configure(configure),
        )
        .await;

        let missing = Uuid::new_v4();
        for req in [
            test::TestRequest::get()
                .uri(&format!("/api/sessions/{missing}"))
                .to_request(),
            test::TestRequest::delete()
                .uri(&format!("/api/sessions/{missing}/selection"))
                .to_request(),
            test::TestRequest::get()
                .uri("/api/thefts/nope/prefill")
                .to_request(),
        ] {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        }
    }
}
