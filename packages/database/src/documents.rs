//! Typed reads and writes on top of a [`ReportStore`].

use auto_watch_report_models::{
    Contact, Location, ReportType, SightingInfo, SightingReport, TheftInfo, TheftReport,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{DbError, ReportStore, StoredDocument};

#[derive(Serialize)]
struct ReportDocument<'a, I> {
    contact: &'a Contact,
    info: &'a I,
    location: &'a Location,
}

/// Fetches all theft reports.
///
/// Documents that do not match the theft shape are skipped with a warning.
///
/// # Errors
///
/// Returns [`DbError`] if the store cannot be read.
pub async fn fetch_thefts(store: &dyn ReportStore) -> Result<Vec<TheftReport>, DbError> {
    let documents = store.fetch_all(ReportType::Theft).await?;
    Ok(decode_all(ReportType::Theft, documents))
}

/// Fetches all sighting reports.
///
/// Documents that do not match the sighting shape are skipped with a
/// warning.
///
/// # Errors
///
/// Returns [`DbError`] if the store cannot be read.
pub async fn fetch_sightings(store: &dyn ReportStore) -> Result<Vec<SightingReport>, DbError> {
    let documents = store.fetch_all(ReportType::Sighting).await?;
    Ok(decode_all(ReportType::Sighting, documents))
}

/// Fetches both collections.
///
/// # Errors
///
/// Returns [`DbError`] if either collection cannot be read.
pub async fn fetch_all_reports(
    store: &dyn ReportStore,
) -> Result<(Vec<TheftReport>, Vec<SightingReport>), DbError> {
    let thefts = fetch_thefts(store).await?;
    let sightings = fetch_sightings(store).await?;
    log::info!(
        "Fetched {} thefts and {} sightings from {}",
        thefts.len(),
        sightings.len(),
        store.name()
    );
    Ok((thefts, sightings))
}

/// Appends a theft report and returns it with its new id.
///
/// # Errors
///
/// Returns [`DbError`] if serialization or the write fails.
pub async fn insert_theft(
    store: &dyn ReportStore,
    contact: Contact,
    info: TheftInfo,
    location: Location,
) -> Result<TheftReport, DbError> {
    let body = serde_json::to_value(ReportDocument {
        contact: &contact,
        info: &info,
        location: &location,
    })?;
    let id = store.insert(ReportType::Theft, body).await?;
    log::info!("New theft marker {id} for {}", info.license_plate);

    Ok(TheftReport {
        id,
        contact,
        info,
        location,
    })
}

/// Appends a sighting report and returns it with its new id.
///
/// # Errors
///
/// Returns [`DbError`] if serialization or the write fails.
pub async fn insert_sighting(
    store: &dyn ReportStore,
    contact: Contact,
    info: SightingInfo,
    location: Location,
) -> Result<SightingReport, DbError> {
    let body = serde_json::to_value(ReportDocument {
        contact: &contact,
        info: &info,
        location: &location,
    })?;
    let id = store.insert(ReportType::Sighting, body).await?;
    log::info!("New sighting marker {id} for {}", info.license_plate);

    Ok(SightingReport {
        id,
        contact,
        info,
        location,
    })
}

fn decode_all<T: DeserializeOwned>(collection: ReportType, documents: Vec<StoredDocument>) -> Vec<T> {
    documents
        .into_iter()
        .filter_map(|doc| {
            let id = doc.id.clone();
            match decode(doc) {
                Ok(report) => Some(report),
                Err(e) => {
                    log::warn!("Skipping malformed {collection} document {id}: {e}");
                    None
                }
            }
        })
        .collect()
}

fn decode<T: DeserializeOwned>(doc: StoredDocument) -> Result<T, DbError> {
    let Value::Object(mut map) = doc.body else {
        return Err(DbError::Conversion {
            message: "document body is not an object".to_string(),
        });
    };
    map.insert("id".to_string(), Value::String(doc.id.0));
    Ok(serde_json::from_value(Value::Object(map))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryReportStore;
    use auto_watch_report_models::{Coordinates, ReportDate};
    use serde_json::json;

    fn location() -> Location {
        Location {
            address: "Main St".to_string(),
            coordinates: Coordinates::new(34.0, -118.0),
        }
    }

    #[tokio::test]
    async fn inserted_thefts_are_fetched_back() {
        let store = MemoryReportStore::new();
        let info = TheftInfo {
            brand: "Honda".to_string(),
            model: "Civic".to_string(),
            color: "Black".to_string(),
            year: Some(2019),
            license_plate: "XYZ-789".to_string(),
            plate_province: "CA".to_string(),
            vehicle_type: "sedan".to_string(),
            date: ReportDate::EpochMillis(1_000),
            photo: None,
        };

        let inserted = insert_theft(&store, Contact::default(), info, location())
            .await
            .unwrap();
        let fetched = fetch_thefts(&store).await.unwrap();

        assert_eq!(fetched, vec![inserted]);
        assert!(fetch_sightings(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stored_bodies_do_not_carry_the_id() {
        let store = MemoryReportStore::new();
        let info = SightingInfo {
            license_plate: "ABC".to_string(),
            date: ReportDate::Seconds { seconds: 3 },
            photo: Some("https://img/1.jpg".to_string()),
        };
        insert_sighting(&store, Contact::default(), info, location())
            .await
            .unwrap();

        let docs = store.fetch_all(ReportType::Sighting).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].body.get("id").is_none());
        assert_eq!(docs[0].body["info"]["date"], json!({"seconds": 3}));
    }

    #[tokio::test]
    async fn malformed_documents_are_skipped() {
        let store = MemoryReportStore::new();
        store
            .insert(ReportType::Theft, json!({"info": {"brand": "no plate"}}))
            .await
            .unwrap();
        store
            .insert(
                ReportType::Theft,
                json!({
                    "info": {"licensePlate": "OK1"},
                    "location": {"address": "", "coordinates": {"latitude": 1.0, "longitude": 2.0}}
                }),
            )
            .await
            .unwrap();
        store.insert(ReportType::Theft, json!("not an object")).await.unwrap();

        let thefts = fetch_thefts(&store).await.unwrap();
        assert_eq!(thefts.len(), 1);
        assert_eq!(thefts[0].info.license_plate, "OK1");
    }
}
