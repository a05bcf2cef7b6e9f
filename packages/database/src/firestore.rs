//! Hosted Firestore database accessed through its REST API.
//!
//! Firestore wraps every field in a typed value object
//! (`{"stringValue": "..."}`, `{"integerValue": "42"}`, ...). Documents are
//! converted to and from plain JSON at this boundary. Timestamps come back
//! as `{"_seconds": .., "_nanoseconds": ..}` objects, the same shape the
//! client SDKs produce.

use async_trait::async_trait;
use auto_watch_report_models::{ReportId, ReportType};
use chrono::{DateTime, TimeZone as _, Utc};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::{DbError, ReportStore, StoredDocument};

/// Public Firestore REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

const PAGE_SIZE: u32 = 300;

/// Report store backed by a Firestore project.
#[derive(Debug, Clone)]
pub struct FirestoreReportStore {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl FirestoreReportStore {
    /// Creates a store for `project_id` against the public endpoint.
    #[must_use]
    pub fn new(client: reqwest::Client, project_id: String, api_key: Option<String>) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL.to_string(), project_id, api_key)
    }

    /// Creates a store against a custom endpoint such as a local emulator.
    #[must_use]
    pub const fn with_base_url(
        client: reqwest::Client,
        base_url: String,
        project_id: String,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url,
            project_id,
            api_key,
        }
    }

    fn collection_url(&self, collection: ReportType) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            self.base_url.trim_end_matches('/'),
            self.project_id,
            collection.collection()
        )
    }

    fn with_key(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.query(&[("key", key)]),
            None => request,
        }
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, DbError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp.text().await.unwrap_or_default();
    Err(DbError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ReportStore for FirestoreReportStore {
    fn name(&self) -> &str {
        "firestore"
    }

    async fn fetch_all(&self, collection: ReportType) -> Result<Vec<StoredDocument>, DbError> {
        let url = self.collection_url(collection);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let resp = check_status(self.with_key(request).send().await?).await?;
            let page: ListResponse = resp.json().await?;
            log::debug!(
                "Fetched {} documents from {}",
                page.documents.len(),
                collection.collection()
            );

            documents.extend(page.documents.into_iter().map(decode_document));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(documents)
    }

    async fn insert(&self, collection: ReportType, body: Value) -> Result<ReportId, DbError> {
        let Value::Object(map) = body else {
            return Err(DbError::Conversion {
                message: "document body must be an object".to_string(),
            });
        };

        let request = self
            .client
            .post(self.collection_url(collection))
            .json(&json!({ "fields": encode_fields(&map) }));

        let resp = check_status(self.with_key(request).send().await?).await?;
        let created: Document = resp.json().await?;

        Ok(document_id(&created.name))
    }
}

fn document_id(name: &str) -> ReportId {
    ReportId(name.rsplit('/').next().unwrap_or(name).to_string())
}

fn decode_document(doc: Document) -> StoredDocument {
    StoredDocument {
        id: document_id(&doc.name),
        body: decode_fields(&doc.fields),
    }
}

fn decode_fields(fields: &Map<String, Value>) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(k, v)| (k.clone(), decode_value(v)))
            .collect(),
    )
}

/// Converts a Firestore typed value into plain JSON.
///
/// Unknown value kinds decode to `null`.
#[must_use]
pub fn decode_value(value: &Value) -> Value {
    let Some(obj) = value.as_object() else {
        return Value::Null;
    };

    if let Some(s) = obj.get("stringValue") {
        return s.clone();
    }
    if let Some(i) = obj.get("integerValue") {
        return match i {
            Value::String(s) => s.parse::<i64>().map_or(Value::Null, Value::from),
            other => other.clone(),
        };
    }
    if let Some(d) = obj.get("doubleValue") {
        return d.clone();
    }
    if let Some(b) = obj.get("booleanValue") {
        return b.clone();
    }
    if obj.contains_key("nullValue") {
        return Value::Null;
    }
    if let Some(ts) = obj.get("timestampValue").and_then(Value::as_str) {
        return DateTime::parse_from_rfc3339(ts).map_or(Value::Null, |date| {
            json!({
                "_seconds": date.timestamp(),
                "_nanoseconds": date.timestamp_subsec_nanos(),
            })
        });
    }
    if let Some(point) = obj.get("geoPointValue") {
        return json!({
            "latitude": point.get("latitude").cloned().unwrap_or(Value::from(0.0)),
            "longitude": point.get("longitude").cloned().unwrap_or(Value::from(0.0)),
        });
    }
    if let Some(map) = obj.get("mapValue") {
        return map
            .get("fields")
            .and_then(Value::as_object)
            .map_or_else(|| Value::Object(Map::new()), decode_fields);
    }
    if let Some(array) = obj.get("arrayValue") {
        return Value::Array(
            array
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        );
    }

    Value::Null
}

fn encode_fields(map: &Map<String, Value>) -> Value {
    Value::Object(
        map.iter()
            .map(|(k, v)| (k.clone(), encode_value(v)))
            .collect(),
    )
}

/// Converts plain JSON into a Firestore typed value.
///
/// Objects holding only `_seconds` and `_nanoseconds` are written as native
/// timestamps.
#[must_use]
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => n.as_i64().map_or_else(
            || json!({ "doubleValue": n }),
            |i| json!({ "integerValue": i.to_string() }),
        ),
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(values) => {
            json!({ "arrayValue": { "values": values.iter().map(encode_value).collect::<Vec<_>>() } })
        }
        Value::Object(map) => as_timestamp(map).map_or_else(
            || json!({ "mapValue": { "fields": encode_fields(map) } }),
            |date| json!({ "timestampValue": date.to_rfc3339() }),
        ),
    }
}

fn as_timestamp(map: &Map<String, Value>) -> Option<DateTime<Utc>> {
    if !map.keys().all(|k| k == "_seconds" || k == "_nanoseconds") {
        return None;
    }
    let seconds = map.get("_seconds")?.as_i64()?;
    let nanos = map
        .get("_nanoseconds")
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0);
    Utc.timestamp_opt(seconds, nanos).single()
}
