// src/services/firestore_client.rs
// DOCUMENTATION: Firestore REST client
// PURPOSE: Run the "locations where category == title" query and flatten typed values

use std::num::NonZeroU32;
use std::time::Duration;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::config::Config;
use crate::errors::ExploraError;
use crate::services::location_store::{LocationStore, RawDocument};

/// Firestore client for the locations collection
/// DOCUMENTATION: Every query waits on a shared rate limiter before it is sent
pub struct FirestoreClient {
    /// HTTP client for making requests
    client: Client,
    /// Web API key, omitted from the query string when empty
    api_key: String,
    /// `{base}/projects/{project}/databases/(default)/documents`
    documents_url: String,
    collection: String,
    limiter: DefaultDirectRateLimiter,
}

/// One element of a runQuery reply. Elements without a document only carry
/// read metadata.
#[derive(Debug, Deserialize)]
struct RunQueryItem {
    document: Option<FirestoreDocument>,
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    /// Full resource name; the id is its last segment
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl FirestoreClient {
    /// Create new Firestore client
    /// DOCUMENTATION: Uses the store timeout and query budget from config
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.store_timeout_secs))
            .build()?;

        let per_second = NonZeroU32::new(config.store_requests_per_second).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            client,
            api_key: config.firestore_api_key.clone(),
            documents_url: format!(
                "{}/projects/{}/databases/(default)/documents",
                config.firestore_base_url.trim_end_matches('/'),
                config.firestore_project_id
            ),
            collection: config.firestore_collection.clone(),
            limiter: RateLimiter::direct(Quota::per_second(per_second)),
        })
    }

    fn query_body(&self, title: &str) -> Value {
        json!({
            "structuredQuery": {
                "from": [{ "collectionId": self.collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": "category" },
                        "op": "EQUAL",
                        "value": { "stringValue": title }
                    }
                }
            }
        })
    }

    /// Run the category query
    /// DOCUMENTATION: Non-2xx replies become ExternalApiError, 429 becomes
    /// RateLimitExceeded
    pub async fn run_category_query(&self, title: &str) -> Result<Vec<RawDocument>, ExploraError> {
        self.limiter.until_ready().await;

        let url = format!("{}:runQuery", self.documents_url);
        log::debug!("Firestore runQuery: collection={}, category={}", self.collection, title);

        let mut request = self.client.post(&url).json(&self.query_body(title));
        if !self.api_key.is_empty() {
            request = request.query(&[("key", self.api_key.as_str())]);
        }

        let response = request.send().await.map_err(|e| {
            log::error!("Firestore request failed: {}", e);
            ExploraError::ExternalApiError(format!("Request failed: {}", e))
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            log::error!("Firestore quota exceeded");
            return Err(ExploraError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Firestore error {}: {}", status, body);
            return Err(ExploraError::ExternalApiError(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let items: Vec<RunQueryItem> = response.json().await.map_err(|e| {
            log::error!("Failed to parse Firestore response: {}", e);
            ExploraError::ExternalApiError(format!("Parse error: {}", e))
        })?;

        let documents: Vec<RawDocument> = items
            .into_iter()
            .filter_map(|item| item.document)
            .map(|doc| RawDocument::new(document_id(&doc.name), decode_fields(&doc.fields)))
            .collect();

        log::info!("Firestore query for '{}' returned {} documents", title, documents.len());
        Ok(documents)
    }
}

impl LocationStore for FirestoreClient {
    async fn fetch_by_category(&self, title: &str) -> Result<Vec<RawDocument>, ExploraError> {
        self.run_category_query(title).await
    }
}

fn document_id(name: &str) -> String {
    name.rsplit('/').next().unwrap_or(name).to_string()
}

fn decode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), decode_value(value)))
        .collect()
}

/// Flatten a Firestore typed value (`{"stringValue": "x"}`) into plain JSON.
/// Unknown shapes become null.
pub fn decode_value(value: &Value) -> Value {
    let Some(typed) = value.as_object() else {
        return Value::Null;
    };
    let Some((kind, inner)) = typed.iter().next() else {
        return Value::Null;
    };

    match kind.as_str() {
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "booleanValue" | "doubleValue" => inner.clone(),
        // int64 travels as a decimal string
        "integerValue" => match inner {
            Value::String(raw) => raw
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| inner.clone()),
            other => other.clone(),
        },
        "nullValue" => Value::Null,
        "geoPointValue" => json!({
            "lat": inner.get("latitude").cloned().unwrap_or(Value::Null),
            "lng": inner.get("longitude").cloned().unwrap_or(Value::Null),
        }),
        "mapValue" => match inner.get("fields").and_then(Value::as_object) {
            Some(fields) => Value::Object(decode_fields(fields)),
            None => Value::Object(Map::new()),
        },
        "arrayValue" => match inner.get("values").and_then(Value::as_array) {
            Some(values) => Value::Array(values.iter().map(decode_value).collect()),
            None => Value::Array(Vec::new()),
        },
        other => {
            log::debug!("Unsupported Firestore value type: {}", other);
            Value::Null
        }
    }
}
