// src/services/location_store.rs
// DOCUMENTATION: Port to the remote document store
// PURPOSE: "Fetch raw documents whose category equals this title"

use std::future::Future;

use serde_json::{Map, Value};

use crate::errors::ExploraError;

/// A document as handed back by the store: identifier plus opaque fields
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl RawDocument {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// Remote store query interface
/// DOCUMENTATION: Implementations filter server-side by exact category
/// title. Retries and transport details stay inside the implementation;
/// callers treat any `Err` as "no data".
pub trait LocationStore: Send + Sync {
    fn fetch_by_category(
        &self,
        title: &str,
    ) -> impl Future<Output = Result<Vec<RawDocument>, ExploraError>> + Send;
}
