// src/services/catalog_service.rs
// DOCUMENTATION: Business logic for category pages
// PURPOSE: Intermediary between handlers, the remote store and the cache

use std::sync::Arc;
use std::time::Duration;

use crate::errors::ExploraError;
use crate::models::{find_category, Category, LocationRecord, RankedLocation};
use crate::services::cache::{KeyValueStore, LocationCache, MemoryStore};
use crate::services::geolocation::{locate_once, GeolocationError, Geolocator};
use crate::services::location_store::LocationStore;
use crate::services::map_view::MapController;
use crate::services::parser::parse_documents;
use crate::services::ranker;
use crate::services::view::{CategoryView, ViewToken};

/// Result of a "nearest to you" lookup. A geolocation failure is reported
/// alongside an empty list, never as an error.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestOutcome {
    pub locations: Vec<RankedLocation>,
    pub geolocation_error: Option<GeolocationError>,
}

pub struct CatalogService<S, K = MemoryStore> {
    store: S,
    cache: Arc<LocationCache<K>>,
    geolocation_timeout: Duration,
}

impl<S: LocationStore, K: KeyValueStore> CatalogService<S, K> {
    pub fn new(store: S, cache: Arc<LocationCache<K>>, geolocation_timeout: Duration) -> Self {
        Self {
            store,
            cache,
            geolocation_timeout,
        }
    }

    /// Resolve a route slug to its category
    pub fn category(&self, slug: &str) -> Result<&'static Category, ExploraError> {
        find_category(slug).ok_or_else(|| ExploraError::CategoryNotFound(slug.to_string()))
    }

    /// Move `view` to `slug`. A load still running for the category being
    /// left is cancelled, so its completion never reaches the cache.
    pub async fn navigate<M: MapController>(
        &self,
        view: &mut CategoryView<M>,
        slug: &str,
    ) -> Option<ViewToken> {
        if let Some(previous) = view.leave() {
            self.cache.cancel(previous.id).await;
        }
        view.navigate(slug)
    }

    /// Navigate `view` to `slug` and fill it with the category's locations
    pub async fn open<M: MapController>(
        &self,
        view: &mut CategoryView<M>,
        slug: &str,
    ) -> Result<&'static Category, ExploraError> {
        let token = self
            .navigate(view, slug)
            .await
            .ok_or_else(|| ExploraError::CategoryNotFound(slug.to_string()))?;

        let records = self.load(token.category()).await;
        view.apply(&token, records);
        Ok(token.category())
    }

    /// Locations for `category`, from cache when fresh.
    ///
    /// On a miss the store is queried and the parsed result written back,
    /// unless a newer fetch for the same slug started in the meantime. A
    /// store failure yields an empty list and leaves the cache untouched.
    /// Records labelled with some other category are dropped.
    pub async fn load(&self, category: &Category) -> Vec<LocationRecord> {
        if let Some(records) = self.cache.get(category.id).await {
            return records;
        }

        let token = self.cache.begin_fetch(category.id).await;
        match self.store.fetch_by_category(category.title).await {
            Ok(documents) => {
                let (records, foreign): (Vec<_>, Vec<_>) = parse_documents(&documents)
                    .into_iter()
                    .partition(|record| {
                        record
                            .category
                            .as_deref()
                            .map_or(true, |label| category.matches_label(label))
                    });
                if !foreign.is_empty() {
                    log::warn!(
                        "Dropped {} locations labelled with another category than '{}'",
                        foreign.len(),
                        category.id
                    );
                }
                log::info!(
                    "Loaded {} locations for '{}' from the remote store",
                    records.len(),
                    category.id
                );
                self.cache.commit(&token, &records).await;
                records
            }
            Err(e) => {
                log::error!("Could not load locations for '{}': {}", category.id, e);
                self.cache.release(&token).await;
                Vec::new()
            }
        }
    }

    /// The `k` locations of `category` closest to wherever `geolocator` says
    /// the user is.
    pub async fn nearest<G: Geolocator>(
        &self,
        category: &Category,
        geolocator: &G,
        k: usize,
    ) -> NearestOutcome {
        let origin = match locate_once(geolocator, self.geolocation_timeout).await {
            Ok(origin) => origin,
            Err(e) => {
                log::info!("No position for '{}' nearest list: {}", category.id, e);
                return NearestOutcome {
                    locations: Vec::new(),
                    geolocation_error: Some(e),
                };
            }
        };

        let records = self.load(category).await;
        NearestOutcome {
            locations: ranker::nearest(origin, &records, k),
            geolocation_error: None,
        }
    }
}
