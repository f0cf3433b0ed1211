// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod cache;
pub mod catalog_service;
pub mod clock;
pub mod firestore_client;
pub mod geolocation;
pub mod location_store;
pub mod map_view;
pub mod parser;
pub mod ranker;
pub mod search;
pub mod slug;
pub mod view;

pub use cache::{start_cleanup_task, LocationCache};
pub use catalog_service::CatalogService;
pub use firestore_client::FirestoreClient;
