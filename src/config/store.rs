// src/config/store.rs
// DOCUMENTATION: Remote store client setup
// PURPOSE: Build the Firestore client once at startup

use anyhow::{Context, Result};

use super::Config;
use crate::services::firestore_client::FirestoreClient;

/// Initialize the Firestore client
/// DOCUMENTATION: Called once at startup; the client is shared by every worker
pub async fn init_store_client(config: &Config) -> Result<FirestoreClient> {
    log::info!(
        "Connecting to Firestore project '{}' (collection '{}')",
        config.firestore_project_id,
        config.firestore_collection
    );

    let client = FirestoreClient::new(config).context("Failed to build Firestore HTTP client")?;

    log::info!(
        "Firestore client ready ({} queries/s, {}s timeout)",
        config.store_requests_per_second,
        config.store_timeout_secs
    );
    Ok(client)
}
