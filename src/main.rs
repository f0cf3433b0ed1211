// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, store client and cache, then start HTTP server

mod config;
mod errors;
mod handlers;
mod models;
mod services;

use actix_web::{middleware::Logger, web, App, HttpServer};
use config::Config;
use dotenv::dotenv;
use services::{start_cleanup_task, CatalogService, FirestoreClient, LocationCache};
use std::io;
use std::sync::Arc;
use std::time::Duration;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.as_str()
        } else {
            "info,actix_web=info"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting explora-places service...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Remote store client
    let store = match config::init_store_client(&config).await {
        Ok(store) => store,
        Err(e) => {
            log::error!("Failed to initialize Firestore client: {:#}", e);
            std::process::exit(1);
        }
    };

    // 5. Location cache (1 hour freshness) and its sweeper
    let cache = Arc::new(LocationCache::in_memory());
    log::info!("Initialized location cache (freshness: 1 hour)");

    start_cleanup_task(cache.clone(), config.cache_cleanup_interval_secs);
    log::info!(
        "Started cache cleanup task (interval: {}s)",
        config.cache_cleanup_interval_secs
    );

    let catalog = web::Data::new(CatalogService::new(
        store,
        cache.clone(),
        Duration::from_millis(config.geolocation_timeout_ms),
    ));

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_data = web::Data::new(config);
    let cache_data = web::Data::new(cache);

    HttpServer::new(move || {
        App::new()
            // Application state (catalog service, config, and cache)
            .app_data(catalog.clone())
            .app_data(config_data.clone())
            .app_data(cache_data.clone())
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::categories_config::<FirestoreClient>)
            .configure(handlers::admin_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
