// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod admin;
pub mod categories;
pub mod health;

pub use admin::config as admin_config;
pub use categories::config as categories_config;
pub use health::config as health_config;
