// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod category;
pub mod location;
pub mod responses;

pub use category::*;
pub use location::*;
pub use responses::*;
