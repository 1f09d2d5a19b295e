//! MediQuery - nearby pharmacy lookup service
//!
//! Geocodes a free-text location through a Nominatim-compatible endpoint and
//! queries an ordered list of Overpass mirrors for pharmacies around it,
//! falling back to the next mirror whenever one is unavailable.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{build_feature_query, normalize_feature};
pub use error::ApiError;
pub use models::{Coordinates, NormalizedStore, RawFeature, TagFilter};
pub use services::{FeatureResolver, GeocoderClient, Resolution};
