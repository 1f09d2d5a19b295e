use serde::{Deserialize, Serialize};
use crate::models::domain::NormalizedStore;

/// Response for the location search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalStoresResponse {
    pub stores: Vec<NormalizedStore>,
}

/// Response for the coordinate search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PharmaciesResponse {
    pub pharmacies: Vec<NormalizedStore>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
