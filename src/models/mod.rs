// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Coordinates, TagFilter, FeatureCenter, RawFeature, NormalizedStore};
pub use requests::{MedicalStoresRequest, PharmaciesQuery};
pub use responses::{MedicalStoresResponse, PharmaciesResponse, HealthResponse, ErrorResponse};
