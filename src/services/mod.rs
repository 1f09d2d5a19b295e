// Service exports
pub mod geocoder;
pub mod resolver;

pub use geocoder::{GeocoderClient, GeocodeError};
pub use resolver::{FeatureResolver, EndpointOutcome, Resolution};
