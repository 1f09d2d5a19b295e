// Core algorithm exports
pub mod normalize;
pub mod query;

pub use normalize::{feature_position, normalize_feature, normalize_features};
pub use query::build_feature_query;
