use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// A resolved (latitude, longitude) pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether both components are finite and inside the WGS84 ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// A single `key=value` tag filter used when building feature queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFilter {
    pub key: String,
    pub value: String,
}

impl TagFilter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Nested center point Overpass attaches to ways and relations with `out center`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureCenter {
    pub lat: f64,
    pub lon: f64,
}

/// Raw element as returned by an Overpass interpreter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFeature {
    pub id: u64,
    #[serde(rename = "type", default)]
    pub element_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: HashMap<String, String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub center: Option<FeatureCenter>,
}

impl RawFeature {
    /// Non-empty tag value for `key`
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<HashMap<String, String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Store record returned to API callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedStore {
    pub id: u64,
    pub name: String,
    pub phone: String,
    pub lat: f64,
    pub lon: f64,
}
