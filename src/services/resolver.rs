use crate::core::{build_feature_query, normalize_features};
use crate::models::{Coordinates, NormalizedStore, RawFeature, TagFilter};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Outcome of a single interpreter attempt
#[derive(Debug)]
pub enum EndpointOutcome {
    /// Structurally valid response; authoritative even when empty
    Success(Vec<RawFeature>),
    /// Non-success status, unparseable body or missing `elements`
    StructurallyInvalid(String),
    /// Connection, DNS or timeout failure
    TransportFailure(String),
}

/// Result of walking the whole endpoint list
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found {
        endpoint: String,
        stores: Vec<NormalizedStore>,
    },
    Exhausted,
}

impl Resolution {
    /// Stores found, with exhaustion degraded to an empty list
    pub fn into_stores(self) -> Vec<NormalizedStore> {
        match self {
            Resolution::Found { stores, .. } => stores,
            Resolution::Exhausted => Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct InterpreterResponse {
    elements: Option<Vec<Value>>,
}

/// Overpass query executor with ordered mirror fallback
///
/// Endpoints are tried strictly in order. The first one that returns a
/// structurally valid response wins and later mirrors are never contacted.
pub struct FeatureResolver {
    endpoints: Vec<String>,
    tag_filters: Vec<TagFilter>,
    default_radius_meters: u32,
    query_timeout_secs: u64,
    client: Client,
}

impl FeatureResolver {
    /// Create a new resolver over an ordered endpoint list
    pub fn new(
        endpoints: Vec<String>,
        tag_filters: Vec<TagFilter>,
        default_radius_meters: u32,
        request_timeout: Duration,
        query_timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            endpoints,
            tag_filters,
            default_radius_meters,
            query_timeout_secs,
            client,
        })
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    pub fn default_radius_meters(&self) -> u32 {
        self.default_radius_meters
    }

    /// Find stores near `coords`, degrading total failure to an empty list
    pub async fn find_nearby(&self, coords: Coordinates, radius_meters: u32) -> Vec<NormalizedStore> {
        self.resolve(coords, radius_meters).await.into_stores()
    }

    /// Run the fallback loop, keeping exhaustion distinguishable
    pub async fn resolve(&self, coords: Coordinates, radius_meters: u32) -> Resolution {
        let query = build_feature_query(
            coords,
            radius_meters,
            &self.tag_filters,
            self.query_timeout_secs,
        );

        for endpoint in &self.endpoints {
            match self.attempt(endpoint, &query).await {
                EndpointOutcome::Success(features) => {
                    let stores = normalize_features(&features);
                    tracing::info!(
                        "Resolved {} stores ({} raw features) from {}",
                        stores.len(),
                        features.len(),
                        endpoint
                    );
                    return Resolution::Found {
                        endpoint: endpoint.clone(),
                        stores,
                    };
                }
                EndpointOutcome::StructurallyInvalid(reason) => {
                    tracing::warn!("Invalid response from {}: {}", endpoint, reason);
                }
                EndpointOutcome::TransportFailure(reason) => {
                    tracing::warn!("Overpass request failed for {}: {}", endpoint, reason);
                }
            }
        }

        tracing::warn!(
            "All {} Overpass endpoints exhausted for ({}, {})",
            self.endpoints.len(),
            coords.lat,
            coords.lon
        );
        Resolution::Exhausted
    }

    /// Issue one query against one endpoint
    pub async fn attempt(&self, endpoint: &str, query: &str) -> EndpointOutcome {
        let response = match self
            .client
            .post(endpoint)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(query.to_string())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return EndpointOutcome::TransportFailure(e.to_string()),
        };

        let status = response.status();
        if !status.is_success() {
            return EndpointOutcome::StructurallyInvalid(format!("status {}", status));
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return EndpointOutcome::TransportFailure(e.to_string()),
        };

        parse_interpreter_body(&body)
    }
}

/// Classify an interpreter body
///
/// Elements that do not match the expected record shape are skipped rather
/// than invalidating the whole response.
fn parse_interpreter_body(body: &str) -> EndpointOutcome {
    let parsed: InterpreterResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) => return EndpointOutcome::StructurallyInvalid(format!("invalid JSON: {}", e)),
    };

    let Some(elements) = parsed.elements else {
        return EndpointOutcome::StructurallyInvalid("missing elements field".to_string());
    };

    let features = elements
        .into_iter()
        .filter_map(|element| match serde_json::from_value::<RawFeature>(element) {
            Ok(feature) => Some(feature),
            Err(e) => {
                tracing::debug!("Skipping unreadable element: {}", e);
                None
            }
        })
        .collect();

    EndpointOutcome::Success(features)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_body() {
        let body = r#"{
            "version": 0.6,
            "elements": [
                {"type": "node", "id": 1, "lat": 1.0, "lon": 2.0, "tags": {"name": "A"}},
                {"type": "way", "id": 2, "center": {"lat": 3.0, "lon": 4.0}}
            ]
        }"#;

        match parse_interpreter_body(body) {
            EndpointOutcome::Success(features) => {
                assert_eq!(features.len(), 2);
                assert_eq!(features[1].id, 2);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_elements_is_success() {
        assert!(matches!(
            parse_interpreter_body(r#"{"elements": []}"#),
            EndpointOutcome::Success(f) if f.is_empty()
        ));
    }

    #[test]
    fn test_missing_elements_is_invalid() {
        assert!(matches!(
            parse_interpreter_body(r#"{"remark": "runtime error: Query timed out"}"#),
            EndpointOutcome::StructurallyInvalid(_)
        ));
    }

    #[test]
    fn test_html_error_page_is_invalid() {
        assert!(matches!(
            parse_interpreter_body("<html><body>Too Many Requests</body></html>"),
            EndpointOutcome::StructurallyInvalid(_)
        ));
    }

    #[test]
    fn test_unreadable_element_is_skipped() {
        match parse_interpreter_body(r#"{"elements": [{"id": "x"}, {"id": 4, "lat": 0.0, "lon": 0.0}]}"#) {
            EndpointOutcome::Success(features) => {
                assert_eq!(features.len(), 1);
                assert_eq!(features[0].id, 4);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_exhausted_degrades_to_empty() {
        assert!(Resolution::Exhausted.into_stores().is_empty());
    }
}
