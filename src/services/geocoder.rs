use crate::models::Coordinates;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when resolving a location
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Geocoding timed out after {0:?}")]
    Timeout(Duration),

    #[error("Geocoder returned status {0}")]
    Upstream(StatusCode),

    #[error("Malformed geocoder response: {0}")]
    MalformedResponse(String),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Candidate as returned by Nominatim-compatible search endpoints
#[derive(Debug, Deserialize)]
struct Candidate {
    lat: Value,
    lon: Value,
}

/// Nominatim-style geocoding client
///
/// Issues exactly one search request per call, bounded by `timeout`.
/// The first candidate wins; an empty result list is `Ok(None)`.
pub struct GeocoderClient {
    endpoint: String,
    timeout: Duration,
    client: Client,
}

impl GeocoderClient {
    /// Create a new geocoder client
    pub fn new(endpoint: String, timeout: Duration, user_agent: &str) -> Result<Self, GeocodeError> {
        let client = Client::builder().user_agent(user_agent).build()?;

        Ok(Self {
            endpoint,
            timeout,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve a free-text location to its best coordinate pair
    pub async fn resolve(&self, location: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let url = format!(
            "{}?format=json&q={}",
            self.endpoint,
            urlencoding::encode(location)
        );

        tracing::debug!("Geocoding location via: {}", url);

        // Dropping the future on timeout cancels the in-flight request
        match tokio::time::timeout(self.timeout, self.fetch(&url)).await {
            Ok(result) => result,
            Err(_) => Err(GeocodeError::Timeout(self.timeout)),
        }
    }

    async fn fetch(&self, url: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let response = self.client.get(url).send().await.map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Upstream(status));
        }

        let body = response.text().await.map_err(|e| self.map_request_error(e))?;
        parse_candidates(&body)
    }

    fn map_request_error(&self, err: reqwest::Error) -> GeocodeError {
        if err.is_timeout() {
            GeocodeError::Timeout(self.timeout)
        } else {
            GeocodeError::Request(err)
        }
    }
}

/// Extract the first candidate's coordinates from a search response body
fn parse_candidates(body: &str) -> Result<Option<Coordinates>, GeocodeError> {
    let candidates: Vec<Candidate> = serde_json::from_str(body)
        .map_err(|e| GeocodeError::MalformedResponse(format!("Failed to parse candidates: {}", e)))?;

    let Some(first) = candidates.into_iter().next() else {
        return Ok(None);
    };

    let lat = parse_degree(&first.lat, "lat")?;
    let lon = parse_degree(&first.lon, "lon")?;

    Ok(Some(Coordinates::new(lat, lon)))
}

/// Nominatim encodes degrees as strings; other providers use numbers
fn parse_degree(value: &Value, field: &str) -> Result<f64, GeocodeError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| GeocodeError::MalformedResponse(format!("Invalid {} value: {}", field, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nominatim_strings() {
        let body = r#"[{"lat":"12.9767936","lon":"77.590082","display_name":"Bengaluru"},
                       {"lat":"1.0","lon":"2.0"}]"#;

        let coords = parse_candidates(body).unwrap().unwrap();
        assert_eq!(coords, Coordinates::new(12.9767936, 77.590082));
    }

    #[test]
    fn test_parse_numeric_degrees() {
        let coords = parse_candidates(r#"[{"lat":48.85,"lon":2.35}]"#).unwrap().unwrap();
        assert_eq!(coords, Coordinates::new(48.85, 2.35));
    }

    #[test]
    fn test_empty_list_is_no_match() {
        assert!(parse_candidates("[]").unwrap().is_none());
    }

    #[test]
    fn test_unexpected_shape_is_malformed() {
        assert!(matches!(
            parse_candidates(r#"{"error":"rate limited"}"#),
            Err(GeocodeError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_candidates("<html>"),
            Err(GeocodeError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_non_numeric_degree_is_malformed() {
        assert!(matches!(
            parse_candidates(r#"[{"lat":"north","lon":"2.0"}]"#),
            Err(GeocodeError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_geocoder_client_creation() {
        let client = GeocoderClient::new(
            "https://nominatim.test/search".to_string(),
            Duration::from_secs(10),
            "mediquery-test",
        )
        .unwrap();

        assert_eq!(client.endpoint(), "https://nominatim.test/search");
        assert_eq!(client.timeout(), Duration::from_secs(10));
    }
}
