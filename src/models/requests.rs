use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body for the location search
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MedicalStoresRequest {
    #[validate(required, length(min = 1))]
    #[serde(default)]
    pub location: Option<String>,
}

impl MedicalStoresRequest {
    /// Parse a raw request body
    ///
    /// Empty bodies and non-JSON content types yield an empty request.
    pub fn from_body(content_type: &str, body: &[u8]) -> Result<Self, serde_json::Error> {
        let is_json = content_type == "application/json" || content_type.ends_with("+json");
        if !is_json || body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        serde_json::from_slice(body)
    }

    /// Trimmed location, `None` when absent or blank
    pub fn location(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }
}

/// Query string for the coordinate search
///
/// Values stay as raw strings so that a malformed number is reported with the
/// same message as a missing one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PharmaciesQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius: Option<String>,
}
