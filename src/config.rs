use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use crate::models::TagFilter;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub geocoder: GeocoderSettings,
    pub overpass: OverpassSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            workers: Some(4),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocoderSettings {
    pub endpoint: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://nominatim.openstreetmap.org/search".to_string(),
            timeout_secs: 10,
            user_agent: default_user_agent(),
        }
    }
}

impl GeocoderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OverpassSettings {
    pub endpoints: Vec<String>,
    pub timeout_secs: u64,
    pub query_timeout_secs: u64,
    pub radius_meters: u32,
    pub tag_filters: Vec<TagFilter>,
    pub user_agent: String,
}

impl Default for OverpassSettings {
    fn default() -> Self {
        Self {
            endpoints: default_endpoints(),
            timeout_secs: 30,
            query_timeout_secs: 25,
            radius_meters: 10_000,
            tag_filters: default_tag_filters(),
            user_agent: default_user_agent(),
        }
    }
}

impl OverpassSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_user_agent() -> String {
    format!("mediquery/{}", env!("CARGO_PKG_VERSION"))
}

fn default_endpoints() -> Vec<String> {
    vec![
        "https://overpass.kumi.systems/api/interpreter".to_string(),
        "https://overpass-api.de/api/interpreter".to_string(),
        "https://overpass.openstreetmap.fr/api/interpreter".to_string(),
    ]
}

fn default_tag_filters() -> Vec<TagFilter> {
    vec![
        TagFilter::new("amenity", "pharmacy"),
        TagFilter::new("healthcare", "pharmacy"),
    ]
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with MEDIQUERY__)
    /// 5. The plain `PORT` variable
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(environment())
            .build()?;

        settings = apply_port_override(settings, std::env::var("PORT").ok())?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject configurations the resolver cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.overpass.endpoints.is_empty() {
            return Err(ConfigError::Message("overpass.endpoints must not be empty".into()));
        }
        if self.overpass.tag_filters.is_empty() {
            return Err(ConfigError::Message("overpass.tag_filters must not be empty".into()));
        }
        if self.overpass.radius_meters == 0 {
            return Err(ConfigError::Message("overpass.radius_meters must be positive".into()));
        }
        if self.geocoder.timeout_secs == 0 || self.overpass.timeout_secs == 0 {
            return Err(ConfigError::Message("timeouts must be positive".into()));
        }
        Ok(())
    }
}

// e.g., MEDIQUERY__SERVER__PORT -> server.port
fn environment() -> Environment {
    Environment::with_prefix("MEDIQUERY")
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("overpass.endpoints")
        .try_parsing(true)
}

/// `PORT` wins over every other source, matching common PaaS conventions
fn apply_port_override(settings: Config, port: Option<String>) -> Result<Config, ConfigError> {
    let Some(port) = port else {
        return Ok(settings);
    };

    let port: u16 = port
        .trim()
        .parse()
        .map_err(|_| ConfigError::Message(format!("Invalid PORT value: {}", port)))?;

    Config::builder()
        .add_source(settings)
        .set_override("server.port", port as i64)?
        .build()
}
