//! Configuration loading and management
//!
//! The client is configured with a base URL, an endpoint map (logical names
//! like `bank-index` mapped to path templates like `/bank`), and a handful
//! of behavior knobs. Deployments ship the endpoint map as a JSON document;
//! YAML is accepted as well for hand-maintained files.

use crate::core::endpoint::EndpointTemplate;
use crate::core::error::{ApiResult, ConfigError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Named endpoint templates, in declaration order
///
/// Keys are logical endpoint names (`bank-index`, `grn-detail`), values are
/// path templates that may carry `:name` placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointMap {
    templates: IndexMap<String, String>,
}

impl EndpointMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an endpoint map from a JSON file (`{"bank-index": "/bank", ...}`)
    pub fn from_json_file(path: &str) -> ApiResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let map: Self = serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        Ok(map)
    }

    /// Load an endpoint map from a JSON string
    pub fn from_json_str(json: &str) -> ApiResult<Self> {
        let map: Self = serde_json::from_str(json).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })?;
        Ok(map)
    }

    /// Load an endpoint map from a YAML file
    pub fn from_yaml_file(path: &str) -> ApiResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let map: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        Ok(map)
    }

    /// Load an endpoint map from a YAML string
    pub fn from_yaml_str(yaml: &str) -> ApiResult<Self> {
        let map: Self = serde_yaml::from_str(yaml)?;
        Ok(map)
    }

    pub fn insert(&mut self, name: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(name.into(), template.into());
    }

    /// Builder-flavored insert
    pub fn with(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.insert(name, template);
        self
    }

    /// Look up a template by endpoint name
    pub fn resolve(&self, name: &str) -> Result<EndpointTemplate, ConfigError> {
        self.templates
            .get(name)
            .map(EndpointTemplate::new)
            .ok_or_else(|| ConfigError::UnknownEndpoint {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Merge another map into this one; entries from `other` win
    pub fn merge(&mut self, other: EndpointMap) {
        for (name, template) in other.templates {
            self.templates.insert(name, template);
        }
    }
}

fn default_read_retries() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    250
}

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is joined onto, e.g. `https://erp.example.com/api`
    pub base_url: String,

    /// Endpoint name to path template map
    #[serde(default)]
    pub endpoints: EndpointMap,

    /// Per-request timeout; `None` leaves the transport default in place
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// How long a committed read stays fresh; `None` means until invalidated
    #[serde(default)]
    pub cache_lifetime_secs: Option<u64>,

    /// Extra attempts for transient read failures
    #[serde(default = "default_read_retries")]
    pub read_retries: u32,

    /// Base delay between read retries (doubles per attempt)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            endpoints: EndpointMap::new(),
            timeout_secs: None,
            cache_lifetime_secs: None,
            read_retries: default_read_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load a full configuration from a JSON file
    pub fn from_json_file(path: &str) -> ApiResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Load a full configuration from a JSON string
    pub fn from_json_str(json: &str) -> ApiResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Load a full configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> ApiResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Load a full configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> ApiResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Builder-flavored endpoint registration
    pub fn endpoint(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.endpoints.insert(name, template);
        self
    }

    /// Look up a template by endpoint name
    pub fn resolve(&self, name: &str) -> Result<EndpointTemplate, ConfigError> {
        self.endpoints.resolve(name)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn cache_lifetime(&self) -> Option<Duration> {
        self.cache_lifetime_secs.map(Duration::from_secs)
    }

    /// Create a default configuration for testing
    ///
    /// Carries the full endpoint catalog against a localhost backend.
    pub fn default_config() -> Self {
        let mut config = Self::new("http://localhost:8000/api");
        let families = [
            ("customer", "/customer"),
            ("bank", "/bank"),
            ("contact", "/customer-contact-manager"),
            ("shipping-address", "/shipping-address"),
            ("spare", "/spare"),
            ("prfq", "/prfq"),
            ("stf", "/stf"),
            ("logistic-request", "/logistic-request"),
            ("invoice", "/invoice"),
            ("grn", "/grn"),
            ("stock-inspection", "/stock-inspection"),
        ];
        for (family, path) in families {
            config
                .endpoints
                .insert(format!("{}-index", family), path.to_string());
            config
                .endpoints
                .insert(format!("{}-detail", family), format!("{}/:id", path));
            config
                .endpoints
                .insert(format!("{}-create", family), path.to_string());
            config
                .endpoints
                .insert(format!("{}-update", family), format!("{}/:id", path));
        }
        config.endpoints.insert("bank-logs", "/bank/logs");
        config
    }
}
