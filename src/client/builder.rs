//! Fluent construction of [`ApiClient`]
//!
//! The builder starts from the standard endpoint catalog, so most callers
//! only have to supply a base URL. Everything else (extra endpoints,
//! timeouts, cache lifetime, a custom transport) layers on top.

use crate::cache::QueryCache;
use crate::client::transport::{HttpTransport, Transport};
use crate::client::{ApiClient, ClientInner};
use crate::config::{ApiConfig, EndpointMap};
use crate::core::error::{ApiResult, ConfigError};
use std::sync::Arc;

/// Builder for [`ApiClient`]
///
/// # Example
///
/// ```rust,ignore
/// let client = ApiClient::builder()
///     .base_url("https://erp.example.com/api")
///     .endpoint("vendor-index", "/vendor")
///     .timeout_secs(20)
///     .cache_lifetime_secs(120)
///     .build()?;
/// ```
pub struct ClientBuilder {
    config: ApiConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        let mut config = ApiConfig::default_config();
        config.base_url = String::new();
        Self {
            config,
            transport: None,
        }
    }

    /// Set the base URL every endpoint path is joined onto
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Replace the whole configuration, catalog included
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = config;
        self
    }

    /// Merge endpoints on top of the current catalog; new entries win
    pub fn endpoints(mut self, endpoints: EndpointMap) -> Self {
        self.config.endpoints.merge(endpoints);
        self
    }

    /// Register or override a single endpoint
    pub fn endpoint(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.config.endpoints.insert(name, template);
        self
    }

    /// Per-request timeout for the default transport
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = Some(secs);
        self
    }

    /// How long a committed read stays fresh before it refetches
    pub fn cache_lifetime_secs(mut self, secs: u64) -> Self {
        self.config.cache_lifetime_secs = Some(secs);
        self
    }

    /// Extra attempts for transient read failures
    pub fn read_retries(mut self, retries: u32) -> Self {
        self.config.read_retries = retries;
        self
    }

    /// Base delay between read retries; doubles on every attempt
    pub fn retry_backoff_ms(mut self, backoff_ms: u64) -> Self {
        self.config.retry_backoff_ms = backoff_ms;
        self
    }

    /// Swap the HTTP transport for a custom implementation
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Build the client
    ///
    /// Fails when no base URL was set, or when the default transport cannot
    /// be constructed.
    pub fn build(self) -> ApiResult<ApiClient> {
        if self.config.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "base_url".to_string(),
                context: "ClientBuilder. Call .base_url() before .build()".to_string(),
            }
            .into());
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let http = match self.config.timeout() {
                    Some(timeout) => HttpTransport::with_timeout(timeout)?,
                    None => HttpTransport::new()?,
                };
                Arc::new(http) as Arc<dyn Transport>
            }
        };

        let cache = match self.config.cache_lifetime() {
            Some(lifetime) => QueryCache::with_lifetime(lifetime),
            None => QueryCache::new(),
        };

        tracing::info!(
            base_url = %self.config.base_url,
            endpoints = self.config.endpoints.len(),
            "api client ready"
        );

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                config: self.config,
                transport,
                cache,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
