//! API client and request machinery
//!
//! [`ApiClient`] is the entry point of the crate: it owns the configuration,
//! the transport and the shared read cache, and hands out typed handles for
//! reads ([`ListQuery`], [`DetailQuery`]) and writes ([`Mutation`]). The
//! client is an [`Arc`] around its state, so cloning it is cheap and every
//! clone shares one cache.

mod builder;
pub(crate) mod fetch;
mod mutation;
mod query;
pub mod transport;

pub use builder::ClientBuilder;
pub use mutation::Mutation;
pub use query::{DetailQuery, ListQuery, QuerySnapshot, QueryStatus};
pub use transport::{ApiRequest, HttpTransport, Method, RawResponse, Transport};

use crate::cache::QueryCache;
use crate::config::ApiConfig;
use crate::core::error::ApiResult;
use crate::core::resource::{MutableResource, Resource};
use std::sync::Arc;

struct ClientInner {
    config: ApiConfig,
    transport: Arc<dyn Transport>,
    cache: QueryCache,
}

/// Shared client for one backend
///
/// # Example
///
/// ```rust,ignore
/// let client = ApiClient::builder()
///     .base_url("https://erp.example.com/api")
///     .build()?;
///
/// let mut banks = client.list::<Bank>();
/// let snapshot = banks.fetch().await;
/// ```
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl ApiClient {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    pub fn cache(&self) -> &QueryCache {
        &self.inner.cache
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.inner.transport.as_ref()
    }

    /// Resolve an endpoint name into a full URL, filling path placeholders
    pub(crate) fn endpoint_url(
        &self,
        endpoint: &str,
        values: &[(&str, &str)],
    ) -> ApiResult<String> {
        let template = self.inner.config.resolve(endpoint)?;
        let path = template.fill(values)?;
        Ok(self.join_base(&path))
    }

    pub(crate) fn join_base(&self, path: &str) -> String {
        fetch::join_url(&self.inner.config.base_url, path)
    }

    /// List handle on the resource's default list endpoint
    pub fn list<R: Resource>(&self) -> ListQuery<R> {
        ListQuery::new(self.clone(), R::list_endpoint())
    }

    /// List handle on an alternate endpoint of the same family, e.g. a log feed
    pub fn list_at<R: Resource>(&self, endpoint: &'static str) -> ListQuery<R> {
        ListQuery::new(self.clone(), endpoint)
    }

    /// Detail handle for one record
    pub fn detail<R: Resource>(&self, id: i64) -> DetailQuery<R> {
        DetailQuery::new(self.clone(), R::detail_endpoint(), id)
    }

    /// POST mutation against a named endpoint
    pub fn post(&self, endpoint: impl Into<String>) -> Mutation {
        Mutation::new(self.clone(), Method::Post, endpoint.into())
    }

    /// PUT mutation against a named endpoint
    pub fn put(&self, endpoint: impl Into<String>) -> Mutation {
        Mutation::new(self.clone(), Method::Put, endpoint.into())
    }

    /// Create mutation for a resource, pre-wired to invalidate its family
    pub fn create<R: MutableResource>(&self) -> Mutation {
        self.post(R::create_endpoint()).invalidates(R::resource_name())
    }

    /// Update mutation for a resource, pre-wired to invalidate its family
    pub fn update<R: MutableResource>(&self) -> Mutation {
        self.put(R::update_endpoint()).invalidates(R::resource_name())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.config.base_url)
            .field("endpoints", &self.inner.config.endpoints.len())
            .field("cached_reads", &self.inner.cache.len())
            .finish()
    }
}
