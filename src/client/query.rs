//! Read-side query handles
//!
//! A [`ListQuery`] or [`DetailQuery`] owns the parameters of one read and
//! drives it through the shared cache: fresh cache entries are served
//! without touching the network, misses and stale entries are fetched,
//! validated, committed and returned. Every fetch is ticketed, so a handle
//! whose parameters changed mid-flight never sees an older response
//! overwrite a newer one.
//!
//! Handles are deliberately view-model shaped: [`QuerySnapshot`] carries
//! status, data and error together, and `keep_previous_data` keeps the last
//! page on screen while the next one loads.

use crate::cache::CacheKey;
use crate::client::ApiClient;
use crate::client::fetch;
use crate::client::transport::ApiRequest;
use crate::core::envelope::ListPage;
use crate::core::error::{ApiError, ApiResult};
use crate::core::params::QueryParams;
use crate::core::resource::Resource;
use serde_json::Value;

/// Lifecycle of one read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Gated off; nothing fetched, nothing will be
    Idle,
    /// No usable answer yet (a kept previous page may still be shown)
    Loading,
    Ready,
    Failed,
}

/// Status, data and error of a read at one point in time
#[derive(Debug, Clone)]
pub struct QuerySnapshot<D> {
    pub status: QueryStatus,
    pub data: Option<D>,
    pub error: Option<ApiError>,
}

impl<D> QuerySnapshot<D> {
    pub(crate) fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
        }
    }

    pub(crate) fn loading(data: Option<D>) -> Self {
        Self {
            status: QueryStatus::Loading,
            data,
            error: None,
        }
    }

    pub(crate) fn ready(data: D) -> Self {
        Self {
            status: QueryStatus::Ready,
            data: Some(data),
            error: None,
        }
    }

    pub(crate) fn failed(error: ApiError, data: Option<D>) -> Self {
        Self {
            status: QueryStatus::Failed,
            data,
            error: Some(error),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.status == QueryStatus::Idle
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    pub fn is_ready(&self) -> bool {
        self.status == QueryStatus::Ready
    }

    pub fn is_failed(&self) -> bool {
        self.status == QueryStatus::Failed
    }

    pub fn data(&self) -> Option<&D> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn into_data(self) -> Option<D> {
        self.data
    }
}

// =============================================================================
// List queries
// =============================================================================

/// Handle for one paginated list read
///
/// # Example
///
/// ```rust,ignore
/// let mut spares = client.list::<Spare>()
///     .params(QueryParams::new().page(1).search("part_no", "KX-180"))
///     .keep_previous_data(true);
///
/// let snapshot = spares.fetch().await;
/// if let Some(page) = snapshot.data() {
///     render_rows(&page.items);
/// }
///
/// spares.set_params(QueryParams::new().page(2));
/// let next = spares.fetch().await; // previous rows stay visible meanwhile
/// ```
pub struct ListQuery<R: Resource> {
    client: ApiClient,
    endpoint: &'static str,
    params: QueryParams,
    enabled: Option<bool>,
    keep_previous_data: bool,
    retries: u32,
    backoff_ms: u64,
    last_data: Option<ListPage<R>>,
    last_error: Option<ApiError>,
}

impl<R: Resource> ListQuery<R> {
    pub(crate) fn new(client: ApiClient, endpoint: &'static str) -> Self {
        let retries = client.config().read_retries;
        let backoff_ms = client.config().retry_backoff_ms;
        Self {
            client,
            endpoint,
            params: QueryParams::new(),
            enabled: None,
            keep_previous_data: false,
            retries,
            backoff_ms,
            last_data: None,
            last_error: None,
        }
    }

    /// Seed the initial parameters
    pub fn params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    /// Force the query on or off; defaults to on
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Keep serving the previous page while a new one loads
    pub fn keep_previous_data(mut self, keep: bool) -> Self {
        self.keep_previous_data = keep;
        self
    }

    /// Override the configured retry budget for transient failures
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Override the configured base retry delay
    pub fn retry_backoff_ms(mut self, backoff_ms: u64) -> Self {
        self.backoff_ms = backoff_ms;
        self
    }

    /// Replace the parameters, resetting any error from the old ones
    pub fn set_params(&mut self, params: QueryParams) {
        if params == self.params {
            return;
        }
        self.params = params;
        self.last_error = None;
        if !self.keep_previous_data {
            self.last_data = None;
        }
    }

    pub fn current_params(&self) -> &QueryParams {
        &self.params
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// Cache identity of the read as currently parameterized
    pub fn cache_key(&self) -> CacheKey {
        let query = self.params.to_query_string();
        let discriminator = if query.is_empty() {
            self.endpoint.to_string()
        } else {
            format!("{}?{}", self.endpoint, query)
        };
        CacheKey::new(R::resource_name(), discriminator)
    }

    /// Current state without any IO
    pub fn snapshot(&self) -> QuerySnapshot<ListPage<R>> {
        if !self.is_enabled() {
            return QuerySnapshot::idle();
        }
        let cached = self.client.cache().lookup(&self.cache_key());
        if let Some(read) = &cached {
            if read.fresh {
                if let Ok(page) = fetch::materialize_list::<R>(&read.value) {
                    return QuerySnapshot::ready(page);
                }
            }
        }
        if let Some(err) = &self.last_error {
            return QuerySnapshot::failed(err.clone(), self.last_data.clone());
        }
        let placeholder = cached
            .and_then(|read| fetch::materialize_list::<R>(&read.value).ok())
            .or_else(|| {
                if self.keep_previous_data {
                    self.last_data.clone()
                } else {
                    None
                }
            });
        QuerySnapshot::loading(placeholder)
    }

    /// Resolve the read: serve it from cache when fresh, fetch otherwise
    pub async fn fetch(&mut self) -> QuerySnapshot<ListPage<R>> {
        if !self.is_enabled() {
            return QuerySnapshot::idle();
        }
        let key = self.cache_key();
        if let Some(read) = self.client.cache().lookup(&key) {
            if read.fresh {
                return self.resolve_value(&read.value);
            }
        }
        self.fetch_over_network(key).await
    }

    /// Fetch from the backend even if the cache is fresh
    ///
    /// Still respects the enabled gate: a disabled query has no business
    /// on the wire.
    pub async fn refetch(&mut self) -> QuerySnapshot<ListPage<R>> {
        if !self.is_enabled() {
            return QuerySnapshot::idle();
        }
        let key = self.cache_key();
        self.fetch_over_network(key).await
    }

    async fn fetch_over_network(&mut self, key: CacheKey) -> QuerySnapshot<ListPage<R>> {
        let url = match self.resolve_url() {
            Ok(url) => url,
            Err(err) => return self.resolve_error(err),
        };

        let ticket = self.client.cache().begin_fetch(&key);
        let transport = self.client.transport();
        let outcome = fetch::retry_with_backoff(self.retries, self.backoff_ms, || {
            let url = url.clone();
            async move {
                fetch::execute_and_parse(transport, R::resource_name(), ApiRequest::get(url)).await
            }
        })
        .await;

        match outcome {
            Ok((status, value)) => {
                if let Err(err) = fetch::validate_list::<R>(status, &value) {
                    return self.resolve_error(err);
                }
                self.client.cache().commit(ticket, value.clone());
                self.resolve_value(&value)
            }
            Err(err) => self.resolve_error(err),
        }
    }

    fn resolve_value(&mut self, value: &Value) -> QuerySnapshot<ListPage<R>> {
        match fetch::materialize_list::<R>(value) {
            Ok(page) => {
                self.last_data = Some(page.clone());
                self.last_error = None;
                QuerySnapshot::ready(page)
            }
            Err(err) => self.resolve_error(err),
        }
    }

    fn resolve_error(&mut self, err: ApiError) -> QuerySnapshot<ListPage<R>> {
        self.last_error = Some(err.clone());
        QuerySnapshot::failed(err, self.last_data.clone())
    }

    fn resolve_url(&self) -> ApiResult<String> {
        let url = self.client.endpoint_url(self.endpoint, &[])?;
        Ok(fetch::with_query(url, &self.params.to_query_string()))
    }
}

// =============================================================================
// Detail queries
// =============================================================================

/// Handle for one single-record read
///
/// Unless overridden with [`enabled`](Self::enabled), the query only runs
/// for a positive id, so a handle wired to an unselected row (id `0` or
/// `-1`) stays idle instead of firing a nonsense request.
pub struct DetailQuery<R: Resource> {
    client: ApiClient,
    endpoint: &'static str,
    id: i64,
    enabled: Option<bool>,
    keep_previous_data: bool,
    retries: u32,
    backoff_ms: u64,
    last_data: Option<R>,
    last_error: Option<ApiError>,
}

impl<R: Resource> DetailQuery<R> {
    pub(crate) fn new(client: ApiClient, endpoint: &'static str, id: i64) -> Self {
        let retries = client.config().read_retries;
        let backoff_ms = client.config().retry_backoff_ms;
        Self {
            client,
            endpoint,
            id,
            enabled: None,
            keep_previous_data: false,
            retries,
            backoff_ms,
            last_data: None,
            last_error: None,
        }
    }

    /// Force the query on or off, replacing the positive-id rule
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Keep serving the previous record while the next one loads
    pub fn keep_previous_data(mut self, keep: bool) -> Self {
        self.keep_previous_data = keep;
        self
    }

    /// Override the configured retry budget for transient failures
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Override the configured base retry delay
    pub fn retry_backoff_ms(mut self, backoff_ms: u64) -> Self {
        self.backoff_ms = backoff_ms;
        self
    }

    /// Point the handle at another record, resetting any error
    pub fn set_id(&mut self, id: i64) {
        if id == self.id {
            return;
        }
        self.id = id;
        self.last_error = None;
        if !self.keep_previous_data {
            self.last_data = None;
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(self.id > 0)
    }

    /// Cache identity of the read as currently parameterized
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(
            R::resource_name(),
            format!("{}?id={}", self.endpoint, self.id),
        )
    }

    /// Current state without any IO
    pub fn snapshot(&self) -> QuerySnapshot<R> {
        if !self.is_enabled() {
            return QuerySnapshot::idle();
        }
        let cached = self.client.cache().lookup(&self.cache_key());
        if let Some(read) = &cached {
            if read.fresh {
                if let Ok(record) = fetch::materialize_detail::<R>(&read.value) {
                    return QuerySnapshot::ready(record);
                }
            }
        }
        if let Some(err) = &self.last_error {
            return QuerySnapshot::failed(err.clone(), self.last_data.clone());
        }
        let placeholder = cached
            .and_then(|read| fetch::materialize_detail::<R>(&read.value).ok())
            .or_else(|| {
                if self.keep_previous_data {
                    self.last_data.clone()
                } else {
                    None
                }
            });
        QuerySnapshot::loading(placeholder)
    }

    /// Resolve the read: serve it from cache when fresh, fetch otherwise
    pub async fn fetch(&mut self) -> QuerySnapshot<R> {
        if !self.is_enabled() {
            return QuerySnapshot::idle();
        }
        let key = self.cache_key();
        if let Some(read) = self.client.cache().lookup(&key) {
            if read.fresh {
                return self.resolve_value(&read.value);
            }
        }
        self.fetch_over_network(key).await
    }

    /// Fetch from the backend even if the cache is fresh
    pub async fn refetch(&mut self) -> QuerySnapshot<R> {
        if !self.is_enabled() {
            return QuerySnapshot::idle();
        }
        let key = self.cache_key();
        self.fetch_over_network(key).await
    }

    async fn fetch_over_network(&mut self, key: CacheKey) -> QuerySnapshot<R> {
        let id = self.id.to_string();
        let url = match self.client.endpoint_url(self.endpoint, &[("id", id.as_str())]) {
            Ok(url) => url,
            Err(err) => return self.resolve_error(err),
        };

        let ticket = self.client.cache().begin_fetch(&key);
        let transport = self.client.transport();
        let outcome = fetch::retry_with_backoff(self.retries, self.backoff_ms, || {
            let url = url.clone();
            async move {
                fetch::execute_and_parse(transport, R::resource_name(), ApiRequest::get(url)).await
            }
        })
        .await;

        match outcome {
            Ok((status, value)) => {
                if let Err(err) = fetch::validate_detail::<R>(status, &value) {
                    return self.resolve_error(err);
                }
                self.client.cache().commit(ticket, value.clone());
                self.resolve_value(&value)
            }
            Err(err) => self.resolve_error(err),
        }
    }

    fn resolve_value(&mut self, value: &Value) -> QuerySnapshot<R> {
        match fetch::materialize_detail::<R>(value) {
            Ok(record) => {
                self.last_data = Some(record.clone());
                self.last_error = None;
                QuerySnapshot::ready(record)
            }
            Err(err) => self.resolve_error(err),
        }
    }

    fn resolve_error(&mut self, err: ApiError) -> QuerySnapshot<R> {
        self.last_error = Some(err.clone());
        QuerySnapshot::failed(err, self.last_data.clone())
    }
}
