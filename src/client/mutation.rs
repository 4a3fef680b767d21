//! Write-side mutation handles
//!
//! A [`Mutation`] is a reusable description of one create or update
//! endpoint. Sending it validates the input, lifts any `:id`-style path
//! parameters out of the body and into the URL, executes the request, and
//! decodes the acknowledgement. On success the resource families it was
//! told about are invalidated, so the next read on them refetches; nothing
//! is invalidated on any failure, business rejections included.
//!
//! Mutations are never retried. A read can be repeated safely, a create
//! cannot.

use crate::client::ApiClient;
use crate::client::fetch;
use crate::client::transport::{ApiRequest, Method};
use crate::core::envelope::MutationOutcome;
use crate::core::error::{ApiResult, InputError};
use crate::core::resource::Resource;
use serde::Serialize;
use serde_json::Value;
use validator::Validate;

/// Handle for one create or update endpoint
///
/// # Example
///
/// ```rust,ignore
/// let update = client.put("bank-update").invalidates_resource::<Bank>();
///
/// // `/bank/:id` resolves against the body; `id` never reaches the wire
/// let outcome = update.send(&UpdateBank { id: 42, bank_name: name, .. }).await?;
/// ```
pub struct Mutation {
    client: ApiClient,
    method: Method,
    endpoint: String,
    invalidates: Vec<String>,
}

impl Mutation {
    pub(crate) fn new(client: ApiClient, method: Method, endpoint: String) -> Self {
        Self {
            client,
            method,
            endpoint,
            invalidates: Vec::new(),
        }
    }

    /// Invalidate every cached read of this resource family after success
    pub fn invalidates(mut self, resource: impl Into<String>) -> Self {
        self.invalidates.push(resource.into());
        self
    }

    /// Typed shorthand for [`invalidates`](Self::invalidates)
    pub fn invalidates_resource<R: Resource>(mut self) -> Self {
        self.invalidates.push(R::resource_name().to_string());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Validate and send a typed input
    ///
    /// Validation failures are reported without any request being sent.
    pub async fn send<I>(&self, input: &I) -> ApiResult<MutationOutcome>
    where
        I: Serialize + Validate,
    {
        input.validate()?;
        let body = serde_json::to_value(input).map_err(|e| {
            InputError::single("(body)", format!("not serializable as JSON: {}", e))
        })?;
        self.dispatch(body).await
    }

    /// Send a raw JSON body, skipping input validation
    pub async fn send_value(&self, body: Value) -> ApiResult<MutationOutcome> {
        self.dispatch(body).await
    }

    async fn dispatch(&self, body: Value) -> ApiResult<MutationOutcome> {
        let template = self.client.config().resolve(&self.endpoint)?;
        let (path, body) = if template.has_placeholders() {
            match body {
                Value::Object(mut map) => {
                    let path = template.fill_from_object(&mut map)?;
                    (path, Value::Object(map))
                }
                other => {
                    return Err(InputError::single(
                        "(body)",
                        format!(
                            "endpoint '{}' takes path parameters, so the body must be a JSON object, not {}",
                            self.endpoint,
                            crate::core::schema::json_type_name(&other),
                        ),
                    )
                    .into());
                }
            }
        } else {
            (template.raw().to_string(), body)
        };

        let request = ApiRequest {
            method: self.method,
            url: self.client.join_base(&path),
            body: Some(body),
        };
        let (status, value) =
            fetch::execute_and_parse(self.client.transport(), &self.endpoint, request).await?;
        let outcome = fetch::decode_mutation(&self.endpoint, status, &value)?;

        for resource in &self.invalidates {
            self.client.cache().invalidate_resource(resource);
        }
        tracing::debug!(
            endpoint = %self.endpoint,
            id = ?outcome.id,
            invalidated_families = self.invalidates.len(),
            "mutation committed"
        );
        Ok(outcome)
    }
}
