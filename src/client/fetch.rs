//! Fetch-and-validate plumbing shared by reads and mutations
//!
//! The pipeline for every request is the same: execute over the transport,
//! sort non-2xx responses into business or network failures, parse the body,
//! check the envelope, then validate the payload against the resource schema
//! before anything is handed to `serde` for typed decoding. Schema
//! violations are written to the diagnostic log at the moment they are
//! detected, then propagated.

use crate::client::transport::{ApiRequest, Transport};
use crate::core::envelope::{self, ListPage, MutationOutcome};
use crate::core::error::{
    ApiError, ApiResult, BusinessFailure, NetworkError, SchemaIssue, SchemaViolation,
};
use crate::core::resource::Resource;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

const REJECTED_FALLBACK: &str = "request rejected by backend";

/// Retry an operation with exponential backoff
///
/// Only errors whose [`ApiError::is_retryable`] is true are retried; schema
/// violations and business rejections surface immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    retries: u32,
    base_delay_ms: u64,
    operation: F,
) -> ApiResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    let mut delay_ms = base_delay_ms;
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < retries && err.is_retryable() => {
                attempt += 1;
                tracing::warn!(
                    attempt,
                    max_attempts = retries + 1,
                    error = %err,
                    "transient failure, retrying"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                delay_ms *= 2;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Execute a request and parse the body as JSON
///
/// Non-2xx responses carrying a readable `message` become business failures;
/// other non-2xx responses stay network errors. A 2xx body that is not JSON
/// is reported as a root-level schema violation for `context`.
pub(crate) async fn execute_and_parse(
    transport: &dyn Transport,
    context: &str,
    request: ApiRequest,
) -> ApiResult<(u16, Value)> {
    let raw = transport.execute(request).await?;

    if !raw.is_success() {
        if let Ok(value) = serde_json::from_str::<Value>(&raw.body) {
            if let Some(message) = value.get("message").and_then(Value::as_str) {
                return Err(BusinessFailure::new(message, Some(raw.status)).into());
            }
        }
        return Err(NetworkError::Status {
            status: raw.status,
            body: excerpt(&raw.body),
        }
        .into());
    }

    let value = serde_json::from_str(&raw.body).map_err(|e| {
        let violation = SchemaViolation::invalid_json(context, &e);
        log_violation(&violation);
        ApiError::Schema(violation)
    })?;
    Ok((raw.status, value))
}

/// Check a list response: envelope shape, status flag, then every row
pub(crate) fn validate_list<R: Resource>(http_status: u16, value: &Value) -> ApiResult<()> {
    let raw = envelope::split_list(value)
        .map_err(|issues| loud_violation(R::resource_name(), issues))?;
    if !raw.status {
        return Err(
            BusinessFailure::new(raw.message.unwrap_or(REJECTED_FALLBACK), Some(http_status))
                .into(),
        );
    }

    let mut issues = Vec::new();
    for (i, item) in raw.items.iter().enumerate() {
        if let Err(item_issues) = R::schema().validate_at(&format!("data[{}]", i), item) {
            issues.extend(item_issues);
        }
    }
    if issues.is_empty() {
        Ok(())
    } else {
        Err(loud_violation(R::resource_name(), issues))
    }
}

/// Decode an already-validated list payload into typed rows
pub(crate) fn materialize_list<R: Resource>(value: &Value) -> ApiResult<ListPage<R>> {
    let raw = envelope::split_list(value)
        .map_err(|issues| loud_violation(R::resource_name(), issues))?;
    let items = raw
        .items
        .iter()
        .map(|item| serde_json::from_value::<R>(item.clone()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| decode_violation(R::resource_name(), "data", e))?;
    Ok(ListPage {
        items,
        current_page: raw.current_page,
        total: raw.total,
        total_pages: raw.total_pages,
    })
}

/// Check a detail response: envelope shape, status flag, then the record
pub(crate) fn validate_detail<R: Resource>(http_status: u16, value: &Value) -> ApiResult<()> {
    let raw = envelope::split_detail(value)
        .map_err(|issues| loud_violation(R::resource_name(), issues))?;
    if !raw.status {
        return Err(
            BusinessFailure::new(raw.message.unwrap_or(REJECTED_FALLBACK), Some(http_status))
                .into(),
        );
    }
    R::schema()
        .validate_at("data", raw.data)
        .map_err(|issues| loud_violation(R::resource_name(), issues))
}

/// Decode an already-validated detail payload into its typed record
pub(crate) fn materialize_detail<R: Resource>(value: &Value) -> ApiResult<R> {
    let raw = envelope::split_detail(value)
        .map_err(|issues| loud_violation(R::resource_name(), issues))?;
    serde_json::from_value(raw.data.clone())
        .map_err(|e| decode_violation(R::resource_name(), "data", e))
}

/// Decode a mutation acknowledgement
///
/// A well-formed envelope with `status: false` is a business failure even
/// though it rode in on a 2xx response.
pub(crate) fn decode_mutation(
    context: &str,
    http_status: u16,
    value: &Value,
) -> ApiResult<MutationOutcome> {
    let raw = envelope::split_mutation(value).map_err(|issues| loud_violation(context, issues))?;
    if !raw.status {
        let message = if raw.outcome.message.is_empty() {
            REJECTED_FALLBACK.to_string()
        } else {
            raw.outcome.message
        };
        return Err(BusinessFailure::new(message, Some(http_status)).into());
    }
    Ok(raw.outcome)
}

/// Build a schema violation, logging it before it propagates
pub(crate) fn loud_violation(resource: &str, issues: Vec<SchemaIssue>) -> ApiError {
    let violation = SchemaViolation::new(resource, issues);
    log_violation(&violation);
    ApiError::Schema(violation)
}

fn log_violation(violation: &SchemaViolation) {
    tracing::error!(
        resource = %violation.resource,
        issue_count = violation.issues.len(),
        detail = %violation,
        "response failed schema validation"
    );
}

fn decode_violation(resource: &str, path: &str, err: serde_json::Error) -> ApiError {
    loud_violation(
        resource,
        vec![SchemaIssue::new(
            path,
            format!("decodable {}", resource),
            format!("decode failure ({})", err),
        )],
    )
}

/// Join a base URL and an endpoint path without doubling slashes
pub(crate) fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

/// Append a serialized query string, when there is one
pub(crate) fn with_query(url: String, query: &str) -> String {
    if query.is_empty() {
        url
    } else {
        format!("{}?{}", url, query)
    }
}

/// Truncate to 240 bytes on a char boundary; error bodies can be whole HTML pages
fn excerpt(body: &str) -> String {
    const MAX: usize = 240;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut cut = MAX;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &body[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::transport::RawResponse;
    use crate::core::error::NetworkError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CannedTransport {
        status: u16,
        body: String,
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn execute(&self, _request: ApiRequest) -> Result<RawResponse, NetworkError> {
            Ok(RawResponse {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }

    // ── retry loop ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_retry_recovers_from_transient_failures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in = calls.clone();

        let result: ApiResult<u32> = retry_with_backoff(2, 1, move || {
            let calls = calls_in.clone();
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(NetworkError::Transport {
                        message: "connection reset".to_string(),
                    }
                    .into())
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_budget() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in = calls.clone();

        let result: ApiResult<u32> = retry_with_backoff(2, 1, move || {
            let calls = calls_in.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(NetworkError::Transport {
                    message: "still down".to_string(),
                }
                .into())
            }
        })
        .await;

        assert!(result.is_err());
        // initial attempt plus two retries
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_terminal_errors_are_not_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in = calls.clone();

        let result: ApiResult<u32> = retry_with_backoff(2, 1, move || {
            let calls = calls_in.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(BusinessFailure::new("duplicate record", Some(200)).into())
            }
        })
        .await;

        assert!(matches!(result, Err(ApiError::Business(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    // ── response sorting ────────────────────────────────────────────────

    #[tokio::test]
    async fn test_non_2xx_with_message_becomes_business_failure() {
        let transport = CannedTransport {
            status: 422,
            body: json!({"message": "account number already registered"}).to_string(),
        };
        let err = execute_and_parse(&transport, "bank", ApiRequest::get("http://x/bank"))
            .await
            .unwrap_err();
        match err {
            ApiError::Business(failure) => {
                assert_eq!(failure.message, "account number already registered");
                assert_eq!(failure.http_status, Some(422));
            }
            other => panic!("expected business failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_2xx_without_message_stays_network_error() {
        let transport = CannedTransport {
            status: 502,
            body: "<html>Bad Gateway</html>".to_string(),
        };
        let err = execute_and_parse(&transport, "bank", ApiRequest::get("http://x/bank"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Network(NetworkError::Status { status: 502, .. })
        ));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_2xx_junk_body_is_a_schema_violation() {
        let transport = CannedTransport {
            status: 200,
            body: "<html>login page</html>".to_string(),
        };
        let err = execute_and_parse(&transport, "bank", ApiRequest::get("http://x/bank"))
            .await
            .unwrap_err();
        match err {
            ApiError::Schema(violation) => {
                assert_eq!(violation.resource, "bank");
                assert_eq!(violation.issues[0].path, "");
            }
            other => panic!("expected schema violation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_2xx_json_parses() {
        let transport = CannedTransport {
            status: 200,
            body: json!({"status": true}).to_string(),
        };
        let (status, value) =
            execute_and_parse(&transport, "bank", ApiRequest::get("http://x/bank"))
                .await
                .unwrap();
        assert_eq!(status, 200);
        assert_eq!(value, json!({"status": true}));
    }

    // ── decoding ────────────────────────────────────────────────────────

    #[test]
    fn test_decode_mutation_status_false_is_business_failure() {
        let value = json!({"status": false, "message": "credit limit exceeded"});
        let err = decode_mutation("invoice-create", 200, &value).unwrap_err();
        match err {
            ApiError::Business(failure) => {
                assert_eq!(failure.message, "credit limit exceeded");
                assert_eq!(failure.http_status, Some(200));
            }
            other => panic!("expected business failure, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_mutation_success() {
        let value = json!({"status": true, "message": "saved", "id": 914});
        let outcome = decode_mutation("invoice-create", 200, &value).unwrap();
        assert_eq!(outcome.id, Some(914));
        assert_eq!(outcome.message, "saved");
    }

    // ── URL assembly ────────────────────────────────────────────────────

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("http://localhost:8000/api/", "/bank"),
            "http://localhost:8000/api/bank"
        );
        assert_eq!(
            join_url("http://localhost:8000/api", "bank/42"),
            "http://localhost:8000/api/bank/42"
        );
        assert_eq!(join_url("http://localhost:8000", ""), "http://localhost:8000");
    }

    #[test]
    fn test_with_query() {
        assert_eq!(with_query("http://x/bank".to_string(), ""), "http://x/bank");
        assert_eq!(
            with_query("http://x/bank".to_string(), "page=2"),
            "http://x/bank?page=2"
        );
    }

    #[test]
    fn test_excerpt_bounds_long_bodies() {
        let long = "é".repeat(500);
        let cut = excerpt(&long);
        assert!(cut.len() <= 244);
        assert!(cut.ends_with("..."));
        assert_eq!(excerpt("short"), "short");
    }
}
