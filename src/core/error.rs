//! Typed error handling for the supplyline client
//!
//! This module provides a comprehensive error type hierarchy that enables
//! callers to handle failures specifically rather than dealing with generic
//! `anyhow::Error` types.
//!
//! # Error Categories
//!
//! - [`NetworkError`]: Transport failures and non-2xx responses without a usable body
//! - [`SchemaViolation`]: Responses that decoded as JSON but do not match the declared schema
//! - [`BusinessFailure`]: Requests the backend understood and rejected (`status: false` or an error message)
//! - [`ConfigError`]: Endpoint map and client configuration problems
//! - [`InputError`]: Mutation payloads rejected before any request is sent
//!
//! # Example
//!
//! ```rust,ignore
//! use supplyline::prelude::*;
//!
//! match bank_query.fetch().await.error() {
//!     Some(ApiError::Business(failure)) => show_toast(&failure.message),
//!     Some(ApiError::Schema(violation)) => report_contract_drift(violation),
//!     Some(other) => show_toast(&other.to_string()),
//!     None => {}
//! }
//! ```

use serde::Serialize;
use std::fmt;

/// The main error type for the supplyline client
///
/// This enum encompasses all possible errors that can occur while talking to
/// a backend. Each variant contains a more specific error type for that
/// category.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// Transport and HTTP-level errors
    Network(NetworkError),

    /// Response shape did not match the declared schema
    Schema(SchemaViolation),

    /// Backend accepted the request and reported a domain failure
    Business(BusinessFailure),

    /// Endpoint map / client configuration errors
    Config(ConfigError),

    /// Mutation input rejected before sending
    Input(InputError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e) => write!(f, "{}", e),
            ApiError::Schema(e) => write!(f, "{}", e),
            ApiError::Business(e) => write!(f, "{}", e),
            ApiError::Config(e) => write!(f, "{}", e),
            ApiError::Input(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e) => Some(e),
            ApiError::Schema(e) => Some(e),
            ApiError::Business(e) => Some(e),
            ApiError::Config(e) => Some(e),
            ApiError::Input(e) => Some(e),
        }
    }
}

impl ApiError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Network(e) => e.error_code(),
            ApiError::Schema(_) => "SCHEMA_VIOLATION",
            ApiError::Business(_) => "BUSINESS_FAILURE",
            ApiError::Config(e) => e.error_code(),
            ApiError::Input(_) => "INPUT_REJECTED",
        }
    }

    /// Whether retrying the same request could plausibly succeed.
    ///
    /// Only transport-level failures qualify. A schema violation, a business
    /// rejection or a bad payload will fail the same way every time, so the
    /// read-side retry loop must not burn attempts on them.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// The HTTP status that produced this error, when one was observed
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ApiError::Network(NetworkError::Status { status, .. }) => Some(*status),
            ApiError::Business(e) => e.http_status,
            _ => None,
        }
    }
}

// =============================================================================
// Network Errors
// =============================================================================

/// Transport and HTTP-level errors
#[derive(Debug, Clone)]
pub enum NetworkError {
    /// The request never produced a response (DNS, connect, TLS, timeout)
    Transport {
        message: String,
    },

    /// The backend answered with a non-2xx status and no usable error body
    Status {
        status: u16,
        body: String,
    },
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::Transport { message } => {
                write!(f, "Network error: {}", message)
            }
            NetworkError::Status { status, body } => {
                if body.is_empty() {
                    write!(f, "Request failed with HTTP {}", status)
                } else {
                    write!(f, "Request failed with HTTP {}: {}", status, body)
                }
            }
        }
    }
}

impl std::error::Error for NetworkError {}

impl NetworkError {
    pub fn error_code(&self) -> &'static str {
        match self {
            NetworkError::Transport { .. } => "NETWORK_TRANSPORT",
            NetworkError::Status { .. } => "NETWORK_STATUS",
        }
    }

    /// Server-side trouble and missing responses are worth another attempt;
    /// 4xx answers are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::Transport { .. } => true,
            NetworkError::Status { status, .. } => *status >= 500,
        }
    }
}

impl From<NetworkError> for ApiError {
    fn from(err: NetworkError) -> Self {
        ApiError::Network(err)
    }
}

// =============================================================================
// Schema Violations
// =============================================================================

/// One field that failed response validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaIssue {
    /// Dotted path into the payload, e.g. `data[3].beneficiary_name`
    pub path: String,
    /// What the schema declares at that path
    pub expected: String,
    /// What the payload actually carried
    pub received: String,
}

impl SchemaIssue {
    pub fn new(
        path: impl Into<String>,
        expected: impl Into<String>,
        received: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
            received: received.into(),
        }
    }
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, received {}",
            self.path, self.expected, self.received
        )
    }
}

/// A response that parsed as JSON but does not match its declared schema
///
/// Carries every offending field, not just the first, so a contract drift on
/// the backend shows up as one complete report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    /// Resource (or endpoint) whose schema was violated
    pub resource: String,
    pub issues: Vec<SchemaIssue>,
}

impl SchemaViolation {
    pub fn new(resource: impl Into<String>, issues: Vec<SchemaIssue>) -> Self {
        Self {
            resource: resource.into(),
            issues,
        }
    }

    /// Violation for a body that was not even valid JSON
    pub fn invalid_json(resource: impl Into<String>, err: &serde_json::Error) -> Self {
        Self {
            resource: resource.into(),
            issues: vec![SchemaIssue::new(
                "",
                "a JSON document",
                format!("unparseable body ({})", err),
            )],
        }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Response for '{}' failed schema validation ({} issue{}): ",
            self.resource,
            self.issues.len(),
            if self.issues.len() == 1 { "" } else { "s" }
        )?;
        let msgs: Vec<String> = self.issues.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", msgs.join("; "))
    }
}

impl std::error::Error for SchemaViolation {}

impl From<SchemaViolation> for ApiError {
    fn from(err: SchemaViolation) -> Self {
        ApiError::Schema(err)
    }
}

// =============================================================================
// Business Failures
// =============================================================================

/// A request the backend understood and rejected
///
/// Produced when a 2xx envelope carries `status: false`, or when a non-2xx
/// response body contains a readable `message`. These are terminal: the same
/// request will be rejected the same way again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusinessFailure {
    /// Message as reported by the backend
    pub message: String,
    /// HTTP status of the carrying response, when one was observed
    pub http_status: Option<u16>,
}

impl BusinessFailure {
    pub fn new(message: impl Into<String>, http_status: Option<u16>) -> Self {
        Self {
            message: message.into(),
            http_status,
        }
    }
}

impl fmt::Display for BusinessFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Request rejected: {}", self.message)
    }
}

impl std::error::Error for BusinessFailure {}

impl From<BusinessFailure> for ApiError {
    fn from(err: BusinessFailure) -> Self {
        ApiError::Business(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to client configuration and the endpoint map
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Failed to parse a configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Missing required field in configuration
    MissingField {
        field: String,
        context: String,
    },

    /// No endpoint registered under this name
    UnknownEndpoint {
        name: String,
    },

    /// A path template placeholder was left unfilled
    MissingPathParam {
        template: String,
        name: String,
    },

    /// IO error while reading configuration
    IoError {
        message: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::MissingField { field, context } => {
                write!(f, "Missing required field '{}' in {}", field, context)
            }
            ConfigError::UnknownEndpoint { name } => {
                write!(f, "No endpoint registered under '{}'", name)
            }
            ConfigError::MissingPathParam { template, name } => {
                write!(f, "Path template '{}' has no value for ':{}'", template, name)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::ParseError { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::MissingField { .. } => "CONFIG_MISSING_FIELD",
            ConfigError::UnknownEndpoint { .. } => "UNKNOWN_ENDPOINT",
            ConfigError::MissingPathParam { .. } => "MISSING_PATH_PARAM",
            ConfigError::IoError { .. } => "CONFIG_IO_ERROR",
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::Config(err)
    }
}

// =============================================================================
// Input Errors
// =============================================================================

/// A single rejected input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputIssue {
    pub field: String,
    pub message: String,
}

/// A mutation payload rejected before any request was sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputError {
    pub issues: Vec<InputIssue>,
}

impl InputError {
    pub fn new(issues: Vec<InputIssue>) -> Self {
        Self { issues }
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![InputIssue {
                field: field.into(),
                message: message.into(),
            }],
        }
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msgs: Vec<String> = self
            .issues
            .iter()
            .map(|i| format!("{}: {}", i.field, i.message))
            .collect();
        write!(f, "Input rejected: {}", msgs.join(", "))
    }
}

impl std::error::Error for InputError {}

impl From<InputError> for ApiError {
    fn from(err: InputError) -> Self {
        ApiError::Input(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(NetworkError::Transport {
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for ApiError {
    fn from(err: serde_yaml::Error) -> Self {
        ApiError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut issues = Vec::new();
        for (field, field_errors) in errors.field_errors() {
            for err in field_errors {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                issues.push(InputIssue {
                    field: field.to_string(),
                    message,
                });
            }
        }
        // HashMap order is arbitrary; keep reports stable
        issues.sort_by(|a, b| a.field.cmp(&b.field).then(a.message.cmp(&b.message)));
        ApiError::Input(InputError::new(issues))
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for supplyline operations
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Tests
// =============================================================================
