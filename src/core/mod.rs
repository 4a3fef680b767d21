//! Core module containing the fundamental types of the client

pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod params;
pub mod resource;
pub mod schema;

pub use endpoint::EndpointTemplate;
pub use envelope::{ListPage, MutationOutcome};
pub use error::{
    ApiError, ApiResult, BusinessFailure, ConfigError, InputError, InputIssue, NetworkError,
    SchemaIssue, SchemaViolation,
};
pub use params::{ParamValue, QueryParams};
pub use resource::{MutableResource, Payload, Resource};
pub use schema::{FieldKind, FieldSpec, Schema, SchemaRef};
