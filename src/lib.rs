//! # Supplyline
//!
//! A typed resource-access layer for logistics and procurement ERP backends.
//!
//! ## Features
//!
//! - **Declared Payloads**: one macro declaration yields the struct, its serde
//!   derives and the schema its responses are validated against
//! - **Schema-Checked Responses**: every decoded body is walked field by field,
//!   and every deviation is reported at once with its dotted path
//! - **Keyed Read Cache**: reads are cached by resource family and serialized
//!   parameters; successful mutations invalidate whole families
//! - **Out-of-Order Safe**: fetches are ticketed, so a superseded response can
//!   never overwrite a newer one
//! - **Business-Aware Failures**: a `status: false` envelope on a 2xx response
//!   is a first-class failure, distinct from transport errors
//! - **Bounded Retries**: transient network failures retry with doubling
//!   backoff; backend rejections never do
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use supplyline::prelude::*;
//!
//! let client = ApiClient::builder()
//!     .base_url("https://erp.example.com/api")
//!     .build()?;
//!
//! // Paginated, cached list read
//! let mut banks = client.list::<Bank>()
//!     .params(QueryParams::new().page(1).search("beneficiary_name", "Nordship"))
//!     .keep_previous_data(true);
//! let snapshot = banks.fetch().await;
//!
//! // Create a record, invalidating every cached bank read
//! let outcome = client.create::<Bank>().send(&new_bank).await?;
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod core;
pub mod resources;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core types ===
    pub use crate::core::{
        ApiError, ApiResult, BusinessFailure, ConfigError, EndpointTemplate, FieldKind,
        InputError, InputIssue, ListPage, MutableResource, MutationOutcome, NetworkError,
        ParamValue, Payload, QueryParams, Resource, Schema, SchemaIssue, SchemaRef,
        SchemaViolation,
    };

    // === Client ===
    pub use crate::client::{
        ApiClient, ApiRequest, ClientBuilder, DetailQuery, HttpTransport, ListQuery, Method,
        Mutation, QuerySnapshot, QueryStatus, RawResponse, Transport,
    };

    // === Cache ===
    pub use crate::cache::{CacheKey, CachedRead, QueryCache};

    // === Config ===
    pub use crate::config::{ApiConfig, EndpointMap};

    // === Resource catalog ===
    pub use crate::resources::{
        Bank, Contact, CurrencyRef, Customer, CustomerRef, Grn, GrnRef, Invoice,
        LogisticRequest, NewBank, NewContact, NewCustomer, NewGrn, NewInvoice,
        NewLogisticRequest, NewPrfq, NewShippingAddress, NewSpare, NewStf, NewStockInspection,
        PortRef, Prfq, PriorityRef, ShippingAddress, Spare, Stf, StockInspection, UpdateBank,
        UpdateCustomer, UpdateInvoice, UpdateSpare, UserRef,
    };

    // === Macros ===
    pub use crate::{define_payload, define_resource, resource_mutations};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{Value, json};
    pub use validator::Validate;
}
