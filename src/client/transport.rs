//! HTTP transport seam
//!
//! Everything above this layer works with [`ApiRequest`] and [`RawResponse`];
//! the only production implementation is [`HttpTransport`] over `reqwest`.
//! Tests swap in scripted transports to drive the cache and retry machinery
//! without a network.

use crate::core::error::{ApiResult, NetworkError};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

/// HTTP methods the backends actually use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

/// One outgoing request, fully resolved
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute URL including any query string
    pub url: String,
    /// JSON body for mutations
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            body: Some(body),
        }
    }

    pub fn put(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Put,
            url: url.into(),
            body: Some(body),
        }
    }
}

/// Status and body of a response, before any decoding
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes requests; the seam between the client and the wire
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, NetworkError>;
}

/// Production transport over a shared `reqwest` client
///
/// Each request is stamped with a fresh `x-request-id` so one client-side
/// operation can be matched to backend logs.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> ApiResult<Self> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
        })
    }

    pub fn with_timeout(timeout: Duration) -> ApiResult<Self> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, NetworkError> {
        let request_id = Uuid::new_v4();
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
            Method::Put => self.client.put(&request.url),
        };
        builder = builder.header("x-request-id", request_id.to_string());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| NetworkError::Transport {
            message: e.to_string(),
        })?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| NetworkError::Transport {
            message: e.to_string(),
        })?;

        tracing::debug!(
            request_id = %request_id,
            method = request.method.as_str(),
            url = %request.url,
            status,
            "request completed"
        );

        Ok(RawResponse { status, body })
    }
}
