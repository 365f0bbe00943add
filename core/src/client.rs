//! Stateless HTTP request builder and response parser for the JSON API.
//!
//! # Design
//! `ApiClient` holds only a `base_url` and carries no mutable state between
//! calls. A request is split into `build_request`, which produces an
//! `HttpRequest`, and `parse_response`, which consumes an `HttpResponse`.
//! `request` strings the two together around a `Transport`. The client never
//! notifies anyone; presenting failures is the caller's decision.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, JSON_CONTENT_TYPE};
use crate::transport::Transport;

/// Stateless client for the application's JSON API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URLs pass through untouched, root-relative paths (`/api/x`)
    /// resolve against the base's origin, anything else hangs off the base.
    pub fn resolve(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        if endpoint.starts_with('/') {
            return format!("{}{endpoint}", self.origin());
        }
        if endpoint.is_empty() {
            return self.base_url.clone();
        }
        format!("{}/{endpoint}", self.base_url)
    }

    /// Scheme and authority of the base URL. Empty for a path-only base.
    fn origin(&self) -> &str {
        let Some(scheme_end) = self.base_url.find("://") else {
            return "";
        };
        let authority_start = scheme_end + 3;
        match self.base_url[authority_start..].find('/') {
            Some(i) => &self.base_url[..authority_start + i],
            None => &self.base_url,
        }
    }

    /// Build the request for `endpoint`.
    ///
    /// Every request is tagged as JSON. The payload becomes the body only for
    /// POST and PUT, and only when it is present and not JSON `null`.
    pub fn build_request(
        &self,
        endpoint: &str,
        method: HttpMethod,
        payload: Option<&Value>,
    ) -> Result<HttpRequest, ApiError> {
        let body = match payload {
            Some(value) if method.carries_body() && !value.is_null() => Some(
                serde_json::to_string(value).map_err(|e| ApiError::Serialization(e.to_string()))?,
            ),
            _ => None,
        };
        Ok(HttpRequest {
            method,
            path: self.resolve(endpoint),
            headers: vec![(JSON_CONTENT_TYPE.0.to_string(), JSON_CONTENT_TYPE.1.to_string())],
            body,
        })
    }

    /// Same as `build_request` for any serializable payload.
    pub fn build_request_with<P: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        method: HttpMethod,
        payload: &P,
    ) -> Result<HttpRequest, ApiError> {
        let value = serde_json::to_value(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        self.build_request(endpoint, method, Some(&value))
    }

    /// Decode a response. Any non-2xx status is an error regardless of the
    /// body; a 2xx body is parsed as JSON whatever its content type says.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value, ApiError> {
        self.parse_response_as(response)
    }

    pub fn parse_response_as<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// Build, execute and parse in one call.
    pub fn request<T: Transport + ?Sized>(
        &self,
        transport: &T,
        endpoint: &str,
        method: HttpMethod,
        payload: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let req = self.build_request(endpoint, method, payload)?;
        debug!(method = %req.method, path = %req.path, has_body = req.body.is_some(), "sending request");
        let response = transport.execute(req)?;
        debug!(status = response.status, "received response");
        self.parse_response(response)
    }
}

fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpStatus {
        status: response.status,
    })
}
