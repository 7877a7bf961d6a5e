//! HTTP data types shared by the resource modules and the transport.
//!
//! # Design
//! Requests are described as plain data. Resource modules produce an
//! `ApiRequest` (a path relative to the base URL plus `RequestInit` options);
//! `ApiClient::fetch_with_credential` turns it into an absolute `HttpRequest`
//! for the `Transport`, which answers with an `HttpResponse`.
//!
//! `RequestInit` deliberately has no credentials switch: the session cookie is
//! attached by the transport on every request, so caller options cannot turn
//! it off.

use std::fmt;

use serde::Serialize;

use crate::error::ApiError;

pub const CONTENT_TYPE: &str = "content-type";
pub const APPLICATION_JSON: &str = "application/json";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied request options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInit {
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RequestInit {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Adds `content-type: application/json`.
    pub fn json_content_type(mut self) -> Self {
        self.headers
            .push((CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()));
        self
    }

    /// Serializes `payload` as the request body. Does not touch headers.
    pub fn json_body<T: Serialize + ?Sized>(mut self, payload: &T) -> Result<Self, ApiError> {
        let body = serde_json::to_string(payload)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        self.body = Some(body);
        Ok(self)
    }
}

/// A request built by a resource module, relative to the client's base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub path: String,
    pub init: RequestInit,
}

impl ApiRequest {
    pub fn new(path: impl Into<String>, init: RequestInit) -> Self {
        Self {
            path: path.into(),
            init,
        }
    }
}

/// An absolute HTTP request handed to a `Transport`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}
