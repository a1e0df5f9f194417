//! Transport Seam
//!
//! `ApiClient` builds `ApiRequest`s and hands them to a `Transport`. The HTTP
//! transport sends them with reqwest; tests swap in a scripted one.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

use super::error::{ClientError, ClientResult};
use crate::config::ClientConfig;

/// HTTP method used by the backend API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    /// Whether requests with this method change server state
    pub fn is_mutating(&self) -> bool {
        matches!(self, Method::Post)
    }
}

/// One field of a multipart form
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

impl FormPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        FormPart::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FormPart>),
}

/// A request to the backend, independent of the HTTP library
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            ..Self::get(path)
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    pub fn multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    /// Value of a query parameter, if present
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value of a header, if present
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Path with the percent-encoded query string appended
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }

        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.path, query)
    }
}

/// Raw response: status plus body bytes
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        serde_json::from_slice(&self.body).map_err(ClientError::Decode)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// The `error` field of a JSON body, else the raw body text
    pub fn error_message(&self) -> String {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            error: String,
        }

        self.json::<ErrorBody>()
            .map(|b| b.error)
            .unwrap_or_else(|_| self.text())
    }

    /// Map a non-2xx status to the matching error
    pub fn error_for_status(self) -> ClientResult<Self> {
        if self.is_success() {
            return Ok(self);
        }
        if self.status == 401 {
            return Err(ClientError::Unauthorized);
        }

        Err(ClientError::Api {
            status: self.status,
            message: self.error_message(),
        })
    }
}

/// Sends requests to the backend
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse>;
}

// ============================================
// reqwest transport
// ============================================

/// Transport over HTTP with a per-process cookie jar for the session
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .cookie_store(true)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build(&self, request: ApiRequest) -> ClientResult<reqwest::RequestBuilder> {
        let url = format!("{}{}", self.base_url, request.path_and_query());

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(parts) => {
                let mut form = Form::new();
                for part in parts {
                    form = match part {
                        FormPart::Text { name, value } => form.text(name, value),
                        FormPart::File {
                            name,
                            file_name,
                            mime,
                            bytes,
                        } => {
                            let part = Part::bytes(bytes).file_name(file_name).mime_str(&mime)?;
                            form.part(name, part)
                        }
                    };
                }
                builder.multipart(form)
            }
        };

        Ok(builder)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        let request_id = Uuid::new_v4();
        let span = tracing::debug_span!(
            "request",
            %request_id,
            method = ?request.method,
            path = %request.path,
        );

        async move {
            let builder = self.build(request)?;
            let response = builder.send().await.map_err(ClientError::from_transport)?;
            let status = response.status().as_u16();
            let body = response
                .bytes()
                .await
                .map_err(ClientError::from_transport)?
                .to_vec();

            tracing::debug!(status, bytes = body.len(), "response received");
            Ok(ApiResponse { status, body })
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_and_query_encoding() {
        let request = ApiRequest::get("/api/record/metrics")
            .query("range", "week")
            .query("user_id", 3);
        assert_eq!(
            request.path_and_query(),
            "/api/record/metrics?range=week&user_id=3"
        );

        let odd = ApiRequest::get("/search").query("q", "a b&c");
        assert_eq!(odd.path_and_query(), "/search?q=a%20b%26c");
    }

    #[test]
    fn test_error_for_status() {
        assert!(ApiResponse::new(200, "{}").error_for_status().is_ok());

        let err = ApiResponse::new(401, r#"{"error":"Unauthorized"}"#)
            .error_for_status()
            .unwrap_err();
        assert!(err.is_unauthorized());

        match ApiResponse::new(400, r#"{"error":"Missing fields"}"#).error_for_status() {
            Err(ClientError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Missing fields");
            }
            other => panic!("unexpected: {:?}", other),
        }

        match ApiResponse::new(500, "boom").error_for_status() {
            Err(ClientError::Api { message, .. }) => assert_eq!(message, "boom"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_header_lookup_case_insensitive() {
        let request = ApiRequest::post("/api/posts").header("X-CSRFToken", "tok");
        assert_eq!(request.header_value("x-csrftoken"), Some("tok"));
        assert!(request.method.is_mutating());
    }
}
