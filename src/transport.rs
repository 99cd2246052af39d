//! HTTP transport used by every endpoint group.
//!
//! [`Transport`] is the single seam between the typed API and the network.
//! [`ReqwestTransport`] is the production implementation; tests substitute a
//! scripted transport.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, StatusCode};
use tracing::debug;

use crate::error::{Error, Result};

/// HTTP request timeout applied to each individual API call.
///
/// Distinct from the run poller's overall deadline.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Beta header required by the assistants v2 endpoints.
pub const DEFAULT_BETA_HEADER: (&str, &str) = ("OpenAI-Beta", "assistants=v2");

/// A file sent as `multipart/form-data`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileUpload {
    /// Value of the `purpose` form field.
    pub purpose: String,
    /// File name reported to the API.
    pub filename: String,
    /// Raw file content.
    pub data: Vec<u8>,
}

impl FileUpload {
    fn into_form(self) -> Form {
        Form::new()
            .text("purpose", self.purpose)
            .part("file", Part::bytes(self.data).file_name(self.filename))
    }
}

/// Body of an API request.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    /// No body.
    Empty,
    /// JSON body, sent with `Content-Type: application/json`.
    Json(serde_json::Value),
    /// Multipart body for file uploads.
    Multipart(FileUpload),
}

/// A request relative to the API base URL.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the base URL, e.g. `threads/thread_1/runs`.
    pub path: String,
    /// Request body.
    pub body: RequestBody,
}

impl ApiRequest {
    /// Creates a new request.
    pub fn new(method: Method, path: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method,
            path: path.into(),
            body,
        }
    }
}

/// Raw API response: status code plus body bytes.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Returns the body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Executes API requests.
///
/// Implementations attach authentication and must not interpret the status
/// code; that is the job of [`ResourceClient`](crate::resource::ResourceClient).
pub trait Transport: Send + Sync {
    /// Sends the request and returns the raw response.
    fn execute<'a>(
        &'a self,
        request: ApiRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ApiResponse>> + Send + 'a>>;
}

/// [`Transport`] backed by a `reqwest` client.
pub struct ReqwestTransport {
    /// HTTP client carrying the default headers and timeout.
    client: Client,
    /// Base URL without a trailing slash.
    base_url: String,
}

impl ReqwestTransport {
    /// Builds a transport that authenticates with `api_key`.
    pub fn new(
        api_key: &str,
        base_url: &str,
        beta_header: Option<(&str, &str)>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| Error::InvalidConfig(format!("Invalid API key: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        if let Some((key, value)) = beta_header {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| Error::InvalidConfig(format!("Invalid beta header name: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::InvalidConfig(format!("Invalid beta header value: {e}")))?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::InvalidConfig(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds the full URL for a relative path.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Transport for ReqwestTransport {
    fn execute<'a>(
        &'a self,
        request: ApiRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ApiResponse>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.url(&request.path);
            debug!(method = %request.method, url = %url, "Sending API request");

            let builder = self.client.request(request.method, &url);
            let builder = match request.body {
                RequestBody::Empty => builder,
                RequestBody::Json(value) => builder.json(&value),
                // Content-Type with the boundary is set by reqwest
                RequestBody::Multipart(upload) => builder.multipart(upload.into_form()),
            };

            let response = builder.send().await.map_err(Error::transport)?;
            let status = response.status();
            let body = response.bytes().await.map_err(Error::transport)?.to_vec();

            debug!(
                status = %status,
                body_len = body.len(),
                "Received API response"
            );

            Ok(ApiResponse { status, body })
        })
    }
}
