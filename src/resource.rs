//! Generic request executor shared by the endpoint groups.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::{Error, Result};
use crate::transport::{ApiRequest, ApiResponse, FileUpload, RequestBody, Transport};

/// Status code every endpoint of this API answers with on success.
pub const SUCCESS_STATUS: StatusCode = StatusCode::OK;

/// Sends requests through a [`Transport`] and decodes JSON responses.
///
/// Cheap to clone: every endpoint group holds its own copy.
#[derive(Clone)]
pub struct ResourceClient {
    transport: Arc<dyn Transport>,
}

impl ResourceClient {
    /// Creates a client over the given transport.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// `GET path`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(ApiRequest::new(Method::GET, path, RequestBody::Empty))
            .await
    }

    /// `POST path` with a JSON body.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body).map_err(Error::Encode)?;
        self.send(ApiRequest::new(Method::POST, path, RequestBody::Json(body)))
            .await
    }

    /// `DELETE path`.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(ApiRequest::new(Method::DELETE, path, RequestBody::Empty))
            .await
    }

    /// `POST path` with a multipart file upload.
    pub async fn upload<T: DeserializeOwned>(&self, path: &str, upload: FileUpload) -> Result<T> {
        self.send(ApiRequest::new(
            Method::POST,
            path,
            RequestBody::Multipart(upload),
        ))
        .await
    }

    /// Executes a request, checks its status and decodes the body.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.transport.execute(request).await?;
        let response = check_error_response(response)?;
        Ok(serde_json::from_slice(&response.body)?)
    }
}

/// Joins `segments` into a relative request path, percent-encoding each one.
///
/// Empty segments and the dot segments `.` and `..` are rejected with
/// [`Error::InvalidId`].
pub fn resource_path(segments: &[&str]) -> Result<String> {
    if let Some(bad) = segments
        .iter()
        .find(|s| matches!(**s, "" | "." | ".."))
    {
        return Err(Error::InvalidId((*bad).to_string()));
    }

    let mut url = Url::parse("http://localhost/")
        .map_err(|e| Error::InvalidConfig(format!("Invalid path base: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| Error::InvalidConfig("Path base cannot hold segments".to_string()))?
        .extend(segments);
    Ok(url.path().trim_start_matches('/').to_string())
}

/// Checks a response for a non-success status.
///
/// On success the response is returned unchanged. Otherwise the body is kept
/// verbatim in an [`Error::RemoteApi`].
pub(crate) fn check_error_response(response: ApiResponse) -> Result<ApiResponse> {
    if response.status == SUCCESS_STATUS {
        return Ok(response);
    }
    Err(Error::RemoteApi {
        status: response.status,
        body: response.text(),
    })
}
