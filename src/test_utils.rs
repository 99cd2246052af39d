//! Shared test utilities.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use reqwest::StatusCode;

use crate::error::{Error, Result};
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Transport with a pre-programmed queue of responses.
///
/// Responses are returned in FIFO order. When the queue is exhausted,
/// subsequent calls fail with a transport error.
///
/// Every executed request is recorded. Use
/// [`request_handle`](Self::request_handle) to inspect them after the
/// transport has been moved into a client.
pub(crate) struct MockTransport {
    responses: Arc<Mutex<VecDeque<Result<ApiResponse>>>>,
    recorded: Arc<Mutex<Vec<ApiRequest>>>,
}

impl MockTransport {
    /// Creates a mock that returns the given responses in order.
    pub(crate) fn new(responses: Vec<Result<ApiResponse>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            recorded: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A `200 OK` response carrying `value` as JSON.
    pub(crate) fn json(value: serde_json::Value) -> Result<ApiResponse> {
        Ok(ApiResponse {
            status: StatusCode::OK,
            body: value.to_string().into_bytes(),
        })
    }

    /// A response with an arbitrary status and raw body.
    pub(crate) fn status(status: StatusCode, body: &str) -> Result<ApiResponse> {
        Ok(ApiResponse {
            status,
            body: body.as_bytes().to_vec(),
        })
    }

    /// A failed request.
    pub(crate) fn network_error(message: &str) -> Result<ApiResponse> {
        Err(Error::Transport {
            message: message.to_string(),
            source: None,
        })
    }

    /// Returns a handle for inspecting executed requests.
    pub(crate) fn request_handle(&self) -> RequestLogHandle {
        RequestLogHandle {
            recorded: self.recorded.clone(),
            responses: self.responses.clone(),
        }
    }
}

/// Shared handle to a mock transport's request log and response queue.
pub(crate) struct RequestLogHandle {
    recorded: Arc<Mutex<Vec<ApiRequest>>>,
    responses: Arc<Mutex<VecDeque<Result<ApiResponse>>>>,
}

impl RequestLogHandle {
    /// Returns all executed requests in order.
    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.recorded.lock().unwrap().clone()
    }

    /// Returns the paths of all executed requests in order.
    pub(crate) fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    /// Returns the number of executed requests.
    pub(crate) fn request_count(&self) -> usize {
        self.recorded.lock().unwrap().len()
    }

    /// Returns the number of unconsumed responses.
    pub(crate) fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

impl Transport for MockTransport {
    fn execute<'a>(
        &'a self,
        request: ApiRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ApiResponse>> + Send + 'a>> {
        let responses = self.responses.clone();
        let recorded = self.recorded.clone();
        Box::pin(async move {
            recorded.lock().unwrap().push(request);
            responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Self::network_error("no more mock responses"))
        })
    }
}
