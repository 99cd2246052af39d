//! Error handling for every API call and for the run poller.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::api::runs::RunStatus;

/// Result type returned throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the client.
#[derive(Error, Debug)]
pub enum Error {
    /// The client was constructed with an empty API key.
    #[error("API key cannot be empty")]
    EmptyApiKey,

    /// The client configuration is invalid (bad base URL, header value, ...).
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// The HTTP request could not be issued or its response could not be read.
    #[error("Network error: {message}")]
    Transport {
        /// Human readable description of the failure.
        message: String,
        /// Underlying error, when one is available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The API answered with a non-success status code.
    #[error("HTTP {status}: {body}")]
    RemoteApi {
        /// Status code returned by the API.
        status: StatusCode,
        /// Raw response body, verbatim.
        body: String,
    },

    /// The request body could not be serialized to JSON.
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// An identifier cannot be used as a path segment.
    #[error("Invalid resource id: {0:?}")]
    InvalidId(String),

    /// The response body is not JSON or does not have the expected shape.
    #[error("Invalid response format: {0}")]
    Decode(#[from] serde_json::Error),

    /// The run stopped in a terminal state other than `completed`.
    #[error("Run {run_id} ended with status {status}{}", reason_suffix(.reason))]
    RunTerminated {
        /// Identifier of the run.
        run_id: String,
        /// Terminal status that was observed.
        status: RunStatus,
        /// Error message reported by the API, if any.
        reason: Option<String>,
    },

    /// The run is waiting for tool outputs, which this client cannot submit.
    #[error("Run {run_id} requires action from the caller")]
    RunRequiresAction {
        /// Identifier of the run.
        run_id: String,
        /// The `required_action` object reported by the API.
        required_action: Option<serde_json::Value>,
    },

    /// The thread holds no messages at all.
    #[error("Thread has no messages")]
    EmptyThread,

    /// The thread holds messages, none of them written by the assistant.
    #[error("Thread has no assistant responses")]
    NoAssistantResponse,

    /// An assistant message carries no text content.
    #[error("Assistant message {message_id} has no text content")]
    MalformedMessage {
        /// Identifier of the offending message.
        message_id: String,
    },

    /// A chat completion came back without any choices.
    #[error("No choices returned in chat completion")]
    EmptyCompletion,

    /// Polling was cancelled through the caller's token.
    #[error("Polling cancelled")]
    Cancelled,

    /// Polling did not observe a terminal status within the allowed time.
    #[error("Run did not finish within {0:?}")]
    Timeout(Duration),
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|r| format!(": {r}"))
        .unwrap_or_default()
}

impl Error {
    /// Wraps a `reqwest` failure as a transport error.
    pub(crate) fn transport(error: reqwest::Error) -> Self {
        Self::Transport {
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }

    /// Returns `true` for errors reported by the remote API itself.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteApi { .. })
    }

    /// Returns the raw response body of a [`Error::RemoteApi`] error.
    pub fn remote_body(&self) -> Option<&str> {
        match self {
            Self::RemoteApi { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Returns the status code of a [`Error::RemoteApi`] error.
    pub fn remote_status(&self) -> Option<StatusCode> {
        match self {
            Self::RemoteApi { status, .. } => Some(*status),
            _ => None,
        }
    }
}
