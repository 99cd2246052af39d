//! Runs: executions of an assistant against a thread.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::CreatedObject;
use crate::error::Result;
use crate::resource::{resource_path, ResourceClient};

/// Status of a run, as reported by the API.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Waiting to be picked up.
    Queued,
    /// Being executed.
    InProgress,
    /// Waiting for tool outputs from the caller.
    RequiresAction,
    /// Cancellation requested, not yet effective.
    Cancelling,
    /// Cancelled.
    Cancelled,
    /// Failed; see [`Run::last_error`].
    Failed,
    /// Finished successfully.
    Completed,
    /// Expired before finishing.
    Expired,
}

impl RunStatus {
    /// Returns `true` for statuses from which no further transition occurs.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Cancelled | Self::Failed | Self::Expired
        )
    }

    /// Wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::RequiresAction => "requires_action",
            Self::Cancelling => "cancelling",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
            Self::Completed => "completed",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error reported on a failed run.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RunError {
    /// Machine readable error code.
    pub code: String,
    /// Human readable description.
    pub message: String,
}

/// A run object.
#[derive(Deserialize, Debug, Clone)]
pub struct Run {
    /// Run identifier.
    pub id: String,
    /// Thread the run belongs to.
    pub thread_id: String,
    /// Assistant executing the run.
    pub assistant_id: String,
    /// Current status.
    pub status: RunStatus,
    /// Last error, set when the run failed.
    #[serde(default)]
    pub last_error: Option<RunError>,
    /// Pending tool calls, set when the status is `requires_action`.
    #[serde(default)]
    pub required_action: Option<serde_json::Value>,
    /// Creation time.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct CreateRunRequest<'a> {
    assistant_id: &'a str,
}

/// Run endpoints.
#[derive(Clone)]
pub struct Runs {
    client: ResourceClient,
}

impl Runs {
    /// Creates the endpoint group.
    pub fn new(client: ResourceClient) -> Self {
        Self { client }
    }

    /// Starts a run of `assistant_id` on `thread_id` and returns its id.
    pub async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<String> {
        let created: CreatedObject = self
            .client
            .post(
                &resource_path(&["threads", thread_id, "runs"])?,
                &CreateRunRequest { assistant_id },
            )
            .await?;
        info!(thread_id, assistant_id, run_id = %created.id, "Created run");
        Ok(created.id)
    }

    /// Fetches the current state of a run.
    pub async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.client
            .get(&resource_path(&["threads", thread_id, "runs", run_id])?)
            .await
    }
}
