//! Run-completion polling.
//!
//! A run executes asynchronously on the server. [`RunPoller`] turns it into a
//! single awaitable result: it fetches the run status at a fixed interval and,
//! once the run has completed, returns the newest assistant reply in the
//! thread.
//!
//! Every loop iteration checks the caller's [`CancellationToken`] and the
//! overall deadline before issuing a request, and the wait between polls races
//! against both. A cancelled or timed-out poller therefore returns within one
//! interval and never issues another status request.

use std::time::Duration;

use tokio::time::{sleep, sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::messages::Messages;
use crate::api::runs::{RunStatus, Runs};
use crate::error::{Error, Result};

/// Interval used by [`PollOptions::default`].
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Maximum wait used by [`PollOptions::default`].
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(600);

/// How a [`RunPoller`] waits.
#[derive(Clone, Debug)]
pub struct PollOptions {
    /// Wait between two status requests.
    pub interval: Duration,
    /// Upper bound on the whole wait, measured from the first poll. A value
    /// too large to add to the current instant, such as [`Duration::MAX`],
    /// means no upper bound.
    pub max_wait: Duration,
    /// Optional token to abort the wait early.
    pub cancel: Option<CancellationToken>,
}

impl PollOptions {
    /// Polls every `interval` for at most `max_wait`.
    pub fn new(interval: Duration, max_wait: Duration) -> Self {
        Self {
            interval,
            max_wait,
            cancel: None,
        }
    }

    /// Aborts polling when `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

impl Default for PollOptions {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_MAX_WAIT)
    }
}

/// Waits for runs to finish and extracts the assistant's reply.
#[derive(Clone)]
pub struct RunPoller {
    runs: Runs,
    messages: Messages,
    options: PollOptions,
}

impl RunPoller {
    /// Creates a poller over the given endpoint groups.
    pub fn new(runs: Runs, messages: Messages, options: PollOptions) -> Self {
        Self {
            runs,
            messages,
            options,
        }
    }

    /// Returns the options this poller was built with.
    pub fn options(&self) -> &PollOptions {
        &self.options
    }

    /// Polls until the run reaches a terminal status.
    ///
    /// Returns `Ok(())` once the run is `completed`.
    ///
    /// # Errors
    ///
    /// - [`Error::RunTerminated`] for `failed`, `cancelled` or `expired`.
    /// - [`Error::RunRequiresAction`] for `requires_action`; tool outputs
    ///   cannot be submitted through this client, so waiting cannot help.
    /// - [`Error::Cancelled`] / [`Error::Timeout`] when interrupted.
    /// - Any error from the status request itself, unretried.
    pub async fn wait_for_completion(&self, thread_id: &str, run_id: &str) -> Result<()> {
        let deadline = Instant::now().checked_add(self.options.max_wait);
        // A token nobody holds never fires.
        let cancel = self.options.cancel.clone().unwrap_or_default();
        let mut polls: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                debug!(run_id, polls, "Polling cancelled");
                return Err(Error::Cancelled);
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return Err(Error::Timeout(self.options.max_wait));
            }

            let run = self.runs.get_run(thread_id, run_id).await?;
            polls += 1;
            debug!(run_id, polls, status = %run.status, "Polled run status");

            match run.status {
                RunStatus::Completed => return Ok(()),
                RunStatus::Failed | RunStatus::Cancelled | RunStatus::Expired => {
                    let reason = run.last_error.map(|e| e.message);
                    warn!(run_id, status = %run.status, reason = ?reason, "Run did not complete");
                    return Err(Error::RunTerminated {
                        run_id: run_id.to_string(),
                        status: run.status,
                        reason,
                    });
                }
                RunStatus::RequiresAction => {
                    warn!(run_id, "Run requires action; stopping");
                    return Err(Error::RunRequiresAction {
                        run_id: run_id.to_string(),
                        required_action: run.required_action,
                    });
                }
                RunStatus::Queued | RunStatus::InProgress | RunStatus::Cancelling => {}
            }

            tokio::select! {
                () = cancel.cancelled() => {
                    debug!(run_id, polls, "Polling cancelled while waiting");
                    return Err(Error::Cancelled);
                }
                () = sleep_until_deadline(deadline) => {
                    return Err(Error::Timeout(self.options.max_wait));
                }
                () = sleep(self.options.interval) => {}
            }
        }
    }

    /// Waits for the run to complete, then returns the newest assistant reply.
    pub async fn wait_for_response(&self, thread_id: &str, run_id: &str) -> Result<String> {
        self.wait_for_completion(thread_id, run_id).await?;
        self.messages.latest_assistant_response(thread_id).await
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
