//! # openai-assist
//!
//! Typed async client for the OpenAI chat completions, assistants, threads,
//! runs, vector stores and files APIs.
//!
//! ## Quick Start
//!
//! ```no_run
//! use openai_assist::{OpenAi, PollOptions};
//!
//! # async fn demo() -> openai_assist::Result<()> {
//! let client = OpenAi::new("sk-...")?;
//! let thread_id = client.threads.create_thread().await?;
//! let reply = client
//!     .ask(&thread_id, "asst_...", "What can you do?", PollOptions::default())
//!     .await?;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod api;
pub mod client;
pub mod error;
pub mod extract;
pub mod poller;
pub mod resource;
pub mod transport;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

pub use crate::client::{OpenAi, OpenAiBuilder};
pub use crate::error::{Error, Result};
pub use crate::extract::latest_assistant_response;
pub use crate::poller::{PollOptions, RunPoller};
pub use tokio_util::sync::CancellationToken;

/// The current version of openai-assist.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
