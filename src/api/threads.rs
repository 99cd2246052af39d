//! Conversation threads.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::error::Result;
use crate::resource::ResourceClient;

/// A thread object.
#[derive(Deserialize, Debug, Clone)]
pub struct Thread {
    /// Thread identifier.
    pub id: String,
    /// Creation time.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Thread endpoints.
#[derive(Clone)]
pub struct Threads {
    client: ResourceClient,
}

impl Threads {
    /// Creates the endpoint group.
    pub fn new(client: ResourceClient) -> Self {
        Self { client }
    }

    /// Creates an empty thread and returns its id.
    pub async fn create_thread(&self) -> Result<String> {
        let thread: Thread = self.client.post("threads", &json!({})).await?;
        Ok(thread.id)
    }
}
