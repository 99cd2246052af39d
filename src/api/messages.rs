//! Thread messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CreatedObject, ListResponse};
use crate::error::Result;
use crate::extract::latest_assistant_response;
use crate::resource::{resource_path, ResourceClient};

/// Author of a thread message.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Written by the end user.
    User,
    /// Written by the assistant.
    Assistant,
    /// System instructions.
    System,
}

/// Text payload of a `text` content block.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TextContent {
    /// The text itself.
    pub value: String,
}

/// Reference to an uploaded image.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// Identifier of the uploaded file.
    pub file_id: String,
}

/// Reference to an external image.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ImageUrl {
    /// Image URL.
    pub url: String,
}

/// One block of message content.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text.
    Text {
        /// Text payload.
        text: TextContent,
    },
    /// Image uploaded through the files API.
    ImageFile {
        /// File reference.
        image_file: ImageFile,
    },
    /// Image referenced by URL.
    ImageUrl {
        /// URL reference.
        image_url: ImageUrl,
    },
    /// A block type this client does not know about.
    #[serde(other)]
    Other,
}

impl ContentBlock {
    /// Builds a text block.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            text: TextContent {
                value: value.into(),
            },
        }
    }

    /// Returns the text of a `text` block.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(&text.value),
            _ => None,
        }
    }
}

/// A message stored in a thread.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ThreadMessage {
    /// Message identifier.
    #[serde(default)]
    pub id: String,
    /// Thread the message belongs to.
    #[serde(default)]
    pub thread_id: String,
    /// Author role.
    pub role: Role,
    /// Content blocks, in order.
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    /// Run that produced the message, for assistant messages.
    #[serde(default)]
    pub run_id: Option<String>,
    /// Creation time.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ThreadMessage {
    /// Returns the text of the first `text` block, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(ContentBlock::as_text)
    }
}

#[derive(Serialize)]
struct AddMessageRequest<'a> {
    role: Role,
    content: &'a str,
}

/// Message endpoints.
#[derive(Clone)]
pub struct Messages {
    client: ResourceClient,
}

impl Messages {
    /// Creates the endpoint group.
    pub fn new(client: ResourceClient) -> Self {
        Self { client }
    }

    /// Appends a user message to a thread and returns the message id.
    pub async fn add_message(&self, thread_id: &str, message: &str) -> Result<String> {
        let created: CreatedObject = self
            .client
            .post(
                &resource_path(&["threads", thread_id, "messages"])?,
                &AddMessageRequest {
                    role: Role::User,
                    content: message,
                },
            )
            .await?;
        Ok(created.id)
    }

    /// Lists the messages of a thread, newest first.
    pub async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>> {
        let list: ListResponse<ThreadMessage> = self
            .client
            .get(&resource_path(&["threads", thread_id, "messages"])?)
            .await?;
        debug!(thread_id, message_count = list.data.len(), "Listed thread messages");
        Ok(list.data)
    }

    /// Returns the text of the newest assistant message in a thread.
    pub async fn latest_assistant_response(&self, thread_id: &str) -> Result<String> {
        let messages = self.list_messages(thread_id).await?;
        latest_assistant_response(&messages).map(str::to_string)
    }
}
