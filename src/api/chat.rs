//! Chat completions.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::resource::ResourceClient;

/// Model used for completions unless configured otherwise.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Author of a chat message.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// System instructions.
    System,
    /// End user.
    User,
    /// Model reply.
    Assistant,
}

/// One entry of the chat history sent with a completion request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Author role.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// A user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// A system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// An assistant message, typically a previous reply.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Chat completion request body.
#[derive(Serialize, Debug)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

/// Chat completion response choice.
#[derive(Deserialize, Debug)]
struct Choice {
    message: ChatMessage,
    #[allow(dead_code)]
    finish_reason: Option<String>,
}

/// Chat completion usage statistics.
#[derive(Deserialize, Debug)]
#[allow(dead_code)]
struct Usage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
}

/// Chat completion response.
#[derive(Deserialize, Debug)]
struct CompletionResponse {
    choices: Vec<Choice>,
    model: Option<String>,
    usage: Option<Usage>,
}

/// Chat completion endpoint.
#[derive(Clone)]
pub struct Chat {
    client: ResourceClient,
    model: String,
}

impl Chat {
    /// Creates the endpoint group. An empty `model` falls back to [`DEFAULT_MODEL`].
    pub fn new(client: ResourceClient, model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            client,
            model: if model.is_empty() {
                DEFAULT_MODEL.to_string()
            } else {
                model
            },
        }
    }

    /// Returns the model used for completions.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends the whole chat history and returns the content of the first choice.
    pub async fn create_completion(&self, messages: &[ChatMessage]) -> Result<String> {
        debug!(
            model = %self.model,
            message_count = messages.len(),
            "Requesting chat completion"
        );

        let response: CompletionResponse = self
            .client
            .post(
                "chat/completions",
                &CompletionRequest {
                    model: &self.model,
                    messages,
                },
            )
            .await?;

        debug!(
            choice_count = response.choices.len(),
            model = ?response.model,
            usage = ?response.usage,
            "Received chat completion"
        );

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(Error::EmptyCompletion)
    }
}
