//! Assistants: configured agents with instructions, model and tools.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::DeletionStatus;
use crate::error::Result;
use crate::resource::{resource_path, ResourceClient};

/// Model used for new assistants unless configured otherwise.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// A tool enabled on an assistant.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tool {
    /// Retrieval over the attached vector stores.
    FileSearch,
    /// Sandboxed code execution.
    CodeInterpreter,
    /// Any other tool type, such as `function`.
    #[serde(other)]
    Other,
}

/// An assistant object.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Assistant {
    /// Assistant identifier.
    #[serde(default)]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Model identifier.
    pub model: String,
    /// System instructions.
    #[serde(default)]
    pub instructions: Option<String>,
    /// Enabled tools.
    #[serde(default)]
    pub tools: Vec<Tool>,
    /// Sampling temperature.
    #[serde(default)]
    pub temperature: Option<f32>,
}

/// Fields to change on an existing assistant. Unset fields are left alone.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct AssistantChanges {
    /// New instructions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// New model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// New temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl AssistantChanges {
    /// Returns `true` if no field is set.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_none() && self.model.is_none() && self.temperature.is_none()
    }
}

#[derive(Serialize, Debug)]
struct VectorStoreIds<'a> {
    vector_store_ids: Vec<&'a str>,
}

#[derive(Serialize, Debug)]
struct ToolResources<'a> {
    file_search: VectorStoreIds<'a>,
}

#[derive(Serialize, Debug)]
struct CreateAssistantRequest<'a> {
    instructions: &'a str,
    name: &'a str,
    tools: Vec<Tool>,
    model: &'a str,
    tool_resources: ToolResources<'a>,
}

/// Assistant endpoints.
#[derive(Clone)]
pub struct Assistants {
    client: ResourceClient,
    model: String,
}

impl Assistants {
    /// Creates the endpoint group; new assistants use `model`.
    pub fn new(client: ResourceClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Returns the model used for new assistants.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Creates an assistant searching `vector_store_id` and returns its id.
    ///
    /// An empty `tools` list enables [`Tool::FileSearch`].
    pub async fn create_assistant(
        &self,
        name: &str,
        instructions: &str,
        vector_store_id: &str,
        tools: Vec<Tool>,
    ) -> Result<String> {
        let request = create_request(&self.model, name, instructions, vector_store_id, tools);
        let assistant: Assistant = self.client.post("assistants", &request).await?;
        info!(assistant_id = %assistant.id, model = %self.model, "Created assistant");
        Ok(assistant.id)
    }

    /// Fetches an assistant.
    pub async fn get_assistant(&self, assistant_id: &str) -> Result<Assistant> {
        self.client
            .get(&resource_path(&["assistants", assistant_id])?)
            .await
    }

    /// Applies `changes` to an assistant and returns the updated object.
    pub async fn modify_assistant(
        &self,
        assistant_id: &str,
        changes: &AssistantChanges,
    ) -> Result<Assistant> {
        debug!(assistant_id, ?changes, "Modifying assistant");
        self.client
            .post(&resource_path(&["assistants", assistant_id])?, changes)
            .await
    }

    /// Deletes an assistant.
    pub async fn delete_assistant(&self, assistant_id: &str) -> Result<()> {
        let status: DeletionStatus = self
            .client
            .delete(&resource_path(&["assistants", assistant_id])?)
            .await?;
        debug!(assistant_id = %status.id, deleted = status.deleted, "Deleted assistant");
        Ok(())
    }
}

fn create_request<'a>(
    model: &'a str,
    name: &'a str,
    instructions: &'a str,
    vector_store_id: &'a str,
    tools: Vec<Tool>,
) -> CreateAssistantRequest<'a> {
    let tools = if tools.is_empty() {
        vec![Tool::FileSearch]
    } else {
        tools
    };
    CreateAssistantRequest {
        instructions,
        name,
        tools,
        model,
        tool_resources: ToolResources {
            file_search: VectorStoreIds {
                vector_store_ids: vec![vector_store_id],
            },
        },
    }
}
