//! Typed endpoint groups, one module per API domain.

pub mod assistants;
pub mod chat;
pub mod files;
pub mod messages;
pub mod runs;
pub mod threads;
pub mod vector_stores;

use serde::Deserialize;

pub use assistants::{Assistant, AssistantChanges, Assistants, Tool};
pub use chat::{Chat, ChatMessage, ChatRole};
pub use files::{FileObject, Files};
pub use messages::{ContentBlock, Messages, Role, ThreadMessage};
pub use runs::{Run, RunStatus, Runs};
pub use threads::{Thread, Threads};
pub use vector_stores::{VectorStore, VectorStoreFile, VectorStores};

/// Response carrying only the identifier of a created object.
#[derive(Deserialize, Debug)]
pub(crate) struct CreatedObject {
    pub(crate) id: String,
}

/// Response of every `DELETE` endpoint.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DeletionStatus {
    /// Identifier of the deleted object.
    pub id: String,
    /// Whether the object was deleted.
    #[serde(default)]
    pub deleted: bool,
}

/// Envelope used by list endpoints.
#[derive(Deserialize, Debug)]
pub(crate) struct ListResponse<T> {
    pub(crate) data: Vec<T>,
}
