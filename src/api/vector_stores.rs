//! Vector stores and the files attached to them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{DeletionStatus, ListResponse};
use crate::error::Result;
use crate::resource::{resource_path, ResourceClient};

/// A vector store object.
#[derive(Deserialize, Debug, Clone)]
pub struct VectorStore {
    /// Store identifier.
    pub id: String,
    /// Store name.
    #[serde(default)]
    pub name: Option<String>,
    /// Creation time.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A file attached to a vector store.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VectorStoreFile {
    /// File identifier.
    pub id: String,
    /// Indexing status (`in_progress`, `completed`, ...).
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Serialize)]
struct CreateVectorStoreRequest<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct AddFileRequest<'a> {
    file_id: &'a str,
}

/// Vector store endpoints.
#[derive(Clone)]
pub struct VectorStores {
    client: ResourceClient,
}

impl VectorStores {
    /// Creates the endpoint group.
    pub fn new(client: ResourceClient) -> Self {
        Self { client }
    }

    /// Creates a vector store and returns its id.
    pub async fn create_vector_store(&self, name: &str) -> Result<String> {
        let store: VectorStore = self
            .client
            .post("vector_stores", &CreateVectorStoreRequest { name })
            .await?;
        Ok(store.id)
    }

    /// Deletes a vector store.
    pub async fn delete_vector_store(&self, store_id: &str) -> Result<()> {
        let status: DeletionStatus = self
            .client
            .delete(&resource_path(&["vector_stores", store_id])?)
            .await?;
        debug!(store_id = %status.id, deleted = status.deleted, "Deleted vector store");
        Ok(())
    }

    /// Attaches an uploaded file to a vector store.
    pub async fn add_file(&self, store_id: &str, file_id: &str) -> Result<()> {
        let _: VectorStoreFile = self
            .client
            .post(
                &resource_path(&["vector_stores", store_id, "files"])?,
                &AddFileRequest { file_id },
            )
            .await?;
        Ok(())
    }

    /// Lists the files attached to a vector store.
    pub async fn list_files(&self, store_id: &str) -> Result<Vec<VectorStoreFile>> {
        let list: ListResponse<VectorStoreFile> = self
            .client
            .get(&resource_path(&["vector_stores", store_id, "files"])?)
            .await?;
        Ok(list.data)
    }

    /// Detaches a file from a vector store. The file itself is not deleted.
    pub async fn delete_file(&self, store_id: &str, file_id: &str) -> Result<()> {
        let status: DeletionStatus = self
            .client
            .delete(&resource_path(&["vector_stores", store_id, "files", file_id])?)
            .await?;
        debug!(store_id, file_id = %status.id, deleted = status.deleted, "Detached vector store file");
        Ok(())
    }
}
