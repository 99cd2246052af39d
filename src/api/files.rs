//! File uploads.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::DeletionStatus;
use crate::error::Result;
use crate::resource::{resource_path, ResourceClient};
use crate::transport::FileUpload;

/// Purpose attached to every upload, so files can be used by assistants.
pub const ASSISTANTS_PURPOSE: &str = "assistants";

/// An uploaded file.
#[derive(Deserialize, Debug, Clone)]
pub struct FileObject {
    /// File identifier.
    pub id: String,
    /// Name the file was uploaded with.
    #[serde(default)]
    pub filename: String,
    /// Size in bytes.
    #[serde(default)]
    pub bytes: u64,
    /// Upload purpose.
    #[serde(default)]
    pub purpose: String,
}

/// File endpoints.
#[derive(Clone)]
pub struct Files {
    client: ResourceClient,
}

impl Files {
    /// Creates the endpoint group.
    pub fn new(client: ResourceClient) -> Self {
        Self { client }
    }

    /// Uploads `data` under the base name of `filename` and returns the file id.
    pub async fn upload_file(&self, filename: &str, data: Vec<u8>) -> Result<String> {
        let upload = FileUpload {
            purpose: ASSISTANTS_PURPOSE.to_string(),
            filename: base_name(filename),
            data,
        };
        debug!(filename = %upload.filename, bytes = upload.data.len(), "Uploading file");
        let file: FileObject = self.client.upload("files", upload).await?;
        Ok(file.id)
    }

    /// Deletes an uploaded file.
    pub async fn delete_file(&self, file_id: &str) -> Result<()> {
        let status: DeletionStatus = self
            .client
            .delete(&resource_path(&["files", file_id])?)
            .await?;
        debug!(file_id = %status.id, deleted = status.deleted, "Deleted file");
        Ok(())
    }
}

/// Returns the last path component, or the input when it has none.
fn base_name(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .map_or_else(|| filename.to_string(), |n| n.to_string_lossy().into_owned())
}
