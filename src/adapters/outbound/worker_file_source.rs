use crate::common::{GatewayError, GatewayResult};
use crate::domains::assignment::{Worker, WorkerSource};
use async_trait::async_trait;
use std::env;
use std::path::PathBuf;

/// Reads the employee list from a JSON array on disk.
pub struct FilesystemWorkerSource {
    path: PathBuf,
}

impl FilesystemWorkerSource {
    /// Uses `path`, else `CRM_ASSIGN_WORKERS_FILE`, else `workers.json` in the working directory.
    pub fn new(path: Option<PathBuf>) -> Self {
        let path = path.unwrap_or_else(|| match env::var("CRM_ASSIGN_WORKERS_FILE") {
            Ok(v) => PathBuf::from(v),
            Err(_) => PathBuf::from("workers.json"),
        });
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl WorkerSource for FilesystemWorkerSource {
    async fn list_workers(&self) -> GatewayResult<Vec<Worker>> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|e| GatewayError::Transport(format!("{}: {}", self.path.display(), e)))?;
        serde_json::from_slice(&raw).map_err(|e| GatewayError::Decode(format!("{}: {}", self.path.display(), e)))
    }
}
