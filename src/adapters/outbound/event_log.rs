use crate::common::{EventEnvelope, EventMetadata};
use crate::domains::assignment::AssignmentEvent;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Appends assignment events as JSON Lines, one file per batch.
pub struct JsonlEventLog {
    base_path: PathBuf,
    source: String,
}

impl JsonlEventLog {
    pub fn new<P: Into<PathBuf>>(base_path: P) -> Self {
        Self {
            base_path: base_path.into(),
            source: "crm-assign".to_string(),
        }
    }

    pub fn file_path(&self, batch_key: &str) -> PathBuf {
        self.base_path.join(format!("{}.jsonl", batch_key))
    }

    pub async fn append(&self, event: &AssignmentEvent, user_id: Option<String>) -> Result<PathBuf, String> {
        tokio::fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| format!("Failed to create event log directory: {}", e))?;

        let metadata = EventMetadata {
            correlation_id: Some(event.batch_id()),
            user_id,
            source: self.source.clone(),
        };
        let envelope = EventEnvelope::new(event, "AssignmentBatch", metadata)
            .map_err(|e| format!("Failed to serialize event: {}", e))?;
        let mut line = serde_json::to_string(&envelope).map_err(|e| format!("Failed to serialize envelope: {}", e))?;
        line.push('\n');

        let path = self.file_path(&envelope.aggregate_id);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| format!("Failed to open event log: {}", e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| format!("Failed to write event: {}", e))?;
        file.flush().await.map_err(|e| format!("Failed to flush event log: {}", e))?;
        Ok(path)
    }

    /// Read back every envelope of one batch, oldest first.
    pub async fn load(&self, batch_key: &str) -> Result<Vec<EventEnvelope>, String> {
        let path = self.file_path(batch_key);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(format!("Failed to read event log: {}", e)),
        };
        content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).map_err(|e| format!("Corrupt event line: {}", e)))
            .collect()
    }
}
