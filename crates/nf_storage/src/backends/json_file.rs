use std::path::{Path, PathBuf};

use async_trait::async_trait;
use nf_core::{Result, Snapshot, SnapshotStorage};
use tokio::fs;
use tracing::debug;

/// Writes the snapshot as pretty-printed UTF-8 JSON, overwriting the file on
/// every store. Parent directories are created on demand.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl SnapshotStorage for JsonFileStorage {
    async fn store_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        // serde_json leaves non-ASCII characters unescaped
        let body = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, body).await?;
        debug!("Wrote {} items to {}", snapshot.items.len(), self.path.display());
        Ok(())
    }

    async fn latest_snapshot(&self) -> Result<Option<Snapshot>> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
