use async_trait::async_trait;
use nf_core::{Result, Snapshot, SnapshotStorage};
use tokio::sync::RwLock;

/// Holds only the last stored snapshot; nothing survives the process.
#[derive(Default)]
pub struct MemoryStorage {
    latest: RwLock<Option<Snapshot>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStorage for MemoryStorage {
    async fn store_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        *self.latest.write().await = Some(snapshot.clone());
        Ok(())
    }

    async fn latest_snapshot(&self) -> Result<Option<Snapshot>> {
        Ok(self.latest.read().await.clone())
    }

    fn location(&self) -> String {
        "memory://".to_string()
    }
}
