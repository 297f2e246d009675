use async_trait::async_trait;
use crate::models::Snapshot;
use crate::Result;

#[async_trait]
pub trait SnapshotStorage: Send + Sync {
    /// Persist a snapshot, replacing whatever was stored before
    async fn store_snapshot(&self, snapshot: &Snapshot) -> Result<()>;

    /// Load the most recently stored snapshot, if any
    async fn latest_snapshot(&self) -> Result<Option<Snapshot>>;

    /// Human-readable location of the stored snapshot
    fn location(&self) -> String;
}
