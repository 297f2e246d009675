use std::path::Path;
use std::sync::Arc;

use nf_core::{Error, Result, SnapshotStorage};

pub mod backends;

pub use backends::*;

/// Build the storage backend named by `kind`. `path` is only used by the
/// `json` backend.
pub fn create_storage(kind: &str, path: &Path) -> Result<Arc<dyn SnapshotStorage>> {
    match kind {
        "json" => Ok(Arc::new(JsonFileStorage::new(path))),
        "memory" => Ok(Arc::new(MemoryStorage::new())),
        other => Err(Error::Storage(format!("Unknown storage backend: {}", other))),
    }
}
