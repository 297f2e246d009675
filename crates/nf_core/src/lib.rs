pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use error::Error;
pub use models::{NewsItem, RawItem, Snapshot, Topic};
pub use storage::SnapshotStorage;

pub type Result<T> = std::result::Result<T, Error>;
