pub mod fetcher;
pub mod logging;
pub mod manager;
pub mod normalize;
pub mod parser;
pub mod ranking;

pub use fetcher::{FeedSource, GoogleNewsSource};
pub use manager::FeedManager;

pub mod prelude {
    pub use super::fetcher::FeedSource;
    pub use nf_core::{Error, NewsItem, Result, Snapshot, SnapshotStorage, Topic};
}
