use std::sync::Arc;

use nf_core::config::{MAX_ITEMS, TOPICS};
use nf_core::{NewsItem, Result, Snapshot, SnapshotStorage, Topic};
use tracing::info;

use crate::fetcher::FeedSource;
use crate::logging::Logger;
use crate::normalize::normalize_item;
use crate::parser::parse_feed;
use crate::ranking::{dedupe, rank};

/// Drives one run: fetch each topic in order, merge, dedupe, rank and store.
pub struct FeedManager {
    source: Arc<dyn FeedSource>,
    storage: Arc<dyn SnapshotStorage>,
    topics: Vec<Topic>,
    max_items: usize,
}

impl FeedManager {
    pub fn new(source: Arc<dyn FeedSource>, storage: Arc<dyn SnapshotStorage>) -> Self {
        Self {
            source,
            storage,
            topics: TOPICS.to_vec(),
            max_items: MAX_ITEMS,
        }
    }

    pub fn with_topics(mut self, topics: Vec<Topic>) -> Self {
        self.topics = topics;
        self
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Items for a single topic. Fetch and parse failures are logged and
    /// yield an empty list; they never fail the run.
    pub async fn collect_topic(&self, topic: &Topic) -> Vec<NewsItem> {
        let logger = Logger::new().with_prefix(format!("[{}]", topic.name));

        let body = match self.source.fetch(topic).await {
            Ok(body) => body,
            Err(e) => {
                logger.error(&format!("Unable to fetch topic from {}: {}", self.source.name(), e));
                return Vec::new();
            }
        };

        let raw_items = match parse_feed(&body) {
            Ok(items) => items,
            Err(e) => {
                logger.error(&format!("Invalid RSS payload: {}", e));
                return Vec::new();
            }
        };

        let items: Vec<NewsItem> = raw_items
            .iter()
            .filter_map(|raw| normalize_item(raw, topic))
            .collect();
        logger.debug(&format!(
            "Parsed {} items ({} without a title skipped)",
            items.len(),
            raw_items.len() - items.len()
        ));
        items
    }

    /// Fetches every topic sequentially, in declaration order.
    pub async fn collect_all(&self) -> Vec<NewsItem> {
        let mut all_items = Vec::new();
        for topic in &self.topics {
            let mut items = self.collect_topic(topic).await;
            info!("📰 {}: {} items", topic.name, items.len());
            all_items.append(&mut items);
        }
        all_items
    }

    pub async fn build_snapshot(&self) -> Snapshot {
        let collected = self.collect_all().await;
        let total = collected.len();

        let unique = dedupe(collected);
        info!("🔁 Dropped {} duplicates", total - unique.len());

        let ranked = rank(unique, self.max_items);
        Snapshot::new(&self.topics, ranked)
    }

    /// Builds a fresh snapshot and stores it, replacing the previous one.
    /// Only the storage step can fail.
    pub async fn run(&self) -> Result<Snapshot> {
        let snapshot = self.build_snapshot().await;
        self.storage.store_snapshot(&snapshot).await?;
        info!("💾 Stored {} items in {}", snapshot.items.len(), self.storage.location());
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nf_core::Error;
    use nf_storage::MemoryStorage;
    use std::collections::HashMap;
    use std::sync::Mutex;

    enum MockResponse {
        Feed(String),
        Timeout,
        Garbage,
    }

    struct MockSource {
        responses: HashMap<&'static str, MockResponse>,
        calls: Mutex<Vec<String>>,
    }

    impl MockSource {
        fn new(responses: Vec<(&'static str, MockResponse)>) -> Self {
            Self {
                responses: responses.into_iter().collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl FeedSource for MockSource {
        fn name(&self) -> &str {
            "mock"
        }

        async fn fetch(&self, topic: &Topic) -> Result<Vec<u8>> {
            self.calls.lock().unwrap().push(topic.query.to_string());
            match self.responses.get(topic.query) {
                Some(MockResponse::Feed(body)) => Ok(body.clone().into_bytes()),
                Some(MockResponse::Garbage) => Ok(b"<html><body>oops".to_vec()),
                Some(MockResponse::Timeout) | None => {
                    Err(Error::Fetch("operation timed out".to_string()))
                }
            }
        }
    }

    struct FailingStorage;

    #[async_trait]
    impl SnapshotStorage for FailingStorage {
        async fn store_snapshot(&self, _snapshot: &Snapshot) -> Result<()> {
            Err(Error::Io(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only")))
        }

        async fn latest_snapshot(&self) -> Result<Option<Snapshot>> {
            Ok(None)
        }

        fn location(&self) -> String {
            "nowhere".to_string()
        }
    }

    fn feed<S: AsRef<str>>(items: &[(S, S, S)]) -> MockResponse {
        let body: String = items
            .iter()
            .map(|(title, link, date)| {
                format!(
                    concat!(
                        "<item><title>{0}</title><link>{1}</link><pubDate>{2}</pubDate>",
                        "<description>&lt;p&gt;{0}&lt;/p&gt;</description></item>"
                    ),
                    title.as_ref(),
                    link.as_ref(),
                    date.as_ref()
                )
            })
            .collect();
        MockResponse::Feed(format!("<rss version=\"2.0\"><channel>{}</channel></rss>", body))
    }

    fn empty_feed() -> MockResponse {
        feed::<&str>(&[])
    }

    fn topics() -> Vec<Topic> {
        vec![
            Topic::new("Alpha", "alpha", "a"),
            Topic::new("Beta", "beta", "b"),
        ]
    }

    fn manager(source: MockSource) -> (FeedManager, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let manager = FeedManager::new(Arc::new(source), storage.clone()).with_topics(topics());
        (manager, storage)
    }

    #[tokio::test]
    async fn test_scenario_single_item() {
        let source = MockSource::new(vec![
            ("alpha", MockResponse::Feed(
                concat!(
                    "<rss><channel><item><title>A &amp;amp; B</title>",
                    "<link>https://www.example.com/x</link>",
                    "<pubDate>Mon, 02 Jan 2023 10:00:00 GMT</pubDate>",
                    "<description>&lt;p&gt;Hello &lt;b&gt;world&lt;/b&gt;&lt;/p&gt;</description>",
                    "</item></channel></rss>"
                )
                .to_string(),
            )),
            ("beta", empty_feed()),
        ]);
        let (manager, _) = manager(source);

        let snapshot = manager.build_snapshot().await;
        assert_eq!(snapshot.items.len(), 1);
        let item = &snapshot.items[0];
        assert_eq!(item.title, "A & B");
        assert_eq!(item.source, "example.com");
        assert_eq!(item.published_at.unwrap().to_rfc3339(), "2023-01-02T10:00:00+00:00");
        assert_eq!(item.summary, "Hello world");
        assert_eq!(item.topic, "a");
        assert_eq!(item.topic_label, "Alpha");
    }

    #[tokio::test]
    async fn test_same_link_across_topics_keeps_first_topic() {
        const SAME_LINK: &str = "https://example.com/same";
        let source = MockSource::new(vec![
            ("alpha", feed(&[("From alpha", SAME_LINK, "Mon, 02 Jan 2023 10:00:00 GMT")])),
            ("beta", feed(&[("From beta", SAME_LINK, "Tue, 03 Jan 2023 10:00:00 GMT")])),
        ]);
        let (manager, _) = manager(source);

        let snapshot = manager.build_snapshot().await;
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].title, "From alpha");
        assert_eq!(snapshot.items[0].topic, "a");
        assert_eq!(snapshot.items[0].topic_label, "Alpha");
    }

    #[tokio::test]
    async fn test_failed_topic_does_not_abort_run() {
        let source = MockSource::new(vec![
            ("alpha", MockResponse::Timeout),
            (
                "beta",
                feed(&[("Still here", "https://example.com/b", "Mon, 02 Jan 2023 10:00:00 GMT")]),
            ),
        ]);
        let (manager, storage) = manager(source);

        assert!(manager.collect_topic(&topics()[0]).await.is_empty());

        let snapshot = manager.run().await.unwrap();
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].topic, "b");
        assert_eq!(storage.latest_snapshot().await.unwrap(), Some(snapshot));
    }

    #[tokio::test]
    async fn test_invalid_payload_yields_no_items() {
        let source = MockSource::new(vec![
            ("alpha", MockResponse::Garbage),
            ("beta", feed(&[("Fine", "", "")])),
        ]);
        let (manager, _) = manager(source);

        let snapshot = manager.build_snapshot().await;
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].title, "Fine");
        assert_eq!(snapshot.items[0].published_at, None);
    }

    #[tokio::test]
    async fn test_topics_fetched_in_declaration_order() {
        let source = Arc::new(MockSource::new(vec![
            ("alpha", empty_feed()),
            ("beta", empty_feed()),
        ]));
        let storage = Arc::new(MemoryStorage::new());
        let manager = FeedManager::new(source.clone(), storage).with_topics(topics());

        let snapshot = manager.run().await.unwrap();
        assert!(snapshot.items.is_empty());
        assert_eq!(snapshot.topics, vec!["a", "b"]);
        assert_eq!(*source.calls.lock().unwrap(), vec!["alpha", "beta"]);
    }

    #[tokio::test]
    async fn test_snapshot_is_sorted_and_capped() {
        let alpha: Vec<_> = (0..20)
            .map(|i| {
                (
                    format!("alpha {}", i),
                    format!("https://example.com/alpha/{}", i),
                    format!("Mon, 02 Jan 2023 {:02}:00:00 GMT", i),
                )
            })
            .collect();
        let mut beta: Vec<_> = (0..10)
            .map(|i| {
                (
                    format!("beta {}", i),
                    format!("https://example.com/beta/{}", i),
                    format!("Tue, 03 Jan 2023 {:02}:30:00 GMT", i),
                )
            })
            .collect();
        beta.push(("beta undated".to_string(), String::new(), "not a date".to_string()));

        let source = MockSource::new(vec![("alpha", feed(&alpha)), ("beta", feed(&beta))]);
        let (manager, _) = manager(source);
        let snapshot = manager.build_snapshot().await;

        assert_eq!(snapshot.items.len(), 24);
        assert_eq!(snapshot.items[0].title, "beta 9");
        assert!(snapshot
            .items
            .windows(2)
            .all(|w| w[0].published_at >= w[1].published_at));
        assert!(snapshot.items.iter().all(|i| i.published_at.is_some()));
    }

    #[tokio::test]
    async fn test_max_items_override() {
        let source = MockSource::new(vec![
            ("alpha", feed(&[("one", "", ""), ("two", "", ""), ("three", "", "")])),
            ("beta", empty_feed()),
        ]);
        let storage = Arc::new(MemoryStorage::new());
        let manager = FeedManager::new(Arc::new(source), storage)
            .with_topics(topics())
            .with_max_items(2);

        let snapshot = manager.build_snapshot().await;
        let titles: Vec<_> = snapshot.items.into_iter().map(|i| i.title).collect();
        assert_eq!(titles, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_storage_failure_is_fatal() {
        let source = MockSource::new(vec![("alpha", empty_feed()), ("beta", empty_feed())]);
        let manager =
            FeedManager::new(Arc::new(source), Arc::new(FailingStorage)).with_topics(topics());
        assert!(matches!(manager.run().await, Err(Error::Io(_))));
    }

    #[test]
    fn test_default_configuration() {
        let source = Arc::new(MockSource::new(Vec::new()));
        let manager = FeedManager::new(source, Arc::new(MemoryStorage::new()));
        let tags: Vec<_> = manager.topics().iter().map(|t| t.tag).collect();
        assert_eq!(tags, vec!["openai", "openclaw"]);
    }
}
