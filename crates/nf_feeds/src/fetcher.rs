use std::iter;

use async_trait::async_trait;
use nf_core::config::{FEED_ENDPOINT, FEED_LOCALE_PARAMS, FEED_TIMEOUT, USER_AGENT};
use nf_core::{Error, Result, Topic};
use reqwest::Client;
use tracing::debug;
use url::Url;

#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Returns the name of the feed provider
    fn name(&self) -> &str;

    /// Fetches the raw feed body for a topic. One attempt, no retries.
    async fn fetch(&self, topic: &Topic) -> Result<Vec<u8>>;
}

/// Google News RSS search.
pub struct GoogleNewsSource {
    client: Client,
    endpoint: String,
}

impl GoogleNewsSource {
    pub fn new() -> Result<Self> {
        Self::with_endpoint(FEED_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FEED_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn feed_url(&self, query: &str) -> Result<Url> {
        let params = iter::once(("q", query)).chain(FEED_LOCALE_PARAMS.iter().copied());
        Url::parse_with_params(&self.endpoint, params)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", self.endpoint, e)))
    }
}

#[async_trait]
impl FeedSource for GoogleNewsSource {
    fn name(&self) -> &str {
        "Google News"
    }

    async fn fetch(&self, topic: &Topic) -> Result<Vec<u8>> {
        let url = self.feed_url(topic.query)?;
        debug!("Fetching feed from: {}", url);

        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        debug!("Received {} bytes for topic {}", bytes.len(), topic.name);
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_url_encodes_query() {
        let source = GoogleNewsSource::new().unwrap();
        assert_eq!(
            source.feed_url("OpenAI").unwrap().as_str(),
            "https://news.google.com/rss/search?q=OpenAI&hl=en-US&gl=US&ceid=US%3Aen"
        );
        assert_eq!(
            source.feed_url("Open AI & co").unwrap().query(),
            Some("q=Open+AI+%26+co&hl=en-US&gl=US&ceid=US%3Aen")
        );
    }

    #[test]
    fn test_invalid_endpoint() {
        let source = GoogleNewsSource::with_endpoint("not a url").unwrap();
        assert!(matches!(source.feed_url("OpenAI"), Err(Error::InvalidUrl(_))));
    }
}
