use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// A named search query whose results are tagged and merged into one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topic {
    /// Display name, copied into `NewsItem::topic_label`.
    pub name: &'static str,
    pub query: &'static str,
    pub tag: &'static str,
}

impl Topic {
    pub const fn new(name: &'static str, query: &'static str, tag: &'static str) -> Self {
        Self { name, query, tag }
    }
}

/// An `<item>` as found in the feed. Missing fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawItem {
    pub title: String,
    pub link: String,
    pub pub_date: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    pub source: String,
    #[serde(with = "rfc3339_opt")]
    pub published_at: Option<DateTime<FixedOffset>>,
    pub summary: String,
    pub topic: String,
    pub topic_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub generated_at: DateTime<Utc>,
    pub topics: Vec<String>,
    pub items: Vec<NewsItem>,
}

impl Snapshot {
    /// Wraps ranked items in a fresh envelope stamped with the current time.
    pub fn new(topics: &[Topic], items: Vec<NewsItem>) -> Self {
        Self {
            generated_at: Utc::now(),
            topics: topics.iter().map(|t| t.tag.to_string()).collect(),
            items,
        }
    }
}

/// Keeps the feed's own offset on the wire, e.g. `2023-01-02T10:00:00+00:00`.
mod rfc3339_opt {
    use chrono::{DateTime, FixedOffset};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(
        value: &Option<DateTime<FixedOffset>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| DateTime::parse_from_rfc3339(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
