//! Build-time settings for a run. Nothing here is read from the environment.

use std::time::Duration;

use crate::models::Topic;

/// Topics fetched on every run, in declaration order.
pub const TOPICS: &[Topic] = &[
    Topic::new("OpenAI", "OpenAI", "openai"),
    Topic::new("OpenClaw", "OpenClaw", "openclaw"),
];

/// Upper bound on items kept in a snapshot.
pub const MAX_ITEMS: usize = 24;

/// Summaries longer than this are cut and suffixed with [`ELLIPSIS`].
pub const SUMMARY_MAX_CHARS: usize = 200;

/// Characters of a long summary kept before the ellipsis.
pub const SUMMARY_TRUNCATED_CHARS: usize = 197;

pub const ELLIPSIS: char = '…';

pub const FEED_ENDPOINT: &str = "https://news.google.com/rss/search";

/// Fixed locale parameters appended to every search query.
pub const FEED_LOCALE_PARAMS: &[(&str, &str)] =
    &[("hl", "en-US"), ("gl", "US"), ("ceid", "US:en")];

pub const FEED_TIMEOUT: Duration = Duration::from_secs(20);

pub const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 ",
    "(KHTML, like Gecko) Chrome/116.0 Safari/537.36"
);

/// Source label used when an item's link has no recognizable host.
pub const FALLBACK_SOURCE: &str = "Google News";

pub const DEFAULT_OUTPUT_PATH: &str = "data/news.json";
