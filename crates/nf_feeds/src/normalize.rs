//! Per-item cleanup applied between parsing and dedupe.

use std::borrow::Cow;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use html_escape::decode_html_entities;
use lazy_static::lazy_static;
use nf_core::config::{ELLIPSIS, FALLBACK_SOURCE, SUMMARY_MAX_CHARS, SUMMARY_TRUNCATED_CHARS};
use nf_core::{NewsItem, RawItem, Topic};
use regex::Regex;

lazy_static! {
    static ref TAG_PATTERN: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref HOST_PATTERN: Regex = Regex::new(r"https?://([^/]+)").unwrap();
    static ref LEGACY_ENTITY_PATTERN: Regex =
        Regex::new(r"&(?:amp|lt|gt|quot|nbsp|copy|reg)\b").unwrap();
}

/// Zone-less `<pubDate>` layouts, tried in order.
const NAIVE_DATE_FORMATS: &[&str] = &[
    "%a, %d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M:%S",
    "%a, %d %b %Y %H:%M",
    "%d %b %Y %H:%M",
];

/// Turn a raw feed entry into a `NewsItem` owned by `topic`.
/// Returns `None` when the title is empty after cleanup.
pub fn normalize_item(raw: &RawItem, topic: &Topic) -> Option<NewsItem> {
    let title = clean_title(&raw.title);
    if title.is_empty() {
        return None;
    }

    let url = raw.link.trim();
    Some(NewsItem {
        title,
        url: url.to_string(),
        source: source_domain(url),
        published_at: parse_pub_date(&raw.pub_date),
        summary: clean_summary(&raw.description),
        topic: topic.tag.to_string(),
        topic_label: topic.name.to_string(),
    })
}

pub fn clean_title(raw: &str) -> String {
    decode_entities(raw).trim().to_string()
}

/// HTML entity decoding that also accepts the semicolon-less legacy forms
/// browsers tolerate, e.g. `&amp B`.
pub fn decode_entities(raw: &str) -> String {
    decode_html_entities(&terminate_legacy_entities(raw)).into_owned()
}

fn terminate_legacy_entities(raw: &str) -> Cow<'_, str> {
    let mut out = String::new();
    let mut last = 0;
    for m in LEGACY_ENTITY_PATTERN.find_iter(raw) {
        if raw[m.end()..].starts_with(';') {
            continue;
        }
        out.push_str(&raw[last..m.end()]);
        out.push(';');
        last = m.end();
    }
    if last == 0 {
        return Cow::Borrowed(raw);
    }
    out.push_str(&raw[last..]);
    Cow::Owned(out)
}

/// Strips tags, decodes entities and caps the length at `SUMMARY_MAX_CHARS`.
pub fn clean_summary(raw: &str) -> String {
    let summary = strip_html(raw);
    if summary.chars().count() <= SUMMARY_MAX_CHARS {
        return summary;
    }
    let mut cut: String = summary.chars().take(SUMMARY_TRUNCATED_CHARS).collect();
    cut.push(ELLIPSIS);
    cut
}

pub fn strip_html(raw: &str) -> String {
    let without_tags = TAG_PATTERN.replace_all(raw, "");
    decode_entities(&without_tags).trim().to_string()
}

/// Host of `url` without a leading `www.` or a port, e.g. `example.com`.
pub fn source_domain(url: &str) -> String {
    let Some(captures) = HOST_PATTERN.captures(url) else {
        return FALLBACK_SOURCE.to_string();
    };
    let host = &captures[1];
    let host = host.strip_prefix("www.").unwrap_or(host);
    host.split(':').next().unwrap_or(host).to_string()
}

/// RFC 2822 date as found in `<pubDate>`. Dates without a zone, or with a
/// zone name chrono does not know (`UTC`, `XYZ`), are taken as UTC.
pub fn parse_pub_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed);
    }

    let naive = parse_naive_date(raw).or_else(|| {
        let (rest, zone) = raw.rsplit_once(char::is_whitespace)?;
        if !zone.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        parse_naive_date(rest.trim_end())
    })?;
    Some(naive.and_utc().fixed_offset())
}

fn parse_naive_date(raw: &str) -> Option<NaiveDateTime> {
    NAIVE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}
