use std::collections::HashSet;

use nf_core::NewsItem;

/// Drop repeated items, keeping the first occurrence.
///
/// An item is a repeat when its non-empty URL was already kept, or when its
/// case-folded title was. Input order must be topic order, then feed order.
pub fn dedupe(items: Vec<NewsItem>) -> Vec<NewsItem> {
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut seen_titles: HashSet<String> = HashSet::new();

    items
        .into_iter()
        .filter(|item| {
            let url = item.url.trim();
            let title = item.title.trim().to_lowercase();

            if !url.is_empty() && seen_urls.contains(url) {
                return false;
            }
            if seen_titles.contains(&title) {
                return false;
            }

            if !url.is_empty() {
                seen_urls.insert(url.to_string());
            }
            seen_titles.insert(title);
            true
        })
        .collect()
}

/// Newest first, undated items last, then keep at most `max_items`.
/// The sort is stable, so ties keep their dedupe order.
pub fn rank(mut items: Vec<NewsItem>, max_items: usize) -> Vec<NewsItem> {
    items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    items.truncate(max_items);
    items
}
