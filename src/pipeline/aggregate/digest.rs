//! Bounded phrase digests used as summary text.

use std::collections::{HashMap, HashSet};

const SUMMARY_PREFIX: &str = "Top phrases: ";

/// The first `window` phrases, deduplicated in first-seen order.
///
/// The window is applied to the raw sequence before deduplication, so
/// repeats inside the window shrink the digest.
pub fn leading_unique(phrases: &[String], window: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    phrases
        .iter()
        .take(window)
        .filter(|p| seen.insert(p.as_str()))
        .cloned()
        .collect()
}

/// The `limit` most frequent phrases. Ties keep first-seen order.
pub fn top_by_frequency(phrases: &[String], limit: usize) -> Vec<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, phrase) in phrases.iter().enumerate() {
        counts.entry(phrase.as_str()).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(phrase, (count, first_seen))| (phrase, count, first_seen))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(limit)
        .map(|(phrase, _, _)| phrase.to_string())
        .collect()
}

/// `"Top phrases: a, b, c"`.
pub fn summary_text(digest: &[String]) -> String {
    format!("{SUMMARY_PREFIX}{}", digest.join(", "))
}
