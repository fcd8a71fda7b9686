//! Aggregation stages: scan the whole review table once, group, reduce each
//! group to a daily summary and upsert it under `(group key, run date)`.
//!
//! Reruns on the same day against an unchanged table overwrite every summary
//! with an identical one.

pub mod digest;
pub mod product;
pub mod sentiment;

pub use product::{summarize_products, ProductAggregator};
pub use sentiment::{summarize_sentiments, SentimentAggregator};

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

use crate::models::EnrichedReview;

/// Counts from one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregationReport {
    pub reviews_scanned: usize,
    pub records_skipped: usize,
    pub summaries_written: usize,
}

/// Partition `reviews` by `key`, groups in first-seen order. Reviews for
/// which `key` returns `None` belong to no group.
pub(crate) fn group_by<'r, K, F>(reviews: &'r [EnrichedReview], key: F) -> Vec<(K, Vec<&'r EnrichedReview>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&EnrichedReview) -> Option<K>,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&EnrichedReview>)> = Vec::new();

    for review in reviews {
        let Some(k) = key(review) else { continue };
        match slots.get(&k) {
            Some(&slot) => groups[slot].1.push(review),
            None => {
                slots.insert(k.clone(), groups.len());
                groups.push((k, vec![review]));
            }
        }
    }

    groups
}

/// Group size as a stored review count, saturating at `u32::MAX`.
pub(crate) fn review_count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawReviewRow;

    fn review(id: &str, product: &str) -> EnrichedReview {
        EnrichedReview {
            review: RawReviewRow {
                review_id: id.into(),
                product_id: product.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let reviews = vec![review("1", "B"), review("2", "A"), review("3", "B"), review("4", "")];

        let groups = group_by(&reviews, |r| {
            Some(r.review.product_id.clone()).filter(|p| !p.is_empty())
        });

        let keys: Vec<_> = groups.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["B", "A"]);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[0].1[1].review_id(), "3");
    }

    #[test]
    fn review_count_saturates() {
        assert_eq!(review_count(3), 3);
        assert_eq!(review_count(u32::MAX as usize), u32::MAX);
        assert_eq!(review_count(usize::MAX), u32::MAX);
    }
}
