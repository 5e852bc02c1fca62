/// Aggregation over the whole store: tier lists, topic counts, summary text.
///
/// Always recomputed from storage. Collections are small enough that a full
/// scan per question is cheaper than keeping a cache coherent.
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};

use crate::store::{insort, ItemStore};
use crate::tier::{empty_tier_buckets, empty_topic_counters, Tier};
use crate::types::{Entry, Topic};

#[derive(Debug, Clone)]
pub struct Stats {
    /// Every tier, best to worst, each ascending by rank.
    pub tiers: BTreeMap<Tier, Vec<Entry>>,
    pub topic_counts: BTreeMap<Topic, usize>,
    /// Topic alphabet sorted by descending count; ties keep alphabet order.
    pub topics: Vec<Topic>,
    /// All tier lists concatenated, best tier first.
    pub ranked: Vec<Entry>,
    /// How many items the collection is expected to hold in total.
    pub total_expected: usize,
    /// Records skipped as corrupt while scanning.
    pub skipped: usize,
}

pub fn compute_stats(store: &ItemStore, total_expected: usize) -> Stats {
    let mut tiers = empty_tier_buckets();
    let mut topic_counts = empty_topic_counters();

    let mut entries = store.entries();
    for entry in entries.by_ref() {
        *topic_counts.entry(entry.topic()).or_default() += 1;
        insort(tiers.entry(entry.tier()).or_default(), entry);
    }
    let skipped = entries.skipped();

    let mut topics: Vec<Topic> = Topic::all().collect();
    topics.sort_by_key(|t| Reverse(topic_counts.get(t).copied().unwrap_or(0)));

    let ranked = tiers.values().flatten().cloned().collect();

    Stats {
        tiers,
        topic_counts,
        topics,
        ranked,
        total_expected,
        skipped,
    }
}

impl Stats {
    pub fn tier(&self, tier: Tier) -> &[Entry] {
        self.tiers.get(&tier).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn topic_count(&self, topic: Topic) -> usize {
        self.topic_counts.get(&topic).copied().unwrap_or(0)
    }

    /// Sequence numbers in `1..=total_expected` that have no entry yet.
    pub fn unranked(&self) -> Vec<u32> {
        let ranked: HashSet<u32> = self.ranked.iter().map(Entry::number).collect();
        (1..=self.total_expected as u32)
            .filter(|n| !ranked.contains(n))
            .collect()
    }

    /// Human-readable counts per tier and per topic.
    pub fn summary(&self) -> Vec<String> {
        let pad = |n: usize| format!("{n:>4} ");
        let mut lines = vec![
            format!("Ranked {} of {} items", self.ranked.len(), self.total_expected),
            String::new(),
        ];
        lines.extend(
            self.tiers
                .iter()
                .map(|(tier, list)| format!("{}{tier}-tier items", pad(list.len()))),
        );
        lines.push(String::new());
        lines.extend(
            self.topics
                .iter()
                .map(|&topic| format!("{}{topic} items", pad(self.topic_count(topic)))),
        );
        if self.skipped > 0 {
            lines.push(String::new());
            lines.push(format!("Skipped {} unreadable records", self.skipped));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{KeyValueStore, MemoryStore};
    use crate::types::{ItemAttrs, ItemKey};

    fn topic(name: &str) -> Topic {
        name.parse().unwrap()
    }

    fn seeded() -> ItemStore {
        let mut store = ItemStore::in_memory();
        let rows = [
            (1, "One", Tier::B, "Physics"),
            (2, "Two", Tier::B, "Physics"),
            (3, "Three", Tier::S, "Music"),
            (4, "Four", Tier::F, "Algebra"),
        ];
        for (rank, (number, title, tier, name)) in rows.into_iter().enumerate() {
            store
                .upsert(
                    ItemKey::new(number, title),
                    ItemAttrs { rank: rank % 2, tier, topic: topic(name) },
                )
                .unwrap();
        }
        store
    }

    #[test]
    fn test_stats_buckets_and_ranked_order() {
        let stats = compute_stats(&seeded(), 10);
        assert_eq!(stats.tier(Tier::B).len(), 2);
        assert_eq!(stats.tier(Tier::A).len(), 0);
        let ranked: Vec<u32> = stats.ranked.iter().map(Entry::number).collect();
        // s first, then b, then f
        assert_eq!(ranked[0], 3);
        assert_eq!(ranked[3], 4);
        for list in stats.tiers.values() {
            let ranks: Vec<usize> = list.iter().map(Entry::rank).collect();
            assert_eq!(ranks, (0..list.len()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_topics_sorted_by_count_stably() {
        let stats = compute_stats(&seeded(), 10);
        assert_eq!(stats.topics[0], topic("Physics"));
        // Algebra precedes Music in the alphabet and both have one entry.
        assert_eq!(stats.topics[1], topic("Algebra"));
        assert_eq!(stats.topics[2], topic("Music"));
        // Zero-count topics keep alphabet order.
        assert_eq!(stats.topics[3], topic("Anthropology"));
        assert_eq!(stats.topics.len(), Topic::all().count());
    }

    #[test]
    fn test_unranked_and_summary() {
        let stats = compute_stats(&seeded(), 6);
        assert_eq!(stats.unranked(), vec![5, 6]);
        let summary = stats.summary();
        assert_eq!(summary[0], "Ranked 4 of 6 items");
        assert!(summary.contains(&"   2 b-tier items".to_string()));
        assert!(summary.contains(&"   2 Physics items".to_string()));
    }

    #[test]
    fn test_corrupt_records_are_counted_not_fatal() {
        let mut backend = MemoryStore::new();
        backend
            .set("1,Good", r#"{"rank":0,"tier":"a","topic":"Music"}"#)
            .unwrap();
        backend.set("2,Broken", "{not json").unwrap();
        backend.set("garbage", r#"{"rank":0,"tier":"a","topic":"Music"}"#).unwrap();
        let store = ItemStore::new(backend);

        let stats = compute_stats(&store, 3);
        assert_eq!(stats.ranked.len(), 1);
        assert_eq!(stats.skipped, 2);
        assert!(stats.summary().last().unwrap().contains("Skipped 2"));
    }
}
