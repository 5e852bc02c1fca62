//! Ordered item collection over an external key-value medium.
//!
//! The store keeps no state of its own beyond the backend handle. Tier lists
//! are derived on demand by scanning every record, and every write path
//! leaves each touched tier with dense ranks `0..n`.

use std::collections::{BTreeMap, HashSet};

use crate::backend::{KeyValueStore, MemoryStore, Mutation};
use crate::codec;
use crate::error::RankError;
use crate::stats::compute_stats;
use crate::tier::Tier;
use crate::types::{Entry, ItemAttrs, ItemKey};

/// Tier symbol to that tier's entries in rank order.
pub type Snapshot = BTreeMap<Tier, Vec<Entry>>;

/// Insert `entry` before the first element whose rank is not smaller.
///
/// Binary search over the stored numeric ranks; `list` must already be
/// ascending by rank.
pub fn insort(list: &mut Vec<Entry>, entry: Entry) {
    let low = list.partition_point(|e| e.rank() < entry.rank());
    list.insert(low, entry);
}

/// Lazy scan over every valid entry in the backend.
///
/// Records that fail to decode are logged and counted, never yielded.
pub struct Entries<'a> {
    backend: &'a dyn KeyValueStore,
    keys: std::vec::IntoIter<String>,
    skipped: usize,
}

impl Entries<'_> {
    /// Corrupt records passed over so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Iterator for Entries<'_> {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        for key in self.keys.by_ref() {
            let Some(value) = self.backend.get(&key) else {
                continue;
            };
            match codec::decode_entry(&key, &value) {
                Ok(entry) => return Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping stored record {key:?}: {e}");
                    self.skipped += 1;
                }
            }
        }
        None
    }
}

pub struct ItemStore {
    backend: Box<dyn KeyValueStore>,
}

impl ItemStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self::from_boxed(Box::new(backend))
    }

    pub fn from_boxed(backend: Box<dyn KeyValueStore>) -> Self {
        ItemStore { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Raw record count, corrupt records included.
    pub fn record_count(&self) -> usize {
        self.backend.len()
    }

    pub fn entries(&self) -> Entries<'_> {
        Entries {
            backend: self.backend.as_ref(),
            keys: self.backend.keys().into_iter(),
            skipped: 0,
        }
    }

    pub fn tier_lists(&self) -> BTreeMap<Tier, Vec<Entry>> {
        compute_stats(self, 0).tiers
    }

    pub fn entries_in_tier(&self, tier: Tier) -> Vec<Entry> {
        self.tier_lists().remove(&tier).unwrap_or_default()
    }

    /// The tier's list with `entry` placed by rank. Nothing is written.
    pub fn insert_sorted(&self, tier: Tier, entry: Entry) -> Vec<Entry> {
        let mut list = self.entries_in_tier(tier);
        insort(&mut list, entry);
        list
    }

    /// Rewrite each entry with its position in `ordered` as its rank.
    ///
    /// Records that already hold their new value are left alone; the rest
    /// go to the backend as one batch.
    pub fn replace_tier(&mut self, ordered: &[Entry]) -> Result<(), RankError> {
        let batch = self.tier_writes(ordered);
        self.backend.apply(batch)?;
        Ok(())
    }

    fn tier_writes(&self, ordered: &[Entry]) -> Vec<Mutation> {
        ordered
            .iter()
            .enumerate()
            .filter_map(|(rank, entry)| {
                let entry = entry.clone().with_rank(rank);
                let key = codec::encode_key(&entry.identity);
                let value = codec::encode_value(&entry.attributes);
                match self.backend.get(&key) {
                    Some(stored) if stored == value => None,
                    _ => Some(Mutation::Set { key, value }),
                }
            })
            .collect()
    }

    /// Place `identity` in `attributes.tier` at `attributes.rank`, shifting
    /// the rest of the tier down.
    ///
    /// An entry with the same sequence number already in the target tier is
    /// replaced. An entry for the same identity in another tier moves, and
    /// the tier it leaves is closed up. Everything is written as one batch.
    pub fn upsert(&mut self, identity: ItemKey, attributes: ItemAttrs) -> Result<(), RankError> {
        let placed = Entry::new(identity.clone(), attributes);
        let mut tier_list = self.insert_sorted(attributes.tier, placed.clone());
        let mut batch = Vec::new();

        // insort puts the new entry ahead of any equal one, so the first
        // match is the one just placed.
        if let Some(at) = tier_list.iter().position(|e| *e == placed) {
            let mut index = 0;
            tier_list.retain(|e| {
                let displaced = index != at && e.number() == identity.number;
                index += 1;
                if displaced {
                    let existing_key = codec::encode_key(&e.identity);
                    tracing::warn!("Updating existing {existing_key}");
                    if e.identity != identity {
                        batch.push(Mutation::Remove { key: existing_key });
                    }
                }
                !displaced
            });
        }

        let vacated = self
            .tier_lists()
            .into_iter()
            .filter(|(tier, _)| *tier != attributes.tier)
            .map(|(_, list)| list)
            .find(|list| list.iter().any(|e| e.identity == identity));

        batch.extend(self.tier_writes(&tier_list));
        if let Some(list) = vacated {
            let remaining: Vec<Entry> = list.into_iter().filter(|e| e.identity != identity).collect();
            tracing::debug!("Closing up {} entries left behind by {}", remaining.len(), identity.title);
            batch.extend(self.tier_writes(&remaining));
        }
        self.backend.apply(batch)?;

        tracing::info!(
            "Stored {} at {}-tier rank {}",
            codec::encode_key(&identity),
            attributes.tier,
            attributes.rank
        );
        Ok(())
    }

    /// Delete every record, corrupt ones included. Returns how many went.
    pub fn clear_all(&mut self) -> Result<usize, RankError> {
        let keys = self.backend.keys();
        let count = keys.len();
        self.backend
            .apply(keys.into_iter().map(|key| Mutation::Remove { key }).collect())?;
        tracing::info!("Cleared {count} records");
        Ok(count)
    }

    pub fn export_snapshot(&self) -> Snapshot {
        self.tier_lists()
    }

    /// Restore tier lists from a snapshot.
    ///
    /// Each listed entry is filed under the tier it is listed in, in list
    /// order. Existing entries of that tier that the snapshot does not
    /// mention stay, after the restored ones. When one identity appears in
    /// several tiers the last tier written (worst) wins. Returns the number
    /// of entries written.
    pub fn import_snapshot(&mut self, snapshot: Snapshot) -> Result<usize, RankError> {
        let mut current = self.tier_lists();
        let mut written = 0;

        for (tier, entries) in snapshot {
            let mut ordered: Vec<Entry> = entries.into_iter().map(|e| e.with_tier(tier)).collect();
            let numbers: HashSet<u32> = ordered.iter().map(Entry::number).collect();
            written += ordered.len();

            let mut batch = Vec::new();
            for existing in current.remove(&tier).unwrap_or_default() {
                if numbers.contains(&existing.number()) {
                    if !ordered.iter().any(|e| e.identity == existing.identity) {
                        batch.push(Mutation::Remove {
                            key: codec::encode_key(&existing.identity),
                        });
                    }
                } else {
                    ordered.push(existing);
                }
            }

            batch.extend(self.tier_writes(&ordered));
            self.backend.apply(batch)?;
        }

        self.compact()?;
        tracing::info!("Imported {written} entries");
        Ok(written)
    }

    /// Rewrite any tier whose ranks are not exactly `0..n`.
    pub fn compact(&mut self) -> Result<(), RankError> {
        for (tier, list) in self.tier_lists() {
            let dense = list.iter().enumerate().all(|(i, e)| e.rank() == i);
            if !dense {
                tracing::debug!("Re-ranking {}-tier ({} entries)", tier, list.len());
                self.replace_tier(&list)?;
            }
        }
        Ok(())
    }
}

/// Parse a snapshot document leniently.
///
/// The document must be a JSON object; unknown tier keys and malformed
/// entries are logged and skipped. Returns the snapshot and the skip count.
pub fn parse_snapshot(json: &str) -> Result<(Snapshot, usize), RankError> {
    let raw: BTreeMap<String, Vec<serde_json::Value>> =
        serde_json::from_str(json).map_err(RankError::Snapshot)?;

    let mut snapshot = Snapshot::new();
    let mut skipped = 0;
    for (symbol, values) in raw {
        let tier: Tier = match symbol.parse() {
            Ok(tier) => tier,
            Err(e) => {
                tracing::warn!("Skipping {} snapshot entries: {e}", values.len());
                skipped += values.len();
                continue;
            }
        };
        let list = snapshot.entry(tier).or_default();
        for value in values {
            match serde_json::from_value::<Entry>(value) {
                Ok(entry) => list.push(entry),
                Err(e) => {
                    tracing::warn!("Skipping malformed {tier}-tier snapshot entry: {e}");
                    skipped += 1;
                }
            }
        }
    }
    Ok((snapshot, skipped))
}
