/// tiersort-core: Tier-and-rank ordering driven by human pairwise comparisons.
///
/// A new item is filed into one of a fixed set of tiers, checked against the
/// edge of the neighbouring tier, then binary-searched into place within its
/// tier, so each placement costs O(log n) questions. The engine never talks
/// to the user directly: every operation returns the next question to ask.
///
/// Durable state lives behind a [`KeyValueStore`]; the engine and the
/// session keep nothing else between calls.
///
/// # Quick start
///
/// ```rust
/// use tiersort_core::{Direction, ItemKey, ItemStore, Prompt, Ranker, Tier};
///
/// let mut ranker = Ranker::new(ItemStore::in_memory(), 100);
///
/// ranker.begin(ItemKey::new(1, "Barrel - Part 1"));
/// let outcome = ranker.choose_tier(Tier::B, Direction::Equal).unwrap();
///
/// // Nothing in b-tier yet, so there is nothing to compare against.
/// assert!(matches!(outcome.prompt, Prompt::AskTopic { .. }));
///
/// let outcome = ranker.choose_topic("Physics").unwrap();
/// if let Prompt::Placed { entry } = outcome.prompt {
///     println!("{} is {}-tier #{}", entry.title(), entry.tier(), entry.rank() + 1);
/// }
/// ```

pub mod backend;
pub mod codec;
pub mod constants;
pub mod engine;
pub mod error;
pub mod session;
pub mod stats;
pub mod store;
pub mod tier;
pub mod types;

// Re-export primary public API at crate root.
pub use backend::{FileStore, KeyValueStore, MemoryStore, Mutation};
pub use engine::{first_midpoint, search_margin, SearchWindow};
pub use error::{RangeError, RankError, StoreError, ValidationError};
pub use session::{resolve_topic, Event, Outcome, Prompt, Ranker, Session, Stage};
pub use stats::{compute_stats, Stats};
pub use store::{insort, parse_snapshot, ItemStore, Snapshot};
pub use tier::{is_tier_logical, Direction, Tier};
pub use types::{Entry, ItemAttrs, ItemKey, Topic};
