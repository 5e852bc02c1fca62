/// Placement algorithms: the in-tier search window and the tier-boundary check.
///
/// No IO and no prompting. The state machine in `session` decides when to
/// ask the user; these functions decide what to ask about and how an answer
/// narrows the search.
use crate::constants::MARGIN_SHIFT;
use crate::error::{RankError, RangeError};
use crate::store::ItemStore;
use crate::tier::{Direction, Tier};
use crate::types::{Entry, ItemAttrs};

/// First probe position for a tier of `high` entries, biased by the
/// direction the user leaned.
///
/// Prefer-higher starts past the end of the list (`floor(1.5 * high)`);
/// [`SearchWindow::probe`] clamps the probe to the last entry and
/// [`SearchWindow::narrow`] continues from the clamped index.
pub fn first_midpoint(direction: Direction, high: usize) -> usize {
    match direction {
        Direction::PreferLower => high / 2,
        Direction::PreferHigher => high * 3 / 2,
        Direction::Equal => high >> 1,
    }
}

/// Widest final window the search accepts for a tier of `tier_len` entries.
///
/// `2^max(0, floor(log2 tier_len) - MARGIN_SHIFT)`; an empty tier has margin 1.
pub fn search_margin(tier_len: usize) -> usize {
    match tier_len.checked_ilog2() {
        Some(log) => 1 << log.saturating_sub(MARGIN_SHIFT),
        None => 1,
    }
}

/// Binary-search state over a tier list's index range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchWindow {
    pub low: usize,
    pub mid: usize,
    pub high: usize,
}

impl SearchWindow {
    pub fn start(direction: Direction, high: usize) -> Self {
        SearchWindow {
            low: 0,
            mid: first_midpoint(direction, high),
            high,
        }
    }

    /// Done once the window is no wider than the tier's margin. A window
    /// whose low bound passed its high bound is settled too.
    pub fn is_settled(&self, tier_len: usize) -> bool {
        self.high.saturating_sub(self.low) <= search_margin(tier_len)
    }

    /// Index of the entry to compare against next, clamped into the list.
    pub fn probe(&self, tier_len: usize) -> Option<usize> {
        tier_len.checked_sub(1).map(|last| self.mid.min(last))
    }

    /// Narrow after the user placed the new item before (prefer-lower) or
    /// after (prefer-higher) the probed entry. The bounds move past the
    /// index actually probed, so an overshooting `mid` never asks about the
    /// same entry twice and `high` ends up inside the tier. `Equal` carries
    /// no information and leaves the window as is.
    pub fn narrow(self, direction: Direction, tier_len: usize) -> Self {
        let Some(probed) = self.probe(tier_len) else {
            return self;
        };
        let low = self.low;
        let probed = probed.max(low);
        let high = self.high.min(tier_len).max(low);
        match direction {
            Direction::PreferLower => SearchWindow {
                low,
                mid: (low + probed) / 2,
                high: probed,
            },
            Direction::PreferHigher => {
                let low = probed + 1;
                let high = high.max(low);
                SearchWindow {
                    low,
                    mid: (low + high) / 2,
                    high,
                }
            }
            Direction::Equal => self,
        }
    }
}

/// The entry of the adjacent tier to compare a new `tier` item against.
///
/// Leaning better checks the worst entry of the tier above; leaning worse
/// checks the best entry of the tier below. Fails with a range error when
/// there is no such tier, the direction is `Equal`, or the tier is empty.
pub fn boundary_target(
    store: &ItemStore,
    tier: Tier,
    direction: Direction,
) -> Result<Entry, RangeError> {
    let neighbour = tier.step(direction)?;
    let list = store.entries_in_tier(neighbour);
    let last = list.len().checked_sub(1).ok_or(RangeError::EmptyTier(neighbour))?;
    let index = direction.pick([last, 0, 0]);
    Ok(list[index].clone())
}

/// Move a boundary entry that lost a cross-tier comparison into `chosen`.
///
/// An entry that was first in its tier goes to the last rank of `chosen`;
/// any other goes to rank 0. Returns the moved entry.
pub fn swap_across_boundary(
    store: &mut ItemStore,
    chosen: Tier,
    boundary: &Entry,
) -> Result<Entry, RankError> {
    let chosen_len = store.entries_in_tier(chosen).len();
    let rank = if boundary.rank() == 0 {
        chosen_len.saturating_sub(1)
    } else {
        0
    };
    let attributes = ItemAttrs {
        rank,
        tier: chosen,
        ..boundary.attributes
    };
    tracing::debug!(
        "Moving {} from {}-tier to {}-tier rank {}",
        boundary.title(),
        boundary.tier(),
        chosen,
        rank
    );
    store.upsert(boundary.identity.clone(), attributes)?;
    Ok(Entry::new(boundary.identity.clone(), attributes))
}
