//! The fixed tier alphabet and the direction algebra used to step between tiers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{RangeError, ValidationError};
use crate::types::{Entry, Topic};

/// One bucket of the best-to-worst classification.
///
/// Declaration order is tier order: `S` is best and has index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Tier {
    S,
    A,
    B,
    C,
    D,
    F,
}

impl Tier {
    pub const ALL: [Tier; 6] = [Tier::S, Tier::A, Tier::B, Tier::C, Tier::D, Tier::F];

    pub fn best() -> Tier {
        Self::ALL[0]
    }

    pub fn worst() -> Tier {
        Self::ALL[Self::ALL.len() - 1]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Tier> {
        Self::ALL.get(index).copied()
    }

    pub fn symbol(self) -> char {
        match self {
            Tier::S => 's',
            Tier::A => 'a',
            Tier::B => 'b',
            Tier::C => 'c',
            Tier::D => 'd',
            Tier::F => 'f',
        }
    }

    /// The adjacent tier in `direction`: one better for prefer-lower, one
    /// worse for prefer-higher.
    pub fn step(self, direction: Direction) -> Result<Tier, RangeError> {
        match direction {
            Direction::Equal => Err(RangeError::SameTier),
            Direction::PreferLower if self == Self::best() => Err(RangeError::BeyondBest),
            Direction::PreferHigher if self == Self::worst() => Err(RangeError::BeyondWorst),
            _ => {
                let next = self.index() as isize + direction.offset();
                Ok(Self::ALL[next as usize])
            }
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Tier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::ALL
                .into_iter()
                .find(|t| t.symbol() == c.to_ascii_lowercase())
                .ok_or_else(|| ValidationError::UnknownTier(s.to_string())),
            _ => Err(ValidationError::UnknownTier(s.to_string())),
        }
    }
}

impl TryFrom<String> for Tier {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Tier> for String {
    fn from(tier: Tier) -> Self {
        tier.symbol().to_string()
    }
}

/// Outcome or intent of a comparison, relative to tier/rank index.
///
/// Lower indices are better, so `PreferLower` means "belongs nearer the top".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    PreferLower,
    Equal,
    PreferHigher,
}

impl Direction {
    pub const ALL: [Direction; 3] = [
        Direction::PreferLower,
        Direction::Equal,
        Direction::PreferHigher,
    ];

    /// Select from a `[low, mid, high]` triple.
    pub fn pick<T>(self, [low, mid, high]: [T; 3]) -> T {
        match self {
            Direction::PreferLower => low,
            Direction::Equal => mid,
            Direction::PreferHigher => high,
        }
    }

    pub fn offset(self) -> isize {
        self.pick([-1, 0, 1])
    }

    /// Phrasing for where in a tier this direction points.
    pub fn feeling(self) -> &'static str {
        self.pick(["best", "middle", "worst"])
    }

    pub fn flip(self) -> Direction {
        self.pick([
            Direction::PreferHigher,
            Direction::Equal,
            Direction::PreferLower,
        ])
    }
}

/// Whether comparing an item in `this` tier as `direction` against an item in
/// `that` tier agrees with their tier order.
///
/// A `false` here means the comparison contradicts the assigned tiers and the
/// two items should trade places across the boundary.
pub fn is_tier_logical(this: Tier, direction: Direction, that: Tier) -> bool {
    let diff = (this.index() as isize - that.index() as isize).signum();
    diff == direction.offset()
}

/// One empty list per tier, best to worst.
pub fn empty_tier_buckets() -> BTreeMap<Tier, Vec<Entry>> {
    Tier::ALL.into_iter().map(|t| (t, Vec::new())).collect()
}

/// A zero count for every topic.
pub fn empty_topic_counters() -> BTreeMap<Topic, usize> {
    Topic::all().map(|t| (t, 0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_order_and_extremes() {
        assert_eq!(Tier::best(), Tier::S);
        assert_eq!(Tier::worst(), Tier::F);
        assert!(Tier::S < Tier::F);
        assert_eq!(Tier::B.index(), 2);
        assert_eq!(Tier::from_index(5), Some(Tier::F));
        assert_eq!(Tier::from_index(6), None);
    }

    #[test]
    fn test_tier_parse() {
        assert_eq!("b".parse::<Tier>().unwrap(), Tier::B);
        assert_eq!("F".parse::<Tier>().unwrap(), Tier::F);
        assert!("e".parse::<Tier>().is_err());
        assert!("ab".parse::<Tier>().is_err());
        assert!("".parse::<Tier>().is_err());
    }

    #[test]
    fn test_tier_step() {
        assert_eq!(Tier::B.step(Direction::PreferLower), Ok(Tier::A));
        assert_eq!(Tier::B.step(Direction::PreferHigher), Ok(Tier::C));
        assert_eq!(Tier::B.step(Direction::Equal), Err(RangeError::SameTier));
        assert_eq!(Tier::S.step(Direction::PreferLower), Err(RangeError::BeyondBest));
        assert_eq!(Tier::F.step(Direction::PreferHigher), Err(RangeError::BeyondWorst));
        assert_eq!(Tier::S.step(Direction::PreferHigher), Ok(Tier::A));
        assert_eq!(Tier::F.step(Direction::PreferLower), Ok(Tier::D));
    }

    #[test]
    fn test_direction_flip_is_involution() {
        for d in Direction::ALL {
            assert_eq!(d.flip().flip(), d);
        }
        assert_eq!(Direction::Equal.flip(), Direction::Equal);
        assert_eq!(Direction::PreferLower.flip(), Direction::PreferHigher);
    }

    #[test]
    fn test_direction_pick() {
        assert_eq!(Direction::PreferLower.pick(["low", "mid", "high"]), "low");
        assert_eq!(Direction::Equal.pick(["low", "mid", "high"]), "mid");
        assert_eq!(Direction::PreferHigher.pick(["low", "mid", "high"]), "high");
        assert_eq!(Direction::PreferLower.feeling(), "best");
        assert_eq!(Direction::PreferHigher.feeling(), "worst");
    }

    #[test]
    fn test_is_tier_logical_all_combinations() {
        for direction in Direction::ALL {
            for this in Tier::ALL {
                for that in Tier::ALL {
                    let sign = match this.index().cmp(&that.index()) {
                        std::cmp::Ordering::Less => -1,
                        std::cmp::Ordering::Equal => 0,
                        std::cmp::Ordering::Greater => 1,
                    };
                    assert_eq!(
                        is_tier_logical(this, direction, that),
                        sign == direction.offset(),
                        "{this} {direction:?} {that}"
                    );
                }
            }
        }
        // A b-tier item judged worse than an a-tier item is consistent.
        assert!(is_tier_logical(Tier::B, Direction::PreferHigher, Tier::A));
        assert!(!is_tier_logical(Tier::B, Direction::PreferLower, Tier::A));
    }

    #[test]
    fn test_empty_buckets_and_counters() {
        let buckets = empty_tier_buckets();
        assert_eq!(buckets.len(), 6);
        assert!(buckets.values().all(Vec::is_empty));
        assert_eq!(buckets.keys().next(), Some(&Tier::S));

        let counters = empty_topic_counters();
        assert_eq!(counters.len(), crate::constants::TOPIC_NAMES.len());
        assert!(counters.values().all(|&c| c == 0));
    }

    #[test]
    fn test_tier_serde_as_symbol() {
        assert_eq!(serde_json::to_string(&Tier::C).unwrap(), "\"c\"");
        let t: Tier = serde_json::from_str("\"d\"").unwrap();
        assert_eq!(t, Tier::D);
        assert!(serde_json::from_str::<Tier>("\"z\"").is_err());
    }
}
