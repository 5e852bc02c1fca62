use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::TOPIC_NAMES;
use crate::error::ValidationError;
use crate::tier::Tier;

/// A category label from the fixed topic alphabet.
///
/// Ordered by position in the alphabet, which is also the number the
/// topic command accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Topic(u8);

impl Topic {
    pub fn all() -> impl Iterator<Item = Topic> {
        (0..TOPIC_NAMES.len() as u8).map(Topic)
    }

    pub fn from_index(index: usize) -> Option<Topic> {
        (index < TOPIC_NAMES.len()).then_some(Topic(index as u8))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn name(self) -> &'static str {
        TOPIC_NAMES[self.index()]
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Topic {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::all()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::UnknownTopic(s.to_string()))
    }
}

impl TryFrom<String> for Topic {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Topic> for String {
    fn from(topic: Topic) -> Self {
        topic.name().to_string()
    }
}

/// Identity of a ranked subject. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemKey {
    /// Sequence number in the source collection (1-based for the remote source).
    #[serde(alias = "comic")]
    pub number: u32,
    pub title: String,
}

impl ItemKey {
    pub fn new(number: u32, title: impl Into<String>) -> Self {
        ItemKey {
            number,
            title: title.into(),
        }
    }
}

/// Where a subject sits: tier, dense position inside the tier, and its topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAttrs {
    /// Zero-based position within the tier's ordered list.
    pub rank: usize,
    pub tier: Tier,
    pub topic: Topic,
}

/// Identity and attributes together: the unit of storage.
///
/// The legacy field names `keyObj`, `itemObj` and `comic` are accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(alias = "keyObj")]
    pub identity: ItemKey,
    #[serde(alias = "itemObj")]
    pub attributes: ItemAttrs,
}

impl Entry {
    pub fn new(identity: ItemKey, attributes: ItemAttrs) -> Self {
        Entry {
            identity,
            attributes,
        }
    }

    pub fn number(&self) -> u32 {
        self.identity.number
    }

    pub fn title(&self) -> &str {
        &self.identity.title
    }

    pub fn rank(&self) -> usize {
        self.attributes.rank
    }

    pub fn tier(&self) -> Tier {
        self.attributes.tier
    }

    pub fn topic(&self) -> Topic {
        self.attributes.topic
    }

    pub fn with_rank(mut self, rank: usize) -> Self {
        self.attributes.rank = rank;
        self
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.attributes.tier = tier;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_lookup() {
        let physics: Topic = "Physics".parse().unwrap();
        assert_eq!(physics.name(), "Physics");
        assert_eq!(Topic::from_index(physics.index()), Some(physics));
        assert_eq!("physics".parse::<Topic>().unwrap(), physics);
        assert!("Astrology".parse::<Topic>().is_err());
        assert_eq!(Topic::from_index(0).unwrap().name(), "Anthropology");
        assert_eq!(Topic::from_index(TOPIC_NAMES.len()), None);
        assert_eq!(Topic::all().count(), TOPIC_NAMES.len());
    }

    #[test]
    fn test_attrs_serialize_as_record() {
        let attrs = ItemAttrs {
            rank: 3,
            tier: Tier::B,
            topic: "Music".parse().unwrap(),
        };
        let json = serde_json::to_string(&attrs).unwrap();
        assert_eq!(json, r#"{"rank":3,"tier":"b","topic":"Music"}"#);
    }

    #[test]
    fn test_attrs_reject_non_integer_rank() {
        let bad = r#"{"rank":1.5,"tier":"b","topic":"Music"}"#;
        assert!(serde_json::from_str::<ItemAttrs>(bad).is_err());
        let negative = r#"{"rank":-1,"tier":"b","topic":"Music"}"#;
        assert!(serde_json::from_str::<ItemAttrs>(negative).is_err());
    }

    #[test]
    fn test_entry_builders() {
        let entry = Entry::new(
            ItemKey::new(7, "Seven"),
            ItemAttrs {
                rank: 0,
                tier: Tier::A,
                topic: Topic::from_index(1).unwrap(),
            },
        );
        let moved = entry.clone().with_rank(4).with_tier(Tier::C);
        assert_eq!(moved.rank(), 4);
        assert_eq!(moved.tier(), Tier::C);
        assert_eq!(moved.identity, entry.identity);
    }
}
