/// Storage encoding for entries.
///
/// Key: `"<number>,<title>"`. Value: a JSON record with integer `rank`,
/// tier symbol `tier` and topic name `topic`.
use crate::constants::KEY_DELIMITER;
use crate::error::ValidationError;
use crate::types::{Entry, ItemAttrs, ItemKey};

pub fn encode_key(key: &ItemKey) -> String {
    format!("{}{}{}", key.number, KEY_DELIMITER, key.title)
}

/// Inverse of [`encode_key`]. Splits on the first delimiter only; a blank
/// title is rejected.
pub fn decode_key(raw: &str) -> Result<ItemKey, ValidationError> {
    let (number, title) = raw
        .split_once(KEY_DELIMITER)
        .ok_or_else(|| ValidationError::MissingDelimiter(raw.to_string()))?;
    let number = number
        .trim()
        .parse::<u32>()
        .map_err(|_| ValidationError::BadNumber(number.to_string()))?;
    if title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    Ok(ItemKey::new(number, title))
}

pub fn encode_value(attrs: &ItemAttrs) -> String {
    serde_json::json!({
        "rank": attrs.rank,
        "tier": attrs.tier,
        "topic": attrs.topic,
    })
    .to_string()
}

pub fn decode_value(raw: &str) -> Result<ItemAttrs, ValidationError> {
    serde_json::from_str(raw).map_err(ValidationError::BadRecord)
}

/// Parse one stored key/value pair, rejecting anything not rankable.
pub fn decode_entry(key: &str, value: &str) -> Result<Entry, ValidationError> {
    Ok(Entry::new(decode_key(key)?, decode_value(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::Tier;

    #[test]
    fn test_key_round_trip() {
        for (number, title) in [(1, "Barrel - Part 1"), (353, "Python"), (0, " Zero ")] {
            let key = ItemKey::new(number, title);
            assert_eq!(decode_key(&encode_key(&key)).unwrap(), key);
        }
    }

    #[test]
    fn test_key_with_delimiter_in_title() {
        let key = ItemKey::new(12, "Poisson, Again");
        assert_eq!(encode_key(&key), "12,Poisson, Again");
        assert_eq!(decode_key("12,Poisson, Again").unwrap(), key);
    }

    #[test]
    fn test_decode_key_rejects_malformed() {
        assert!(matches!(
            decode_key("no delimiter"),
            Err(ValidationError::MissingDelimiter(_))
        ));
        assert!(matches!(
            decode_key("x12,Title"),
            Err(ValidationError::BadNumber(_))
        ));
        assert!(matches!(
            decode_key("-4,Title"),
            Err(ValidationError::BadNumber(_))
        ));
        assert!(matches!(decode_key("4,"), Err(ValidationError::MissingTitle)));
        assert!(matches!(decode_key("4,  "), Err(ValidationError::MissingTitle)));
    }

    #[test]
    fn test_value_round_trip() {
        let attrs = ItemAttrs {
            rank: 2,
            tier: Tier::S,
            topic: "Climate".parse().unwrap(),
        };
        let raw = encode_value(&attrs);
        assert_eq!(decode_value(&raw).unwrap(), attrs);
    }

    #[test]
    fn test_decode_value_rejects_bad_records() {
        for raw in [
            "not json",
            r#"{"rank":"1","tier":"b","topic":"Music"}"#,
            r#"{"rank":1,"tier":"q","topic":"Music"}"#,
            r#"{"rank":1,"tier":"b","topic":"Astrology"}"#,
            r#"{"rank":1,"tier":"b"}"#,
        ] {
            assert!(decode_value(raw).is_err(), "accepted {raw}");
        }
    }

    #[test]
    fn test_decode_entry() {
        let entry = decode_entry("5,Fire", r#"{"rank":0,"tier":"a","topic":"Physics"}"#).unwrap();
        assert_eq!(entry.number(), 5);
        assert_eq!(entry.title(), "Fire");
        assert_eq!(entry.tier(), Tier::A);
    }
}
