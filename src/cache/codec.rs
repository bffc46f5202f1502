//! Cache Entry Codec
//!
//! Converts entries to and from the string form handed to the storage adapter.

use serde::{de::DeserializeOwned, Serialize};

use crate::cache::CacheEntry;
use crate::error::CacheError;

/// Serializes an entry to JSON.
///
/// Fails only when the payload has no JSON representation, such as a map
/// with non-string keys.
pub fn encode<T: Serialize>(entry: &CacheEntry<T>) -> Result<String, CacheError> {
    serde_json::to_string(entry).map_err(|e| CacheError::Encode(e.to_string()))
}

/// Parses a persisted entry.
///
/// Rejects malformed JSON, payloads of the wrong shape, and envelopes whose
/// expiry precedes their timestamp.
pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<CacheEntry<T>, CacheError> {
    let entry: CacheEntry<T> =
        serde_json::from_str(raw).map_err(|e| CacheError::Decode(e.to_string()))?;

    if entry.expiry < entry.timestamp {
        return Err(CacheError::Decode(format!(
            "expiry {} precedes timestamp {}",
            entry.expiry, entry.timestamp
        )));
    }

    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Lookup {
        id: u32,
        name: String,
    }

    #[test]
    fn test_envelope_field_names() {
        let entry = CacheEntry::new(vec!["steam", "modern"], 100, Duration::from_millis(1000));
        let raw = encode(&entry).unwrap();

        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["data"], serde_json::json!(["steam", "modern"]));
        assert_eq!(value["timestamp"], 100);
        assert_eq!(value["expiry"], 1100);
    }

    #[test]
    fn test_decode_struct_payload() {
        let entry = CacheEntry::new(
            vec![Lookup {
                id: 1,
                name: "Steam".into(),
            }],
            5,
            Duration::from_secs(1),
        );

        let decoded: CacheEntry<Vec<Lookup>> = decode(&encode(&entry).unwrap()).unwrap();
        assert_eq!(decoded, entry);
    }

    #[test]
    fn test_decode_hand_written_envelope() {
        let raw = r#"{"data":["steam"],"timestamp":10,"expiry":1010}"#;
        let entry: CacheEntry<Vec<String>> = decode(raw).unwrap();

        assert_eq!(entry.data, vec!["steam".to_string()]);
        assert_eq!(entry.expiry, 1010);
    }

    #[test]
    fn test_decode_not_json() {
        let result = decode::<Vec<String>>("definitely not json");
        assert!(matches!(result, Err(CacheError::Decode(_))));
    }

    #[test]
    fn test_decode_missing_fields() {
        let result = decode::<Vec<String>>(r#"{"data":["steam"]}"#);
        assert!(matches!(result, Err(CacheError::Decode(_))));
    }

    #[test]
    fn test_decode_wrong_payload_shape() {
        let result = decode::<Vec<Lookup>>(r#"{"data":"oops","timestamp":1,"expiry":2}"#);
        assert!(matches!(result, Err(CacheError::Decode(_))));
    }

    #[test]
    fn test_decode_inverted_expiry() {
        let result = decode::<Vec<String>>(r#"{"data":[],"timestamp":500,"expiry":10}"#);
        assert!(matches!(result, Err(CacheError::Decode(_))));
    }

    #[test]
    fn test_encode_non_string_map_keys_fails() {
        let mut data = HashMap::new();
        data.insert((1, 2), "tuple key");
        let entry = CacheEntry::new(data, 0, Duration::from_secs(1));

        assert!(matches!(encode(&entry), Err(CacheError::Encode(_))));
    }
}
