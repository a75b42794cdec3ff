//! Deserialization helpers for loosely typed OnApp responses.

use serde::{Deserialize, Deserializer};

/// Deserialize a field, treating JSON `null` like a missing key.
///
/// OnApp sends `null` for unset booleans, lists and nested objects. Pair
/// with `#[serde(default)]` so absent keys decode the same way.
///
/// # Errors
///
/// Propagates type errors for non-null values.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq, Default)]
    struct Flags {
        #[serde(default, deserialize_with = "null_as_default")]
        enabled: bool,
        #[serde(default, deserialize_with = "null_as_default")]
        tags: Vec<String>,
    }

    #[test]
    fn null_and_missing_decode_to_default() {
        let flags: Flags = serde_json::from_value(json!({"enabled": null, "tags": null})).unwrap();
        assert_eq!(flags, Flags::default());
        let flags: Flags = serde_json::from_value(json!({})).unwrap();
        assert_eq!(flags, Flags::default());
    }

    #[test]
    fn present_values_are_kept() {
        let flags: Flags =
            serde_json::from_value(json!({"enabled": true, "tags": ["a"]})).unwrap();
        assert!(flags.enabled);
        assert_eq!(flags.tags, vec!["a"]);
    }

    #[test]
    fn wrong_types_still_fail() {
        assert!(serde_json::from_value::<Flags>(json!({"enabled": "yes"})).is_err());
    }
}
