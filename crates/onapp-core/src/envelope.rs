//! Single-key resource envelopes.
//!
//! OnApp wraps every record in an object keyed by the singular resource name,
//! both in request bodies and in responses. Collections are returned as an
//! array of such one-entry objects rather than one wrapper around an array:
//!
//! ```json
//! [{"instance_package": {"id": 1}}, {"instance_package": {"id": 2}}]
//! ```

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Wrap a payload under `key` for transmission.
#[must_use]
pub fn wrap<'a, T>(key: &'static str, payload: &'a T) -> BTreeMap<&'static str, &'a T>
where
    T: Serialize + ?Sized,
{
    let mut envelope = BTreeMap::new();
    envelope.insert(key, payload);
    envelope
}

/// Take the record stored under `key` out of a single envelope.
///
/// # Errors
///
/// Returns [`Error::ParseError`] when the key is absent.
pub fn unwrap_one<T>(key: &str, mut envelope: HashMap<String, T>) -> Result<T> {
    envelope
        .remove(key)
        .ok_or_else(|| Error::ParseError(format!("response is missing the `{key}` envelope")))
}

/// Unwrap every envelope of a collection response, preserving order.
///
/// # Errors
///
/// Returns [`Error::ParseError`] when any element lacks the key.
pub fn unwrap_many<T>(key: &str, envelopes: Vec<HashMap<String, T>>) -> Result<Vec<T>> {
    envelopes
        .into_iter()
        .map(|envelope| unwrap_one(key, envelope))
        .collect()
}
