//! Serde helper functions for request deserialization.
//!
//! Partial updates need to tell "field absent" apart from "field explicitly
//! set to null". Pair these helpers with `#[serde(default)]` on an
//! `Option<Option<T>>` field.

use serde::{Deserialize, Deserializer};

/// Deserialize a present value (including `null`) as `Some(..)`.
///
/// Absent fields fall back to `#[serde(default)]` and stay `None`, so a body
/// of `{"description": null}` yields `Some(None)` while `{}` yields `None`.
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
