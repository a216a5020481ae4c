//! Signed amounts on the wire.
//!
//! Balance deltas are `i128` so that a full `u64` magnitude fits with its
//! sign. JSON numbers in `serde_json::Value` stop at the `i64`/`u64`
//! range, so deltas serialize as decimal strings instead. Use with
//! `#[serde(with = "zkt_core::signed")]`.

use serde::{Deserialize, Deserializer, Serializer};

/// Write `value` as a base-10 string.
pub fn serialize<S: Serializer>(value: &i128, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&value.to_string())
}

/// Read a base-10 string.
pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<i128, D::Error> {
    let text = String::deserialize(d)?;
    text.parse::<i128>()
        .map_err(|e| serde::de::Error::custom(format!("invalid signed amount {text:?}: {e}")))
}
