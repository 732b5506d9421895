//! Field decoders that never reject a record.
//!
//! Each decoder reads the raw JSON value and maps a wrong type to the field's
//! documented default, so one odd field does not cost the whole line.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::{AnsweredQuestion, Difficulty};

pub(super) fn label<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

pub(super) fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(Value::deserialize(d)?.as_f64().unwrap_or(0.0))
}

pub(super) fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(as_count(&Value::deserialize(d)?).unwrap_or(0))
}

pub(super) fn optional_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(as_count(&Value::deserialize(d)?))
}

pub(super) fn timestamp<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        _ => None,
    })
}

pub(super) fn accuracy_map<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<BTreeMap<Difficulty, f64>, D::Error> {
    let Value::Object(map) = Value::deserialize(d)? else {
        return Ok(BTreeMap::new());
    };
    Ok(map
        .iter()
        .filter_map(|(key, value)| Some((Difficulty::from_label(key)?, value.as_f64()?)))
        .collect())
}

pub(super) fn answered<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<Vec<AnsweredQuestion>>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => Some(items.iter().map(AnsweredQuestion::from_value).collect()),
        _ => None,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn as_count(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    value
        .as_f64()
        .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= f64::from(u32::MAX))
        .map(|f| f as u32)
}
