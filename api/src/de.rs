//! Lenient field decoders for PHP-flavoured JSON.
//!
//! The backend serializes database rows straight from `mysqli`, so numbers
//! regularly arrive as strings, ids flip between numbers and strings, and
//! booleans show up as `1`/`"0"`/`"true"`. Every decoder here first reads a
//! [`serde_json::Value`] and then normalizes it.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Number, string or null → `String` (null becomes empty).
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_string(deserializer)?.unwrap_or_default())
}

/// Number, string or null → `Option<String>`; blank strings become `None`.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(&Value::deserialize(deserializer)?))
}

/// Integer or string id → trimmed `Option<String>`. Fractional numbers,
/// booleans and containers are errors.
pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    value_to_id(&Value::deserialize(deserializer)?).map_err(serde::de::Error::custom)
}

/// Normalize a JSON id.
///
/// # Errors
///
/// Returns a message naming the JSON type when the value cannot be an id.
pub fn value_to_id(value: &Value) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.trim().to_owned()).filter(|s| !s.is_empty())),
        Value::Number(n) if n.is_u64() || n.is_i64() => Ok(Some(n.to_string())),
        Value::Number(n) => Err(format!("id must be an integer, got {n}")),
        Value::Bool(_) => Err("id must be a string or integer, got a boolean".to_owned()),
        Value::Array(_) | Value::Object(_) => Err("id must be a string or integer".to_owned()),
    }
}

/// Number or numeric string → `Option<f64>`. Anything unparseable is `None`.
pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_f64(&Value::deserialize(deserializer)?))
}

/// Like [`opt_f64`] but missing values read as zero.
pub fn f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_f64(deserializer)?.unwrap_or(0.0))
}

/// Non-negative integer counts such as `totalRecords`.
pub fn u64_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_u64(deserializer)?.unwrap_or(0))
}

/// Non-negative integer, possibly string-encoded.
pub fn opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    })
}

/// `true`/`false`, `1`/`0`, `"1"`/`"0"`, `"yes"`/`"no"`, `"active"`/`"inactive"`.
pub fn bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_bool(&Value::deserialize(deserializer)?).unwrap_or(false))
}

/// `YYYY-MM-DD`, optionally followed by a time part, or empty.
pub fn opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = opt_string(deserializer)? else {
        return Ok(None);
    };
    Ok(parse_date(&raw))
}

/// Parse the date portion of a `YYYY-MM-DD[ HH:MM:SS]` string.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

#[must_use]
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[must_use]
pub fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

#[must_use]
pub fn value_to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" | "active" | "enabled" => Some(true),
            "0" | "false" | "no" | "off" | "inactive" | "disabled" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
