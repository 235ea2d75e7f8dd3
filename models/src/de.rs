//! Lenient deserialisers for backend payloads.
//!
//! The backend is not consistent about primitive encodings: ids come back as
//! numbers or strings, booleans as `0/1`, decimals as strings and timestamps
//! in several formats. Everything is normalised here, once, so the models
//! carry plain Rust types.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// Backend identifier, numeric or opaque string.
///
/// Equality and hashing use the text form, so `3` and `"3"` name the
/// same record whichever encoding the backend picked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Num(i64),
    Str(String),
}

impl Id {
    /// Parses user input, preferring the numeric form.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        s.parse::<i64>()
            .map(Id::Num)
            .unwrap_or_else(|_| Id::Str(s.to_string()))
    }
}

impl PartialEq for Id {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Id::Num(a), Id::Num(b)) => a == b,
            (Id::Str(a), Id::Str(b)) => a == b,
            (Id::Num(n), Id::Str(s)) | (Id::Str(s), Id::Num(n)) => *s == n.to_string(),
        }
    }
}

impl Eq for Id {}

impl Hash for Id {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Id::Num(n) => n.to_string().hash(state),
            Id::Str(s) => s.hash(state),
        }
    }
}

impl Default for Id {
    fn default() -> Self {
        Id::Num(0)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Num(n) => write!(f, "{}", n),
            Id::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Num(n)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::parse(s)
    }
}

/// Treats an explicit `null` like a missing field.
pub fn null_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// Accepts `true/false`, `0/1` and `"true"/"1"`; `null` is `false`.
pub fn bool_or_int<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(value_to_bool(&Value::deserialize(d)?))
}

pub(crate) fn value_to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
        _ => false,
    }
}

/// Accepts numbers and numeric strings (`"29.00"`); `null` is `0.0`.
pub fn f64_lenient<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    match Value::deserialize(d)? {
        Value::Number(n) => Ok(n.as_f64().unwrap_or_default()),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid number: {}", s))),
        Value::Null => Ok(0.0),
        other => Err(serde::de::Error::custom(format!("invalid number: {}", other))),
    }
}

/// Like [`f64_lenient`] for counts and limits; negative values clamp to 0.
pub fn u64_lenient<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    let f = f64_lenient(d)?;
    Ok(if f.is_finite() && f > 0.0 { f.round() as u64 } else { 0 })
}

/// Optional timestamp in RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD`
/// or unix seconds. Unparseable values become `None`.
pub fn opt_datetime<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => parse_datetime(&s),
        Value::Number(n) => n.as_i64().and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        _ => None,
    })
}

pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Flags {
        #[serde(default, deserialize_with = "bool_or_int")]
        flag: bool,
        #[serde(default, deserialize_with = "f64_lenient")]
        price: f64,
        #[serde(default, deserialize_with = "u64_lenient")]
        count: u64,
        #[serde(default, deserialize_with = "opt_datetime")]
        at: Option<DateTime<Utc>>,
    }

    #[test]
    fn ids_keep_their_wire_form() {
        let num: Id = serde_json::from_value(json!(42)).unwrap();
        let text: Id = serde_json::from_value(json!("f_8a2c")).unwrap();
        assert_eq!(num, Id::Num(42));
        assert_eq!(text.to_string(), "f_8a2c");
        assert_eq!(serde_json::to_value(&num).unwrap(), json!(42));
        assert_eq!(Id::parse("17"), Id::Num(17));
        assert_eq!(Id::parse("abc"), Id::Str("abc".to_string()));
    }

    #[test]
    fn numeric_and_text_ids_match() {
        use std::collections::HashSet;

        let text: Id = serde_json::from_value(json!("3")).unwrap();
        assert_eq!(text, Id::parse("3"));
        assert_eq!(Id::Num(3), text);
        assert_ne!(Id::Num(3), Id::Str("03".to_string()));

        let seen: HashSet<Id> = [text].into_iter().collect();
        assert!(seen.contains(&Id::Num(3)));
    }

    #[test]
    fn integer_flags_are_booleans() {
        let f: Flags = serde_json::from_value(json!({ "flag": 1 })).unwrap();
        assert!(f.flag);
        let f: Flags = serde_json::from_value(json!({ "flag": 0 })).unwrap();
        assert!(!f.flag);
        let f: Flags = serde_json::from_value(json!({ "flag": null })).unwrap();
        assert!(!f.flag);
        let f: Flags = serde_json::from_value(json!({ "flag": "true" })).unwrap();
        assert!(f.flag);
    }

    #[test]
    fn decimal_strings_are_numbers() {
        let f: Flags = serde_json::from_value(json!({ "price": "29.00", "count": "5000" })).unwrap();
        assert_eq!(f.price, 29.0);
        assert_eq!(f.count, 5000);
        assert!(serde_json::from_value::<Flags>(json!({ "price": "free" })).is_err());
    }

    #[test]
    fn timestamps_in_several_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap();
        for raw in [
            json!("2024-05-01T10:30:00.000Z"),
            json!("2024-05-01 10:30:00"),
            json!(1714559400),
        ] {
            let f: Flags = serde_json::from_value(json!({ "at": raw })).unwrap();
            assert_eq!(f.at, Some(expected));
        }
        let f: Flags = serde_json::from_value(json!({ "at": "yesterday" })).unwrap();
        assert_eq!(f.at, None);
    }
}
