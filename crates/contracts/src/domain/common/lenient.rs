//! Serde helpers for the loosely typed fields the backend hands back.
//!
//! Timestamps arrive either as RFC 3339 or as naive `YYYY-MM-DDTHH:MM:SS.ffffff`
//! (treated as UTC). Optional text/date fields coming from forms are often
//! empty strings instead of null.

use crate::enums::LeadPriorityValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a backend timestamp. Returns `None` for anything unparseable.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    parse_date(raw).and_then(|d| d.and_hms_opt(0, 0, 0)).map(|n| n.and_utc())
}

/// Parse a calendar date, accepting a full timestamp as well
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw.get(..10).unwrap_or(raw), "%Y-%m-%d").ok()
}

pub mod timestamp {
    use super::*;

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_timestamp))
    }
}

pub mod date {
    use super::*;

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_date))
    }
}

/// `""` and `null` both become `None`
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(T::from))
}

/// `null` becomes the type's default
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Percentage stored as a number or numeric text; rounded and clamped to
/// 0..=100. Anything else becomes `None`.
pub fn percentage<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    let number = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number
        .filter(|n| n.is_finite())
        .map(|n| n.round().clamp(0.0, 100.0) as u8))
}

/// Priority name; `""` and `null` become `None`, unknown names are kept
pub fn priority<'de, D>(deserializer: D) -> Result<Option<LeadPriorityValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) if !s.trim().is_empty() => {
            Some(LeadPriorityValue::from_raw(s.trim()))
        }
        Some(Value::String(_)) | Some(Value::Null) | None => None,
        Some(other) => Some(LeadPriorityValue::Unrecognized(other.to_string())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_timestamp_formats() {
        let naive = parse_timestamp("2025-07-18T04:54:33.187000").unwrap();
        assert_eq!((naive.year(), naive.month(), naive.day()), (2025, 7, 18));
        assert_eq!(naive.hour(), 4);

        let rfc = parse_timestamp("2025-07-18T04:54:33+05:30").unwrap();
        assert_eq!(rfc.hour(), 23);
        assert_eq!(rfc.day(), 17);

        let date_only = parse_timestamp("2025-01-02").unwrap();
        assert_eq!(date_only.hour(), 0);

        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-03-31T10:00:00"),
            NaiveDate::from_ymd_opt(2025, 3, 31)
        );
        assert_eq!(parse_date("2025-02-30"), None);
        assert_eq!(parse_date("  "), None);
    }

    #[derive(Deserialize)]
    struct Scored {
        #[serde(default, deserialize_with = "percentage")]
        probability: Option<u8>,
        #[serde(default, deserialize_with = "priority")]
        priority: Option<LeadPriorityValue>,
    }

    fn scored(raw: Value) -> Scored {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_percentage_rounds_and_clamps() {
        use serde_json::json;
        assert_eq!(scored(json!({"probability": 12.5})).probability, Some(13));
        assert_eq!(scored(json!({"probability": "40"})).probability, Some(40));
        assert_eq!(scored(json!({"probability": 140})).probability, Some(100));
        assert_eq!(scored(json!({"probability": -3})).probability, Some(0));
        assert_eq!(scored(json!({"probability": "high"})).probability, None);
        assert_eq!(scored(json!({})).probability, None);
    }

    #[test]
    fn test_priority_tolerates_empty_and_unknown() {
        use crate::enums::LeadPriority;
        use serde_json::json;
        assert_eq!(scored(json!({"priority": ""})).priority, None);
        assert_eq!(scored(json!({"priority": null})).priority, None);
        assert_eq!(
            scored(json!({"priority": "High"})).priority,
            Some(LeadPriority::High.into())
        );
        assert_eq!(
            scored(json!({"priority": "Urgent"})).priority,
            Some(LeadPriorityValue::Unrecognized("Urgent".into()))
        );
        assert_eq!(
            scored(json!({"priority": 3})).priority,
            Some(LeadPriorityValue::Unrecognized("3".into()))
        );
    }
}
