//! Lenient timestamp decoding.
//!
//! The service emits `created_at` either as RFC 3339 or as a naive ISO-8601 string
//! without an offset (`2024-03-01T10:15:00.123456`). Naive values are UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

pub fn parse_utc(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_utc(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_utc("2024-03-01T10:15:00+02:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-01T08:15:00+00:00");
    }

    #[test]
    fn test_parse_naive_as_utc() {
        let dt = parse_utc("2024-03-01T10:15:00.123456").unwrap();
        assert_eq!(dt.format("%H:%M:%S").to_string(), "10:15:00");

        let dt = parse_utc("2024-03-01 10:15:00").unwrap();
        assert_eq!(dt.format("%Y-%m-%d").to_string(), "2024-03-01");
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_utc("yesterday").is_none());
    }
}
