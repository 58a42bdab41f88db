//! Lenient field readers for session logs written by older tooling.
//!
//! Older logs store timestamps as offset-less local ISO-8601 strings
//! (`2024-03-01T09:00:00.123456`) and may store `focus_score` as a float.
//! Both are accepted on read; writes always use RFC 3339 UTC and integer scores.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::score::PERFECT_SCORE;

fn parse_rfc3339(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Offset-less timestamps are read as local wall-clock time.
fn parse_naive_local(value: &str) -> Option<DateTime<Utc>> {
    let naive = value.parse::<NaiveDateTime>().ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    parse_rfc3339(value).or_else(|| parse_naive_local(value))
}

pub(crate) fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_timestamp(&value)
        .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {value}")))
}

pub(crate) fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) => parse_timestamp(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {value}"))),
        None => Ok(None),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScore {
    Whole(u64),
    Fractional(f64),
}

pub(crate) fn focus_score<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let score = match RawScore::deserialize(deserializer)? {
        RawScore::Whole(value) => value as f64,
        RawScore::Fractional(value) => value,
    };

    if !(0.0..=f64::from(PERFECT_SCORE)).contains(&score) {
        return Err(D::Error::custom(format!(
            "focus_score {score} outside 0..={PERFECT_SCORE}"
        )));
    }
    Ok(score.round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_rfc3339() {
        let parsed = parse_timestamp("2024-03-01T09:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 1, 7, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp_naive_is_local() {
        let parsed = parse_timestamp("2024-03-01T09:00:00.123456").unwrap();
        let expected = Local
            .with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
            + chrono::Duration::microseconds(123_456);
        assert_eq!(parsed, expected);

        assert!(parse_timestamp("2024-03-01T09:00:00").is_some());
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }
}
