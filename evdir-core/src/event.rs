//! Event records as stored in the backing JSON file.
//!
//! The file is hand-edited, so the record shape is read leniently: `name` is
//! the fallback for `title` (a record may carry both), popularity may be a
//! number or a numeric string, and a time of day that doesn't parse is dropped
//! rather than rejecting the record.
//!
//! Only a missing title or an unparsable date makes a record invalid, and
//! invalid records are skipped at load. Every loaded event therefore has a real
//! date, so sorting never needs an epoch placeholder for a missing one.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A directory event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEvent")]
pub struct Event {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Calendar date (YYYY-MM-DD)
    pub date: NaiveDate,

    /// Time of day (HH:MM). `None` means unknown, displayed and sorted as midnight.
    #[serde(serialize_with = "serialize_clock", skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,

    /// Categorical tag, e.g. "market" or "sport"
    #[serde(rename = "type")]
    pub kind: String,

    pub place: String,

    #[serde(serialize_with = "serialize_popularity")]
    pub popularity: f64,
}

/// Record shape as found in the file, before `title`/`name` are reconciled.
#[derive(Deserialize)]
struct RawEvent {
    #[serde(default, deserialize_with = "deserialize_text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    date: NaiveDate,
    #[serde(default, deserialize_with = "deserialize_clock")]
    time: Option<NaiveTime>,
    #[serde(rename = "type", default, deserialize_with = "deserialize_tag")]
    kind: String,
    #[serde(default, deserialize_with = "deserialize_tag")]
    place: String,
    #[serde(default, deserialize_with = "deserialize_popularity")]
    popularity: f64,
}

impl TryFrom<RawEvent> for Event {
    type Error = String;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        let title = raw
            .title
            .filter(|t| !t.trim().is_empty())
            .or(raw.name)
            .ok_or_else(|| "missing field `title` (or `name`)".to_string())?;

        Ok(Event {
            title,
            description: raw.description,
            date: raw.date,
            time: raw.time,
            kind: raw.kind,
            place: raw.place,
            popularity: raw.popularity,
        })
    }
}

impl Event {
    /// Time of day as minutes since midnight.
    pub fn minutes(&self) -> Option<u32> {
        self.time.map(|t| t.hour() * 60 + t.minute())
    }

    /// Combined date and time, with a missing time treated as midnight.
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time.unwrap_or(NaiveTime::MIN))
    }
}

/// Parse an `H:MM` or `HH:MM` time of day. Trailing components such as
/// seconds are ignored.
pub fn parse_clock(s: &str) -> Option<NaiveTime> {
    let mut parts = s.trim().split(':');
    let hour = parts.next()?.trim().parse::<u32>().ok()?;
    let minute = parts.next()?.trim().parse::<u32>().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Minutes since midnight for a clock string, if it parses.
pub fn clock_minutes(s: &str) -> Option<u32> {
    parse_clock(s).map(|t| t.hour() * 60 + t.minute())
}

/// Format a time of day the way records store it.
pub fn format_clock(time: &NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Coerce a raw popularity value. Anything that is not a finite,
/// non-negative number counts as 0.
pub fn coerce_popularity(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match n {
        Some(n) if n.is_finite() && n > 0.0 => n,
        _ => 0.0,
    }
}

fn deserialize_clock<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => parse_clock(&s),
        _ => None,
    })
}

fn serialize_clock<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match time {
        Some(t) => serializer.serialize_str(&format_clock(t)),
        None => serializer.serialize_none(),
    }
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn deserialize_tag<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn deserialize_popularity<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().map(coerce_popularity).unwrap_or(0.0))
}

// Whole numbers go back out as integers so `50` doesn't become `50.0`.
fn serialize_popularity<S>(popularity: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if popularity.fract() == 0.0 && *popularity <= i64::MAX as f64 {
        serializer.serialize_i64(*popularity as i64)
    } else {
        serializer.serialize_f64(*popularity)
    }
}
