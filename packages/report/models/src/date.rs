//! Report timestamps as they arrive from the document store.
//!
//! Documents written by different clients carry the report date in
//! different shapes. [`ReportDate`] captures every shape the store is known
//! to return and normalizes them all to epoch milliseconds through
//! [`ReportDate::to_millis`].

use chrono::{DateTime, TimeZone as _, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// A report date in any of the shapes the document store returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportDate {
    /// Database-native timestamp (`{"_seconds": .., "_nanoseconds": ..}`).
    Timestamp {
        /// Whole seconds since the Unix epoch.
        seconds: i64,
        /// Sub-second nanoseconds.
        nanoseconds: u32,
    },
    /// Plain object exposing only a `seconds` field.
    Seconds {
        /// Whole seconds since the Unix epoch.
        seconds: i64,
    },
    /// Convertible wrapper (`{"$date": ..}`) holding an RFC 3339 string or
    /// epoch milliseconds.
    Wrapped {
        /// The unwrapped date.
        date: DateTime<Utc>,
    },
    /// Native date serialized as an RFC 3339 string.
    DateTime(DateTime<Utc>),
    /// Raw epoch milliseconds.
    EpochMillis(i64),
    /// Any other shape. Normalizes to the epoch.
    Unrecognized(Value),
}

impl Default for ReportDate {
    fn default() -> Self {
        Self::Unrecognized(Value::Null)
    }
}

impl ReportDate {
    /// Current wall-clock time as a database-native timestamp.
    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Converts a UTC datetime into a database-native timestamp.
    #[must_use]
    pub fn from_datetime(date: DateTime<Utc>) -> Self {
        Self::Timestamp {
            seconds: date.timestamp(),
            nanoseconds: date.timestamp_subsec_nanos(),
        }
    }

    /// Classifies an arbitrary JSON value.
    ///
    /// Objects are checked for `_seconds`, then `seconds`, then `$date`;
    /// strings must be RFC 3339; numbers are epoch milliseconds.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match &value {
            Value::Object(map) => {
                if let Some(seconds) = map.get("_seconds").and_then(as_integer) {
                    let nanoseconds = map
                        .get("_nanoseconds")
                        .and_then(Value::as_u64)
                        .and_then(|n| u32::try_from(n).ok())
                        .unwrap_or(0);
                    return Self::Timestamp {
                        seconds,
                        nanoseconds,
                    };
                }
                if let Some(seconds) = map.get("seconds").and_then(as_integer) {
                    return Self::Seconds { seconds };
                }
                if let Some(date) = map.get("$date").and_then(parse_wrapped) {
                    return Self::Wrapped { date };
                }
                Self::Unrecognized(value.clone())
            }
            Value::String(s) => DateTime::parse_from_rfc3339(s).map_or_else(
                |_| Self::Unrecognized(value.clone()),
                |date| Self::DateTime(date.with_timezone(&Utc)),
            ),
            Value::Number(_) => as_integer(&value)
                .map_or_else(|| Self::Unrecognized(value.clone()), Self::EpochMillis),
            Value::Null | Value::Bool(_) | Value::Array(_) => Self::Unrecognized(value.clone()),
        }
    }

    /// Milliseconds since the Unix epoch; `0` for unrecognized shapes.
    #[must_use]
    pub fn to_millis(&self) -> i64 {
        match self {
            Self::Timestamp {
                seconds,
                nanoseconds,
            } => seconds
                .saturating_mul(1000)
                .saturating_add(i64::from(*nanoseconds / 1_000_000)),
            Self::Seconds { seconds } => seconds.saturating_mul(1000),
            Self::Wrapped { date } | Self::DateTime(date) => date.timestamp_millis(),
            Self::EpochMillis(millis) => *millis,
            Self::Unrecognized(_) => 0,
        }
    }

    /// Whether this date came from a known shape.
    #[must_use]
    pub const fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }

    /// Whether the date was absent from the source document.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Unrecognized(Value::Null))
    }

    fn to_value(&self) -> Value {
        match self {
            Self::Timestamp {
                seconds,
                nanoseconds,
            } => {
                let mut map = Map::new();
                map.insert("_seconds".to_string(), Value::from(*seconds));
                map.insert("_nanoseconds".to_string(), Value::from(*nanoseconds));
                Value::Object(map)
            }
            Self::Seconds { seconds } => {
                let mut map = Map::new();
                map.insert("seconds".to_string(), Value::from(*seconds));
                Value::Object(map)
            }
            Self::Wrapped { date } => {
                let mut map = Map::new();
                map.insert("$date".to_string(), Value::String(date.to_rfc3339()));
                Value::Object(map)
            }
            Self::DateTime(date) => Value::String(date.to_rfc3339()),
            Self::EpochMillis(millis) => Value::from(*millis),
            Self::Unrecognized(value) => value.clone(),
        }
    }
}

impl From<DateTime<Utc>> for ReportDate {
    fn from(date: DateTime<Utc>) -> Self {
        Self::DateTime(date)
    }
}

impl Serialize for ReportDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ReportDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_value(Value::deserialize(deserializer)?))
    }
}

#[allow(clippy::cast_possible_truncation)]
fn as_integer(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
}

fn parse_wrapped(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|d| d.with_timezone(&Utc)),
        Value::Number(_) => as_integer(value).and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}
