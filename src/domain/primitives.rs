//! Domain primitives: TimeMs, TodoId.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::num::ParseIntError;
use std::str::FromStr;

/// Time in milliseconds since Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeMs(pub i64);

impl TimeMs {
    /// Create a TimeMs from milliseconds.
    pub fn new(ms: i64) -> Self {
        TimeMs(ms)
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        TimeMs(Utc::now().timestamp_millis())
    }

    /// Get the underlying milliseconds value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Convert to a UTC datetime, if the value is in chrono's range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

/// Store-assigned todo identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub i64);

impl TodoId {
    pub fn new(id: i64) -> Self {
        TodoId(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TodoId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(TodoId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timems_ordering() {
        let t1 = TimeMs::new(1000);
        let t2 = TimeMs::new(2000);
        assert!(t1 < t2);
    }

    #[test]
    fn test_timems_serializes_as_integer() {
        let json = serde_json::to_string(&TimeMs::new(1_700_000_000_000)).unwrap();
        assert_eq!(json, "1700000000000");
    }

    #[test]
    fn test_timems_to_datetime() {
        let dt = TimeMs::new(0).to_datetime().unwrap();
        assert_eq!(dt.timestamp(), 0);
    }

    #[test]
    fn test_todo_id_parse() {
        assert_eq!(" 42 ".parse::<TodoId>().unwrap(), TodoId::new(42));
        assert!("abc".parse::<TodoId>().is_err());
        assert!("".parse::<TodoId>().is_err());
    }

    #[test]
    fn test_todo_id_display() {
        assert_eq!(TodoId::new(7).to_string(), "7");
    }
}
