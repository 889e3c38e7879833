//! Record identity: timestamp-derived numeric ids

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of a stored record
///
/// Seeded records use small ids (`1`, `2`, ...); records created at runtime
/// get the wall-clock millisecond timestamp of their creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Parse an id, accepting an optional leading `#`
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        s.parse()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.is_empty() {
            return Err(IdParseError::Empty);
        }
        digits
            .parse::<u64>()
            .map(RecordId)
            .map_err(|_| IdParseError::NotNumeric(s.to_string()))
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Errors that can occur when parsing record ids
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdParseError {
    #[error("record id is empty")]
    Empty,

    #[error("invalid record id '{0}' (expected a number such as 3 or #3)")]
    NotNumeric(String),
}

/// Issues record ids from the current timestamp
///
/// Two creations inside the same millisecond would collide, so every issued id
/// is at least one greater than the previous one.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the floor so future ids are above `id`
    pub fn observe(&mut self, id: RecordId) {
        self.last = self.last.max(id.0);
    }

    /// Issue the next id, using the wall clock as the candidate
    pub fn next(&mut self) -> RecordId {
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        self.next_from(now)
    }

    /// Issue the next id from an explicit timestamp candidate
    pub fn next_from(&mut self, candidate: u64) -> RecordId {
        let id = candidate.max(self.last.saturating_add(1));
        self.last = id;
        RecordId(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_parsing() {
        assert_eq!(RecordId::parse("42").unwrap(), RecordId::new(42));
        assert_eq!(RecordId::parse("#7").unwrap(), RecordId::new(7));
        assert_eq!(RecordId::parse(" 3 ").unwrap(), RecordId::new(3));
    }

    #[test]
    fn test_record_id_invalid() {
        assert_eq!(RecordId::parse("").unwrap_err(), IdParseError::Empty);
        assert!(matches!(
            RecordId::parse("abc").unwrap_err(),
            IdParseError::NotNumeric(_)
        ));
    }

    #[test]
    fn test_record_id_serializes_as_number() {
        let json = serde_json::to_string(&RecordId::new(9)).unwrap();
        assert_eq!(json, "9");
    }

    #[test]
    fn test_generator_never_repeats_within_same_millisecond() {
        let mut ids = IdGenerator::new();
        let a = ids.next_from(1_700_000_000_000);
        let b = ids.next_from(1_700_000_000_000);
        let c = ids.next_from(1_699_999_999_999);
        assert!(a < b && b < c);
    }

    #[test]
    fn test_generator_respects_observed_ids() {
        let mut ids = IdGenerator::new();
        ids.observe(RecordId::new(500));
        assert_eq!(ids.next_from(10), RecordId::new(501));
    }

    #[test]
    fn test_generator_uses_clock() {
        let mut ids = IdGenerator::new();
        let id = ids.next();
        assert!(id.value() > 1_600_000_000_000);
    }
}
