// ── Record identity ──
//
// The backend assigns every identifier. Most resources use integer keys,
// a few use strings (UUIDs, slugs); `EntityId` accepts either.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical identifier for any backend record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl EntityId {
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::Number(0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        s.parse::<i64>()
            .map_or_else(|_| Self::Text(s.to_owned()), Self::Number)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        match s.parse::<i64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(s),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn numeric_strings_become_numbers() {
        assert_eq!(EntityId::from("42"), EntityId::Number(42));
        assert_eq!("abc-1".parse::<EntityId>().unwrap(), EntityId::Text("abc-1".into()));
    }

    #[test]
    fn deserializes_both_shapes() {
        let n: EntityId = serde_json::from_str("5").unwrap();
        let s: EntityId = serde_json::from_str(r#""c0ffee""#).unwrap();
        assert_eq!(n, EntityId::Number(5));
        assert_eq!(s.to_string(), "c0ffee");
    }
}
