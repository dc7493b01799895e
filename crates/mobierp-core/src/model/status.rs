// ── Document status ──
//
// Lifecycle stage shared by transactional documents (receipts, deliveries,
// warranty claims, production and material requests). Unknown values from
// the backend are kept verbatim in `Other` instead of failing to decode.
// A missing or null status is `Other("")`, which no status rule accepts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum DocumentStatus {
    Draft,
    Pending,
    Approved,
    InProgress,
    Completed,
    Cancelled,
    Other(String),
}

impl DocumentStatus {
    /// Wire value, also used as the facet value for filtering.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Other(s) => s,
        }
    }

    /// The status the backend did not report.
    pub fn unknown() -> Self {
        Self::Other(String::new())
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Other(s) if s.is_empty())
    }

    /// Statuses the backend documents, in lifecycle order.
    pub const KNOWN: [DocumentStatus; 6] = [
        Self::Draft,
        Self::Pending,
        Self::Approved,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];
}

impl Default for DocumentStatus {
    fn default() -> Self {
        Self::unknown()
    }
}

impl<'de> Deserialize<'de> for DocumentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.map_or_else(Self::unknown, Self::from))
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "draft" => Self::Draft,
            "pending" => Self::Pending,
            "approved" => Self::Approved,
            "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            other => Self::Other(other.to_owned()),
        })
    }
}

impl From<String> for DocumentStatus {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

impl From<DocumentStatus> for String {
    fn from(status: DocumentStatus) -> Self {
        status.as_str().to_owned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn known_values_round_trip_through_serde() {
        for status in DocumentStatus::KNOWN {
            let json = serde_json::to_string(&status).unwrap();
            let back: DocumentStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn unknown_values_are_preserved() {
        let status: DocumentStatus = serde_json::from_str(r#""on_hold""#).unwrap();
        assert_eq!(status, DocumentStatus::Other("on_hold".into()));
        assert_eq!(status.as_str(), "on_hold");
    }

    #[test]
    fn null_and_missing_status_are_unknown() {
        let status: DocumentStatus = serde_json::from_str("null").unwrap();
        assert!(status.is_unknown());
        assert!(DocumentStatus::default().is_unknown());
        assert_ne!(DocumentStatus::default(), DocumentStatus::Draft);
    }
}
