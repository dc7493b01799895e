// ── Core error types ──
//
// User-facing errors from mobierp-core. Screens never see HTTP plumbing
// directly: the `From<mobierp_api::Error>` impl translates transport-layer
// errors into domain-appropriate variants, and `notice()` turns any of
// them into the title + message pair shown to the user.

use thiserror::Error;

use crate::notify::Notice;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Backend request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Unexpected {entity_type} payload: {message}")]
    Decode {
        entity_type: String,
        message: String,
    },

    // ── Local precondition errors ────────────────────────────────────
    /// An action was attempted against a record whose status forbids it.
    /// Raised before any network call is issued.
    #[error("Cannot {action} while status is '{status}' (allowed: {allowed})")]
    Precondition {
        action: String,
        status: String,
        allowed: String,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Backend errors (wrapped, not exposed raw) ────────────────────
    #[error("Backend error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// `true` for failures detected locally before any request was sent.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::Precondition { .. } | Self::ValidationFailed { .. }
        )
    }

    /// The user-visible notification for this failure.
    ///
    /// Backend and precondition failures share one presentation: a title
    /// chosen by the screen plus the error text as the message.
    pub fn notice(&self, title: impl Into<String>) -> Notice {
        Notice::error(title, self.to_string())
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<mobierp_api::Error> for CoreError {
    fn from(err: mobierp_api::Error) -> Self {
        match err {
            mobierp_api::Error::Unauthorized => CoreError::AuthenticationFailed {
                message: "the access token is missing, invalid or expired".into(),
            },
            mobierp_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            mobierp_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            mobierp_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            mobierp_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            mobierp_api::Error::NotFound { path } => CoreError::NotFound {
                entity_type: "record".into(),
                identifier: path,
            },
            mobierp_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            mobierp_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NoticeLevel;

    #[test]
    fn api_errors_keep_status() {
        let err = CoreError::from(mobierp_api::Error::Api {
            status: 500,
            message: "boom".into(),
        });
        assert!(matches!(err, CoreError::Api { status: Some(500), .. }));
        assert!(!err.is_precondition());
    }

    #[test]
    fn unauthorized_maps_to_auth_failure() {
        let err = CoreError::from(mobierp_api::Error::Unauthorized);
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    }

    #[test]
    fn precondition_notice_carries_reason() {
        let err = CoreError::Precondition {
            action: "edit".into(),
            status: "completed".into(),
            allowed: "draft".into(),
        };
        let notice = err.notice("Not allowed");
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.title, "Not allowed");
        assert!(notice.message.contains("completed"));
        assert!(err.is_precondition());
    }
}
