// ── Runtime backend configuration ──
//
// Describes *how* to reach the ERP backend: base URL, bearer token, TLS
// and timeout. Carries credential data but never touches disk. The CLI
// (or any other front-end) builds a `BackendConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use mobierp_api::transport::{TlsMode, TransportConfig};
use mobierp_api::ApiClient;

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed staging backends).
    DangerAcceptInvalid,
}

/// Configuration for one backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Backend root URL (e.g., `https://erp.example.com`).
    pub url: Url,
    /// Bearer token, if the backend requires one.
    pub token: Option<SecretString>,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
}

impl BackendConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            token: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Build the transport settings for this backend.
    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
            auth_token: self.token.clone(),
        }
    }

    /// Build the shared API client. Screens receive it through a
    /// [`ScreenContext`](crate::ScreenContext), never as a global.
    pub fn connect(&self) -> Result<ApiClient, CoreError> {
        Ok(ApiClient::new(self.url.clone(), &self.transport())?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn transport_mirrors_settings() {
        let mut config = BackendConfig::new("https://erp.example.com".parse().unwrap());
        config.tls = TlsVerification::DangerAcceptInvalid;
        config.timeout = Duration::from_secs(5);

        let transport = config.transport();
        assert!(matches!(transport.tls, TlsMode::DangerAcceptInvalid));
        assert_eq!(transport.timeout, Duration::from_secs(5));
        assert!(transport.auth_token.is_none());
    }
}
