//! CLI configuration -- thin wrapper around `mobierp_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--backend, --token, --insecure, --timeout).

use std::time::Duration;

use secrecy::SecretString;

use mobierp_core::{BackendConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use mobierp_config::{
    Config, Profile, config_path, delete_token, load_config_or_default, profile_to_backend_config,
    save_config, store_token,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names for error help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort_unstable();
    names.join(", ")
}

/// Build the `BackendConfig` for this invocation.
///
/// The active profile supplies the baseline; flags and `MOBIERP_*`
/// variables override it. Without a profile, `--backend` alone is enough.
pub fn build_backend_config(global: &GlobalOpts) -> Result<BackendConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut backend = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile_to_backend_config(profile, &profile_name, &cfg.defaults)?,
        None => {
            if global.profile.is_some() {
                return Err(CliError::ProfileNotFound {
                    name: profile_name,
                    available: available_profiles(&cfg),
                });
            }
            let url_str = global.backend.as_deref().ok_or_else(|| CliError::NoConfig {
                path: config_path().display().to_string(),
            })?;
            let mut backend = BackendConfig::new(parse_url(url_str)?);
            backend.timeout = Duration::from_secs(cfg.defaults.timeout);
            backend
        }
    };

    if let Some(ref url_str) = global.backend {
        backend.url = parse_url(url_str)?;
    }
    if let Some(ref token) = global.token {
        backend.token = Some(SecretString::from(token.clone()));
    }
    if global.insecure {
        backend.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        backend.timeout = Duration::from_secs(secs);
    }

    tracing::debug!(
        profile = %profile_name,
        url = %backend.url,
        authenticated = backend.token.is_some(),
        "resolved backend"
    );
    Ok(backend)
}

fn parse_url(url_str: &str) -> Result<url::Url, CliError> {
    url_str.parse().map_err(|_| CliError::Validation {
        field: "backend".into(),
        reason: format!("invalid URL: {url_str}"),
    })
}
