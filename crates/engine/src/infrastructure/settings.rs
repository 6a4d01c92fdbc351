//! Bot settings loaded from `FATEBOT_*` environment variables.
//!
//! `main` loads `.env.local` / `.env` from the repo root first, so every
//! variable can live in a dotenv file during development.

use std::net::SocketAddr;
use std::time::Duration;

use sha2::{Digest, Sha256};

use crate::infrastructure::backend::{DEFAULT_BACKEND_TIMEOUT, DEFAULT_BACKEND_URL};

pub const DEFAULT_BIND: &str = "0.0.0.0:3100";
pub const DEFAULT_ADMIN_ROLE: &str = "bot_admins";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{key} has invalid value `{value}`: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotSettings {
    pub backend_url: String,
    pub backend_timeout: Duration,
    pub bind: SocketAddr,
    /// Role allowed to run operator commands such as `stop`
    pub admin_role: String,
    /// Where this process runs; shown by `version`
    pub host_label: String,
    /// Build revision, when the deploy pipeline provides one
    pub revision: Option<String>,
}

impl BotSettings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let backend_url = var("FATEBOT_BACKEND_URL").unwrap_or_else(|| DEFAULT_BACKEND_URL.into());

        let backend_timeout = match var("FATEBOT_BACKEND_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|e: std::num::ParseIntError| {
                    SettingsError::InvalidValue {
                        key: "FATEBOT_BACKEND_TIMEOUT_SECS",
                        value: raw.clone(),
                        reason: e.to_string(),
                    }
                })?;
                Duration::from_secs(secs.max(1))
            }
            None => DEFAULT_BACKEND_TIMEOUT,
        };

        let bind_raw = var("FATEBOT_BIND").unwrap_or_else(|| DEFAULT_BIND.into());
        let bind = bind_raw
            .parse()
            .map_err(|e: std::net::AddrParseError| SettingsError::InvalidValue {
                key: "FATEBOT_BIND",
                value: bind_raw.clone(),
                reason: e.to_string(),
            })?;

        let admin_role = var("FATEBOT_ADMIN_ROLE").unwrap_or_else(|| DEFAULT_ADMIN_ROLE.into());
        let host_label = var("FATEBOT_HOST_LABEL")
            .or_else(|| var("HOSTNAME"))
            .unwrap_or_else(|| "unknown".into());
        let revision = var("FATEBOT_REVISION");

        Ok(Self {
            backend_url,
            backend_timeout,
            bind,
            admin_role,
            host_label,
            revision,
        })
    }

    /// Short sha256 of the settings that change behavior. Two processes with
    /// the same fingerprint talk to the same backend with the same policy.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.backend_url.as_bytes());
        hasher.update(b"\n");
        hasher.update(self.backend_timeout.as_secs().to_string().as_bytes());
        hasher.update(b"\n");
        hasher.update(self.bind.to_string().as_bytes());
        hasher.update(b"\n");
        hasher.update(self.admin_role.as_bytes());
        let digest = hex::encode(hasher.finalize());
        digest[..12].to_string()
    }
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.into(),
            backend_timeout: DEFAULT_BACKEND_TIMEOUT,
            bind: SocketAddr::from(([0, 0, 0, 0], 3100)),
            admin_role: DEFAULT_ADMIN_ROLE.into(),
            host_label: "unknown".into(),
            revision: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = BotSettings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, BotSettings::default());
    }

    #[test]
    fn test_overrides() {
        let settings = BotSettings::from_lookup(lookup(&[
            ("FATEBOT_BACKEND_URL", "http://game:9000"),
            ("FATEBOT_BACKEND_TIMEOUT_SECS", "3"),
            ("FATEBOT_BIND", "127.0.0.1:4000"),
            ("FATEBOT_ADMIN_ROLE", "gm"),
            ("HOSTNAME", "box-1"),
            ("FATEBOT_REVISION", "abc123"),
        ]))
        .unwrap();
        assert_eq!(settings.backend_url, "http://game:9000");
        assert_eq!(settings.backend_timeout, Duration::from_secs(3));
        assert_eq!(settings.bind.port(), 4000);
        assert_eq!(settings.admin_role, "gm");
        assert_eq!(settings.host_label, "box-1");
        assert_eq!(settings.revision.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_host_label_prefers_explicit_value() {
        let settings = BotSettings::from_lookup(lookup(&[
            ("FATEBOT_HOST_LABEL", "prod"),
            ("HOSTNAME", "box-1"),
        ]))
        .unwrap();
        assert_eq!(settings.host_label, "prod");
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let error =
            BotSettings::from_lookup(lookup(&[("FATEBOT_BACKEND_TIMEOUT_SECS", "soon")]))
                .unwrap_err();
        assert!(matches!(
            error,
            SettingsError::InvalidValue { key: "FATEBOT_BACKEND_TIMEOUT_SECS", .. }
        ));
    }

    #[test]
    fn test_fingerprint_tracks_behavioral_settings() {
        let a = BotSettings::default();
        let mut b = BotSettings::default();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 12);

        b.host_label = "elsewhere".into();
        assert_eq!(a.fingerprint(), b.fingerprint());

        b.admin_role = "gm".into();
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
