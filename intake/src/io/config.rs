//! Startup configuration stored in `intake.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable overriding [`IntakeConfig::client_id`].
pub const CLIENT_ID_ENV: &str = "INTAKE_CLIENT_ID";
/// Environment variable overriding [`IntakeConfig::api_base`].
pub const API_URL_ENV: &str = "INTAKE_API_URL";

/// Intake configuration (TOML).
///
/// Read once at startup. Missing fields default to local development values;
/// the two externally supplied values may also come from the environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IntakeConfig {
    /// OAuth client identifier handed to the identity provider.
    pub client_id: String,

    /// Base URL of the verification backend (`{api_base}/verify`).
    pub api_base: String,

    /// Per-request timeout for the verification call, in seconds.
    pub request_timeout_secs: u64,

    /// File holding the persisted session token.
    pub token_path: PathBuf,

    /// Directory receiving submitted answer records.
    pub outbox_dir: PathBuf,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            api_base: "http://127.0.0.1:8080".to_string(),
            request_timeout_secs: 30,
            token_path: PathBuf::from(".intake/token.json"),
            outbox_dir: PathBuf::from(".intake/outbox"),
        }
    }
}

impl IntakeConfig {
    pub fn validate(&self) -> Result<()> {
        let api_base = self.api_base.trim();
        if api_base.is_empty() {
            return Err(anyhow!("api_base must be set"));
        }
        if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
            return Err(anyhow!("api_base must be an http(s) URL, got {api_base}"));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("request_timeout_secs must be > 0"));
        }
        if self.token_path.as_os_str().is_empty() {
            return Err(anyhow!("token_path must be set"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Full URL of the verification endpoint.
    pub fn verify_url(&self) -> String {
        format!("{}/verify", self.api_base.trim().trim_end_matches('/'))
    }

    /// Apply overrides from an environment lookup (empty values are ignored).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(client_id) = lookup(CLIENT_ID_ENV).filter(|v| !v.trim().is_empty()) {
            self.client_id = client_id;
        }
        if let Some(api_base) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_base = api_base;
        }
    }
}

/// Load config from a TOML file, then apply environment overrides.
///
/// If the file is missing, starts from `IntakeConfig::default()`.
pub fn load_config(path: &Path) -> Result<IntakeConfig> {
    let mut cfg = if path.exists() {
        let contents =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?
    } else {
        debug!(path = %path.display(), "config file missing, using defaults");
        IntakeConfig::default()
    };
    cfg.apply_env(|key| std::env::var(key).ok());
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        IntakeConfig::default().validate().expect("valid");
    }

    #[test]
    fn parses_partial_file_with_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("intake.toml");
        fs::write(&path, "api_base = \"https://api.example.test/\"\n").expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.verify_url(), "https://api.example.test/verify");
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = IntakeConfig::default();
        cfg.apply_env(|key| match key {
            CLIENT_ID_ENV => Some("client-123".to_string()),
            API_URL_ENV => Some("https://env.example.test".to_string()),
            _ => None,
        });
        assert_eq!(cfg.client_id, "client-123");
        assert_eq!(cfg.api_base, "https://env.example.test");
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut cfg = IntakeConfig::default();
        cfg.apply_env(|_| Some("  ".to_string()));
        assert_eq!(cfg, IntakeConfig::default());
    }

    #[test]
    fn rejects_relative_api_base() {
        let cfg = IntakeConfig {
            api_base: "/api".to_string(),
            ..IntakeConfig::default()
        };
        let err = cfg.validate().expect_err("invalid");
        assert!(err.to_string().contains("http(s)"));
    }
}
