//! Durable storage for the verified session token.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

/// Key under which the token is stored.
pub const TOKEN_KEY: &str = "token";

/// Abstraction over the client-side key-value store holding the token.
pub trait TokenStore: Send + Sync {
    /// Persisted token, if any.
    fn load(&self) -> Result<Option<String>>;
    /// Persist `token`, replacing any previous value.
    fn save(&self, token: &str) -> Result<()>;
    /// Forget the persisted token. Succeeds when nothing is stored.
    fn clear(&self) -> Result<()>;
}

/// Token store backed by a small JSON object on disk (`{"token": "..."}`).
///
/// Unrelated keys already present in the file are preserved.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("read token store {}", self.path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("parse token store {}", self.path.display()))
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let mut buf = serde_json::to_string_pretty(entries).context("serialize token store")?;
        buf.push('\n');
        write_atomic(&self.path, &buf)
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        let entries = self.read_entries()?;
        Ok(entries.get(TOKEN_KEY).cloned())
    }

    fn save(&self, token: &str) -> Result<()> {
        debug!(path = %self.path.display(), "persisting session token");
        let mut entries = self.read_entries()?;
        entries.insert(TOKEN_KEY.to_string(), token.to_string());
        self.write_entries(&entries)
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self.read_entries()?;
        if entries.remove(TOKEN_KEY).is_none() {
            return Ok(());
        }
        debug!(path = %self.path.display(), "clearing session token");
        self.write_entries(&entries)
    }
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp token store {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("replace token store {}", path.display()))?;
    Ok(())
}
