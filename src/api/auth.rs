//! Stored bearer token for the CandiDash API.
//!
//! `candidash login` writes the token here; the TUI and the other
//! subcommands read it back. One JSON file under the data directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// On-disk home of the [`AuthToken`].
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// `data_dir` is the app data directory; the token lives in
    /// `token.json` inside it.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("token.json"),
        }
    }

    /// Read the stored token, if any. A missing file means "not logged
    /// in", not an error; an unreadable file propagates.
    pub fn load(&self) -> Result<Option<AuthToken>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read token file {}", self.path.display()))?;
        let token: AuthToken =
            serde_json::from_str(&contents).context("Failed to parse token file")?;
        Ok(Some(token))
    }

    pub fn save(&self, token: &AuthToken) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create data directory")?;
        }
        let contents = serde_json::to_string_pretty(token)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write token file {}", self.path.display()))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).context("Failed to remove token file")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_token_is_none() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::new(dir.path());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::new(dir.path());

        store
            .save(&AuthToken {
                access_token: "abc123".to_string(),
                token_type: "bearer".to_string(),
            })
            .unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.access_token, "abc123");
        assert_eq!(loaded.token_type, "bearer");
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::new(dir.path());

        store
            .save(&AuthToken {
                access_token: "abc".to_string(),
                token_type: "bearer".to_string(),
            })
            .unwrap();

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_token_type_defaults_to_bearer() {
        let token: AuthToken = serde_json::from_str(r#"{"access_token": "xyz"}"#).unwrap();
        assert_eq!(token.token_type, "bearer");
    }
}
