//! Bearer-token storage. The token obtained by `login` lives in a single
//! file under the data dir; `logout` removes it. A `PROMPTDECK_TOKEN`
//! environment override takes precedence and is never written back.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join("token"),
        }
    }

    /// The stored token, if any. Unreadable or empty files count as absent.
    pub fn load(&self) -> Option<String> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        let token = raw.trim().to_string();
        if token.is_empty() { None } else { Some(token) }
    }

    pub fn store(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create data dir: {}", parent.display()))?;
        }
        std::fs::write(&self.path, token)
            .with_context(|| format!("failed to write credential file: {}", self.path.display()))
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).with_context(|| {
                format!("failed to remove credential file: {}", self.path.display())
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_none() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        assert!(store.load().is_none());
    }

    #[test]
    fn store_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        store.store("tok-abc").unwrap();
        assert_eq!(store.load().as_deref(), Some("tok-abc"));
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        std::fs::write(dir.path().join("token"), "  tok-abc\n").unwrap();
        assert_eq!(store.load().as_deref(), Some("tok-abc"));
    }

    #[test]
    fn empty_file_counts_as_absent() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        std::fs::write(dir.path().join("token"), "\n").unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn clear_removes_the_file_and_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        store.store("tok").unwrap();
        store.clear().unwrap();
        assert!(store.load().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn store_creates_missing_data_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("deeper");
        let store = CredentialStore::new(&nested);
        store.store("tok").unwrap();
        assert_eq!(store.load().as_deref(), Some("tok"));
    }
}
