use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};

use file_lock::{FileLock, FileOptions};

use crate::{Result, Session};

/// File-backed session store
///
/// Reads tolerate a missing or corrupt file (the session starts fresh, with
/// a diagnostic); writes are read-modify-write merges under an exclusive
/// lock, so two invocations racing on the same file cannot drop each other's
/// fields.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current session
    ///
    /// A missing file is an empty session, not an error: first invocations
    /// start with nothing persisted.
    #[must_use]
    pub fn load(&self) -> Session {
        if !self.path.exists() {
            tracing::warn!(path = %self.path.display(), "session file does not exist, starting fresh");
            return Session::default();
        }

        match std::fs::read_to_string(&self.path) {
            Ok(contents) => parse_or_fresh(&self.path, &contents),
            Err(err) => {
                tracing::error!(path = %self.path.display(), %err, "error reading session file, starting fresh");
                Session::default()
            }
        }
    }

    /// Merge `patch` into the stored session and return the merged result
    ///
    /// The read, merge, and write happen under an exclusive file lock.
    pub fn merge(&self, patch: Session) -> Result<Session> {
        let options = FileOptions::new().read(true).write(true).create(true);
        let path = self.path.to_string_lossy();
        let mut lock = FileLock::lock(&*path, true, options)?;

        let mut contents = String::new();
        lock.file.read_to_string(&mut contents)?;

        let mut session = if contents.trim().is_empty() {
            Session::default()
        } else {
            parse_or_fresh(&self.path, &contents)
        };
        session.merge(patch);

        let serialized = serde_json::to_string_pretty(&session)?;
        lock.file.set_len(0)?;
        lock.file.rewind()?;
        lock.file.write_all(serialized.as_bytes())?;

        Ok(session)
    }
}

fn parse_or_fresh(path: &Path, contents: &str) -> Session {
    match serde_json::from_str(contents) {
        Ok(session) => session,
        Err(err) => {
            tracing::error!(path = %path.display(), %err, "error parsing session file, starting fresh");
            Session::default()
        }
    }
}

#[cfg(test)]
mod test {
    use primitives::{Address, Element};
    use tempdir::TempDir;

    use super::*;

    fn store_in(dir: &TempDir) -> SessionStore {
        SessionStore::new(dir.path().join("session.json"))
    }

    #[test]
    fn missing_file_is_an_empty_session() {
        let dir = TempDir::new("session").unwrap();
        assert_eq!(store_in(&dir).load(), Session::default());
    }

    #[test]
    fn merge_creates_and_round_trips() {
        let dir = TempDir::new("session").unwrap();
        let store = store_in(&dir);

        let merged = store
            .merge(Session {
                donor_secret_key: Some(Element::new(7)),
                ..Session::default()
            })
            .unwrap();

        assert_eq!(merged.donor_secret_key, Some(Element::new(7)));
        assert_eq!(store.load(), merged);
    }

    #[test]
    fn merge_preserves_fields_absent_from_the_patch() {
        let dir = TempDir::new("session").unwrap();
        let store = store_in(&dir);

        store
            .merge(Session {
                donor_secret_key: Some(Element::new(1)),
                donor_salt: Some(Element::new(2)),
                ..Session::default()
            })
            .unwrap();

        store
            .merge(Session {
                token_address: Some(Address::new(Element::new(3))),
                ..Session::default()
            })
            .unwrap();

        let session = store.load();
        assert_eq!(session.donor_secret_key, Some(Element::new(1)));
        assert_eq!(session.donor_salt, Some(Element::new(2)));
        assert_eq!(session.token_address, Some(Address::new(Element::new(3))));
    }

    #[test]
    fn corrupt_file_starts_fresh() {
        let dir = TempDir::new("session").unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "not json {").unwrap();

        assert_eq!(store.load(), Session::default());

        // a merge over a corrupt file must still succeed
        let merged = store
            .merge(Session {
                donor_salt: Some(Element::new(4)),
                ..Session::default()
            })
            .unwrap();
        assert_eq!(merged.donor_salt, Some(Element::new(4)));
    }
}
