//! Session handling.
//!
//! The identity provider itself is out of scope; a session is an opaque
//! bearer token plus the user key (email) the backend keys interactions by.
//! `artify login` writes the session file, `artify logout` removes it, and
//! everything else receives the session by injection rather than reading
//! ambient global state.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::app::{ArtifyError, Result};

/// An authenticated user's identity, as far as this client cares.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The key the backend identifies the user by (their email address).
    pub user_key: String,
    /// Bearer credential attached to every request.
    pub token: String,
}

impl Session {
    /// Load the stored session, if any. A missing file means "not signed in",
    /// not an error.
    pub fn load() -> Result<Option<Self>> {
        Self::load_from(&Self::session_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::session_path()?)
    }

    /// Remove the stored session. Idempotent.
    pub fn clear() -> Result<()> {
        Self::clear_at(&Self::session_path()?)
    }

    fn load_from(path: &PathBuf) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        let session = toml::from_str(&content).map_err(|e| {
            ArtifyError::Config(format!("invalid session file {}: {}", path.display(), e))
        })?;
        Ok(Some(session))
    }

    fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ArtifyError::Config(format!("could not serialize session: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    fn clear_at(path: &PathBuf) -> Result<()> {
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn session_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ArtifyError::Config("Could not determine config directory".into()))?;
        Ok(config_dir.join("artify").join("session.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_round_trips_through_toml() {
        let session = Session {
            user_key: "ada@example.com".into(),
            token: "abc.def.ghi".into(),
        };
        let content = toml::to_string_pretty(&session).unwrap();
        let parsed: Session = toml::from_str(&content).unwrap();
        assert_eq!(parsed.user_key, session.user_key);
        assert_eq!(parsed.token, session.token);
    }

    #[test]
    fn test_save_load_clear_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artify").join("session.toml");

        assert!(Session::load_from(&path).unwrap().is_none());

        let session = Session {
            user_key: "ada@example.com".into(),
            token: "tok".into(),
        };
        session.save_to(&path).unwrap();

        let loaded = Session::load_from(&path).unwrap().unwrap();
        assert_eq!(loaded.user_key, "ada@example.com");

        Session::clear_at(&path).unwrap();
        assert!(Session::load_from(&path).unwrap().is_none());
        // Clearing twice is fine.
        Session::clear_at(&path).unwrap();
    }

    #[test]
    fn test_invalid_session_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        fs::write(&path, "not [valid toml").unwrap();

        assert!(Session::load_from(&path).is_err());
    }
}
