//! Bearer-token persistence.
//!
//! The stored session is read from disk once when the store is constructed
//! and written through on every mutation, so token handling stays an explicit
//! side-effecting boundary rather than ambient global state.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Session {
    pub token: Option<String>,
    pub email: Option<String>,
}

pub struct SessionStore {
    path: PathBuf,
    data: Mutex<Session>,
}

impl SessionStore {
    /// Load from the default location (`~/.config/ticket-scout/session.json`)
    pub fn load() -> Self {
        Self::with_path(default_path())
    }

    pub fn with_path(path: PathBuf) -> Self {
        let data = read_session(&path).unwrap_or_default();
        Self {
            path,
            data: Mutex::new(data),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.data.lock().expect("session mutex poisoned").token.clone()
    }

    pub fn email(&self) -> Option<String> {
        self.data.lock().expect("session mutex poisoned").email.clone()
    }

    pub fn login(&self, token: String, email: String) -> Result<()> {
        self.update(|session| {
            session.token = Some(token);
            session.email = Some(email);
        })
    }

    pub fn logout(&self) -> Result<()> {
        self.update(|session| {
            session.token = None;
            session.email = None;
        })
    }

    fn update<F>(&self, transform: F) -> Result<()>
    where
        F: FnOnce(&mut Session),
    {
        let mut guard = self.data.lock().expect("session mutex poisoned");
        transform(&mut guard);
        write_session(&self.path, &guard)
    }
}

fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ticket-scout")
        .join("session.json")
}

fn read_session(path: &PathBuf) -> Result<Session> {
    if !path.exists() {
        return Ok(Session::default());
    }
    let contents = fs::read_to_string(path).context("Failed to read session file")?;
    serde_json::from_str(&contents).context("Failed to parse session file")
}

fn write_session(path: &PathBuf, session: &Session) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create session directory")?;
    }
    let contents = serde_json::to_string_pretty(session)?;
    fs::write(path, contents).context("Failed to write session file")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_session_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("ticket-scout-test-{}-{}", std::process::id(), name))
    }

    #[test]
    fn login_persists_and_reloads() {
        let path = temp_session_path("login/session.json");
        let _ = fs::remove_file(&path);

        let store = SessionStore::with_path(path.clone());
        assert!(store.token().is_none());

        store
            .login("tok-123".to_string(), "fan@example.com".to_string())
            .unwrap();
        assert_eq!(store.token().as_deref(), Some("tok-123"));

        // A fresh store sees the written file
        let reloaded = SessionStore::with_path(path.clone());
        assert_eq!(reloaded.token().as_deref(), Some("tok-123"));
        assert_eq!(reloaded.email().as_deref(), Some("fan@example.com"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn logout_clears_token() {
        let path = temp_session_path("logout/session.json");
        let _ = fs::remove_file(&path);

        let store = SessionStore::with_path(path.clone());
        store
            .login("tok-123".to_string(), "fan@example.com".to_string())
            .unwrap();
        store.logout().unwrap();
        assert!(store.token().is_none());

        let reloaded = SessionStore::with_path(path.clone());
        assert!(reloaded.token().is_none());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn corrupt_session_file_falls_back_to_empty() {
        let path = temp_session_path("corrupt/session.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        let store = SessionStore::with_path(path.clone());
        assert!(store.token().is_none());

        let _ = fs::remove_file(&path);
    }
}
