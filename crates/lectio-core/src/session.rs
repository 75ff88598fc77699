//! Identity and session state.
//!
//! The core never talks to a real auth provider; it consumes an
//! [`Identity`] collaborator. The CLI uses [`LocalSession`], a small
//! file-backed identity that survives between invocations. Credentials are
//! never persisted — only the id and display name of the signed-in user.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// The signed-in user, as exposed by the identity collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub display_name: String,
}

/// Read-side identity collaborator.
pub trait Identity {
    fn current_user(&self) -> Option<User>;
}

/// Process-wide auth-change listener.
pub type AuthListener = Box<dyn Fn(Option<&User>) + Send + Sync>;

static AUTH_WATCH: OnceLock<AuthListener> = OnceLock::new();

/// Install the process-wide auth listener.
///
/// One-time initialization: the first call installs the listener and
/// returns `true`; every later call leaves the installed listener in place
/// and returns `false`. Callers may therefore invoke this from any entry
/// point without guarding it themselves.
pub fn init_auth_watch(listener: AuthListener) -> bool {
    AUTH_WATCH.set(listener).is_ok()
}

/// Notify the installed listener, if any, of a session change.
pub fn notify_auth_change(user: Option<&User>) {
    if let Some(listener) = AUTH_WATCH.get() {
        listener(user);
    }
}

/// File-backed identity used by the CLI.
#[derive(Debug, Clone)]
pub struct LocalSession {
    path: PathBuf,
}

impl LocalSession {
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sign in under a display name.
    ///
    /// The user id derives from the display name, so signing in again with
    /// the same name resumes the same progress record.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file cannot be written.
    pub fn sign_in(&self, display_name: &str) -> Result<User> {
        let digest = blake3::hash(display_name.trim().as_bytes());
        let user = User {
            id: format!("u-{}", &digest.to_hex()[..12]),
            display_name: display_name.trim().to_string(),
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create session directory {}", parent.display()))?;
        }
        let body = serde_json::to_string_pretty(&user).context("serialize session")?;
        std::fs::write(&self.path, body)
            .with_context(|| format!("write session file {}", self.path.display()))?;

        notify_auth_change(Some(&user));
        Ok(user)
    }

    /// Sign out. Removing an absent session is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file exists but cannot be removed.
    pub fn sign_out(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("remove session file {}", self.path.display()));
            }
        }
        notify_auth_change(None);
        Ok(())
    }
}

impl Identity for LocalSession {
    fn current_user(&self) -> Option<User> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("unreadable session file {}: {e}", self.path.display());
                None
            }
        }
    }
}
