#![warn(missing_docs)]
//! # hubigr-session
//!
//! ## Purpose
//! Holds the client's authentication state: the bearer token, the current
//! user, and the single-use captcha token awaiting a signup.
//!
//! ## Responsibilities
//! - Model the session lifecycle `Anonymous -> Authenticating -> Authenticated`
//!   with explicit transitions ([`Session`]).
//! - Persist the raw token under a single key ([`TokenStore`]), with an
//!   in-memory and a file-backed implementation.
//! - Hold the captcha token delivered by the challenge widget until signup
//!   consumes it ([`CaptchaSlot`]).
//!
//! ## Data flow
//! Startup reads [`TokenStore::load`] into [`Session::restore`]. Login success
//! calls [`Session::establish`] and [`TokenStore::save`]. Logout or an
//! unreadable profile calls [`Session::clear`] and [`TokenStore::clear`].
//!
//! ## Ownership and lifetimes
//! One [`Session`] exists per client instance and is owned by the controller;
//! nothing here is shared across threads.
//!
//! ## Error model
//! Only persistence can fail, with [`StoreError`]. Session transitions are
//! infallible.
//!
//! ## Security and privacy notes
//! `Debug` output of [`Session`] and [`CaptchaSlot`] never includes token
//! values.
//!
//! ## Example
//! ```rust
//! use hubigr_core::UserProfile;
//! use hubigr_session::{Session, SessionPhase};
//!
//! let mut session = Session::restore(None);
//! assert_eq!(session.phase(), SessionPhase::Anonymous);
//! session.begin_login();
//! session.establish("tok".to_string(), UserProfile::default());
//! assert!(session.is_authenticated());
//! session.clear();
//! assert!(session.token().is_none());
//! ```

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use hubigr_core::UserProfile;
use thiserror::Error;

/// Lifecycle phase of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No token is held.
    Anonymous,
    /// A login is in flight, or a restored token awaits its profile.
    Authenticating,
    /// Token accepted and user known.
    Authenticated,
}

/// In-memory session record.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    user: Option<UserProfile>,
    phase: SessionPhase,
}

impl Session {
    /// Builds the startup session from a persisted token, if any.
    ///
    /// A restored token is unverified, so the phase is `Authenticating` until
    /// the profile loads.
    pub fn restore(token: Option<String>) -> Self {
        let token = token.filter(|token| !token.trim().is_empty());
        let phase = if token.is_some() {
            SessionPhase::Authenticating
        } else {
            SessionPhase::Anonymous
        };
        Self {
            token,
            user: None,
            phase,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Bearer token, when held.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Current user, when known.
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// Returns `true` in the `Authenticated` phase.
    pub fn is_authenticated(&self) -> bool {
        self.phase == SessionPhase::Authenticated
    }

    /// Marks a login attempt as in flight.
    pub fn begin_login(&mut self) {
        self.phase = SessionPhase::Authenticating;
    }

    /// Reverts a failed login attempt without touching token or user.
    pub fn abort_login(&mut self) {
        self.phase = match (&self.token, &self.user) {
            (Some(_), Some(_)) => SessionPhase::Authenticated,
            (Some(_), None) => SessionPhase::Authenticating,
            _ => SessionPhase::Anonymous,
        };
    }

    /// Applies a successful login.
    pub fn establish(&mut self, token: String, user: UserProfile) {
        self.token = Some(token);
        self.user = Some(user);
        self.phase = SessionPhase::Authenticated;
    }

    /// Replaces the user record with a freshly fetched profile.
    ///
    /// Ignored without a token: a profile never authenticates on its own.
    pub fn refresh_user(&mut self, user: UserProfile) {
        if self.token.is_none() {
            return;
        }
        self.user = Some(user);
        self.phase = SessionPhase::Authenticated;
    }

    /// Updates the stored avatar location of the current user.
    pub fn set_avatar_url(&mut self, avatar_url: String) {
        if let Some(user) = self.user.as_mut() {
            user.avatar_url = Some(avatar_url);
        }
    }

    /// Drops token and user.
    pub fn clear(&mut self) {
        self.token = None;
        self.user = None;
        self.phase = SessionPhase::Anonymous;
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("has_token", &self.token.is_some())
            .field("user", &self.user)
            .field("phase", &self.phase)
            .finish()
    }
}

/// Durable storage for the raw bearer token under a single key.
pub trait TokenStore {
    /// Reads the persisted token.
    ///
    /// # Errors
    /// Returns [`StoreError`] when storage exists but cannot be read.
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Persists `token`, replacing any previous value.
    ///
    /// # Errors
    /// Returns [`StoreError`] when storage cannot be written.
    fn save(&mut self, token: &str) -> Result<(), StoreError>;

    /// Removes the persisted token. Clearing an empty store succeeds.
    ///
    /// # Errors
    /// Returns [`StoreError`] when storage exists but cannot be removed.
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// Process-local [`TokenStore`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MemoryTokenStore {
    token: Option<String>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// Current value.
    pub fn get(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl fmt::Debug for MemoryTokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryTokenStore")
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.token.clone())
    }

    fn save(&mut self, token: &str) -> Result<(), StoreError> {
        self.token = Some(token.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.token = None;
        Ok(())
    }
}

/// [`TokenStore`] keeping the token as the whole content of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store at `path`. The file is not touched until used.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(self.io_error(error)),
        }
    }

    fn save(&mut self, token: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|error| self.io_error(error))?;
        }
        fs::write(&self.path, token).map_err(|error| self.io_error(error))?;
        restrict_permissions(&self.path).map_err(|error| self.io_error(error))
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(self.io_error(error)),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Single-use slot for the token produced by the captcha widget.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CaptchaSlot {
    token: Option<String>,
}

impl CaptchaSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Widget callback: stores a freshly issued token, replacing any previous
    /// one. Blank tokens are ignored.
    pub fn on_challenge_complete(&mut self, token: impl Into<String>) {
        let token = token.into();
        if token.trim().is_empty() {
            log::debug!("captcha challenge_complete ignored blank token");
            return;
        }
        self.token = Some(token);
    }

    /// Returns `true` while a token is waiting.
    pub fn is_ready(&self) -> bool {
        self.token.is_some()
    }

    /// Removes and returns the token. A second call returns `None`.
    pub fn take(&mut self) -> Option<String> {
        self.token.take()
    }
}

impl fmt::Debug for CaptchaSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptchaSlot")
            .field("ready", &self.is_ready())
            .finish()
    }
}

/// Persistence failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Token file could not be read, written, or removed.
    #[error("token store {path}: {source}")]
    Io {
        /// Backing file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
