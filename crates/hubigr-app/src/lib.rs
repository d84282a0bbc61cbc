#![warn(missing_docs)]
//! # hubigr-app
//!
//! ## Purpose
//! Orchestrates gateway, session, and view state for the `hubigr` client and
//! ships the `hubigr` command-line front end.
//!
//! ## Responsibilities
//! - Run every user action (login, signup, email verification, profile
//!   load/edit, avatar upload, logout) through [`ProfileController`].
//! - Keep the token store, the in-memory session, and the visible panel
//!   consistent after each action.
//! - Provide log-safe string helpers.
//!
//! ## Data flow
//! User action -> controller operation -> gateway request -> on success,
//! session/view mutation and a success notification; on failure, the
//! gateway's danger notification and an [`AppError`] for the caller.
//!
//! ## Ownership and lifetimes
//! The controller owns exactly one session, one view switcher, and one
//! notification center. Operations take `&mut self`, so a second action
//! cannot start while one is pending on the same controller.
//!
//! ## Error model
//! Failures are wrapped in [`AppError`]. Every variant has already been shown
//! to the user as a notification when it is returned.
//!
//! ## Security and privacy notes
//! - Passwords and tokens are never logged; [`redact_sensitive`] and
//!   [`sanitize_for_log`] clean any user-supplied text that reaches a log.
//! - The persisted token file is written with owner-only permissions on Unix.

mod controller;

use hubigr_api::{ConfigError, RequestError};
use hubigr_core::CoreError;
use hubigr_core::validation::ValidationIssue;
use thiserror::Error;

pub use controller::{ControllerConfig, ProfileController};

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("HUBIGR_VERSION");

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

const SENSITIVE_KEYS: [&str; 4] = ["password", "token", "authorization", "bearer"];

/// Cuts a log line at the first secret marker and masks the remainder.
pub fn redact_sensitive(input: &str) -> String {
    let lower = input.to_ascii_lowercase();
    let first = SENSITIVE_KEYS
        .iter()
        .filter_map(|key| lower.find(key).map(|position| (position, *key)))
        .min_by_key(|(position, _)| *position);

    match first {
        Some((position, key)) => format!("{}{key}=<redacted>", &input[..position]),
        None => input.to_string(),
    }
}

/// Strips control characters so user input cannot forge log lines.
pub fn sanitize_for_log(input: &str) -> String {
    input.chars().filter(|ch| !ch.is_control()).collect()
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// API call failed; the message was already notified.
    #[error(transparent)]
    Request(#[from] RequestError),
    /// Signup attempted before the captcha challenge completed.
    #[error("captcha challenge not completed")]
    MissingCaptcha,
    /// Avatar upload attempted without a file.
    #[error("no avatar file selected")]
    MissingAvatar,
    /// Strict validation rejected the input.
    #[error("invalid input: {}", join_issues(.0))]
    Invalid(Vec<ValidationIssue>),
    /// Profile editing requested without a loaded profile.
    #[error("not signed in")]
    NotSignedIn,
    /// Request body could not be encoded.
    #[error("encoding error: {0}")]
    Encode(#[from] CoreError),
    /// Client configuration rejected.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// Avatar file could not be read from disk.
    #[error("cannot read avatar file {path}: {source}")]
    AvatarRead {
        /// File that failed.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
