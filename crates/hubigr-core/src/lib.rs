#![warn(missing_docs)]
//! # hubigr-core
//!
//! ## Purpose
//! Defines the pure data model shared across the `hubigr` client workspace.
//!
//! ## Responsibilities
//! - Represent the user profile, submissions, and every request/response body
//!   exchanged with the profile API.
//! - Define the narrow seams the rest of the workspace is written against:
//!   [`NotificationSink`] for user-facing messages and [`Clock`] for time.
//! - Provide client-side form validation rules ([`validation`]).
//!
//! ## Data flow
//! Form input is collected into request bodies ([`LoginRequest`],
//! [`SignupRequest`], [`UpdateProfileRequest`]) and serialized by the API
//! gateway. Responses are decoded into [`LoginResponse`], [`UserProfile`],
//! [`SubmissionList`] and [`AvatarUploadResponse`].
//!
//! ## Ownership and lifetimes
//! All model values own their strings so they can outlive the transient network
//! buffers they were decoded from.
//!
//! ## Error model
//! Serialization failures return [`CoreError`]. Validation never errors; it
//! returns the list of [`validation::ValidationIssue`] found.
//!
//! ## Security and privacy notes
//! Request bodies carrying passwords implement `Debug` by hand so a stray
//! `{:?}` never prints credentials.
//!
//! ## Example
//! ```rust
//! use hubigr_core::{Severity, UserProfile};
//!
//! let profile: UserProfile =
//!     serde_json::from_str(r#"{"email":"a@b.com","nick":"Alice"}"#).unwrap();
//! assert_eq!(profile.nick, "Alice");
//! assert!(profile.avatar_url.is_none());
//! assert_eq!(Severity::Danger.as_str(), "danger");
//! ```

pub mod validation;

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Multipart field name the avatar file is sent under.
pub const AVATAR_FIELD: &str = "avatar";

/// Public profile of the authenticated user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Account email.
    #[serde(default)]
    pub email: String,
    /// Display nickname.
    #[serde(default)]
    pub nick: String,
    /// Free-form biography.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Avatar location as returned by the server (no cache-buster).
    #[serde(rename = "avatar", default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// One game submitted to a jam. Display-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Title of the submitted game.
    pub game_title: String,
    /// Title of the jam it was submitted to.
    pub jam_title: String,
    /// Server timestamp, usually RFC 3339.
    pub submitted_at: String,
}

/// Payload of `GET /profile/submissions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionList {
    /// Submissions of the current user. An explicit `null` reads as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub submissions: Vec<Submission>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `POST /auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Payload of a successful login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for protected endpoints.
    pub access_token: String,
    /// User record returned alongside the token.
    #[serde(default)]
    pub user: UserProfile,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("access_token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

/// Signup form as entered by the user, before the captcha token is attached.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    /// Account email.
    pub email: String,
    /// Desired nickname.
    pub nick: String,
    /// Password.
    pub password: String,
    /// Password repeated.
    pub confirm_password: String,
    /// Whether terms and privacy policy were accepted.
    pub agree_terms: bool,
}

impl fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupForm")
            .field("email", &self.email)
            .field("nick", &self.nick)
            .field("agree_terms", &self.agree_terms)
            .finish_non_exhaustive()
    }
}

/// Body of `POST /auth/signup`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    /// Account email.
    pub email: String,
    /// Desired nickname.
    pub nick: String,
    /// Password.
    pub password: String,
    /// Password repeated.
    pub confirm_password: String,
    /// Terms acceptance flag.
    pub agree_terms: bool,
    /// Single-use proof of a solved challenge.
    pub captcha_token: String,
}

impl SignupRequest {
    /// Attaches a captcha token to a filled form.
    pub fn from_form(form: SignupForm, captcha_token: String) -> Self {
        Self {
            email: form.email,
            nick: form.nick,
            password: form.password,
            confirm_password: form.confirm_password,
            agree_terms: form.agree_terms,
            captcha_token,
        }
    }
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("email", &self.email)
            .field("nick", &self.nick)
            .field("agree_terms", &self.agree_terms)
            .finish_non_exhaustive()
    }
}

/// Body of `PUT /profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    /// New nickname.
    pub nick: String,
    /// New biography; empty clears it.
    pub bio: String,
}

/// Payload of a successful avatar upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarUploadResponse {
    /// Location of the stored avatar.
    pub avatar_url: String,
}

/// Image file selected for avatar upload.
#[derive(Clone, PartialEq, Eq)]
pub struct AvatarFile {
    /// Original file name, forwarded in the multipart part.
    pub file_name: String,
    /// MIME type of the content.
    pub content_type: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl AvatarFile {
    /// Wraps file content, sniffing its MIME type from magic bytes.
    ///
    /// Unknown content is labelled `application/octet-stream` and left for
    /// the server (or strict validation) to reject.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let content_type = validation::sniff_image_type(&bytes)
            .unwrap_or("application/octet-stream")
            .to_string();
        Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }
}

impl fmt::Debug for AvatarFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvatarFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Neutral information.
    Info,
    /// Completed action.
    Success,
    /// Local problem the user can fix.
    Warning,
    /// Failed request.
    Danger,
}

impl Severity {
    /// Lower-case label used by renderers and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination for transient user-facing messages.
pub trait NotificationSink {
    /// Shows `message` with the given severity.
    fn notify(&mut self, message: &str, severity: Severity);
}

/// Source of wall-clock time in Unix epoch milliseconds.
pub trait Clock {
    /// Current time in milliseconds.
    fn now_ms(&self) -> u64;
}

/// [`Clock`] backed by [`SystemTime`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Serializes a request body into a JSON value.
///
/// # Errors
/// Returns [`CoreError::Codec`] when serialization fails.
pub fn to_json_body<T: Serialize>(body: &T) -> Result<serde_json::Value, CoreError> {
    serde_json::to_value(body).map_err(CoreError::Codec)
}

/// Error type for model encoding failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON encoding/decoding error.
    #[error("payload codec failure: {0}")]
    Codec(#[from] serde_json::Error),
}
