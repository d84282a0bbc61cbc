//! Client-side form checks mirroring the server's acceptance rules.
//!
//! Every function returns the full list of issues so a form can show all of
//! them at once. An empty list means the input would pass server validation.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::{AvatarFile, SignupForm, UpdateProfileRequest};

/// Inclusive password length bounds, in characters.
pub const PASSWORD_CHARS: (usize, usize) = (6, 20);
/// Inclusive nickname length bounds, in characters, after trimming.
pub const NICK_CHARS: (usize, usize) = (2, 50);
/// Maximum biography length, in characters.
pub const BIO_MAX_CHARS: usize = 200;
/// Maximum avatar size in bytes (2 MiB).
pub const AVATAR_MAX_BYTES: usize = 2 << 20;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("static email regex")
});

static PASSWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r##"^[0-9A-Za-z!"#$%&'()*+,./:;<=>?@\[\\\]^_{}-]+$"##)
        .expect("static password regex")
});

static NICK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-zА-Яа-яЁё]+$").expect("static nick regex"));

/// A single rule a form value violates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    /// Email does not match `name@domain.tld`.
    #[error("email must look like name@example.com")]
    InvalidEmail,
    /// Password length outside bounds.
    #[error("password must be 6 to 20 characters long")]
    PasswordLength,
    /// Password contains a character outside the allowed set.
    #[error("password contains unsupported characters")]
    PasswordCharacters,
    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,
    /// Nickname length outside bounds.
    #[error("nick must be 2 to 50 characters long")]
    NickLength,
    /// Nickname contains a non-letter.
    #[error("nick may contain letters only")]
    NickCharacters,
    /// Terms were not accepted.
    #[error("you must accept the terms and privacy policy")]
    TermsNotAccepted,
    /// Biography too long.
    #[error("bio must not exceed 200 characters")]
    BioTooLong,
    /// Avatar file is empty.
    #[error("avatar file is empty")]
    AvatarEmpty,
    /// Avatar file larger than the limit.
    #[error("avatar must not exceed 2 MB")]
    AvatarTooLarge,
    /// Avatar content is neither JPEG nor PNG.
    #[error("avatar must be a JPEG or PNG image")]
    AvatarNotImage,
}

/// Returns `true` when `email` has an acceptable shape.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Checks a signup form.
pub fn validate_signup(form: &SignupForm) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if !is_valid_email(&form.email) {
        issues.push(ValidationIssue::InvalidEmail);
    }

    let password_len = form.password.chars().count();
    if password_len < PASSWORD_CHARS.0 || password_len > PASSWORD_CHARS.1 {
        issues.push(ValidationIssue::PasswordLength);
    }
    if !PASSWORD.is_match(&form.password) {
        issues.push(ValidationIssue::PasswordCharacters);
    }
    if form.password != form.confirm_password {
        issues.push(ValidationIssue::PasswordMismatch);
    }

    check_nick(&form.nick, &mut issues);

    if !form.agree_terms {
        issues.push(ValidationIssue::TermsNotAccepted);
    }

    issues
}

/// Checks a profile update.
pub fn validate_profile_update(request: &UpdateProfileRequest) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    check_nick(&request.nick, &mut issues);
    if request.bio.chars().count() > BIO_MAX_CHARS {
        issues.push(ValidationIssue::BioTooLong);
    }
    issues
}

/// Checks an avatar file by size and magic bytes.
pub fn validate_avatar(file: &AvatarFile) -> Vec<ValidationIssue> {
    if file.bytes.is_empty() {
        return vec![ValidationIssue::AvatarEmpty];
    }

    let mut issues = Vec::new();
    if file.bytes.len() > AVATAR_MAX_BYTES {
        issues.push(ValidationIssue::AvatarTooLarge);
    }
    if sniff_image_type(&file.bytes).is_none() {
        issues.push(ValidationIssue::AvatarNotImage);
    }
    issues
}

/// Detects JPEG or PNG content from its leading bytes.
pub fn sniff_image_type(bytes: &[u8]) -> Option<&'static str> {
    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];
    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    if bytes.starts_with(JPEG) {
        Some("image/jpeg")
    } else if bytes.starts_with(PNG) {
        Some("image/png")
    } else {
        None
    }
}

fn check_nick(nick: &str, issues: &mut Vec<ValidationIssue>) {
    let nick = nick.trim();
    let len = nick.chars().count();
    if len < NICK_CHARS.0 || len > NICK_CHARS.1 {
        issues.push(ValidationIssue::NickLength);
    }
    if !NICK.is_match(nick) {
        issues.push(ValidationIssue::NickCharacters);
    }
}
