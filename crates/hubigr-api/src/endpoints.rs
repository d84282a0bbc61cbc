//! Endpoint paths of the profile API, relative to the API root.

/// `POST` credentials, returns token and user.
pub const LOGIN: &str = "/auth/login";
/// `POST` signup form with captcha token.
pub const SIGNUP: &str = "/auth/signup";
/// `GET` current profile, `PUT` profile changes.
pub const PROFILE: &str = "/profile";
/// `POST` multipart avatar file.
pub const AVATAR: &str = "/profile/avatar";
/// `GET` submissions of the current user.
pub const SUBMISSIONS: &str = "/profile/submissions";

/// `POST` with an empty body; the emailed token travels in the query string.
pub fn verify_email(token: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(token.as_bytes()).collect();
    format!("/auth/verify-email?token={encoded}")
}
