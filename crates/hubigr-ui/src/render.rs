//! Projections from session data to display values.

use chrono::{DateTime, NaiveDate};
use hubigr_core::{Submission, UserProfile};

use crate::Panel;

/// Display name used when the nickname is blank.
pub const DEFAULT_DISPLAY_NAME: &str = "User";
/// Bio placeholder.
pub const EMPTY_BIO_TEXT: &str = "No information provided";
/// Submissions placeholder.
pub const NO_SUBMISSIONS_TEXT: &str = "No submissions";

/// Greeting shown next to the logout control. `None` without a nickname.
pub fn greeting(user: Option<&UserProfile>) -> Option<String> {
    let nick = user?.nick.trim();
    if nick.is_empty() {
        return None;
    }
    Some(format!("Hello, {nick}!"))
}

/// Appends a `t=<now_ms>` query parameter so image caches are bypassed.
pub fn cache_busted(url: &str, now_ms: u64) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}t={now_ms}")
}

/// Read-only profile plus the pre-filled edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileCard {
    /// Heading name.
    pub display_name: String,
    /// Email line.
    pub email: String,
    /// Bio text or placeholder.
    pub bio: String,
    /// Avatar image source, cache-busted.
    pub avatar_src: Option<String>,
    /// Edit form: nickname field.
    pub edit_nick: String,
    /// Edit form: bio field.
    pub edit_bio: String,
    /// Edit form: read-only email field.
    pub edit_email: String,
}

impl ProfileCard {
    /// Builds the card for `user`, keeping `avatar_src` as rendered earlier.
    pub fn from_profile(user: &UserProfile, avatar_src: Option<String>) -> Self {
        let bio = user.bio.clone().unwrap_or_default();
        Self {
            display_name: if user.nick.is_empty() {
                DEFAULT_DISPLAY_NAME.to_string()
            } else {
                user.nick.clone()
            },
            email: user.email.clone(),
            bio: if bio.is_empty() {
                EMPTY_BIO_TEXT.to_string()
            } else {
                bio.clone()
            },
            avatar_src,
            edit_nick: user.nick.clone(),
            edit_bio: bio,
            edit_email: user.email.clone(),
        }
    }
}

/// One rendered submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionEntry {
    /// Game title.
    pub game_title: String,
    /// Jam title.
    pub jam_title: String,
    /// Date part of the submission time.
    pub submitted_on: String,
}

/// Rendered submissions block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionsView {
    /// Number of submissions.
    pub count: usize,
    /// One entry per submission, server order.
    pub entries: Vec<SubmissionEntry>,
}

impl SubmissionsView {
    /// Projects a fetched list.
    pub fn from_submissions(submissions: &[Submission]) -> Self {
        Self {
            count: submissions.len(),
            entries: submissions
                .iter()
                .map(|submission| SubmissionEntry {
                    game_title: submission.game_title.clone(),
                    jam_title: submission.jam_title.clone(),
                    submitted_on: format_submission_date(&submission.submitted_at),
                })
                .collect(),
        }
    }
}

/// Formats an RFC 3339 timestamp (or plain date) as `YYYY-MM-DD`.
///
/// Anything else is returned unchanged.
pub fn format_submission_date(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.date_naive().format("%Y-%m-%d").to_string();
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return parsed.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    /// Visible panel.
    pub panel: Panel,
    /// Greeting, shown only on profile panels.
    pub greeting: Option<String>,
    /// Profile card, when a profile is loaded.
    pub profile: Option<ProfileCard>,
    /// Submissions, when fetched.
    pub submissions: Option<SubmissionsView>,
    /// `(severity, message)` of every active notification.
    pub notifications: Vec<(String, String)>,
}

/// Plain-text rendering for terminals.
pub fn render_text(model: &ViewModel) -> String {
    let mut lines = vec![format!("== {} ==", model.panel.title())];

    if let Some(greeting) = &model.greeting {
        lines.push(greeting.clone());
    }

    if model.panel.is_profile()
        && let Some(card) = &model.profile
    {
        match model.panel {
            Panel::ProfileEdit => {
                lines.push(format!("nick:  {}", card.edit_nick));
                lines.push(format!("bio:   {}", card.edit_bio));
                lines.push(format!("email: {}", card.edit_email));
            }
            _ => {
                lines.push(card.display_name.clone());
                lines.push(card.email.clone());
                lines.push(card.bio.clone());
            }
        }
        if let Some(avatar) = &card.avatar_src {
            lines.push(format!("avatar: {avatar}"));
        }
    }

    if model.panel == Panel::ProfileView
        && let Some(submissions) = &model.submissions
    {
        if submissions.entries.is_empty() {
            lines.push(NO_SUBMISSIONS_TEXT.to_string());
        } else {
            lines.push(format!("submissions: {}", submissions.count));
            for entry in &submissions.entries {
                lines.push(format!(
                    "  {} / {} ({})",
                    entry.game_title, entry.jam_title, entry.submitted_on
                ));
            }
        }
    }

    for (severity, message) in &model.notifications {
        lines.push(format!("[{severity}] {message}"));
    }

    lines.join("\n")
}
