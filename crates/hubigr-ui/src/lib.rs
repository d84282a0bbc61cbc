#![warn(missing_docs)]
//! # hubigr-ui
//!
//! ## Purpose
//! Defines the display-independent view state of the `hubigr` client.
//!
//! ## Responsibilities
//! - Model the five mutually exclusive panels and switch between them
//!   ([`ViewSwitcher`]).
//! - Keep transient notifications with a fixed lifetime
//!   ([`notifications::NotificationCenter`]).
//! - Project session data into display values: greeting, profile card,
//!   submissions list, cache-busted avatar sources ([`render`]).
//!
//! ## Data flow
//! Controller events switch panels and push notifications. A renderer reads a
//! [`render::ViewModel`] snapshot and draws it; nothing here draws.
//!
//! ## Ownership and lifetimes
//! View state owns its strings so snapshots can be handed to a renderer
//! without borrowing the session.
//!
//! ## Error model
//! This crate favors explicit state over recoverable errors. Every panel
//! switch is valid from every panel.
//!
//! ## Security and privacy notes
//! View state never holds tokens or passwords.

pub mod notifications;
pub mod render;

/// One of the five mutually exclusive panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    /// Login form.
    LoggedOutLogin,
    /// Signup form.
    LoggedOutSignup,
    /// Email verification form.
    LoggedOutVerify,
    /// Read-only profile.
    ProfileView,
    /// Profile edit form.
    ProfileEdit,
}

impl Panel {
    /// Every panel, in page order.
    pub const ALL: [Panel; 5] = [
        Panel::LoggedOutLogin,
        Panel::LoggedOutSignup,
        Panel::LoggedOutVerify,
        Panel::ProfileView,
        Panel::ProfileEdit,
    ];

    /// Short display title.
    pub fn title(self) -> &'static str {
        match self {
            Panel::LoggedOutLogin => "Login",
            Panel::LoggedOutSignup => "Sign up",
            Panel::LoggedOutVerify => "Verify email",
            Panel::ProfileView => "Profile",
            Panel::ProfileEdit => "Edit profile",
        }
    }

    /// Returns `true` for panels shown to an authenticated user.
    pub fn is_profile(self) -> bool {
        matches!(self, Panel::ProfileView | Panel::ProfileEdit)
    }
}

/// Tracks the single visible panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSwitcher {
    current: Panel,
}

impl ViewSwitcher {
    /// Starts on the login panel.
    pub fn new() -> Self {
        Self {
            current: Panel::LoggedOutLogin,
        }
    }

    /// Makes `panel` the only visible panel.
    pub fn show(&mut self, panel: Panel) {
        if self.current != panel {
            log::debug!("view switch from={:?} to={panel:?}", self.current);
        }
        self.current = panel;
    }

    /// Visible panel.
    pub fn current(&self) -> Panel {
        self.current
    }

    /// Returns `true` when `panel` is the visible one.
    pub fn is_visible(&self, panel: Panel) -> bool {
        self.current == panel
    }

    /// Every visible panel; always exactly one element.
    pub fn visible_panels(&self) -> Vec<Panel> {
        Panel::ALL
            .into_iter()
            .filter(|panel| self.is_visible(*panel))
            .collect()
    }

    /// Whether the greeting and logout control are shown.
    pub fn chrome_visible(&self) -> bool {
        self.current.is_profile()
    }
}

impl Default for ViewSwitcher {
    fn default() -> Self {
        Self::new()
    }
}
