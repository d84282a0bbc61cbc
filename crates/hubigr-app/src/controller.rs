//! Session/view controller driving every user action.

use hubigr_api::{ApiCall, ApiGateway, ApiTransport, endpoints};
use hubigr_core::validation::{
    ValidationIssue, validate_avatar, validate_profile_update, validate_signup,
};
use hubigr_core::{
    AvatarFile, AvatarUploadResponse, Clock, LoginRequest, LoginResponse, NotificationSink,
    Severity, SignupForm, SignupRequest, SubmissionList, UpdateProfileRequest, UserProfile,
    to_json_body,
};
use hubigr_session::{CaptchaSlot, Session, TokenStore};
use hubigr_ui::notifications::{NOTIFICATION_LIFETIME_MS, NotificationCenter};
use hubigr_ui::render::{
    ProfileCard, SubmissionsView, ViewModel, cache_busted, greeting,
};
use hubigr_ui::{Panel, ViewSwitcher};

use crate::{AppError, sanitize_for_log};

/// Runtime knobs of a [`ProfileController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Reject invalid forms locally instead of letting the server answer.
    pub strict_validation: bool,
    /// Lifetime of each notification.
    pub notification_lifetime_ms: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            strict_validation: false,
            notification_lifetime_ms: NOTIFICATION_LIFETIME_MS,
        }
    }
}

/// Sink for best-effort requests whose failures are logged, not shown.
struct LogOnly;

impl NotificationSink for LogOnly {
    fn notify(&mut self, message: &str, severity: Severity) {
        log::warn!(
            "notify suppressed severity={severity} message={}",
            sanitize_for_log(message)
        );
    }
}

/// Owns the session, the visible panel, and the notification list, and
/// applies API results to them.
pub struct ProfileController<T, S, C> {
    gateway: ApiGateway<T>,
    store: S,
    clock: C,
    config: ControllerConfig,
    session: Session,
    captcha: CaptchaSlot,
    view: ViewSwitcher,
    notifications: NotificationCenter<C>,
    avatar_src: Option<String>,
    submissions: Option<SubmissionsView>,
}

impl<T, S, C> ProfileController<T, S, C>
where
    T: ApiTransport,
    S: TokenStore,
    C: Clock + Clone,
{
    /// Creates an anonymous controller showing the login panel.
    ///
    /// Nothing is read from `store` until [`ProfileController::start`].
    pub fn new(gateway: ApiGateway<T>, store: S, clock: C, config: ControllerConfig) -> Self {
        let notifications =
            NotificationCenter::with_lifetime(clock.clone(), config.notification_lifetime_ms);
        Self {
            gateway,
            store,
            clock,
            config,
            session: Session::restore(None),
            captcha: CaptchaSlot::new(),
            view: ViewSwitcher::new(),
            notifications,
            avatar_src: None,
            submissions: None,
        }
    }

    /// Restores the persisted token and shows the matching panel.
    ///
    /// Without a token the login panel is shown. With one the profile is
    /// loaded, which ends on the profile panel or, if the token is rejected,
    /// back on login.
    pub async fn start(&mut self) {
        let token = self.store.load().unwrap_or_else(|error| {
            log::warn!("session restore_failed error={error}");
            None
        });

        self.session = Session::restore(token);
        if self.session.token().is_some() {
            log::info!("session restore token_found");
            if let Err(error) = self.load_profile().await {
                log::info!("session restore_rejected error={error}");
            }
        } else {
            self.view.show(Panel::LoggedOutLogin);
        }
    }

    /// Logs in and shows the profile panel.
    ///
    /// # Errors
    /// Returns [`AppError::Request`] when the server rejects the credentials;
    /// token, user, and panel are left unchanged.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), AppError> {
        log::info!("auth login_attempt email={}", sanitize_for_log(email));
        let body = to_json_body(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;

        self.session.begin_login();
        let response = self
            .gateway
            .request_as::<LoginResponse>(
                ApiCall::post(endpoints::LOGIN).json(body),
                self.session.token(),
                &mut self.notifications,
            )
            .await;

        let response = match response {
            Ok(response) => response,
            Err(error) => {
                self.session.abort_login();
                log::info!("auth login_failed");
                return Err(error.into());
            }
        };

        if let Err(error) = self.store.save(&response.access_token) {
            log::warn!("auth persist_failed error={error}");
        }

        let now_ms = self.clock.now_ms();
        self.avatar_src = response
            .user
            .avatar_url
            .as_deref()
            .map(|url| cache_busted(url, now_ms));
        self.submissions = None;
        self.session.establish(response.access_token, response.user);

        self.view.show(Panel::ProfileView);
        self.notifications
            .notify("Logged in successfully", Severity::Success);
        log::info!("auth login_success");
        Ok(())
    }

    /// Widget callback delivering a solved captcha token.
    pub fn on_challenge_complete(&mut self, token: impl Into<String>) {
        self.captcha.on_challenge_complete(token);
    }

    /// Registers a new account and shows the verification panel.
    ///
    /// The captcha token is checked before anything else and consumed once the
    /// request is sent, whatever its outcome.
    ///
    /// # Errors
    /// - [`AppError::MissingCaptcha`] without a captcha token; nothing is sent.
    /// - [`AppError::Invalid`] when strict validation rejects the form.
    /// - [`AppError::Request`] when the server rejects the signup.
    pub async fn signup(&mut self, form: SignupForm) -> Result<(), AppError> {
        if !self.captcha.is_ready() {
            self.notifications
                .notify("Complete the captcha challenge", Severity::Warning);
            log::info!("auth signup_blocked reason=captcha_missing");
            return Err(AppError::MissingCaptcha);
        }

        if self.config.strict_validation {
            self.reject_issues(validate_signup(&form))?;
        }

        let Some(captcha_token) = self.captcha.take() else {
            return Err(AppError::MissingCaptcha);
        };

        log::info!("auth signup_attempt email={}", sanitize_for_log(&form.email));
        let body = to_json_body(&SignupRequest::from_form(form, captcha_token))?;
        self.gateway
            .request(
                ApiCall::post(endpoints::SIGNUP).json(body),
                self.session.token(),
                &mut self.notifications,
            )
            .await?;

        self.notifications
            .notify("Signed up. Confirm your email.", Severity::Success);
        self.view.show(Panel::LoggedOutVerify);
        Ok(())
    }

    /// Confirms an email address and shows the login panel.
    ///
    /// # Errors
    /// Returns [`AppError::Request`] when the token is rejected.
    pub async fn verify_email(&mut self, token: &str) -> Result<(), AppError> {
        self.gateway
            .request(
                ApiCall::post(endpoints::verify_email(token.trim())),
                self.session.token(),
                &mut self.notifications,
            )
            .await?;

        self.notifications
            .notify("Email confirmed. You can log in.", Severity::Success);
        self.view.show(Panel::LoggedOutLogin);
        Ok(())
    }

    /// Drops the session everywhere and shows the login panel.
    pub fn logout(&mut self) {
        self.session.clear();
        if let Err(error) = self.store.clear() {
            log::warn!("auth forget_failed error={error}");
        }
        self.avatar_src = None;
        self.submissions = None;

        self.view.show(Panel::LoggedOutLogin);
        self.notifications.notify("Logged out", Severity::Info);
        log::info!("auth logout");
    }

    /// Fetches the profile, then the submissions, and shows the profile panel.
    ///
    /// # Errors
    /// Returns [`AppError::Request`] after logging out: an unreadable profile
    /// means the session is no longer valid.
    pub async fn load_profile(&mut self) -> Result<(), AppError> {
        let profile = self
            .gateway
            .request_as::<UserProfile>(
                ApiCall::get(endpoints::PROFILE),
                self.session.token(),
                &mut self.notifications,
            )
            .await;

        let profile = match profile {
            Ok(profile) => profile,
            Err(error) => {
                log::warn!("profile load_failed; ending session");
                self.logout();
                return Err(error.into());
            }
        };

        let now_ms = self.clock.now_ms();
        self.avatar_src = profile
            .avatar_url
            .as_deref()
            .map(|url| cache_busted(url, now_ms));
        self.session.refresh_user(profile);

        self.load_submissions().await;
        self.view.show(Panel::ProfileView);
        Ok(())
    }

    /// Fetches the submissions list. Failures are logged and otherwise ignored.
    pub async fn load_submissions(&mut self) {
        let result = self
            .gateway
            .request_as::<SubmissionList>(
                ApiCall::get(endpoints::SUBMISSIONS),
                self.session.token(),
                &mut LogOnly,
            )
            .await;

        match result {
            Ok(list) => {
                log::debug!("profile submissions_loaded count={}", list.submissions.len());
                self.submissions = Some(SubmissionsView::from_submissions(&list.submissions));
            }
            Err(error) => {
                log::warn!(
                    "profile submissions_failed message={}",
                    sanitize_for_log(&error.message)
                );
            }
        }
    }

    /// Saves nick and bio, then reloads the whole profile from the server.
    ///
    /// # Errors
    /// - [`AppError::Invalid`] when strict validation rejects the input.
    /// - [`AppError::Request`] when saving or the reload fails.
    pub async fn update_profile(&mut self, nick: &str, bio: &str) -> Result<(), AppError> {
        let request = UpdateProfileRequest {
            nick: nick.to_string(),
            bio: bio.to_string(),
        };
        if self.config.strict_validation {
            self.reject_issues(validate_profile_update(&request))?;
        }

        let body = to_json_body(&request)?;
        self.gateway
            .request(
                ApiCall::put(endpoints::PROFILE).json(body),
                self.session.token(),
                &mut self.notifications,
            )
            .await?;

        self.notifications
            .notify("Profile updated", Severity::Success);
        self.load_profile().await
    }

    /// Uploads a new avatar and returns the cache-busted source now displayed.
    ///
    /// # Errors
    /// - [`AppError::MissingAvatar`] without a file; nothing is sent.
    /// - [`AppError::Invalid`] when strict validation rejects the file.
    /// - [`AppError::Request`] when the upload fails.
    pub async fn upload_avatar(&mut self, file: Option<AvatarFile>) -> Result<String, AppError> {
        let Some(file) = file else {
            self.notifications.notify("Choose a file", Severity::Warning);
            return Err(AppError::MissingAvatar);
        };

        if self.config.strict_validation {
            self.reject_issues(validate_avatar(&file))?;
        }

        log::info!("profile avatar_upload {file:?}");
        let response = self
            .gateway
            .request_as::<AvatarUploadResponse>(
                ApiCall::post(endpoints::AVATAR).multipart(file),
                self.session.token(),
                &mut self.notifications,
            )
            .await?;

        let src = cache_busted(&response.avatar_url, self.clock.now_ms());
        self.session.set_avatar_url(response.avatar_url);
        self.avatar_src = Some(src.clone());
        self.notifications
            .notify("Avatar uploaded", Severity::Success);
        Ok(src)
    }

    /// Shows the login panel.
    pub fn show_login(&mut self) {
        self.view.show(Panel::LoggedOutLogin);
    }

    /// Shows the signup panel.
    pub fn show_signup(&mut self) {
        self.view.show(Panel::LoggedOutSignup);
    }

    /// Shows the email verification panel.
    pub fn show_verify(&mut self) {
        self.view.show(Panel::LoggedOutVerify);
    }

    /// Opens the profile edit form.
    ///
    /// # Errors
    /// Returns [`AppError::NotSignedIn`] when no profile is loaded; the panel
    /// is unchanged.
    pub fn edit_profile(&mut self) -> Result<(), AppError> {
        self.require_user()?;
        self.view.show(Panel::ProfileEdit);
        Ok(())
    }

    /// Leaves the edit form without saving.
    ///
    /// # Errors
    /// Returns [`AppError::NotSignedIn`] when no profile is loaded.
    pub fn cancel_edit(&mut self) -> Result<(), AppError> {
        self.require_user()?;
        self.view.show(Panel::ProfileView);
        Ok(())
    }

    /// Visible panel.
    pub fn panel(&self) -> Panel {
        self.view.current()
    }

    /// Panel switcher, read-only.
    pub fn view(&self) -> &ViewSwitcher {
        &self.view
    }

    /// Session record, read-only.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Token store, read-only.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Gateway, read-only.
    pub fn gateway(&self) -> &ApiGateway<T> {
        &self.gateway
    }

    /// Notification center.
    pub fn notifications(&self) -> &NotificationCenter<C> {
        &self.notifications
    }

    /// Notification center, for dismissal and pruning.
    pub fn notifications_mut(&mut self) -> &mut NotificationCenter<C> {
        &mut self.notifications
    }

    /// Returns `true` while a captcha token waits for a signup.
    pub fn captcha_ready(&self) -> bool {
        self.captcha.is_ready()
    }

    /// Displayed avatar source, cache-busted.
    pub fn avatar_src(&self) -> Option<&str> {
        self.avatar_src.as_deref()
    }

    /// Last fetched submissions.
    pub fn submissions(&self) -> Option<&SubmissionsView> {
        self.submissions.as_ref()
    }

    /// Snapshot for a renderer.
    pub fn view_model(&self) -> ViewModel {
        let user = self.session.user();
        ViewModel {
            panel: self.view.current(),
            greeting: if self.view.chrome_visible() {
                greeting(user)
            } else {
                None
            },
            profile: user.map(|user| ProfileCard::from_profile(user, self.avatar_src.clone())),
            submissions: self.submissions.clone(),
            notifications: self
                .notifications
                .active()
                .into_iter()
                .map(|entry| (entry.severity.to_string(), entry.message.clone()))
                .collect(),
        }
    }

    fn require_user(&self) -> Result<(), AppError> {
        if self.session.user().is_none() {
            log::debug!("view edit_ignored reason=no_profile");
            return Err(AppError::NotSignedIn);
        }
        Ok(())
    }

    fn reject_issues(&mut self, issues: Vec<ValidationIssue>) -> Result<(), AppError> {
        if issues.is_empty() {
            return Ok(());
        }
        for issue in &issues {
            self.notifications.notify(&issue.to_string(), Severity::Warning);
        }
        Err(AppError::Invalid(issues))
    }
}
