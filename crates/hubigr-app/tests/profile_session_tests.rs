//! Integration tests for profile loading and session invalidation.

mod common;

use common::{alice_profile, controller, ok, status, two_submissions};
use hubigr_app::{AppError, ControllerConfig};
use hubigr_core::Severity;
use hubigr_session::{MemoryTokenStore, SessionPhase};
use hubigr_ui::Panel;
use serde_json::json;

#[tokio::test]
async fn profile_session_tests_startup_with_token_loads_profile_and_submissions() {
    let (mut controller, _clock) = controller(
        vec![ok(alice_profile()), ok(two_submissions())],
        MemoryTokenStore::with_token("tok1"),
        ControllerConfig::default(),
    );

    controller.start().await;

    assert_eq!(
        controller.gateway().transport().sent_urls(),
        vec![
            "http://api.example.test/api/v1/profile".to_string(),
            "http://api.example.test/api/v1/profile/submissions".to_string(),
        ]
    );
    assert_eq!(controller.view().visible_panels(), vec![Panel::ProfileView]);
    assert_eq!(controller.session().phase(), SessionPhase::Authenticated);
    assert_eq!(controller.avatar_src(), Some("/avatars/alice.png?t=1000"));

    let model = controller.view_model();
    let card = model.profile.expect("profile card should render");
    assert_eq!(card.display_name, "Alice");
    assert_eq!(card.bio, "Makes tiny games");
    assert_eq!(model.greeting.as_deref(), Some("Hello, Alice!"));

    let submissions = model.submissions.expect("submissions should render");
    assert_eq!(submissions.count, 2);
    assert_eq!(submissions.entries[0].submitted_on, "2024-03-05");
    assert!(controller.notifications().all().is_empty());
}

#[tokio::test]
async fn profile_session_tests_unauthorized_profile_ends_session() {
    let (mut controller, _clock) = controller(
        vec![status(401, json!({"message": "Token expired"}))],
        MemoryTokenStore::with_token("stale"),
        ControllerConfig::default(),
    );

    controller.start().await;

    assert_eq!(controller.store().get(), None);
    assert!(controller.session().token().is_none());
    assert_eq!(controller.view().visible_panels(), vec![Panel::LoggedOutLogin]);
    assert_eq!(controller.gateway().transport().sent().len(), 1);

    let severities: Vec<_> = controller
        .notifications()
        .all()
        .iter()
        .map(|entry| entry.severity)
        .collect();
    assert_eq!(severities, vec![Severity::Danger, Severity::Info]);
    assert_eq!(controller.notifications().all()[0].message, "Token expired");
}

#[tokio::test]
async fn profile_session_tests_explicit_reload_failure_returns_error() {
    let (mut controller, _clock) = controller(
        vec![
            ok(alice_profile()),
            ok(two_submissions()),
            status(500, json!({})),
        ],
        MemoryTokenStore::with_token("tok1"),
        ControllerConfig::default(),
    );
    controller.start().await;

    let error = controller
        .load_profile()
        .await
        .expect_err("reload should fail");

    assert!(matches!(error, AppError::Request(ref inner) if inner.message == "Request failed"));
    assert_eq!(controller.panel(), Panel::LoggedOutLogin);
}

#[tokio::test]
async fn profile_session_tests_submissions_failure_is_silent() {
    let (mut controller, _clock) = controller(
        vec![
            ok(alice_profile()),
            status(503, json!({"message": "submissions offline"})),
        ],
        MemoryTokenStore::with_token("tok1"),
        ControllerConfig::default(),
    );

    controller.start().await;

    assert_eq!(controller.view().visible_panels(), vec![Panel::ProfileView]);
    assert!(controller.session().is_authenticated());
    assert_eq!(controller.store().get(), Some("tok1"));
    assert!(controller.submissions().is_none());
    assert!(controller.notifications().all().is_empty());
}

#[tokio::test]
async fn profile_session_tests_empty_submissions_render_placeholder() {
    let (mut controller, _clock) = controller(
        vec![
            ok(json!({"email": "a@b.com", "nick": ""})),
            ok(json!({"submissions": []})),
        ],
        MemoryTokenStore::with_token("tok1"),
        ControllerConfig::default(),
    );

    controller.start().await;

    let text = hubigr_ui::render::render_text(&controller.view_model());
    assert!(text.contains(hubigr_ui::render::NO_SUBMISSIONS_TEXT));
    assert!(text.contains(hubigr_ui::render::DEFAULT_DISPLAY_NAME));
    assert!(controller.avatar_src().is_none());
}

#[tokio::test]
async fn profile_session_tests_null_submissions_render_placeholder() {
    let (mut controller, _clock) = controller(
        vec![
            ok(alice_profile()),
            ok(json!({"submissions": null, "total": 0, "page": 1, "limit": 20})),
        ],
        MemoryTokenStore::with_token("tok1"),
        ControllerConfig::default(),
    );

    controller.start().await;

    let submissions = controller.submissions().expect("submissions should load");
    assert_eq!(submissions.count, 0);
    let text = hubigr_ui::render::render_text(&controller.view_model());
    assert!(text.contains(hubigr_ui::render::NO_SUBMISSIONS_TEXT));
}
