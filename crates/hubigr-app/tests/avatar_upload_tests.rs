//! Integration tests for avatar upload.

mod common;

use common::{alice_profile, controller, ok, two_submissions};
use hubigr_api::RequestBody;
use hubigr_app::{AppError, ControllerConfig};
use hubigr_core::{AvatarFile, Severity};
use hubigr_session::MemoryTokenStore;
use serde_json::json;

const PNG: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[tokio::test]
async fn avatar_upload_tests_missing_file_warns_without_request() {
    let (mut controller, _clock) =
        controller(vec![], MemoryTokenStore::new(), ControllerConfig::default());

    let error = controller
        .upload_avatar(None)
        .await
        .expect_err("upload should abort");

    assert!(matches!(error, AppError::MissingAvatar));
    assert!(controller.gateway().transport().sent().is_empty());
    assert_eq!(controller.notifications().all()[0].severity, Severity::Warning);
}

#[tokio::test]
async fn avatar_upload_tests_each_upload_gets_fresh_cache_buster() {
    let (mut controller, clock) = controller(
        vec![
            ok(alice_profile()),
            ok(two_submissions()),
            ok(json!({"avatar_url": "/avatars/new.png"})),
            ok(json!({"avatar_url": "/avatars/new.png"})),
        ],
        MemoryTokenStore::with_token("tok1"),
        ControllerConfig::default(),
    );
    controller.start().await;

    clock.set(5_000);
    let first = controller
        .upload_avatar(Some(AvatarFile::new("me.png", PNG.to_vec())))
        .await
        .expect("first upload should succeed");
    clock.set(6_000);
    let second = controller
        .upload_avatar(Some(AvatarFile::new("me.png", PNG.to_vec())))
        .await
        .expect("second upload should succeed");

    assert_eq!(first, "/avatars/new.png?t=5000");
    assert_eq!(second, "/avatars/new.png?t=6000");
    assert_ne!(first, second);
    assert_eq!(controller.avatar_src(), Some(second.as_str()));
    assert_eq!(
        controller
            .session()
            .user()
            .and_then(|user| user.avatar_url.as_deref()),
        Some("/avatars/new.png")
    );

    let upload = &controller.gateway().transport().sent()[2];
    assert_eq!(upload.url, "http://api.example.test/api/v1/profile/avatar");
    assert_eq!(upload.header("Authorization"), Some("Bearer tok1"));
    assert_eq!(upload.header("Content-Type"), None);
    let RequestBody::Multipart(file) = &upload.body else {
        panic!("avatar should be sent as multipart");
    };
    assert_eq!(file.content_type, "image/png");
}

#[tokio::test]
async fn avatar_upload_tests_strict_validation_rejects_non_images() {
    let (mut controller, _clock) = controller(
        vec![],
        MemoryTokenStore::with_token("tok1"),
        ControllerConfig {
            strict_validation: true,
            ..ControllerConfig::default()
        },
    );

    let result = controller
        .upload_avatar(Some(AvatarFile::new("me.gif", b"GIF89a".to_vec())))
        .await;

    assert!(matches!(result, Err(AppError::Invalid(_))));
    assert!(controller.gateway().transport().sent().is_empty());
}
