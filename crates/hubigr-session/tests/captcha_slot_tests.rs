//! Integration tests for the single-use captcha slot.

use hubigr_session::CaptchaSlot;

#[test]
fn captcha_slot_tests_token_is_consumed_once() {
    let mut slot = CaptchaSlot::new();
    assert!(!slot.is_ready());

    slot.on_challenge_complete("challenge-1");
    assert!(slot.is_ready());
    assert_eq!(slot.take().as_deref(), Some("challenge-1"));
    assert_eq!(slot.take(), None);
}

#[test]
fn captcha_slot_tests_latest_challenge_wins_and_blank_is_ignored() {
    let mut slot = CaptchaSlot::new();
    slot.on_challenge_complete("first");
    slot.on_challenge_complete("second");
    slot.on_challenge_complete("   ");
    assert_eq!(slot.take().as_deref(), Some("second"));
}
