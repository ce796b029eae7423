use serde_json::json;
use voicenote_sync::domain::{
    interaction::{
        CheckKind, InteractionKind, InteractionState, InteractionStatus, LikeStatus, ShareStatus,
    },
    session::Session,
};

#[test]
fn like_status_decodes_backend_payload() {
    let status: LikeStatus =
        serde_json::from_value(json!({ "liked": true, "likeCount": 14 })).expect("decode");
    assert_eq!(InteractionStatus::from(status), InteractionStatus::new(true, 14));
}

#[test]
fn negative_server_counts_are_clamped() {
    let status: ShareStatus =
        serde_json::from_value(json!({ "shared": false, "shareCount": -2 })).expect("decode");
    assert_eq!(InteractionStatus::from(status), InteractionStatus::new(false, 0));
}

#[test]
fn state_serializes_with_ui_field_names() {
    let mut state = InteractionState::seeded(false, 3);
    state.begin_toggle();

    let value = serde_json::to_value(state).expect("encode");
    assert_eq!(
        value,
        json!({ "active": true, "count": 4, "isLoading": false, "isProcessing": true })
    );
}

#[test]
fn unlike_at_zero_never_goes_negative() {
    let mut state = InteractionState::seeded(true, 0);
    let snapshot = state.begin_toggle().expect("idle state toggles");

    assert_eq!(state.status(), InteractionStatus::new(false, 0));
    state.rollback(snapshot);
    assert_eq!(state, InteractionState::seeded(true, 0));
}

#[test]
fn check_kinds_pair_with_their_interaction() {
    assert_eq!(InteractionKind::Like.status_check(), CheckKind::LikeStatus);
    assert_eq!(InteractionKind::Share.count_check(), CheckKind::ShareCount);
    assert!(CheckKind::ShareStatus.requires_user());
    assert!(!CheckKind::LikeCount.requires_user());
}

#[test]
fn blank_user_ids_count_as_anonymous() {
    let session: Session = serde_json::from_value(json!({ "user_id": "  " })).expect("decode");
    assert!(!session.is_authenticated());
    assert!(Session::authenticated("user-1").is_authenticated());
}
