#![allow(clippy::unwrap_used, clippy::expect_used)]

use hookchat_core::Role;
use hookchat_session::{ChatStats, SessionContext, DEFAULT_WELCOME};

fn session_with_history() -> SessionContext {
    let mut session = SessionContext::new("Welcome to the desk!");
    session.push_user("I need six people for a roadshow");
    session.push_assistant("Great, for how many days?");
    session.push_user("Three");
    session
}

#[test]
fn test_log_preserves_order() {
    let session = session_with_history();
    let roles: Vec<Role> = session.messages().iter().map(|m| m.role()).collect();
    assert_eq!(
        roles,
        vec![Role::Assistant, Role::User, Role::Assistant, Role::User]
    );
    assert_eq!(session.last().content(), "Three");
}

#[test]
fn test_clear_resets_to_welcome() {
    let mut session = session_with_history();
    let id = session.session_id().to_string();

    session.clear();

    assert_eq!(session.message_count(), 1);
    assert_eq!(session.messages()[0].role(), Role::Assistant);
    assert_eq!(session.messages()[0].content(), "Welcome to the desk!");
    assert_eq!(session.session_id(), id);
}

#[test]
fn test_new_session_changes_id_and_resets_log() {
    let mut session = session_with_history();
    let id = session.session_id().to_string();

    // Ids embed a uuid fragment, so two consecutive ids differ even within
    // the same second.
    session.new_session();

    assert_ne!(session.session_id(), id);
    assert_eq!(session.message_count(), 1);
    assert_eq!(session.last().content(), "Welcome to the desk!");
}

#[test]
fn test_new_session_releases_busy() {
    let mut session = SessionContext::default();
    session.begin_turn().unwrap();
    session.new_session();
    assert!(!session.is_busy());
}

#[test]
fn test_default_welcome() {
    let session = SessionContext::default();
    assert_eq!(session.last().content(), DEFAULT_WELCOME);
}

#[test]
fn test_stats_after_clear() {
    let mut session = session_with_history();
    session.clear();
    assert_eq!(
        session.stats(),
        ChatStats {
            total_messages: 1,
            user_messages: 0,
            assistant_messages: 1,
            conversation_length: 0,
        }
    );
}

#[test]
fn test_stats_serialize() {
    let session = session_with_history();
    let json = serde_json::to_value(session.stats()).unwrap();
    assert_eq!(json["user_messages"], 2);
    assert_eq!(json["conversation_length"], 3);
}
