//! Login, rehydration and logout

use pretty_assertions::assert_eq;
use tokio_test::assert_ok;

use console_session::config::RouteSettings;
use console_session::domain::{
    KeyValueStore, LogoutCause, SessionEvent, SessionState, Severity, DEFAULT_LOGOUT_MESSAGE,
    LOGIN_SUCCESS_MESSAGE, SESSION_EXPIRED_MESSAGE,
};
use console_session::infrastructure::storage::MemoryStore;
use console_session::presentation::{GuardDecision, RouteGuard};

use crate::common::*;

fn persisted_session(login_time: Option<i64>) -> MemoryStore {
    let mut entries = vec![
        ("providus_token", "tok1".to_string()),
        ("providus_role", TEST_ROLE.to_string()),
        ("providus_email", TEST_EMAIL.to_string()),
        ("other_app_theme", "dark".to_string()),
    ];
    if let Some(login_time) = login_time {
        entries.push(("providus_login_time", login_time.to_string()));
    }
    MemoryStore::with_entries(entries)
}

#[tokio::test(start_paused = true)]
async fn test_login_publishes_state_and_event() {
    let session = TestSession::new(ScriptedRefresher::echo());
    let mut events = session.manager.events();
    let mut state = session.manager.subscribe();

    session.login("tok1");

    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::LoggedIn {
            user_email: TEST_EMAIL.to_string()
        }
    );
    assert!(state.has_changed().unwrap());
    assert_eq!(
        *state.borrow_and_update(),
        SessionState::new(
            "tok1".to_string(),
            TEST_ROLE.to_string(),
            TEST_EMAIL.to_string(),
            EPOCH_MS
        )
    );
    assert_eq!(session.notifier.count(Severity::Success, LOGIN_SUCCESS_MESSAGE), 1);
    assert_eq!(session.manager.active_timers(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_mount_rehydrates_persisted_session() {
    let session = TestSession::with_stores(
        ScriptedRefresher::echo(),
        persisted_session(Some(EPOCH_MS - 60 * 60 * 1000)),
        MemoryStore::new(),
    );

    assert_ok!(session.manager.mount());
    settle().await;

    assert!(session.manager.is_authenticated());
    assert_eq!(session.manager.token().as_deref(), Some("tok1"));
    assert_eq!(session.manager.role().as_deref(), Some(TEST_ROLE));
    assert_eq!(session.manager.user_email().as_deref(), Some(TEST_EMAIL));
    assert_eq!(session.manager.login_time(), Some(EPOCH_MS - 60 * 60 * 1000));
    assert_eq!(session.manager.active_timers(), 3);
    assert!(session.notifier.toasts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_mount_ends_session_past_absolute_lifetime() {
    let session = TestSession::with_stores(
        ScriptedRefresher::echo(),
        persisted_session(Some(EPOCH_MS - 31 * 60 * 60 * 1000)),
        MemoryStore::new(),
    );
    let mut events = session.manager.events();

    assert_ok!(session.manager.mount());
    settle().await;

    assert!(!session.manager.is_authenticated());
    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::LoggedOut {
            cause: LogoutCause::SessionExpired,
            message: SESSION_EXPIRED_MESSAGE.to_string(),
        }
    );
    assert_eq!(session.notifier.count(Severity::Info, SESSION_EXPIRED_MESSAGE), 1);
    assert_eq!(session.persistent.keys().unwrap(), vec!["other_app_theme".to_string()]);
    assert_eq!(session.refresher.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_mount_backfills_missing_login_time() {
    let session = TestSession::with_stores(
        ScriptedRefresher::echo(),
        persisted_session(None),
        MemoryStore::new(),
    );

    assert_ok!(session.manager.mount());
    settle().await;

    assert!(session.manager.is_authenticated());
    assert_eq!(session.manager.login_time(), Some(EPOCH_MS));
    assert_eq!(
        session.persistent.get("providus_login_time").unwrap(),
        Some(EPOCH_MS.to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn test_mount_without_token_stays_signed_out() {
    let session = TestSession::with_stores(
        ScriptedRefresher::echo(),
        MemoryStore::with_entries([("providus_email", TEST_EMAIL)]),
        MemoryStore::new(),
    );

    assert_ok!(session.manager.mount());
    settle().await;

    assert!(!session.manager.is_authenticated());
    assert_eq!(session.manager.active_timers(), 0);
    assert_eq!(session.manager.authorization_header(), None);
}

#[tokio::test(start_paused = true)]
async fn test_logout_purges_only_namespaced_keys() {
    let session = TestSession::with_stores(
        ScriptedRefresher::echo(),
        MemoryStore::with_entries([("other_app_theme", "dark")]),
        MemoryStore::new(),
    );
    session.login("tok1");
    session.transient.set("providus_scratch", "x").unwrap();
    session.transient.set("other_app_draft", "hello").unwrap();
    settle().await;

    session.manager.logout();

    assert_eq!(session.manager.state(), SessionState::signed_out());
    assert_eq!(session.persistent.keys().unwrap(), vec!["other_app_theme".to_string()]);
    assert_eq!(session.transient.keys().unwrap(), vec!["other_app_draft".to_string()]);
    assert_eq!(session.manager.active_timers(), 0);
    assert_eq!(session.notifier.count(Severity::Info, DEFAULT_LOGOUT_MESSAGE), 1);

    // Nothing left running can end the session a second time.
    advance(2 * HOUR).await;
    advance(30 * HOUR).await;
    assert_eq!(session.notifier.toasts().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_logout_with_reason_carries_message() {
    let session = TestSession::new(ScriptedRefresher::echo());
    session.login("tok1");
    let mut events = session.manager.events();

    session.manager.logout_with_reason("Password changed elsewhere");

    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::LoggedOut {
            cause: LogoutCause::Explicit,
            message: "Password changed elsewhere".to_string(),
        }
    );
    assert_eq!(
        session.notifier.count(Severity::Info, "Password changed elsewhere"),
        1
    );
}

#[tokio::test(start_paused = true)]
async fn test_unmount_stops_timers_and_keeps_session() {
    let session = TestSession::new(ScriptedRefresher::echo());
    session.login("tok1");
    settle().await;

    session.manager.unmount();
    advance(2 * HOUR).await;

    assert!(session.manager.is_authenticated());
    assert_eq!(session.manager.active_timers(), 0);
    assert_eq!(
        session.persistent.get("providus_token").unwrap().as_deref(),
        Some("tok1")
    );
}

#[tokio::test(start_paused = true)]
async fn test_remount_after_restart_restores_login() {
    let first = TestSession::new(ScriptedRefresher::echo());
    first.login("tok1");
    first.manager.unmount();
    let persisted: Vec<(String, String)> = first
        .persistent
        .keys()
        .unwrap()
        .into_iter()
        .map(|key| {
            let value = first.persistent.get(&key).unwrap().unwrap_or_default();
            (key, value)
        })
        .collect();

    let second = TestSession::with_stores(
        ScriptedRefresher::echo(),
        MemoryStore::with_entries(persisted),
        MemoryStore::new(),
    );
    assert_ok!(second.manager.mount());
    settle().await;

    assert_eq!(second.manager.state(), first.manager.state());
}

#[tokio::test(start_paused = true)]
async fn test_guards_follow_session() {
    let session = TestSession::new(ScriptedRefresher::echo());
    let guard = RouteGuard::new(session.manager.clone(), RouteSettings::default());
    let to_login = GuardDecision::Redirect {
        to: "/login".to_string(),
        replace: true,
    };

    assert_eq!(guard.protect(), to_login);

    session.login("tok1");
    assert_eq!(guard.protect(), GuardDecision::Allow);

    session.manager.logout();
    assert_eq!(guard.protect(), to_login);
}
