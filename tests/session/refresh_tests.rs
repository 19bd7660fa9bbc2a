//! Proactive token refresh

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::sync::Notify;

use console_session::domain::{
    KeyValueStore, LogoutCause, SessionEvent, Severity, NO_TOKEN_MESSAGE, REFRESH_FAILED_MESSAGE,
};

use crate::common::*;

const CYCLE: Duration = Duration::from_secs(30);

fn expiring_soon() -> String {
    token_expiring_at(EPOCH_MS + 10 * 60 * 1000)
}

fn expiring_later() -> String {
    token_expiring_at(EPOCH_MS + 2 * 60 * 60 * 1000)
}

#[tokio::test(start_paused = true)]
async fn test_token_inside_window_is_refreshed_immediately() {
    let fresh = expiring_later();
    let session = TestSession::new(ScriptedRefresher::issuing(fresh.clone()));
    let mut events = session.manager.events();
    let soon = expiring_soon();

    session.login(&soon);
    settle().await;

    assert_eq!(session.refresher.tokens_seen(), vec![soon]);
    assert_eq!(session.manager.token(), Some(fresh.clone()));
    assert_eq!(session.persistent.get("providus_token").unwrap(), Some(fresh));
    assert_eq!(session.manager.login_time(), Some(EPOCH_MS));
    assert!(matches!(events.recv().await.unwrap(), SessionEvent::LoggedIn { .. }));
    assert_eq!(events.recv().await.unwrap(), SessionEvent::TokenRefreshed);

    // The fresh token sits outside the window.
    for _ in 0..4 {
        advance(CYCLE).await;
    }
    assert_eq!(session.refresher.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_repeats_each_cycle_while_inside_window() {
    let session = TestSession::new(ScriptedRefresher::echo());
    session.login(&expiring_soon());
    settle().await;
    assert_eq!(session.refresher.calls(), 1);

    advance(CYCLE).await;
    assert_eq!(session.refresher.calls(), 2);

    advance(CYCLE).await;
    assert_eq!(session.refresher.calls(), 3);
    assert!(session.manager.is_authenticated());
}

#[tokio::test(start_paused = true)]
async fn test_token_outside_window_is_left_alone() {
    let session = TestSession::new(ScriptedRefresher::echo());
    session.login(&expiring_later());
    settle().await;

    for _ in 0..10 {
        advance(CYCLE).await;
    }

    assert_eq!(session.refresher.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_undecodable_token_never_triggers_refresh() {
    let session = TestSession::new(ScriptedRefresher::echo());
    session.login("opaque-token");
    settle().await;

    advance(5 * CYCLE).await;

    assert_eq!(session.refresher.calls(), 0);
    assert!(session.manager.is_authenticated());
}

#[tokio::test(start_paused = true)]
async fn test_refresh_rejection_ends_session() {
    let session = TestSession::new(ScriptedRefresher::rejecting(401));
    let mut events = session.manager.events();

    session.login(&expiring_soon());
    settle().await;

    assert!(!session.manager.is_authenticated());
    assert!(session.persistent.is_empty());
    assert_eq!(session.notifier.count(Severity::Info, REFRESH_FAILED_MESSAGE), 1);
    assert!(matches!(events.recv().await.unwrap(), SessionEvent::LoggedIn { .. }));
    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::LoggedOut {
            cause: LogoutCause::RefreshFailed,
            message: REFRESH_FAILED_MESSAGE.to_string(),
        }
    );
    assert_eq!(session.manager.active_timers(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_resolving_after_logout_is_discarded() {
    let gate = Arc::new(Notify::new());
    let session = TestSession::new(ScriptedRefresher::issuing(expiring_later()).gated(gate.clone()));
    let mut events = session.manager.events();
    session.login(&expiring_soon());
    settle().await;
    assert_eq!(session.refresher.calls(), 1);

    session.manager.logout();
    gate.notify_one();
    settle().await;

    assert!(!session.manager.is_authenticated());
    assert!(session.persistent.is_empty());
    assert!(matches!(events.recv().await.unwrap(), SessionEvent::LoggedIn { .. }));
    assert!(matches!(
        events.recv().await.unwrap(),
        SessionEvent::LoggedOut {
            cause: LogoutCause::Explicit,
            ..
        }
    ));
    assert!(events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_refresh_failure_after_logout_does_not_log_out_again() {
    let gate = Arc::new(Notify::new());
    let session = TestSession::new(ScriptedRefresher::rejecting(500).gated(gate.clone()));
    session.login(&expiring_soon());
    settle().await;

    session.manager.logout();
    gate.notify_one();
    settle().await;

    assert_eq!(session.notifier.count(Severity::Info, REFRESH_FAILED_MESSAGE), 0);
    assert_eq!(session.notifier.toasts().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_stale_refresh_does_not_clobber_new_login() {
    let gate = Arc::new(Notify::new());
    let session = TestSession::new(ScriptedRefresher::issuing(expiring_later()).gated(gate.clone()));
    session.login(&expiring_soon());
    settle().await;

    session.manager.logout();
    session.login("tok2");
    gate.notify_one();
    settle().await;

    assert_eq!(session.manager.token().as_deref(), Some("tok2"));
    assert_eq!(
        session.persistent.get("providus_token").unwrap().as_deref(),
        Some("tok2")
    );
}

#[tokio::test(start_paused = true)]
async fn test_stale_refresh_failure_keeps_new_login() {
    let gate = Arc::new(Notify::new());
    let session = TestSession::new(ScriptedRefresher::rejecting(401).gated(gate.clone()));
    session.login(&expiring_soon());
    settle().await;

    session.manager.logout();
    session.login("tok2");
    let mut events = session.manager.events();
    gate.notify_one();
    settle().await;

    assert!(session.manager.is_authenticated());
    assert_eq!(session.manager.token().as_deref(), Some("tok2"));
    assert_eq!(session.manager.active_timers(), 3);
    assert_eq!(session.notifier.count(Severity::Info, REFRESH_FAILED_MESSAGE), 0);
    assert!(events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_refresh_calls_share_one_request() {
    let gate = Arc::new(Notify::new());
    let session = TestSession::new(ScriptedRefresher::echo().gated(gate.clone()));
    session.login("tok1");
    settle().await;

    let first = tokio::spawn({
        let manager = session.manager.clone();
        async move { manager.refresh_token().await }
    });
    let second = tokio::spawn({
        let manager = session.manager.clone();
        async move { manager.refresh_token().await }
    });
    settle().await;
    assert_eq!(session.refresher.calls(), 1);

    gate.notify_one();
    first.await.unwrap();
    second.await.unwrap();

    assert_eq!(session.refresher.calls(), 1);
    assert!(session.manager.is_authenticated());
}

#[tokio::test(start_paused = true)]
async fn test_refresh_without_session_reports_missing_token() {
    let session = TestSession::new(ScriptedRefresher::echo());

    session.manager.refresh_token().await;

    assert_eq!(session.refresher.calls(), 0);
    assert_eq!(session.notifier.count(Severity::Error, NO_TOKEN_MESSAGE), 1);
    assert!(!session.manager.is_authenticated());
}
