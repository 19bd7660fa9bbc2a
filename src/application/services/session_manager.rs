//! Session Manager
//!
//! Single owner of the client authentication state. Persists it, enforces the
//! idle and absolute-lifetime policies, refreshes the bearer token before it
//! expires, and tears everything down on logout.
//!
//! ## Timer lines
//!
//! - idle timer: one-shot, re-armed on every activity event
//! - session check: polls `now - login_time` against the absolute lifetime
//! - refresh check: polls the token `exp` claim against the refresh window
//!
//! All three are owned by the manager and run only while authenticated. The
//! tasks hold a weak reference back to the manager, so dropping the last
//! `Arc<SessionManager>` stops them.
//!
//! ## Locking
//!
//! State transitions (mount, login, refresh write-back, logout) are serialized
//! by `transition`. Lock order is always `transition` then `timers`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, trace, warn};

use super::timers::{TimerHandle, Timers};
use crate::config::SessionSettings;
use crate::domain::{
    ActivityKind, KeyValueStore, LogoutCause, Notifier, PendingLogin, SessionEvent, SessionState,
    Severity, StorageOp, TokenClaims, TokenRefresher, DEFAULT_LOGOUT_MESSAGE, EMAIL_KEY,
    IDLE_TIMEOUT_MESSAGE, LOGIN_SUCCESS_MESSAGE, LOGIN_TIME_KEY, NO_TOKEN_MESSAGE,
    REFRESH_FAILED_MESSAGE, ROLE_KEY, SESSION_EXPIRED_MESSAGE, TOKEN_KEY,
};
use crate::infrastructure::storage::NamespacedStore;
use crate::shared::clock::Clock;
use crate::shared::error::{SessionError, StorageError};

/// Capacity of the session event channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Collaborators the session manager is wired to.
#[derive(Clone)]
pub struct SessionBackends {
    /// Long-lived store (survives restarts)
    pub persistent: Arc<dyn KeyValueStore>,

    /// Short-lived store (current tab/process only)
    pub transient: Arc<dyn KeyValueStore>,

    /// Refresh endpoint
    pub refresher: Arc<dyn TokenRefresher>,

    /// Toast sink
    pub notifier: Arc<dyn Notifier>,

    /// Wall clock
    pub clock: Arc<dyn Clock>,
}

/// Clears the in-flight flag when a refresh attempt ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Client session lifecycle owner.
pub struct SessionManager {
    settings: SessionSettings,
    persistent: NamespacedStore,
    transient: NamespacedStore,
    refresher: Arc<dyn TokenRefresher>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    state_tx: watch::Sender<SessionState>,
    events_tx: broadcast::Sender<SessionEvent>,
    transition: Mutex<()>,
    timers: Mutex<Timers>,
    refresh_in_flight: AtomicBool,
    this: Weak<SessionManager>,
}

impl SessionManager {
    /// Create an unmounted manager. Call [`mount`](Self::mount) to rehydrate
    /// persisted state and start the timers.
    ///
    /// Timers are tokio tasks: every operation that arms one must run inside
    /// a tokio runtime.
    pub fn new(settings: SessionSettings, backends: SessionBackends) -> Arc<Self> {
        let persistent = NamespacedStore::new(settings.storage_prefix.clone(), backends.persistent);
        let transient = NamespacedStore::new(settings.storage_prefix.clone(), backends.transient);
        let (state_tx, _) = watch::channel(SessionState::signed_out());
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Arc::new_cyclic(|this| Self {
            settings,
            persistent,
            transient,
            refresher: backends.refresher,
            notifier: backends.notifier,
            clock: backends.clock,
            state_tx,
            events_tx,
            transition: Mutex::new(()),
            timers: Mutex::new(Timers::default()),
            refresh_in_flight: AtomicBool::new(false),
            this: this.clone(),
        })
    }

    // --- Accessors ---

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    /// Watch state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Receive lifecycle events emitted after this call.
    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events_tx.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state_tx.borrow().is_authenticated()
    }

    pub fn token(&self) -> Option<String> {
        self.state_tx.borrow().token.clone()
    }

    pub fn role(&self) -> Option<String> {
        self.state_tx.borrow().role.clone()
    }

    pub fn user_email(&self) -> Option<String> {
        self.state_tx.borrow().user_email.clone()
    }

    pub fn login_time(&self) -> Option<i64> {
        self.state_tx.borrow().login_time
    }

    /// `Authorization` header value for outbound requests.
    pub fn authorization_header(&self) -> Option<String> {
        let state = self.state_tx.borrow();
        if state.is_authenticated() {
            state.token.as_ref().map(|t| format!("Bearer {}", t))
        } else {
            None
        }
    }

    /// Number of timer tasks currently running.
    pub fn active_timers(&self) -> usize {
        self.timers.lock().active()
    }

    // --- Mount / unmount ---

    /// Rehydrate persisted state and arm the timers.
    ///
    /// A persisted token without a login time gets one backfilled to now
    /// instead of being treated as expired.
    pub fn mount(&self) -> Result<(), SessionError> {
        {
            let _transition = self.transition.lock();
            let mut state = self.load_persisted()?;

            if state.is_authenticated() && state.login_time.is_none() {
                let now = self.clock.now_millis();
                self.persistent.set(LOGIN_TIME_KEY, &now.to_string())?;
                state.login_time = Some(now);
                info!("Backfilled login time for rehydrated session");
            }

            let authenticated = state.is_authenticated();
            self.state_tx.send_replace(state);

            let mut timers = self.timers.lock();
            if authenticated {
                self.arm_monitors(&mut timers);
                info!("Rehydrated persisted session");
            } else {
                timers.cancel_monitors();
                debug!("No persisted session to rehydrate");
            }
        }

        self.reset_inactivity_timer();
        Ok(())
    }

    /// Cancel every timer without touching state or storage.
    pub fn unmount(&self) {
        self.timers.lock().cancel_all();
        debug!("Session manager unmounted");
    }

    // --- Login / logout ---

    /// Record a completed credential exchange.
    ///
    /// Persists token, role, email and login time as one batch, clears the
    /// short-lived store, then flips the in-memory state and arms the timers.
    pub fn login(&self, token: &str, role: &str, email: &str) -> Result<(), SessionError> {
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }

        {
            let _transition = self.transition.lock();
            let now = self.clock.now_millis();

            self.persistent.apply(vec![
                StorageOp::Set(LOGIN_TIME_KEY.into(), now.to_string()),
                StorageOp::Set(TOKEN_KEY.into(), token.into()),
                StorageOp::Set(ROLE_KEY.into(), role.into()),
                StorageOp::Set(EMAIL_KEY.into(), email.into()),
            ])?;
            if let Err(e) = self.transient.clear_all() {
                warn!(error = %e, "Failed to clear short-lived store");
            }

            self.state_tx.send_replace(SessionState::new(
                token.to_string(),
                role.to_string(),
                email.to_string(),
                now,
            ));

            let mut timers = self.timers.lock();
            self.arm_monitors(&mut timers);
        }

        self.reset_inactivity_timer();

        info!(user_email = %email, "User logged in");
        let _ = self.events_tx.send(SessionEvent::LoggedIn {
            user_email: email.to_string(),
        });
        self.notifier.notify(Severity::Success, LOGIN_SUCCESS_MESSAGE);

        Ok(())
    }

    /// Log out with the default message.
    pub fn logout(&self) {
        self.end_session(LogoutCause::Explicit, DEFAULT_LOGOUT_MESSAGE);
    }

    /// Log out with a caller-supplied message.
    pub fn logout_with_reason(&self, reason: &str) {
        self.end_session(LogoutCause::Explicit, reason);
    }

    /// Tear the session down.
    ///
    /// Timers are cancelled before storage is purged so no timer can observe a
    /// half-cleared store. Idempotent apart from the notification and event.
    fn end_session(&self, cause: LogoutCause, message: &str) {
        self.teardown(None, cause, message);
    }

    /// Tear the session down only while `issued_with` is still the live token.
    ///
    /// Returns false, touching nothing, when the session changed in between.
    fn end_session_if_current(&self, issued_with: &str, cause: LogoutCause, message: &str) -> bool {
        self.teardown(Some(issued_with), cause, message)
    }

    fn teardown(&self, issued_with: Option<&str>, cause: LogoutCause, message: &str) -> bool {
        {
            let _transition = self.transition.lock();
            if issued_with.is_some_and(|token| !self.is_current_token(token)) {
                return false;
            }

            let mut timers = self.timers.lock();
            timers.cancel_all();

            for (scope, store) in [("persistent", &self.persistent), ("transient", &self.transient)] {
                match store.purge() {
                    Ok(removed) => debug!(scope, removed, "Purged session keys"),
                    Err(e) => warn!(scope, error = %e, "Failed to purge session keys"),
                }
            }

            self.state_tx.send_replace(SessionState::signed_out());
        }

        info!(cause = %cause, "Session ended");
        self.notifier.notify(Severity::Info, message);
        let _ = self.events_tx.send(SessionEvent::LoggedOut {
            cause,
            message: message.to_string(),
        });
        true
    }

    // --- Pending OTP stage ---

    /// Hold the interim token issued by the password step until OTP
    /// verification completes.
    pub fn begin_pending_login(&self, temp_token: &str, email: &str) -> Result<(), SessionError> {
        if temp_token.is_empty() {
            return Err(SessionError::EmptyToken);
        }

        let _transition = self.transition.lock();
        if self.is_authenticated() {
            return Err(SessionError::AlreadyAuthenticated);
        }

        self.persistent.set(EMAIL_KEY, email)?;
        self.transient.set(TOKEN_KEY, temp_token)?;
        debug!(user_email = %email, "Awaiting OTP verification");
        Ok(())
    }

    /// Interim credentials, if an OTP verification is pending.
    pub fn pending_login(&self) -> Result<Option<PendingLogin>, SessionError> {
        if self.is_authenticated() {
            return Ok(None);
        }

        let temp_token = self.transient.get(TOKEN_KEY)?;
        let email = self.persistent.get(EMAIL_KEY)?;
        Ok(match (temp_token, email) {
            (Some(temp_token), Some(email)) if !temp_token.is_empty() => {
                Some(PendingLogin { temp_token, email })
            }
            _ => None,
        })
    }

    /// Drop a pending login after OTP rejection or expiry.
    pub fn abandon_pending_login(&self) -> Result<(), SessionError> {
        let _transition = self.transition.lock();
        if self.is_authenticated() {
            return Err(SessionError::AlreadyAuthenticated);
        }

        self.persistent.purge()?;
        self.transient.purge()?;
        debug!("Pending login abandoned");
        Ok(())
    }

    // --- Inactivity ---

    /// Entry point for monitored user activity.
    pub fn record_activity(&self, kind: ActivityKind) {
        trace!(activity = %kind, "User activity");
        self.reset_inactivity_timer();
    }

    /// Cancel the pending idle timer and, if authenticated, arm a fresh one.
    pub fn reset_inactivity_timer(&self) {
        let mut timers = self.timers.lock();
        timers.cancel_idle();

        if !self.is_authenticated() {
            return;
        }

        let this = self.this.clone();
        let budget = self.settings.idle_timeout();
        timers.arm_idle(TimerHandle::spawn(async move {
            tokio::time::sleep(budget).await;
            if let Some(manager) = this.upgrade() {
                info!(idle_ms = budget.as_millis() as u64, "Idle timeout reached");
                manager.end_session(LogoutCause::IdleTimeout, IDLE_TIMEOUT_MESSAGE);
            }
        }));
    }

    // --- Monitors ---

    fn arm_monitors(&self, timers: &mut Timers) {
        timers.cancel_monitors();
        timers.arm_monitors(self.spawn_session_monitor(), self.spawn_refresh_monitor());
    }

    fn spawn_session_monitor(&self) -> TimerHandle {
        let this = self.this.clone();
        let period = self.settings.session_check_interval();

        TimerHandle::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            // The first tick completes immediately, so a stale rehydrated
            // session is caught without waiting a full period.
            loop {
                ticker.tick().await;
                let Some(manager) = this.upgrade() else { break };
                if manager.check_session_expiry() {
                    break;
                }
            }
        })
    }

    fn spawn_refresh_monitor(&self) -> TimerHandle {
        let this = self.this.clone();
        let period = self.settings.refresh_check_interval();

        TimerHandle::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                let Some(manager) = this.upgrade() else { break };
                manager.check_refresh_window();
            }
        })
    }

    /// Returns true when the session was ended.
    fn check_session_expiry(&self) -> bool {
        if !self.is_authenticated() {
            return false;
        }

        let login_time = match self.persistent.get(LOGIN_TIME_KEY) {
            Ok(Some(raw)) => match raw.parse::<i64>() {
                Ok(login_time) => login_time,
                Err(_) => {
                    debug!("Persisted login time is not a number; skipping expiry check");
                    return false;
                }
            },
            Ok(None) => return false,
            Err(e) => {
                warn!(error = %e, "Failed to read login time; skipping expiry check");
                return false;
            }
        };

        let elapsed = self.clock.now_millis().saturating_sub(login_time);
        let lifetime = i64::try_from(self.settings.session_lifetime_ms).unwrap_or(i64::MAX);
        if elapsed > lifetime {
            info!(elapsed_ms = elapsed, "Absolute session lifetime exceeded");
            self.end_session(LogoutCause::SessionExpired, SESSION_EXPIRED_MESSAGE);
            return true;
        }

        false
    }

    fn check_refresh_window(&self) {
        let Some(token) = self.token().filter(|t| !t.is_empty()) else {
            return;
        };

        let claims = match TokenClaims::decode(&token) {
            Ok(claims) => claims,
            Err(e) => {
                warn!(error = %e, "Failed to parse token; skipping refresh check");
                return;
            }
        };

        let now = self.clock.now_millis();
        if claims.within_refresh_window(now, self.settings.refresh_threshold_ms) {
            debug!(
                expires_in_ms = ?claims.expires_at_millis().map(|exp| exp.saturating_sub(now)),
                "Token inside refresh window"
            );
            if let Some(manager) = self.this.upgrade() {
                tokio::spawn(async move { manager.refresh_token().await });
            }
        }
    }

    // --- Refresh ---

    /// Exchange the persisted token for a fresh one.
    ///
    /// Failure of any kind forces a logout; there are no retries. If the
    /// session changed while the request was in flight the outcome is
    /// discarded. Only one refresh runs at a time; concurrent calls return
    /// immediately.
    pub async fn refresh_token(&self) {
        let Some(_in_flight) = InFlight::acquire(&self.refresh_in_flight) else {
            debug!("Token refresh already in flight; skipping");
            return;
        };

        let current = match self.persistent.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => {
                error!("Token refresh requested without a persisted token");
                self.notifier.notify(Severity::Error, NO_TOKEN_MESSAGE);
                return;
            }
            Err(e) => {
                error!(error = %e, "Failed to read persisted token");
                self.notifier.notify(Severity::Error, NO_TOKEN_MESSAGE);
                return;
            }
        };

        match self.refresher.refresh(&current).await {
            Ok(token) => self.apply_refreshed_token(&current, token),
            Err(e) => {
                error!(error = %e, "Token refresh failed");
                if !self.end_session_if_current(
                    &current,
                    LogoutCause::RefreshFailed,
                    REFRESH_FAILED_MESSAGE,
                ) {
                    debug!("Ignoring refresh failure for a session that already changed");
                }
            }
        }
    }

    fn apply_refreshed_token(&self, issued_with: &str, token: String) {
        {
            let _transition = self.transition.lock();
            if !self.is_current_token(issued_with) {
                debug!("Discarding refreshed token; session changed while refreshing");
                return;
            }

            if let Err(e) = self.persistent.set(TOKEN_KEY, &token) {
                error!(error = %e, "Failed to persist refreshed token; keeping current token");
                return;
            }

            let refreshed = self.state_tx.borrow().with_token(token);
            self.state_tx.send_replace(refreshed);
        }

        info!("Token refreshed");
        let _ = self.events_tx.send(SessionEvent::TokenRefreshed);
    }

    fn is_current_token(&self, token: &str) -> bool {
        self.state_tx.borrow().token.as_deref() == Some(token)
    }

    /// Persisted session, or the signed-out state when no token is stored.
    ///
    /// An email left behind by a pending login is not rehydrated.
    fn load_persisted(&self) -> Result<SessionState, StorageError> {
        let Some(token) = self.persistent.get(TOKEN_KEY)?.filter(|t| !t.is_empty()) else {
            return Ok(SessionState::signed_out());
        };
        let login_time = self
            .persistent
            .get(LOGIN_TIME_KEY)?
            .and_then(|raw| raw.parse::<i64>().ok());

        Ok(SessionState {
            token: Some(token),
            role: self.persistent.get(ROLE_KEY)?,
            user_email: self.persistent.get(EMAIL_KEY)?,
            login_time,
        })
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("authenticated", &self.is_authenticated())
            .field("prefix", &self.settings.storage_prefix)
            .finish_non_exhaustive()
    }
}
