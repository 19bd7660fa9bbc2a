//! Application Startup
//!
//! Wires the session manager to its production collaborators and runs it
//! headlessly until the session ends or the process is interrupted.

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::application::services::{SessionBackends, SessionManager};
use crate::config::Settings;
use crate::domain::{ActivityKind, SessionEvent};
use crate::infrastructure::http::HttpRefreshClient;
use crate::infrastructure::notify::TracingNotifier;
use crate::infrastructure::storage::{FileStore, MemoryStore};
use crate::presentation::{ActivityListener, LoggingNavigator, NavigationListener};
use crate::shared::clock::SystemClock;

/// Capacity of the stdin activity channel.
const ACTIVITY_CHANNEL_CAPACITY: usize = 32;

/// Application instance
pub struct Application {
    session: Arc<SessionManager>,
    navigation: NavigationListener,
}

impl Application {
    /// Build the application from settings
    pub fn build(settings: Settings) -> Result<Self> {
        let persistent = FileStore::open(&settings.storage.path)?;
        info!(path = %settings.storage.path.display(), "Session store opened");

        let refresher = HttpRefreshClient::from_settings(&settings.api)?;
        info!(url = %refresher.url(), "Refresh endpoint configured");

        let session = SessionManager::new(
            settings.session.clone(),
            SessionBackends {
                persistent: Arc::new(persistent),
                transient: Arc::new(MemoryStore::new()),
                refresher: Arc::new(refresher),
                notifier: Arc::new(TracingNotifier),
                clock: Arc::new(SystemClock),
            },
        );

        let navigation =
            NavigationListener::spawn(&session, Arc::new(LoggingNavigator), settings.routes.entry);

        Ok(Self {
            session,
            navigation,
        })
    }

    /// Rehydrate the persisted session and keep it alive until it ends.
    ///
    /// Every line read from stdin counts as activity; a line naming a DOM
    /// event (`keydown`, `scroll`, ...) is recorded as that kind.
    pub async fn run_until_stopped(self) -> Result<()> {
        let mut events = self.session.events();
        self.session.mount()?;

        if !self.session.is_authenticated() {
            info!("No persisted session; nothing to watch");
            self.session.unmount();
            return Ok(());
        }

        info!(
            user_email = self.session.user_email().as_deref().unwrap_or_default(),
            "Watching session"
        );

        let (tx, rx) = mpsc::channel(ACTIVITY_CHANNEL_CAPACITY);
        let activity = ActivityListener::attach(&self.session, rx);
        let stdin = tokio::spawn(forward_stdin(tx));

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted");
                    break;
                }
                event = events.recv() => match event {
                    Ok(SessionEvent::LoggedOut { cause, .. }) => {
                        info!(cause = %cause, "Session over");
                        break;
                    }
                    Ok(event) => debug!(?event, "Session event"),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Session event receiver lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }

        stdin.abort();
        activity.detach();
        self.session.unmount();
        self.navigation.stop();
        Ok(())
    }
}

async fn forward_stdin(tx: mpsc::Sender<ActivityKind>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let kind = ActivityKind::from_event_name(line.trim()).unwrap_or(ActivityKind::KeyPress);
                if tx.send(kind).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Failed to read stdin");
                break;
            }
        }
    }
}
