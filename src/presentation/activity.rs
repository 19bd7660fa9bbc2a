//! Activity forwarding.
//!
//! UI layers push raw interaction events into a channel; this listener feeds
//! them to the session manager's idle timer. Attaching is the subscribe half
//! of mount, dropping the listener the unsubscribe half of unmount.

use std::sync::{Arc, Weak};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::application::services::SessionManager;
use crate::domain::ActivityKind;

#[derive(Debug)]
pub struct ActivityListener {
    task: JoinHandle<()>,
}

impl ActivityListener {
    /// Forward every event received on `events` to `session`.
    pub fn attach(session: &Arc<SessionManager>, mut events: mpsc::Receiver<ActivityKind>) -> Self {
        let session: Weak<SessionManager> = Arc::downgrade(session);

        let task = tokio::spawn(async move {
            while let Some(kind) = events.recv().await {
                let Some(session) = session.upgrade() else { break };
                session.record_activity(kind);
            }
            debug!("Activity source closed");
        });

        Self { task }
    }

    /// Stop forwarding activity.
    pub fn detach(self) {}
}

impl Drop for ActivityListener {
    fn drop(&mut self) {
        self.task.abort();
    }
}
