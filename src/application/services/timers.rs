//! Timer ownership for the session manager.
//!
//! Every timer line is a tokio task behind an abort-on-drop handle, so
//! replacing or dropping a handle cancels the task it owns.

use std::future::Future;

use tokio::task::JoinHandle;

/// Handle to a spawned timer task. Aborts the task when dropped.
#[derive(Debug)]
pub struct TimerHandle(JoinHandle<()>);

impl TimerHandle {
    /// Spawn `task` on the current tokio runtime.
    pub fn spawn<F>(task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self(tokio::spawn(task))
    }

    pub fn is_finished(&self) -> bool {
        self.0.is_finished()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// The three timer lines of a session.
///
/// At most one handle per line; arming a line drops (and so cancels) whatever
/// it held before.
#[derive(Debug, Default)]
pub struct Timers {
    idle: Option<TimerHandle>,
    session_check: Option<TimerHandle>,
    refresh_check: Option<TimerHandle>,
}

impl Timers {
    pub fn cancel_idle(&mut self) {
        self.idle.take();
    }

    pub fn arm_idle(&mut self, handle: TimerHandle) {
        self.cancel_idle();
        self.idle = Some(handle);
    }

    pub fn cancel_monitors(&mut self) {
        self.session_check.take();
        self.refresh_check.take();
    }

    pub fn arm_monitors(&mut self, session_check: TimerHandle, refresh_check: TimerHandle) {
        self.cancel_monitors();
        self.session_check = Some(session_check);
        self.refresh_check = Some(refresh_check);
    }

    pub fn cancel_all(&mut self) {
        self.cancel_idle();
        self.cancel_monitors();
    }

    /// Number of timer tasks still running.
    pub fn active(&self) -> usize {
        [&self.idle, &self.session_check, &self.refresh_check]
            .into_iter()
            .flatten()
            .filter(|handle| !handle.is_finished())
            .count()
    }
}
