//! Notification sink that writes toasts to the log.
//!
//! Used by the headless binary, where there is no toast layer to render them.

use tracing::{error, info};

use crate::domain::{Notifier, Severity};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Error => error!(severity = %severity, "{}", message),
            Severity::Success | Severity::Info => info!(severity = %severity, "{}", message),
        }
    }
}
