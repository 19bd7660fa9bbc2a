//! User activity signals that keep a session alive.

use std::fmt;

/// Monitored activity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    PointerMove,
    KeyPress,
    TouchStart,
    Scroll,
}

impl ActivityKind {
    /// Every kind the session core listens for.
    pub const ALL: [ActivityKind; 4] = [
        ActivityKind::PointerMove,
        ActivityKind::KeyPress,
        ActivityKind::TouchStart,
        ActivityKind::Scroll,
    ];

    /// DOM event name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PointerMove => "mousemove",
            Self::KeyPress => "keydown",
            Self::TouchStart => "touchstart",
            Self::Scroll => "scroll",
        }
    }

    /// Map a DOM event name back to a kind.
    pub fn from_event_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
