//! Outbound panel events.
//!
//! The [`PanelService`](super::service::PanelService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  A presentation layer
//! subscribes to them to re-render; the log sink just prints them.

use crate::fsm::LinkState;
use crate::relays::{Relay, RelayId, RelaySwitch};
use crate::telemetry::DeviceTelemetry;

/// Structured events emitted by the panel core.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    /// The service has started (carries the initial link state).
    Started(LinkState),

    /// The link moved between states.
    StateChanged { from: LinkState, to: LinkState },

    /// A telemetry tick was applied.
    Telemetry(DeviceTelemetry),

    /// A relay's stored state changed and was sent to the device.
    RelayChanged(RelaySwitch),

    RelayAdded(Relay),
    RelayUpdated(Relay),
    RelayRemoved(RelayId),

    /// Entering `Disconnected` switched this many relays off.
    RelaysForcedOff(usize),

    /// A user-facing message.
    Notice(Notice),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Short user-facing message: outcome of an action or a rejection reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: &'static str,
    pub detail: String,
}

impl Notice {
    pub fn info(title: &'static str, detail: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, title, detail)
    }

    pub fn warning(title: &'static str, detail: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, title, detail)
    }

    pub fn error(title: &'static str, detail: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, title, detail)
    }

    fn new(level: NoticeLevel, title: &'static str, detail: impl Into<String>) -> Self {
        Self {
            level,
            title,
            detail: detail.into(),
        }
    }
}
