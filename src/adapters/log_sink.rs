//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each panel event on one log line
//! with a fixed tag.  A UI binding would implement the same trait.

use log::{error, info, warn};

use crate::app::events::{NoticeLevel, PanelEvent};
use crate::app::ports::EventSink;

/// Adapter that logs every [`PanelEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink {
    emitted: u64,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events seen so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &PanelEvent) {
        self.emitted += 1;
        match event {
            PanelEvent::Telemetry(t) => {
                info!(
                    "TELEM | bat={}% | sig={}% | mem={}% | T={}\u{00b0}C | up={}",
                    t.battery, t.signal, t.memory_usage, t.temperature, t.uptime,
                );
            }
            PanelEvent::StateChanged { from, to } => {
                info!("STATE | {} -> {}", from, to);
            }
            PanelEvent::RelayChanged(sw) => {
                info!(
                    "RELAY | id={} pin={} -> {}",
                    sw.id,
                    sw.pin,
                    if sw.on { "ON" } else { "OFF" }
                );
            }
            PanelEvent::RelayAdded(r) => {
                info!("RELAY | added id={} '{}' pin={} icon={}", r.id, r.name, r.pin, r.icon.name());
            }
            PanelEvent::RelayUpdated(r) => {
                info!("RELAY | updated id={} '{}' pin={} icon={}", r.id, r.name, r.pin, r.icon.name());
            }
            PanelEvent::RelayRemoved(id) => {
                info!("RELAY | removed id={}", id);
            }
            PanelEvent::RelaysForcedOff(n) => {
                info!("RELAY | {} forced off on disconnect", n);
            }
            PanelEvent::Notice(n) => match n.level {
                NoticeLevel::Info => info!("NOTICE | {}: {}", n.title, n.detail),
                NoticeLevel::Warning => warn!("NOTICE | {}: {}", n.title, n.detail),
                NoticeLevel::Error => error!("NOTICE | {}: {}", n.title, n.detail),
            },
            PanelEvent::Started(state) => {
                info!("START | initial_state={}", state);
            }
        }
    }
}
