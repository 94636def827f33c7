//! Recording mocks for integration tests.
//!
//! `MockTransport` records every call the core makes on the link;
//! `RecordingSink` keeps every emitted event for later assertions.

use rcpanel::app::events::{NoticeLevel, PanelEvent};
use rcpanel::app::ports::{EventSink, LinkTransport};
use rcpanel::dispatch::DeviceCommand;
use rcpanel::error::TransportError;

// ── Transport call record ─────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum LinkCall {
    RequestConnection,
    Disconnect,
    Send(DeviceCommand),
}

// ── MockTransport ─────────────────────────────────────────────

pub struct MockTransport {
    pub available: bool,
    /// Returned by the next `request_connection`.
    pub request_result: Result<(), TransportError>,
    pub calls: Vec<LinkCall>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self {
            available: true,
            request_result: Ok(()),
            calls: Vec::new(),
        }
    }

    pub fn sent(&self) -> Vec<DeviceCommand> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                LinkCall::Send(cmd) => Some(*cmd),
                _ => None,
            })
            .collect()
    }

    pub fn sent_names(&self) -> Vec<String> {
        self.sent().iter().map(DeviceCommand::name).collect()
    }

    pub fn count(&self, call: &LinkCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkTransport for MockTransport {
    fn is_available(&self) -> bool {
        self.available
    }

    fn request_connection(&mut self) -> Result<(), TransportError> {
        self.calls.push(LinkCall::RequestConnection);
        self.request_result
    }

    fn disconnect(&mut self) {
        self.calls.push(LinkCall::Disconnect);
    }

    fn send(&mut self, command: &DeviceCommand) {
        self.calls.push(LinkCall::Send(*command));
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<PanelEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notice_titles(&self) -> Vec<&'static str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PanelEvent::Notice(n) => Some(n.title),
                _ => None,
            })
            .collect()
    }

    pub fn notices_at(&self, level: NoticeLevel) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, PanelEvent::Notice(n) if n.level == level))
            .count()
    }

    pub fn telemetry_ticks(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, PanelEvent::Telemetry(_)))
            .count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &PanelEvent) {
        self.events.push(event.clone());
    }
}
