//! Simulated wireless transport.
//!
//! Stands in for the real BLE link on the host: availability and the
//! pairing outcome are scripted, every sent command is encoded with the
//! configured protocol and recorded.

use std::collections::VecDeque;

use log::{info, warn};

use crate::app::ports::LinkTransport;
use crate::config::CommandProtocol;
use crate::dispatch::DeviceCommand;
use crate::error::TransportError;

use super::wire;

/// One command as it went out.
#[derive(Debug, Clone, PartialEq)]
pub struct SentFrame {
    pub command: DeviceCommand,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub struct SimulatedTransport {
    available: bool,
    protocol: CommandProtocol,
    /// Outcomes handed out by successive pairings; empty means success.
    outcomes: VecDeque<Result<String, TransportError>>,
    device_name: String,
    pairing: bool,
    linked: bool,
    sent: Vec<SentFrame>,
}

impl SimulatedTransport {
    pub fn new(protocol: CommandProtocol) -> Self {
        Self {
            available: true,
            protocol,
            outcomes: VecDeque::new(),
            device_name: String::from("ESP32-Controller"),
            pairing: false,
            linked: false,
            sent: Vec::new(),
        }
    }

    /// A platform with no wireless pairing.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(CommandProtocol::default())
        }
    }

    pub fn with_device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = name.into();
        self
    }

    /// Queue the outcome of the next pairing.
    pub fn script_pairing(&mut self, outcome: Result<String, TransportError>) {
        self.outcomes.push_back(outcome);
    }

    pub fn set_protocol(&mut self, protocol: CommandProtocol) {
        self.protocol = protocol;
    }

    /// Finish the pending pairing.  Feed the result to
    /// [`PanelService::pairing_finished`](crate::app::service::PanelService::pairing_finished).
    pub fn finish_pairing(&mut self) -> Result<String, TransportError> {
        if !self.pairing {
            return Err(TransportError::Cancelled);
        }
        self.pairing = false;
        let outcome = self
            .outcomes
            .pop_front()
            .unwrap_or_else(|| Ok(self.device_name.clone()));
        self.linked = outcome.is_ok();
        outcome
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Simulate the device going out of range.
    pub fn drop_link(&mut self) {
        self.linked = false;
    }

    pub fn sent(&self) -> &[SentFrame] {
        &self.sent
    }

    /// Names of every sent command, oldest first.
    pub fn sent_names(&self) -> Vec<String> {
        self.sent.iter().map(|f| f.command.name()).collect()
    }
}

impl LinkTransport for SimulatedTransport {
    fn is_available(&self) -> bool {
        self.available
    }

    fn request_connection(&mut self) -> Result<(), TransportError> {
        if !self.available {
            return Err(TransportError::Unsupported);
        }
        info!("SimTransport: scanning for '{}'", crate::config::DEVICE_NAME_FILTER);
        self.pairing = true;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.pairing = false;
        self.linked = false;
        info!("SimTransport: disconnected");
    }

    fn send(&mut self, command: &DeviceCommand) {
        info!("Sending command: {}", command);
        match wire::encode(self.protocol, command) {
            Ok(bytes) => self.sent.push(SentFrame {
                command: *command,
                bytes,
            }),
            Err(e) => warn!("SimTransport: dropping {}: {}", command, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairing_defaults_to_success() {
        let mut t = SimulatedTransport::new(CommandProtocol::Json).with_device_name("Bot");
        t.request_connection().unwrap();
        assert_eq!(t.finish_pairing(), Ok("Bot".into()));
        assert!(t.is_linked());
    }

    #[test]
    fn scripted_failure() {
        let mut t = SimulatedTransport::new(CommandProtocol::Json);
        t.script_pairing(Err(TransportError::HandshakeFailed));
        t.request_connection().unwrap();
        assert_eq!(t.finish_pairing(), Err(TransportError::HandshakeFailed));
        assert!(!t.is_linked());
    }

    #[test]
    fn finish_without_request_is_cancelled() {
        let mut t = SimulatedTransport::new(CommandProtocol::Json);
        assert_eq!(t.finish_pairing(), Err(TransportError::Cancelled));
    }

    #[test]
    fn protocol_switch_applies_to_next_frame() {
        let mut t = SimulatedTransport::new(CommandProtocol::Json);
        t.send(&DeviceCommand::Pump(true));
        t.set_protocol(CommandProtocol::Text);
        t.send(&DeviceCommand::Pump(false));
        assert_eq!(t.sent()[0].bytes, br#"{"cmd":"PUMP","value":true}"#);
        assert_eq!(t.sent()[1].bytes, b"PUMP:0");
    }

    #[test]
    fn records_encoded_frames() {
        let mut t = SimulatedTransport::new(CommandProtocol::Text);
        t.send(&DeviceCommand::Relay { pin: 4, on: true });
        assert_eq!(t.sent()[0].bytes, b"RELAY_4_ON");
        assert_eq!(t.sent_names(), vec!["RELAY_4_ON"]);
    }
}
