//! Session blackboard threaded through every link-state handler.
//!
//! Holds the slices of session state the link owns side effects on:
//! the relay registry (forced off on disconnect), the telemetry
//! simulator (armed only while connected) and the stored control values
//! (kept across disconnects).

use crate::controls::ControlState;
use crate::relays::RelayRegistry;
use crate::telemetry::TelemetrySimulator;

pub struct SessionContext {
    pub relays: RelayRegistry,
    pub telemetry: TelemetrySimulator,
    pub controls: ControlState,
    /// Name reported by the transport on a successful pairing.
    pub device_name: Option<String>,
    /// How many relays the last entry into `Disconnected` switched off.
    pub forced_off: usize,
}

impl SessionContext {
    pub fn new(relays: RelayRegistry) -> Self {
        Self::from_parts(relays, TelemetrySimulator::new())
    }

    /// Deterministic telemetry for tests and replays.
    pub fn with_seed(relays: RelayRegistry, seed: u64) -> Self {
        Self::from_parts(relays, TelemetrySimulator::with_seed(seed))
    }

    fn from_parts(relays: RelayRegistry, telemetry: TelemetrySimulator) -> Self {
        Self {
            relays,
            telemetry,
            controls: ControlState::default(),
            device_name: None,
            forced_off: 0,
        }
    }
}
