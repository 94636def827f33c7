//! Inbound commands to the panel service.
//!
//! Every user gesture and transport callback can be expressed as one of
//! these and fed through
//! [`PanelService::handle_command`](super::service::PanelService::handle_command).

use crate::config::PanelSettings;
use crate::controls::joystick::JoystickVector;
use crate::controls::{JoystickSide, ServoAngle};
use crate::error::TransportError;
use crate::relays::{NewRelay, RelayId, RelayPatch};

#[derive(Debug, Clone, PartialEq)]
pub enum PanelCommand {
    // ── Link ──────────────────────────────────────────────────
    Connect,
    Disconnect,
    /// Outcome of a pairing started by `Connect`.
    PairingFinished(Result<String, TransportError>),
    /// The transport dropped the link.
    LinkLost,

    // ── Controls ──────────────────────────────────────────────
    Joystick {
        side: JoystickSide,
        vector: JoystickVector,
    },
    SetServo(ServoAngle),
    TogglePump,

    // ── Relays ────────────────────────────────────────────────
    AddRelay(NewRelay),
    EditRelay { id: RelayId, patch: RelayPatch },
    ToggleRelay(RelayId),
    DeleteRelay(RelayId),
    SetAllRelays(bool),

    // ── Settings ──────────────────────────────────────────────
    UpdateSettings(PanelSettings),
}
