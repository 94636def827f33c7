//! Command dispatcher: the only path from the core to the transport.
//!
//! Every control event becomes one [`DeviceCommand`].  The dispatcher
//! forwards it only while the link is `Connected`; otherwise the command
//! is dropped (never queued) and the caller gets
//! [`PanelError::NotConnected`].  Sending is fire-and-forget.  The
//! dispatcher knows nothing about wire formats.

use core::fmt;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::LinkTransport;
use crate::controls::joystick::JoystickVector;
use crate::controls::{JoystickSide, ServoAngle};
use crate::error::{PanelError, Result};
use crate::fsm::LinkState;
use crate::pins::Pin;
use crate::relays::RelaySwitch;

/// One logical device command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DeviceCommand {
    MoveLeft(JoystickVector),
    MoveRight(JoystickVector),
    Servo(ServoAngle),
    Pump(bool),
    Relay { pin: Pin, on: bool },
}

/// Payload carried next to the command name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandPayload {
    Vector(JoystickVector),
    Angle(ServoAngle),
    Flag(bool),
    None,
}

impl DeviceCommand {
    pub fn joystick(side: JoystickSide, vector: JoystickVector) -> Self {
        match side {
            JoystickSide::Left => Self::MoveLeft(vector),
            JoystickSide::Right => Self::MoveRight(vector),
        }
    }

    /// Command kind as the device understands it, e.g. `RELAY_4_ON`.
    pub fn name(&self) -> String {
        self.to_string()
    }

    pub fn payload(&self) -> CommandPayload {
        match *self {
            Self::MoveLeft(v) | Self::MoveRight(v) => CommandPayload::Vector(v),
            Self::Servo(a) => CommandPayload::Angle(a),
            Self::Pump(on) => CommandPayload::Flag(on),
            Self::Relay { .. } => CommandPayload::None,
        }
    }
}

impl From<RelaySwitch> for DeviceCommand {
    fn from(sw: RelaySwitch) -> Self {
        Self::Relay { pin: sw.pin, on: sw.on }
    }
}

impl fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoveLeft(_) => f.write_str("MOVE_LEFT"),
            Self::MoveRight(_) => f.write_str("MOVE_RIGHT"),
            Self::Servo(_) => f.write_str("SERVO"),
            Self::Pump(_) => f.write_str("PUMP"),
            Self::Relay { pin, on } => {
                write!(f, "RELAY_{}_{}", pin, if *on { "ON" } else { "OFF" })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct CommandDispatcher {
    /// Log each send at `info` instead of `debug`.
    verbose: bool,
    sent: u64,
    dropped: u64,
}

impl CommandDispatcher {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            ..Self::default()
        }
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Forward `command` if `state` is `Connected`.
    pub fn dispatch<T: LinkTransport>(
        &mut self,
        state: LinkState,
        command: DeviceCommand,
        transport: &mut T,
    ) -> Result<()> {
        if !state.is_connected() {
            self.dropped += 1;
            warn!("Dispatch: dropped {} while {}", command, state);
            return Err(PanelError::NotConnected);
        }
        if self.verbose {
            info!("Dispatch: {} {:?}", command, command.payload());
        } else {
            debug!("Dispatch: {}", command);
        }
        transport.send(&command);
        self.sent += 1;
        Ok(())
    }

    pub fn sent_count(&self) -> u64 {
        self.sent
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }
}
