//! Operator controls: two joysticks, a servo slider and the pump button.
//!
//! Stored values survive a disconnect; only the displayed values are
//! masked (see [`ControlState::displayed`]).

pub mod joystick;

use core::fmt;

use serde::{Deserialize, Serialize};

use joystick::JoystickVector;

/// Which stick a vector came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoystickSide {
    Left,
    Right,
}

/// Servo position in whole degrees, always within `[0, 180]`.
///
/// Deserialization goes through [`TryFrom<u8>`], so no decoder can build
/// an out-of-range angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ServoAngle(u8);

/// Rejected servo angle, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidAngle(pub u8);

impl fmt::Display for InvalidAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "servo angle {} outside 0-180", self.0)
    }
}

impl std::error::Error for InvalidAngle {}

impl ServoAngle {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(180);
    pub const CENTER: Self = Self(90);

    /// Construct, rejecting out-of-range degrees.
    pub fn new(degrees: u16) -> Option<Self> {
        (degrees <= 180).then_some(Self(degrees as u8))
    }

    /// Construct, clamping into range.
    pub fn saturating(degrees: u16) -> Self {
        Self(degrees.min(180) as u8)
    }

    pub fn degrees(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for ServoAngle {
    type Error = InvalidAngle;

    fn try_from(degrees: u8) -> Result<Self, Self::Error> {
        Self::new(u16::from(degrees)).ok_or(InvalidAngle(degrees))
    }
}

impl From<ServoAngle> for u8 {
    fn from(angle: ServoAngle) -> Self {
        angle.0
    }
}

impl Default for ServoAngle {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Stored control values for one session.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlState {
    pub left: JoystickVector,
    pub right: JoystickVector,
    pub servo: ServoAngle,
    pub pump: bool,
}

impl ControlState {
    pub fn set_joystick(&mut self, side: JoystickSide, vector: JoystickVector) {
        match side {
            JoystickSide::Left => self.left = vector,
            JoystickSide::Right => self.right = vector,
        }
    }

    /// What the panel shows.  While not connected every control reads as
    /// neutral (servo 0, pump off) without touching the stored values.
    pub fn displayed(&self, connected: bool) -> Self {
        if connected {
            *self
        } else {
            Self {
                left: JoystickVector::ZERO,
                right: JoystickVector::ZERO,
                servo: ServoAngle::MIN,
                pump: false,
            }
        }
    }
}
