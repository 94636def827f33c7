//! Unified error types for the control panel core.
//!
//! A single `PanelError` enum that every subsystem converts into, so the
//! service layer can report rejected actions uniformly.  All variants are
//! `Copy`: a rejected action carries its reason, never an allocation.

use core::fmt;

use crate::pins::Pin;
use crate::relays::RelayId;

// ---------------------------------------------------------------------------
// Top-level panel error
// ---------------------------------------------------------------------------

/// Every fallible core operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelError {
    /// Bad user input.  Nothing was mutated.
    Validation(ValidationError),
    /// The referenced relay id does not exist.
    NotFound(RelayId),
    /// The action needs an active link and the panel is not connected.
    NotConnected,
    /// The wireless transport refused or failed the request.
    Transport(TransportError),
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "validation: {e}"),
            Self::NotFound(id) => write!(f, "relay {id} not found"),
            Self::NotConnected => write!(f, "not connected"),
            Self::Transport(e) => write!(f, "transport: {e}"),
        }
    }
}

impl std::error::Error for PanelError {}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Relay name is blank after trimming.
    EmptyName,
    /// Another relay already owns this pin.
    PinInUse(Pin),
    /// Pin is not one of the device's relay-capable outputs.
    PinNotAllowed(Pin),
    /// Every allowed pin is already assigned.
    RegistryFull,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "empty name"),
            Self::PinInUse(pin) => write!(f, "pin {pin} in use"),
            Self::PinNotAllowed(pin) => write!(f, "pin {pin} not allowed"),
            Self::RegistryFull => write!(f, "no free relay slots"),
        }
    }
}

impl From<ValidationError> for PanelError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Failures reported by the wireless transport.  None of them are fatal:
/// the link falls back to `Disconnected` and the user may retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The platform offers no wireless pairing capability.
    Unsupported,
    /// Handshake with the device failed.
    HandshakeFailed,
    /// The user dismissed the device picker.
    Cancelled,
    /// The device did not answer within the connection timeout.
    Timeout,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => write!(f, "wireless pairing not supported"),
            Self::HandshakeFailed => write!(f, "handshake failed"),
            Self::Cancelled => write!(f, "pairing cancelled"),
            Self::Timeout => write!(f, "connection timed out"),
        }
    }
}

impl From<TransportError> for PanelError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, PanelError>;
