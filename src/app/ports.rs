//! Port traits: the hexagonal boundary between the panel core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ PanelService (domain)
//! ```
//!
//! The [`PanelService`](super::service::PanelService) takes these as
//! `&mut impl Trait` per call, so one struct may implement several ports
//! without a double borrow.

use crate::config::PanelSettings;
use crate::dispatch::DeviceCommand;
use crate::error::TransportError;

// ───────────────────────────────────────────────────────────────
// Link transport (driven adapter: domain → wireless link)
// ───────────────────────────────────────────────────────────────

/// The wireless link to the controlled device.
///
/// Pairing is single-shot and asynchronous: [`request_connection`]
/// only starts it, and the host reports the outcome back through
/// [`PanelService::pairing_finished`](super::service::PanelService::pairing_finished).
///
/// [`request_connection`]: LinkTransport::request_connection
pub trait LinkTransport {
    /// Whether the platform offers wireless pairing at all.
    fn is_available(&self) -> bool;

    /// Start pairing (may show a platform picker).  An `Err` means the
    /// attempt failed before it got going.
    fn request_connection(&mut self) -> Result<(), TransportError>;

    /// Drop the link.  Always succeeds from the core's point of view.
    fn disconnect(&mut self);

    /// Fire-and-forget.  Encoding is the transport's business.
    fn send(&mut self, command: &DeviceCommand);
}

// ───────────────────────────────────────────────────────────────
// Event sink (driven adapter: domain → presentation / logging)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`PanelEvent`](super::events::PanelEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::PanelEvent);
}

// ───────────────────────────────────────────────────────────────
// Settings port (driven adapter: domain ↔ persistent settings)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the panel settings record as one opaque blob.
///
/// Implementations MUST validate before persisting and reject bad
/// ranges with [`SettingsError::ValidationFailed`] rather than clamping.
pub trait SettingsPort {
    /// Returns [`PanelSettings::default()`] when nothing is stored.
    fn load(&self) -> Result<PanelSettings, SettingsError>;

    fn save(&self, settings: &PanelSettings) -> Result<(), SettingsError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`SettingsPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsError {
    /// Stored blob failed to decode.
    Corrupted,
    /// A field failed range validation; the message names it.
    ValidationFailed(&'static str),
    /// Generic backend failure.
    IoError,
}

impl core::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "settings corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for SettingsError {}
