//! Remote control panel core.
//!
//! Joystick mapping, the device link state machine, the relay registry,
//! the telemetry simulator and the command dispatcher, with the wireless
//! transport, settings storage and presentation behind port traits.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod controls;
pub mod dispatch;
pub mod error;
pub mod fsm;
pub mod pins;
pub mod relays;
pub mod scheduler;
pub mod telemetry;

pub use app::service::PanelService;
pub use error::{PanelError, Result};
