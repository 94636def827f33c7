//! Application core: pure panel logic, zero I/O.
//!
//! The link FSM, relay registry, telemetry simulator and command
//! dispatcher are orchestrated by [`service::PanelService`].  All
//! interaction with the transport, the presentation layer and settings
//! storage goes through the port traits in [`ports`].

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
