//! Panel settings record.
//!
//! One flat record, persisted as a single opaque blob through
//! [`SettingsPort`](crate::app::ports::SettingsPort).  The core reads only
//! `debug_mode` and `battery_alert`; the joystick shaping fields are exposed
//! through [`InputShaping::from_percent`](crate::controls::joystick::InputShaping::from_percent)
//! but are not wired into the mapper by default.

use serde::{Deserialize, Serialize};

use crate::app::ports::SettingsError;

/// GATT service the panel asks for when pairing.
pub const SERVICE_UUID: &str = "12345678-1234-1234-1234-123456789abc";

/// Advertised name filter for the device picker.
pub const DEVICE_NAME_FILTER: &str = "ESP32";

/// Encoding the transport uses for outgoing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandProtocol {
    #[default]
    Json,
    Binary,
    Text,
}

/// User-tunable panel settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanelSettings {
    // --- Connection ---
    pub device_name: String,
    /// Reconnect to the last known device on start.
    pub auto_connect: bool,
    /// Pairing timeout (seconds).
    pub connection_timeout: u16,
    pub protocol: CommandProtocol,

    // --- Controls ---
    /// Joystick sensitivity (1-100 %).
    pub sensitivity: u8,
    /// Joystick deadzone (0-20 %).
    pub deadzone: u8,
    /// Servo slew speed (1-100 %).
    pub servo_speed: u8,
    /// Pump pulse length (100-5000 ms, step 100).
    pub pump_duration: u16,

    // --- Alerts ---
    /// Battery level that raises a low-battery notice (5-50 %, step 5).
    pub battery_alert: u8,
    pub vibration: bool,
    /// Log every dispatched command at info level.
    pub debug_mode: bool,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            device_name: String::from("ESP32-Controller"),
            auto_connect: true,
            connection_timeout: 30,
            protocol: CommandProtocol::Json,

            sensitivity: 75,
            deadzone: 5,
            servo_speed: 50,
            pump_duration: 1000,

            battery_alert: 20,
            vibration: true,
            debug_mode: false,
        }
    }
}

impl PanelSettings {
    /// Range-check every field.  Stores call this before persisting;
    /// invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.device_name.trim().is_empty() {
            return Err(SettingsError::ValidationFailed("deviceName must not be empty"));
        }
        if self.connection_timeout == 0 {
            return Err(SettingsError::ValidationFailed("connectionTimeout must be at least 1"));
        }
        if !(1..=100).contains(&self.sensitivity) {
            return Err(SettingsError::ValidationFailed("sensitivity must be 1-100"));
        }
        if self.deadzone > 20 {
            return Err(SettingsError::ValidationFailed("deadzone must be 0-20"));
        }
        if !(1..=100).contains(&self.servo_speed) {
            return Err(SettingsError::ValidationFailed("servoSpeed must be 1-100"));
        }
        if !(100..=5000).contains(&self.pump_duration) || self.pump_duration % 100 != 0 {
            return Err(SettingsError::ValidationFailed(
                "pumpDuration must be 100-5000 in steps of 100",
            ));
        }
        if !(5..=50).contains(&self.battery_alert) || self.battery_alert % 5 != 0 {
            return Err(SettingsError::ValidationFailed(
                "batteryAlert must be 5-50 in steps of 5",
            ));
        }
        Ok(())
    }
}
