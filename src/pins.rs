//! GPIO pins a relay may be bound to on the controlled ESP32.
//!
//! Single source of truth for the pin picker and for registry validation.
//! Strapping and flash pins are left out of the list on purpose.

/// A physical output line on the device.
pub type Pin = u8;

/// Relay-capable GPIO pins, in picker order.
pub const RELAY_PINS: [Pin; 23] = [
    2, 4, 5, 12, 13, 14, 15, 16, 17, 18, 19, 21, 22, 23, 25, 26, 27, 32, 33, 34, 35, 36, 39,
];

/// Upper bound on registry size: every relay owns a distinct pin.
pub const MAX_RELAYS: usize = RELAY_PINS.len();

/// Pin pre-selected in the "add relay" form.
pub const DEFAULT_RELAY_PIN: Pin = 2;

/// Whether `pin` may carry a relay.
pub fn is_relay_pin(pin: Pin) -> bool {
    RELAY_PINS.contains(&pin)
}
