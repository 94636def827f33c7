//! Wire encodings for [`DeviceCommand`].
//!
//! The dispatcher is format-agnostic; the transport picks one of these
//! from the [`CommandProtocol`] setting.
//!
//! | Protocol | `RELAY_4_ON`             | `SERVO` 90                    | `MOVE_LEFT` (0.5, -0.25)                         |
//! |----------|--------------------------|-------------------------------|--------------------------------------------------|
//! | JSON     | `{"cmd":"RELAY_4_ON"}`   | `{"cmd":"SERVO","value":90}`  | `{"cmd":"MOVE_LEFT","value":{"x":0.5,"y":-0.25}}` |
//! | Binary   | postcard of the enum     |                               |                                                  |
//! | Text     | `RELAY_4_ON`             | `SERVO:90`                    | `MOVE_LEFT:0.500,-0.250`                         |

use core::fmt;

use serde_json::{Value, json};

use crate::config::CommandProtocol;
use crate::controls::ServoAngle;
use crate::controls::joystick::JoystickVector;
use crate::dispatch::{CommandPayload, DeviceCommand};

/// Longest text frame the decoder accepts.
pub const MAX_TEXT_FRAME: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireError {
    /// Frame is not valid for the protocol.
    Malformed,
    /// Command name not recognised.
    UnknownCommand,
    /// A payload value is outside its legal range.
    OutOfRange,
    /// Serialisation failed.
    Encode,
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed frame"),
            Self::UnknownCommand => write!(f, "unknown command"),
            Self::OutOfRange => write!(f, "value out of range"),
            Self::Encode => write!(f, "encode failed"),
        }
    }
}

impl std::error::Error for WireError {}

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

pub fn encode(protocol: CommandProtocol, command: &DeviceCommand) -> Result<Vec<u8>, WireError> {
    match protocol {
        CommandProtocol::Json => serde_json::to_vec(&encode_json(command)).map_err(|_| WireError::Encode),
        CommandProtocol::Binary => postcard::to_allocvec(command).map_err(|_| WireError::Encode),
        CommandProtocol::Text => Ok(encode_text(command).into_bytes()),
    }
}

pub fn encode_json(command: &DeviceCommand) -> Value {
    let cmd = command.name();
    match command.payload() {
        CommandPayload::Vector(v) => json!({ "cmd": cmd, "value": { "x": v.x, "y": v.y } }),
        CommandPayload::Angle(a) => json!({ "cmd": cmd, "value": a.degrees() }),
        CommandPayload::Flag(on) => json!({ "cmd": cmd, "value": on }),
        CommandPayload::None => json!({ "cmd": cmd }),
    }
}

pub fn encode_text(command: &DeviceCommand) -> String {
    let cmd = command.name();
    match command.payload() {
        CommandPayload::Vector(v) => format!("{}:{:.3},{:.3}", cmd, v.x, v.y),
        CommandPayload::Angle(a) => format!("{}:{}", cmd, a.degrees()),
        CommandPayload::Flag(on) => format!("{}:{}", cmd, u8::from(on)),
        CommandPayload::None => cmd,
    }
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

pub fn decode(protocol: CommandProtocol, frame: &[u8]) -> Result<DeviceCommand, WireError> {
    match protocol {
        CommandProtocol::Json => {
            let value: Value = serde_json::from_slice(frame).map_err(|_| WireError::Malformed)?;
            decode_json(&value)
        }
        CommandProtocol::Binary => {
            let command = postcard::from_bytes(frame).map_err(binary_error)?;
            checked_command(command)
        }
        CommandProtocol::Text => {
            let text = core::str::from_utf8(frame).map_err(|_| WireError::Malformed)?;
            decode_text(text)
        }
    }
}

/// Parse one text frame, e.g. `SERVO:90` or `RELAY_21_OFF`.
pub fn decode_text(frame: &str) -> Result<DeviceCommand, WireError> {
    let frame = frame.trim();
    if frame.is_empty() || frame.len() > MAX_TEXT_FRAME {
        return Err(WireError::Malformed);
    }

    if let Some(rest) = frame.strip_prefix("RELAY_") {
        return parse_relay(rest);
    }

    let (name, arg) = frame.split_once(':').ok_or(WireError::Malformed)?;
    match name {
        "MOVE_LEFT" => Ok(DeviceCommand::MoveLeft(parse_vector(arg)?)),
        "MOVE_RIGHT" => Ok(DeviceCommand::MoveRight(parse_vector(arg)?)),
        "SERVO" => {
            let deg: u16 = arg.parse().map_err(|_| WireError::Malformed)?;
            ServoAngle::new(deg)
                .map(DeviceCommand::Servo)
                .ok_or(WireError::OutOfRange)
        }
        "PUMP" => match arg {
            "1" => Ok(DeviceCommand::Pump(true)),
            "0" => Ok(DeviceCommand::Pump(false)),
            _ => Err(WireError::Malformed),
        },
        _ => Err(WireError::UnknownCommand),
    }
}

pub fn decode_json(value: &Value) -> Result<DeviceCommand, WireError> {
    let cmd = value
        .get("cmd")
        .and_then(Value::as_str)
        .ok_or(WireError::Malformed)?;
    let payload = value.get("value");

    if let Some(rest) = cmd.strip_prefix("RELAY_") {
        return parse_relay(rest);
    }

    match cmd {
        "MOVE_LEFT" | "MOVE_RIGHT" => {
            let v = payload.ok_or(WireError::Malformed)?;
            let axis = |k: &str| {
                v.get(k)
                    .and_then(Value::as_f64)
                    .ok_or(WireError::Malformed)
            };
            let vector = checked_vector(axis("x")? as f32, axis("y")? as f32)?;
            Ok(if cmd == "MOVE_LEFT" {
                DeviceCommand::MoveLeft(vector)
            } else {
                DeviceCommand::MoveRight(vector)
            })
        }
        "SERVO" => {
            let deg = payload
                .and_then(Value::as_u64)
                .ok_or(WireError::Malformed)?;
            u16::try_from(deg)
                .ok()
                .and_then(ServoAngle::new)
                .map(DeviceCommand::Servo)
                .ok_or(WireError::OutOfRange)
        }
        "PUMP" => payload
            .and_then(Value::as_bool)
            .map(DeviceCommand::Pump)
            .ok_or(WireError::Malformed),
        _ => Err(WireError::UnknownCommand),
    }
}

fn parse_relay(rest: &str) -> Result<DeviceCommand, WireError> {
    let (pin, state) = rest.rsplit_once('_').ok_or(WireError::Malformed)?;
    let pin = pin.parse().map_err(|_| WireError::Malformed)?;
    let on = match state {
        "ON" => true,
        "OFF" => false,
        _ => return Err(WireError::Malformed),
    };
    Ok(DeviceCommand::Relay { pin, on })
}

fn parse_vector(arg: &str) -> Result<JoystickVector, WireError> {
    let (x, y) = arg.split_once(',').ok_or(WireError::Malformed)?;
    let x: f32 = x.trim().parse().map_err(|_| WireError::Malformed)?;
    let y: f32 = y.trim().parse().map_err(|_| WireError::Malformed)?;
    checked_vector(x, y)
}

/// Postcard reports a failed `TryFrom` (e.g. servo angle) as a custom
/// serde error.
fn binary_error(e: postcard::Error) -> WireError {
    match e {
        postcard::Error::SerdeDeCustom => WireError::OutOfRange,
        _ => WireError::Malformed,
    }
}

/// Range-check the payloads serde cannot check on its own.
fn checked_command(command: DeviceCommand) -> Result<DeviceCommand, WireError> {
    match command {
        DeviceCommand::MoveLeft(v) => checked_vector(v.x, v.y).map(DeviceCommand::MoveLeft),
        DeviceCommand::MoveRight(v) => checked_vector(v.x, v.y).map(DeviceCommand::MoveRight),
        other => Ok(other),
    }
}

fn checked_vector(x: f32, y: f32) -> Result<JoystickVector, WireError> {
    let in_range = |v: f32| v.is_finite() && (-1.0..=1.0).contains(&v);
    if in_range(x) && in_range(y) {
        Ok(JoystickVector::new(x, y))
    } else {
        Err(WireError::OutOfRange)
    }
}
