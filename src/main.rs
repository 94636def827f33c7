//! Control panel host simulator.
//!
//! Runs one scripted operator session against the simulated transport
//! and logs every panel event.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  SimulatedTransport  LogEventSink  MemorySettingsStore   │
//! │  (LinkTransport)     (EventSink)   (SettingsPort)        │
//! │  ─────────────── Port Trait Boundary ───────────────     │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │ PanelService: FSM · Relays · Telemetry · Dispatch  │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `rcpanel [settings.json]`

#![deny(unused_must_use)]

use core::time::Duration;

use anyhow::{Context, Result};
use log::info;

use rcpanel::adapters::log_sink::LogEventSink;
use rcpanel::adapters::settings_store::MemorySettingsStore;
use rcpanel::adapters::sim_transport::SimulatedTransport;
use rcpanel::app::ports::SettingsPort;
use rcpanel::config::PanelSettings;
use rcpanel::controls::joystick::{Joystick, JoystickGeometry, JoystickVector, Point, PointerId};
use rcpanel::controls::{JoystickSide, ServoAngle};
use rcpanel::relays::{NewRelay, RelayIcon, RelayPatch};
use rcpanel::telemetry::format_uptime;
use rcpanel::PanelService;

/// Device uptime when the session starts (2h 34m).
const DEVICE_UPTIME_AT_START: Duration = Duration::from_secs(2 * 3600 + 34 * 60);

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // ── Settings ──────────────────────────────────────────────
    let store = match std::env::args().nth(1) {
        Some(path) => {
            let blob = std::fs::read(&path).with_context(|| format!("reading {path}"))?;
            MemorySettingsStore::with_blob(blob)
        }
        None => MemorySettingsStore::new(),
    };
    let settings = store.load().context("loading settings")?;
    settings.validate().context("validating settings")?;
    info!(
        "Panel '{}' protocol={:?} debug={}",
        settings.device_name, settings.protocol, settings.debug_mode
    );

    let mut transport =
        SimulatedTransport::new(settings.protocol).with_device_name(settings.device_name.clone());
    let mut sink = LogEventSink::new();
    let mut panel = PanelService::new(settings);
    panel.start(&mut sink);

    // Rejected while disconnected; the panel reports it and carries on.
    let _ = panel.toggle_relay(1, &mut transport, &mut sink);

    // ── Connect ───────────────────────────────────────────────
    panel.request_connect(&mut transport, &mut sink)?;
    panel.pairing_finished(transport.finish_pairing(), &mut sink)?;
    panel.set_uptime(format_uptime(DEVICE_UPTIME_AT_START));

    // ── Joystick drag ─────────────────────────────────────────
    let center = Point::new(100.0, 100.0);
    let mut stick = Joystick::new(JoystickGeometry::default(), center);
    let mut vectors = Vec::new();
    {
        let mut collect = |v: JoystickVector| vectors.push(v);
        stick.press(PointerId::Mouse, Point::new(130.0, 100.0), &mut collect);
        stick.drag_to(PointerId::Mouse, Point::new(160.0, 40.0), &mut collect);
        stick.drag_to(PointerId::Mouse, Point::new(400.0, 100.0), &mut collect);
        stick.release(PointerId::Mouse, &mut collect);
    }
    for v in vectors {
        panel.joystick(JoystickSide::Left, v, &mut transport, &mut sink)?;
    }

    // ── Servo & pump ──────────────────────────────────────────
    panel.set_servo(ServoAngle::saturating(135), &mut transport, &mut sink)?;
    panel.toggle_pump(&mut transport, &mut sink)?;

    // ── Relays ────────────────────────────────────────────────
    let _ = panel.add_relay(NewRelay::new("Lamp", "", 4, RelayIcon::Lamp), &mut sink);
    let lamp = panel.add_relay(
        NewRelay::new("Desk Lamp", "Reading light", 22, RelayIcon::Lamp),
        &mut sink,
    )?;
    panel.edit_relay(lamp.id, RelayPatch::default().name("Desk Light"), &mut sink)?;
    panel.toggle_relay(lamp.id, &mut transport, &mut sink)?;
    panel.set_all_relays(true, &mut transport, &mut sink)?;
    panel.delete_relay(lamp.id, &mut sink)?;

    // ── Telemetry ─────────────────────────────────────────────
    let step = Duration::from_secs(1);
    let mut uptime = DEVICE_UPTIME_AT_START;
    for _ in 0..30 {
        panel.advance(step, &mut sink);
        uptime += step;
        panel.set_uptime(format_uptime(uptime));
    }

    // ── Disconnect ────────────────────────────────────────────
    panel.disconnect(&mut transport, &mut sink);
    panel.save_settings(&store).context("saving settings")?;

    let view = panel.view();
    info!(
        "Final view: state={} relays={}/{} servo={} pump={} battery={}%",
        view.state,
        view.summary.active,
        view.summary.total,
        view.controls.servo.degrees(),
        view.controls.pump,
        view.telemetry.battery,
    );
    info!(
        "Sent {} command(s): {}",
        transport.sent().len(),
        transport.sent_names().join(", ")
    );
    info!("{} event(s) logged", sink.emitted());
    Ok(())
}
