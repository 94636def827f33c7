//! Panel service: the hexagonal core.
//!
//! [`PanelService`] owns the link FSM, the session blackboard and the
//! command dispatcher.  All I/O flows through port traits passed in at
//! each call, so the whole service runs against mocks in tests.
//!
//! ```text
//!  LinkTransport ◀──┌──────────────────────────┐──▶ EventSink
//!                   │       PanelService       │
//!  SettingsPort ◀──▶│ FSM · Relays · Telemetry │
//!                   └──────────────────────────┘
//! ```

use core::time::Duration;

use log::{debug, info, warn};

use crate::config::PanelSettings;
use crate::controls::joystick::{InputShaping, JoystickVector};
use crate::controls::{ControlState, JoystickSide, ServoAngle};
use crate::dispatch::{CommandDispatcher, DeviceCommand};
use crate::error::{PanelError, Result, TransportError, ValidationError};
use crate::fsm::context::SessionContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, LinkEvent, LinkState};
use crate::relays::{
    NewRelay, Relay, RelayIcon, RelayId, RelayPatch, RelayRegistry, RelaySummary, RelaySwitch,
};
use crate::telemetry::DeviceTelemetry;

use super::commands::PanelCommand;
use super::events::{Notice, PanelEvent};
use super::ports::{EventSink, LinkTransport, SettingsError, SettingsPort};

// ───────────────────────────────────────────────────────────────
// Display projection
// ───────────────────────────────────────────────────────────────

/// One relay as the panel should draw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayView {
    pub id: RelayId,
    pub name: String,
    pub icon: RelayIcon,
    pub asset: &'static str,
    pub description: String,
    pub pin: u8,
    /// Stored state conjoined with the link being up.
    pub on: bool,
}

/// Everything the panel shows, with disconnect masking applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub state: LinkState,
    pub device_name: Option<String>,
    pub telemetry: DeviceTelemetry,
    pub controls: ControlState,
    pub relays: Vec<RelayView>,
    pub summary: RelaySummary,
}

// ───────────────────────────────────────────────────────────────
// PanelService
// ───────────────────────────────────────────────────────────────

pub struct PanelService {
    fsm: Fsm,
    ctx: SessionContext,
    dispatcher: CommandDispatcher,
    settings: PanelSettings,
    /// Battery level after the previous telemetry tick.
    last_battery: u8,
    settings_dirty: bool,
}

impl PanelService {
    /// Construct with the default relay set and entropy-seeded telemetry.
    ///
    /// Does **not** start the FSM; call [`start`](Self::start) next.
    pub fn new(settings: PanelSettings) -> Self {
        Self::from_context(settings, SessionContext::new(RelayRegistry::with_defaults()))
    }

    /// Same as [`new`](Self::new) with a deterministic telemetry walk.
    pub fn with_seed(settings: PanelSettings, seed: u64) -> Self {
        Self::from_context(
            settings,
            SessionContext::with_seed(RelayRegistry::with_defaults(), seed),
        )
    }

    fn from_context(settings: PanelSettings, ctx: SessionContext) -> Self {
        Self {
            fsm: Fsm::new(build_state_table(), LinkState::Disconnected),
            dispatcher: CommandDispatcher::new(settings.debug_mode),
            last_battery: ctx.telemetry.current().battery,
            ctx,
            settings,
            settings_dirty: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        sink.emit(&PanelEvent::Started(self.fsm.current_state()));
        info!("PanelService started in {}", self.fsm.current_state());
    }

    // ── Link ──────────────────────────────────────────────────

    /// Begin connecting.  No-op while already connecting or connected.
    pub fn request_connect(
        &mut self,
        transport: &mut impl LinkTransport,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        match self.state() {
            LinkState::Connecting => {
                debug!("connect ignored: pairing already in progress");
                return Ok(());
            }
            LinkState::Connected => {
                debug!("connect ignored: already connected");
                return Ok(());
            }
            LinkState::Disconnected => {}
        }

        if !transport.is_available() {
            warn!("connect rejected: no wireless pairing on this platform");
            sink.emit(&PanelEvent::Notice(Notice::error(
                "Bluetooth not supported",
                "This platform cannot pair with wireless devices",
            )));
            return Err(TransportError::Unsupported.into());
        }

        self.apply(LinkEvent::ConnectRequested, sink);
        if let Err(e) = transport.request_connection() {
            self.fail_pairing(e, sink);
            return Err(e.into());
        }
        Ok(())
    }

    /// Report the outcome of a pairing.  Ignored unless connecting.
    pub fn pairing_finished(
        &mut self,
        outcome: core::result::Result<String, TransportError>,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        if self.state() != LinkState::Connecting {
            warn!("pairing outcome ignored in state {}", self.state());
            return Ok(());
        }
        match outcome {
            Ok(name) => {
                self.ctx.device_name = Some(name.clone());
                self.apply(LinkEvent::PairingSucceeded, sink);
                self.last_battery = self.ctx.telemetry.current().battery;
                sink.emit(&PanelEvent::Notice(Notice::info(
                    "Connected",
                    format!("Connected to {name}"),
                )));
                Ok(())
            }
            Err(e) => {
                self.fail_pairing(e, sink);
                Err(e.into())
            }
        }
    }

    /// Operator disconnect, or cancellation of a pending pairing.
    pub fn disconnect(&mut self, transport: &mut impl LinkTransport, sink: &mut impl EventSink) {
        if self.state() == LinkState::Disconnected {
            return;
        }
        transport.disconnect();
        if self.apply(LinkEvent::DisconnectRequested, sink) {
            sink.emit(&PanelEvent::Notice(Notice::info(
                "Disconnected",
                "Device disconnected",
            )));
        }
    }

    /// The transport dropped the link on its own.
    pub fn link_lost(&mut self, sink: &mut impl EventSink) {
        if self.apply(LinkEvent::LinkLost, sink) {
            sink.emit(&PanelEvent::Notice(Notice::warning(
                "Disconnected",
                "Connection to the device was lost",
            )));
        }
    }

    /// Drive the telemetry timer by `dt`.  Returns the ticks applied.
    pub fn advance(&mut self, dt: Duration, sink: &mut impl EventSink) -> u32 {
        let alert = self.settings.battery_alert;
        let last_battery = &mut self.last_battery;
        self.ctx.telemetry.advance_with(dt, |t| {
            sink.emit(&PanelEvent::Telemetry(t.clone()));
            if *last_battery > alert && t.battery <= alert {
                warn!("battery at {}% (alert {}%)", t.battery, alert);
                sink.emit(&PanelEvent::Notice(Notice::warning(
                    "Battery Low",
                    format!("Device battery at {}%", t.battery),
                )));
            }
            *last_battery = t.battery;
        })
    }

    // ── Controls ──────────────────────────────────────────────

    /// Forward a joystick vector.  Stored only if it was sent.
    pub fn joystick(
        &mut self,
        side: JoystickSide,
        vector: JoystickVector,
        transport: &mut impl LinkTransport,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        self.send(DeviceCommand::joystick(side, vector), transport, sink)?;
        self.ctx.controls.set_joystick(side, vector);
        Ok(())
    }

    pub fn set_servo(
        &mut self,
        angle: ServoAngle,
        transport: &mut impl LinkTransport,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        self.send(DeviceCommand::Servo(angle), transport, sink)?;
        self.ctx.controls.servo = angle;
        Ok(())
    }

    /// Flip the pump.  Returns the new pump state.
    pub fn toggle_pump(
        &mut self,
        transport: &mut impl LinkTransport,
        sink: &mut impl EventSink,
    ) -> Result<bool> {
        let on = !self.ctx.controls.pump;
        self.send(DeviceCommand::Pump(on), transport, sink)?;
        self.ctx.controls.pump = on;
        Ok(on)
    }

    // ── Relays ────────────────────────────────────────────────

    pub fn add_relay(&mut self, new: NewRelay, sink: &mut impl EventSink) -> Result<Relay> {
        match self.ctx.relays.add(new) {
            Ok(relay) => {
                sink.emit(&PanelEvent::RelayAdded(relay.clone()));
                sink.emit(&PanelEvent::Notice(Notice::info(
                    "Relay Added",
                    format!("{} has been added", relay.name),
                )));
                Ok(relay)
            }
            Err(e) => Err(reject(e, sink)),
        }
    }

    pub fn edit_relay(
        &mut self,
        id: RelayId,
        patch: RelayPatch,
        sink: &mut impl EventSink,
    ) -> Result<Relay> {
        match self.ctx.relays.edit(id, patch) {
            Ok(relay) => {
                sink.emit(&PanelEvent::RelayUpdated(relay.clone()));
                sink.emit(&PanelEvent::Notice(Notice::info(
                    "Relay Updated",
                    format!("{} has been updated", relay.name),
                )));
                Ok(relay)
            }
            Err(e) => Err(reject(e, sink)),
        }
    }

    pub fn toggle_relay(
        &mut self,
        id: RelayId,
        transport: &mut impl LinkTransport,
        sink: &mut impl EventSink,
    ) -> Result<RelaySwitch> {
        let connected = self.state().is_connected();
        let switch = self
            .ctx
            .relays
            .toggle(id, connected)
            .map_err(|e| reject(e, sink))?;
        self.send(switch.into(), transport, sink)?;
        sink.emit(&PanelEvent::RelayChanged(switch));
        Ok(switch)
    }

    pub fn delete_relay(&mut self, id: RelayId, sink: &mut impl EventSink) -> Result<Relay> {
        match self.ctx.relays.delete(id) {
            Ok(relay) => {
                sink.emit(&PanelEvent::RelayRemoved(relay.id));
                sink.emit(&PanelEvent::Notice(Notice::info(
                    "Relay Deleted",
                    format!("{} has been removed", relay.name),
                )));
                Ok(relay)
            }
            Err(e) => Err(reject(e, sink)),
        }
    }

    /// Switch every relay.  Returns how many commands were sent.
    pub fn set_all_relays(
        &mut self,
        on: bool,
        transport: &mut impl LinkTransport,
        sink: &mut impl EventSink,
    ) -> Result<usize> {
        let connected = self.state().is_connected();
        let batch = self
            .ctx
            .relays
            .set_all(on, connected)
            .map_err(|e| reject(e, sink))?;
        for switch in &batch {
            self.send((*switch).into(), transport, sink)?;
            sink.emit(&PanelEvent::RelayChanged(*switch));
        }
        let (title, detail) = if on {
            ("All Relays ON", "All relays have been turned on")
        } else {
            ("All Relays OFF", "All relays have been turned off")
        };
        sink.emit(&PanelEvent::Notice(Notice::info(title, detail)));
        Ok(batch.len())
    }

    pub fn relay_summary(&self) -> RelaySummary {
        self.ctx.relays.summary()
    }

    pub fn relays(&self) -> &RelayRegistry {
        &self.ctx.relays
    }

    // ── Settings ──────────────────────────────────────────────

    /// Validate and adopt new settings.  Marks them for saving.
    pub fn update_settings(
        &mut self,
        settings: PanelSettings,
    ) -> core::result::Result<(), SettingsError> {
        settings.validate()?;
        self.adopt(settings);
        self.settings_dirty = true;
        info!("Settings updated");
        Ok(())
    }

    pub fn save_settings(
        &mut self,
        port: &impl SettingsPort,
    ) -> core::result::Result<(), SettingsError> {
        port.save(&self.settings)?;
        self.settings_dirty = false;
        info!("Settings saved");
        Ok(())
    }

    /// Replace the live settings with the stored ones.  On error the
    /// live settings are left as they were.
    pub fn load_settings(
        &mut self,
        port: &impl SettingsPort,
    ) -> core::result::Result<(), SettingsError> {
        let settings = port.load()?;
        settings.validate()?;
        self.adopt(settings);
        self.settings_dirty = false;
        info!("Settings loaded");
        Ok(())
    }

    pub fn settings(&self) -> &PanelSettings {
        &self.settings
    }

    pub fn is_settings_dirty(&self) -> bool {
        self.settings_dirty
    }

    /// Joystick shaping derived from the deadzone and sensitivity
    /// settings.  Callers opt in by installing it on a joystick.
    pub fn input_shaping(&self) -> InputShaping {
        InputShaping::from_percent(self.settings.deadzone, self.settings.sensitivity)
    }

    // ── Command handling ──────────────────────────────────────

    pub fn handle_command(
        &mut self,
        cmd: PanelCommand,
        transport: &mut impl LinkTransport,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        match cmd {
            PanelCommand::Connect => self.request_connect(transport, sink),
            PanelCommand::Disconnect => {
                self.disconnect(transport, sink);
                Ok(())
            }
            PanelCommand::PairingFinished(outcome) => self.pairing_finished(outcome, sink),
            PanelCommand::LinkLost => {
                self.link_lost(sink);
                Ok(())
            }
            PanelCommand::Joystick { side, vector } => self.joystick(side, vector, transport, sink),
            PanelCommand::SetServo(angle) => self.set_servo(angle, transport, sink),
            PanelCommand::TogglePump => self.toggle_pump(transport, sink).map(|_| ()),
            PanelCommand::AddRelay(new) => self.add_relay(new, sink).map(|_| ()),
            PanelCommand::EditRelay { id, patch } => self.edit_relay(id, patch, sink).map(|_| ()),
            PanelCommand::ToggleRelay(id) => self.toggle_relay(id, transport, sink).map(|_| ()),
            PanelCommand::DeleteRelay(id) => self.delete_relay(id, sink).map(|_| ()),
            PanelCommand::SetAllRelays(on) => {
                self.set_all_relays(on, transport, sink).map(|_| ())
            }
            PanelCommand::UpdateSettings(settings) => {
                if let Err(e) = self.update_settings(settings) {
                    warn!("settings rejected: {}", e);
                    sink.emit(&PanelEvent::Notice(Notice::error(
                        "Invalid Settings",
                        e.to_string(),
                    )));
                }
                Ok(())
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> LinkState {
        self.fsm.current_state()
    }

    pub fn device_name(&self) -> Option<&str> {
        self.ctx.device_name.as_deref()
    }

    /// Stored (unmasked) telemetry.
    pub fn telemetry(&self) -> &DeviceTelemetry {
        self.ctx.telemetry.current()
    }

    /// Stored (unmasked) control values.
    pub fn controls(&self) -> &ControlState {
        &self.ctx.controls
    }

    /// Uptime comes from outside the simulator.
    pub fn set_uptime(&mut self, uptime: impl Into<String>) {
        self.ctx.telemetry.set_uptime(uptime);
    }

    pub fn commands_sent(&self) -> u64 {
        self.dispatcher.sent_count()
    }

    /// What the panel shows right now.
    pub fn view(&self) -> PanelView {
        let connected = self.state().is_connected();
        PanelView {
            state: self.state(),
            device_name: self.ctx.device_name.clone(),
            telemetry: self.ctx.telemetry.current().displayed(connected),
            controls: self.ctx.controls.displayed(connected),
            relays: self
                .ctx
                .relays
                .iter()
                .map(|r| RelayView {
                    id: r.id,
                    name: r.name.clone(),
                    icon: r.icon,
                    asset: r.icon.asset(),
                    description: r.description.clone(),
                    pin: r.pin,
                    on: r.is_on(connected),
                })
                .collect(),
            summary: self.ctx.relays.summary(),
        }
    }

    // ── Internal ──────────────────────────────────────────────

    /// Feed the FSM and report what happened.  Returns `true` on a
    /// transition.
    fn apply(&mut self, event: LinkEvent, sink: &mut impl EventSink) -> bool {
        let Some((from, to)) = self.fsm.handle(event, &mut self.ctx) else {
            return false;
        };
        sink.emit(&PanelEvent::StateChanged { from, to });
        if to == LinkState::Disconnected && self.ctx.forced_off > 0 {
            sink.emit(&PanelEvent::RelaysForcedOff(self.ctx.forced_off));
        }
        true
    }

    fn fail_pairing(&mut self, error: TransportError, sink: &mut impl EventSink) {
        warn!("pairing failed: {}", error);
        self.apply(LinkEvent::PairingFailed, sink);
        sink.emit(&PanelEvent::Notice(Notice::error(
            "Connection failed",
            error.to_string(),
        )));
    }

    fn send(
        &mut self,
        command: DeviceCommand,
        transport: &mut impl LinkTransport,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let state = self.state();
        self.dispatcher
            .dispatch(state, command, transport)
            .map_err(|e| reject(e, sink))
    }

    fn adopt(&mut self, settings: PanelSettings) {
        self.dispatcher.set_verbose(settings.debug_mode);
        self.settings = settings;
    }
}

/// Surface a rejected action as a notice and hand the error back.
fn reject(error: PanelError, sink: &mut impl EventSink) -> PanelError {
    warn!("action rejected: {}", error);
    let notice = match error {
        PanelError::NotConnected => {
            Notice::warning("Not Connected", "Please connect to the device first")
        }
        PanelError::NotFound(id) => Notice::error("Relay Not Found", format!("No relay with id {id}")),
        PanelError::Validation(ValidationError::EmptyName) => {
            Notice::error("Name Required", "Please enter a relay name")
        }
        PanelError::Validation(ValidationError::PinInUse(pin)) => Notice::error(
            "Pin already in use",
            format!("GPIO {pin} is already assigned to another relay"),
        ),
        PanelError::Validation(ValidationError::PinNotAllowed(pin)) => Notice::error(
            "Pin not allowed",
            format!("GPIO {pin} cannot drive a relay"),
        ),
        PanelError::Validation(ValidationError::RegistryFull) => {
            Notice::error("No free pins", "Every relay pin is already assigned")
        }
        PanelError::Transport(e) => Notice::error("Connection failed", e.to_string()),
    };
    sink.emit(&PanelEvent::Notice(notice));
    error
}
