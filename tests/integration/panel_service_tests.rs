//! PanelService: link lifecycle, gating and masking through the public API.

use core::time::Duration;

use rcpanel::PanelService;
use rcpanel::app::commands::PanelCommand;
use rcpanel::app::events::{NoticeLevel, PanelEvent};
use rcpanel::config::PanelSettings;
use rcpanel::controls::joystick::JoystickVector;
use rcpanel::controls::{JoystickSide, ServoAngle};
use rcpanel::dispatch::DeviceCommand;
use rcpanel::error::{PanelError, TransportError};
use rcpanel::fsm::LinkState;
use rcpanel::relays::RelaySummary;
use rcpanel::telemetry::DeviceTelemetry;

use crate::mock_transport::{LinkCall, MockTransport, RecordingSink};

fn make_panel() -> (PanelService, MockTransport, RecordingSink) {
    let mut panel = PanelService::with_seed(PanelSettings::default(), 2024);
    let transport = MockTransport::new();
    let mut sink = RecordingSink::new();
    panel.start(&mut sink);
    (panel, transport, sink)
}

fn connect(panel: &mut PanelService, transport: &mut MockTransport, sink: &mut RecordingSink) {
    panel.request_connect(transport, sink).unwrap();
    panel.pairing_finished(Ok("ESP32-Bench".into()), sink).unwrap();
    assert_eq!(panel.state(), LinkState::Connected);
}

// ── Link lifecycle ────────────────────────────────────────────

#[test]
fn connect_walks_through_connecting() {
    let (mut panel, mut t, mut sink) = make_panel();

    panel.request_connect(&mut t, &mut sink).unwrap();
    assert_eq!(panel.state(), LinkState::Connecting);
    assert_eq!(t.count(&LinkCall::RequestConnection), 1);

    panel.pairing_finished(Ok("ESP32-Bench".into()), &mut sink).unwrap();
    assert_eq!(panel.state(), LinkState::Connected);
    assert_eq!(panel.device_name(), Some("ESP32-Bench"));
    assert!(sink.notice_titles().contains(&"Connected"));
}

#[test]
fn immediate_request_failure_returns_to_disconnected() {
    let (mut panel, mut t, mut sink) = make_panel();
    t.request_result = Err(TransportError::Cancelled);

    let err = panel.request_connect(&mut t, &mut sink).unwrap_err();
    assert_eq!(err, PanelError::Transport(TransportError::Cancelled));
    assert_eq!(panel.state(), LinkState::Disconnected);
    assert!(sink.events.contains(&PanelEvent::StateChanged {
        from: LinkState::Connecting,
        to: LinkState::Disconnected,
    }));
}

#[test]
fn unsupported_platform_never_reaches_connecting() {
    let (mut panel, mut t, mut sink) = make_panel();
    t.available = false;

    assert!(panel.request_connect(&mut t, &mut sink).is_err());
    assert_eq!(panel.state(), LinkState::Disconnected);
    assert!(t.calls.is_empty());
    assert!(
        !sink
            .events
            .iter()
            .any(|e| matches!(e, PanelEvent::StateChanged { .. }))
    );
    assert_eq!(sink.notice_titles(), vec!["Bluetooth not supported"]);
}

#[test]
fn user_can_cancel_pending_pairing() {
    let (mut panel, mut t, mut sink) = make_panel();
    panel.request_connect(&mut t, &mut sink).unwrap();

    panel.disconnect(&mut t, &mut sink);
    assert_eq!(panel.state(), LinkState::Disconnected);
    assert_eq!(t.count(&LinkCall::Disconnect), 1);

    // The late success is dropped.
    panel.pairing_finished(Ok("late".into()), &mut sink).unwrap();
    assert_eq!(panel.state(), LinkState::Disconnected);
}

#[test]
fn panel_can_retry_after_failures() {
    let (mut panel, mut t, mut sink) = make_panel();
    for _ in 0..3 {
        panel.request_connect(&mut t, &mut sink).unwrap();
        let _ = panel.pairing_finished(Err(TransportError::HandshakeFailed), &mut sink);
        assert_eq!(panel.state(), LinkState::Disconnected);
    }
    connect(&mut panel, &mut t, &mut sink);
    assert_eq!(sink.notices_at(NoticeLevel::Error), 3);
}

#[test]
fn disconnect_while_disconnected_is_quiet() {
    let (mut panel, mut t, mut sink) = make_panel();
    sink.clear();
    panel.disconnect(&mut t, &mut sink);
    panel.link_lost(&mut sink);
    assert!(t.calls.is_empty());
    assert!(sink.events.is_empty());
}

// ── Relay toggle and forced reset ─────────────────────────────

#[test]
fn toggle_then_link_loss_resets_relay() {
    let (mut panel, mut t, mut sink) = make_panel();
    connect(&mut panel, &mut t, &mut sink);

    panel.toggle_relay(1, &mut t, &mut sink).unwrap();
    assert!(panel.relays().get(1).unwrap().state);
    assert_eq!(t.sent_names(), vec!["RELAY_2_ON"]);

    panel.link_lost(&mut sink);
    assert_eq!(panel.state(), LinkState::Disconnected);
    assert!(!panel.relays().get(1).unwrap().state);
    // The reset is local; nothing extra was sent.
    assert_eq!(t.sent().len(), 1);
}

#[test]
fn set_all_dispatches_one_command_per_relay() {
    let (mut panel, mut t, mut sink) = make_panel();
    connect(&mut panel, &mut t, &mut sink);

    assert_eq!(panel.set_all_relays(true, &mut t, &mut sink).unwrap(), 6);
    assert_eq!(
        t.sent_names(),
        vec![
            "RELAY_2_ON",
            "RELAY_4_ON",
            "RELAY_5_ON",
            "RELAY_18_ON",
            "RELAY_19_ON",
            "RELAY_21_ON"
        ]
    );
    assert_eq!(panel.relay_summary(), RelaySummary { active: 6, total: 6 });
    assert!(sink.notice_titles().contains(&"All Relays ON"));
}

#[test]
fn gated_actions_are_dropped_not_queued() {
    let (mut panel, mut t, mut sink) = make_panel();

    let _ = panel.toggle_relay(1, &mut t, &mut sink);
    let _ = panel.set_all_relays(true, &mut t, &mut sink);
    let _ = panel.joystick(JoystickSide::Left, JoystickVector::new(0.5, 0.5), &mut t, &mut sink);
    let _ = panel.set_servo(ServoAngle::MAX, &mut t, &mut sink);

    connect(&mut panel, &mut t, &mut sink);
    assert!(t.sent().is_empty());
    assert_eq!(panel.relay_summary().active, 0);
    assert!(panel.controls().left.is_zero());
}

// ── Controls ──────────────────────────────────────────────────

#[test]
fn controls_forward_their_payloads() {
    let (mut panel, mut t, mut sink) = make_panel();
    connect(&mut panel, &mut t, &mut sink);

    let v = JoystickVector::new(0.25, -1.0);
    panel.joystick(JoystickSide::Right, v, &mut t, &mut sink).unwrap();
    panel.set_servo(ServoAngle::saturating(10), &mut t, &mut sink).unwrap();
    panel.toggle_pump(&mut t, &mut sink).unwrap();
    panel.toggle_pump(&mut t, &mut sink).unwrap();

    assert_eq!(
        t.sent(),
        vec![
            DeviceCommand::MoveRight(v),
            DeviceCommand::Servo(ServoAngle::saturating(10)),
            DeviceCommand::Pump(true),
            DeviceCommand::Pump(false),
        ]
    );
    assert_eq!(panel.commands_sent(), 4);
}

#[test]
fn reconnect_resumes_stored_servo_and_pump() {
    let (mut panel, mut t, mut sink) = make_panel();
    connect(&mut panel, &mut t, &mut sink);
    panel.set_servo(ServoAngle::saturating(150), &mut t, &mut sink).unwrap();
    panel.toggle_pump(&mut t, &mut sink).unwrap();

    panel.disconnect(&mut t, &mut sink);
    let masked = panel.view();
    assert_eq!(masked.controls.servo, ServoAngle::MIN);
    assert!(!masked.controls.pump);

    connect(&mut panel, &mut t, &mut sink);
    let shown = panel.view();
    assert_eq!(shown.controls.servo.degrees(), 150);
    assert!(shown.controls.pump);
}

// ── Telemetry ─────────────────────────────────────────────────

#[test]
fn telemetry_freezes_on_disconnect_and_rebaselines_on_connect() {
    let (mut panel, mut t, mut sink) = make_panel();
    connect(&mut panel, &mut t, &mut sink);

    panel.advance(Duration::from_secs(50), &mut sink);
    assert_eq!(sink.telemetry_ticks(), 10);

    panel.disconnect(&mut t, &mut sink);
    let frozen = panel.telemetry().clone();
    sink.clear();
    panel.advance(Duration::from_secs(120), &mut sink);
    assert_eq!(sink.telemetry_ticks(), 0);
    assert_eq!(panel.telemetry(), &frozen);
    assert_eq!(panel.view().telemetry, DeviceTelemetry::masked());

    connect(&mut panel, &mut t, &mut sink);
    let base = DeviceTelemetry::baseline();
    assert_eq!(panel.telemetry().battery, base.battery);
    assert_eq!(panel.telemetry().signal, base.signal);
}

#[test]
fn partial_period_is_dropped_on_disconnect() {
    let (mut panel, mut t, mut sink) = make_panel();
    connect(&mut panel, &mut t, &mut sink);
    panel.advance(Duration::from_secs(4), &mut sink);
    panel.disconnect(&mut t, &mut sink);
    connect(&mut panel, &mut t, &mut sink);
    sink.clear();

    panel.advance(Duration::from_secs(4), &mut sink);
    assert_eq!(sink.telemetry_ticks(), 0);
    panel.advance(Duration::from_secs(1), &mut sink);
    assert_eq!(sink.telemetry_ticks(), 1);
}

#[test]
fn host_suspend_step_is_bounded() {
    let (mut panel, mut t, mut sink) = make_panel();
    connect(&mut panel, &mut t, &mut sink);
    sink.clear();

    let applied = panel.advance(Duration::MAX, &mut sink);
    assert_eq!(applied, rcpanel::telemetry::MAX_CATCH_UP_TICKS);
    assert_eq!(sink.telemetry_ticks(), applied as usize);
    assert_eq!(panel.state(), LinkState::Connected);
}

// ── Command surface ───────────────────────────────────────────

#[test]
fn handle_command_covers_the_session() {
    let (mut panel, mut t, mut sink) = make_panel();

    panel.handle_command(PanelCommand::Connect, &mut t, &mut sink).unwrap();
    panel
        .handle_command(PanelCommand::PairingFinished(Ok("Rover".into())), &mut t, &mut sink)
        .unwrap();
    panel
        .handle_command(PanelCommand::ToggleRelay(3), &mut t, &mut sink)
        .unwrap();
    panel
        .handle_command(PanelCommand::SetServo(ServoAngle::MIN), &mut t, &mut sink)
        .unwrap();
    panel.handle_command(PanelCommand::Disconnect, &mut t, &mut sink).unwrap();

    assert_eq!(panel.state(), LinkState::Disconnected);
    assert_eq!(t.sent_names(), vec!["RELAY_5_ON", "SERVO"]);
    assert_eq!(
        panel.handle_command(PanelCommand::ToggleRelay(3), &mut t, &mut sink),
        Err(PanelError::NotConnected)
    );
}

#[test]
fn invalid_settings_command_is_reported_not_applied() {
    let (mut panel, mut t, mut sink) = make_panel();
    let mut bad = PanelSettings::default();
    bad.pump_duration = 50;

    panel
        .handle_command(PanelCommand::UpdateSettings(bad), &mut t, &mut sink)
        .unwrap();
    assert_eq!(panel.settings().pump_duration, 1000);
    assert!(sink.notice_titles().contains(&"Invalid Settings"));
}
