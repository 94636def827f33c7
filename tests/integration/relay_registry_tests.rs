//! Relay CRUD through the service: validation, notices and events.

use rcpanel::PanelService;
use rcpanel::app::events::PanelEvent;
use rcpanel::config::PanelSettings;
use rcpanel::error::{PanelError, ValidationError};
use rcpanel::relays::{NewRelay, RelayIcon, RelayPatch, RelayRegistry};

use crate::mock_transport::{MockTransport, RecordingSink};

fn make_panel() -> (PanelService, MockTransport, RecordingSink) {
    let mut panel = PanelService::with_seed(PanelSettings::default(), 7);
    let mut sink = RecordingSink::new();
    panel.start(&mut sink);
    (panel, MockTransport::new(), sink)
}

fn shape(reg: &RelayRegistry) -> Vec<(u32, u8, String)> {
    reg.iter().map(|r| (r.id, r.pin, r.name.clone())).collect()
}

#[test]
fn duplicate_pin_scenario() {
    let mut reg = RelayRegistry::new();
    for (name, pin) in [("A", 2), ("B", 4), ("C", 5)] {
        reg.add(NewRelay::new(name, "", pin, RelayIcon::Plug)).unwrap();
    }
    let before = shape(&reg);

    let err = reg
        .add(NewRelay::new("Lamp", "", 4, RelayIcon::from_name("Lamp")))
        .unwrap_err();
    assert_eq!(err, PanelError::Validation(ValidationError::PinInUse(4)));
    assert_eq!(reg.len(), 3);
    assert_eq!(shape(&reg), before);
}

#[test]
fn crud_is_allowed_while_disconnected() {
    let (mut panel, _, mut sink) = make_panel();

    let r = panel
        .add_relay(NewRelay::new("Heater", "Bench heater", 23, RelayIcon::Thermometer), &mut sink)
        .unwrap();
    assert_eq!(r.id, 7);
    assert!(!r.state);

    panel
        .edit_relay(r.id, RelayPatch::default().description("Shop heater"), &mut sink)
        .unwrap();
    panel.delete_relay(r.id, &mut sink).unwrap();

    assert_eq!(
        sink.notice_titles(),
        vec!["Relay Added", "Relay Updated", "Relay Deleted"]
    );
    assert!(sink.events.contains(&PanelEvent::RelayRemoved(7)));
}

#[test]
fn edit_keeping_own_pin_never_collides() {
    let (mut panel, _, mut sink) = make_panel();
    for id in 1..=6 {
        let pin = panel.relays().get(id).unwrap().pin;
        let r = panel
            .edit_relay(id, RelayPatch::default().name("Renamed").pin(pin), &mut sink)
            .unwrap();
        assert_eq!(r.pin, pin);
    }
}

#[test]
fn edit_rejections_leave_relay_untouched() {
    let (mut panel, _, mut sink) = make_panel();
    let before = shape(panel.relays());

    assert_eq!(
        panel
            .edit_relay(1, RelayPatch::default().name("  "), &mut sink)
            .unwrap_err(),
        PanelError::Validation(ValidationError::EmptyName)
    );
    assert_eq!(
        panel
            .edit_relay(1, RelayPatch::default().name("X").pin(21), &mut sink)
            .unwrap_err(),
        PanelError::Validation(ValidationError::PinInUse(21))
    );
    assert_eq!(
        panel
            .edit_relay(99, RelayPatch::default().name("X"), &mut sink)
            .unwrap_err(),
        PanelError::NotFound(99)
    );
    assert_eq!(shape(panel.relays()), before);
    assert_eq!(
        sink.notice_titles(),
        vec!["Name Required", "Pin already in use", "Relay Not Found"]
    );
}

#[test]
fn delete_keeps_other_ids_and_pins() {
    let (mut panel, _, mut sink) = make_panel();
    panel.delete_relay(3, &mut sink).unwrap();

    let remaining: Vec<_> = panel.relays().iter().map(|r| (r.id, r.pin)).collect();
    assert_eq!(remaining, vec![(1, 2), (2, 4), (4, 18), (5, 19), (6, 21)]);
    assert_eq!(
        panel.delete_relay(3, &mut sink).unwrap_err(),
        PanelError::NotFound(3)
    );
    // Freed pin is offered again.
    assert!(panel.relays().free_pins().any(|p| p == 5));
}

#[test]
fn toggle_unknown_relay_while_connected_is_not_found() {
    let (mut panel, mut t, mut sink) = make_panel();
    panel.request_connect(&mut t, &mut sink).unwrap();
    panel.pairing_finished(Ok("dev".into()), &mut sink).unwrap();

    assert_eq!(
        panel.toggle_relay(42, &mut t, &mut sink).unwrap_err(),
        PanelError::NotFound(42)
    );
    assert!(t.sent().is_empty());
}
