//! Joystick drag tracking end to end.

use rcpanel::controls::joystick::{
    InputShaping, Joystick, JoystickGeometry, JoystickVector, Point, PointerId,
};

const CENTER: Point = Point { x: 150.0, y: 150.0 };

fn stick() -> Joystick {
    Joystick::new(JoystickGeometry::default(), CENTER)
}

#[test]
fn far_press_is_clamped_to_unit_x() {
    let mut js = stick();
    let mut out = Vec::new();
    js.press(PointerId::Mouse, Point::new(CENTER.x + 300.0, CENTER.y), &mut |v: JoystickVector| out.push(v));

    assert_eq!(out.len(), 1);
    assert!((out[0].x - 1.0).abs() < 1e-6);
    assert!(out[0].y.abs() < 1e-6);
    let knob = js.knob_offset();
    assert!((knob.x - 70.0).abs() < 1e-3);
}

#[test]
fn full_drag_cycle_reports_press_moves_and_release() {
    let mut js = stick();
    let mut out: Vec<JoystickVector> = Vec::new();
    let mut sink = |v: JoystickVector| out.push(v);

    assert!(js.press(PointerId::Touch(1), Point::new(150.0, 115.0), &mut sink));
    assert!(js.drag_to(PointerId::Touch(1), Point::new(185.0, 150.0), &mut sink));
    // Second finger is ignored.
    assert!(!js.drag_to(PointerId::Touch(2), Point::new(0.0, 0.0), &mut sink));
    assert!(!js.press(PointerId::Touch(2), Point::new(0.0, 0.0), &mut sink));
    assert!(js.release(PointerId::Touch(1), &mut sink));
    assert!(!js.is_dragging());

    assert_eq!(out.len(), 3);
    assert!((out[0].y - 0.5).abs() < 1e-5, "upward press is positive y");
    assert!((out[1].x - 0.5).abs() < 1e-5);
    assert_eq!(out[2], JoystickVector::ZERO);
}

#[test]
fn repeated_drags_do_not_leak_attachment() {
    let mut js = stick();
    let mut count = 0;
    let mut sink = |_: JoystickVector| count += 1;
    for _ in 0..5 {
        js.press(PointerId::Mouse, Point::new(160.0, 160.0), &mut sink);
        js.release(PointerId::Mouse, &mut sink);
    }
    // Moves after release go nowhere.
    assert!(!js.drag_to(PointerId::Mouse, Point::new(170.0, 170.0), &mut sink));
    assert_eq!(count, 10);
}

#[test]
fn disabled_stick_reports_nothing() {
    let mut js = stick();
    js.set_disabled(true);
    let mut out = Vec::new();
    assert!(!js.press(PointerId::Mouse, Point::new(200.0, 150.0), &mut |v: JoystickVector| out.push(v)));
    assert!(out.is_empty());
}

#[test]
fn shaping_hook_is_opt_in() {
    let mut js = stick();
    assert!(js.shaping().is_neutral());

    js.set_shaping(InputShaping::from_percent(20, 100));
    let mut out = Vec::new();
    // 7 px of 70 is 0.1, inside a 0.2 deadzone.
    js.press(PointerId::Mouse, Point::new(157.0, 150.0), &mut |v: JoystickVector| out.push(v));
    assert_eq!(out, vec![JoystickVector::ZERO]);
}
