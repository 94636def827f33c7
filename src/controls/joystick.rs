//! Analog joystick: pointer position → normalized vector.
//!
//! ```text
//!            +ny (up)
//!              │
//!      ┌───────┼───────┐
//!      │    .--┼--.    │      R = (size - handle) / 2
//!  ────┼───(   ●   )───┼──▶ +nx
//!      │    '--┼--'    │      |(nx, ny)| <= 1
//!      └───────┼───────┘
//! ```
//!
//! Offsets beyond `R` are projected back onto the circle along their polar
//! angle, so the input space stays circular rather than square.  Screen Y
//! grows downward; the normalized Y is inverted so an upward drag is
//! positive.

use serde::{Deserialize, Serialize};

/// Handle diameter as a fraction of the control diameter.
pub const HANDLE_RATIO: f32 = 0.3;

/// A normalized stick deflection, each axis in `[-1.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JoystickVector {
    pub x: f32,
    pub y: f32,
}

impl JoystickVector {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// A screen-space position or offset, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Size of the rendered control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoystickGeometry {
    /// Outer diameter (px).
    pub size: f32,
}

impl Default for JoystickGeometry {
    fn default() -> Self {
        Self { size: 200.0 }
    }
}

impl JoystickGeometry {
    /// Compact layout used in mobile landscape.
    pub const COMPACT: Self = Self { size: 140.0 };

    pub fn new(size: f32) -> Self {
        Self { size }
    }

    pub fn handle_size(&self) -> f32 {
        self.size * HANDLE_RATIO
    }

    /// Maximum knob travel from the center.
    pub fn max_radius(&self) -> f32 {
        (self.size - self.handle_size()) / 2.0
    }
}

/// Clamp an offset onto the disc of radius `max_radius`, preserving its
/// direction.  Offsets inside the disc are returned untouched.  A
/// degenerate radius (zero, negative or NaN) pins the knob at the center.
pub fn clamp_offset(dx: f32, dy: f32, max_radius: f32) -> (f32, f32) {
    if !is_usable_radius(max_radius) {
        return (0.0, 0.0);
    }
    let distance = (dx * dx + dy * dy).sqrt();
    if distance > max_radius {
        let angle = dy.atan2(dx);
        (angle.cos() * max_radius, angle.sin() * max_radius)
    } else {
        (dx, dy)
    }
}

/// Map a clamped offset to a normalized vector (Y inverted).
pub fn normalize(dx: f32, dy: f32, max_radius: f32) -> JoystickVector {
    if !is_usable_radius(max_radius) {
        return JoystickVector::ZERO;
    }
    let (cx, cy) = clamp_offset(dx, dy, max_radius);
    JoystickVector {
        x: cx / max_radius,
        y: -cy / max_radius,
    }
}

fn is_usable_radius(r: f32) -> bool {
    r.is_finite() && r > 0.0
}

// ---------------------------------------------------------------------------
// Input shaping hook
// ---------------------------------------------------------------------------

/// Optional deadzone and sensitivity applied after normalization.
///
/// Neutral by default.  The settings record carries matching sliders but
/// nothing installs them automatically; callers opt in with
/// [`Joystick::set_shaping`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputShaping {
    /// Magnitudes at or below this (0.0-1.0) report as zero.
    pub deadzone_radius: f32,
    /// Output multiplier; results are re-clamped to the unit circle.
    pub sensitivity_scale: f32,
}

impl Default for InputShaping {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl InputShaping {
    pub const NEUTRAL: Self = Self {
        deadzone_radius: 0.0,
        sensitivity_scale: 1.0,
    };

    /// Build from the settings' percentages: deadzone 5 % → radius 0.05,
    /// sensitivity 100 % → scale 1.0.
    pub fn from_percent(deadzone_pct: u8, sensitivity_pct: u8) -> Self {
        Self {
            deadzone_radius: f32::from(deadzone_pct.min(100)) / 100.0,
            sensitivity_scale: f32::from(sensitivity_pct) / 100.0,
        }
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }

    pub fn apply(&self, v: JoystickVector) -> JoystickVector {
        if self.is_neutral() {
            return v;
        }
        let magnitude = v.magnitude();
        if magnitude <= self.deadzone_radius {
            return JoystickVector::ZERO;
        }
        let scaled = JoystickVector::new(v.x * self.sensitivity_scale, v.y * self.sensitivity_scale);
        let scaled_mag = scaled.magnitude();
        if scaled_mag > 1.0 {
            JoystickVector::new(scaled.x / scaled_mag, scaled.y / scaled_mag)
        } else {
            scaled
        }
    }
}

// ---------------------------------------------------------------------------
// Drag tracking
// ---------------------------------------------------------------------------

/// Which pointer source owns the current drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerId {
    Mouse,
    Touch(u32),
}

/// Receives every vector the joystick reports.
pub trait VectorSink {
    fn on_vector(&mut self, vector: JoystickVector);
}

impl<F: FnMut(JoystickVector)> VectorSink for F {
    fn on_vector(&mut self, vector: JoystickVector) {
        self(vector);
    }
}

/// One on-screen stick.
///
/// Move/release handling is "attached" only between a press and the
/// matching release (or [`teardown`](Self::teardown)); events from any
/// other pointer are ignored while a drag is active.
#[derive(Debug, Clone)]
pub struct Joystick {
    geometry: JoystickGeometry,
    shaping: InputShaping,
    center: Point,
    disabled: bool,
    drag: Option<PointerId>,
    knob: Point,
}

impl Joystick {
    pub fn new(geometry: JoystickGeometry, center: Point) -> Self {
        Self {
            geometry,
            shaping: InputShaping::NEUTRAL,
            center,
            disabled: false,
            drag: None,
            knob: Point::ORIGIN,
        }
    }

    /// Press (mouse-down / first touch).  Starts a drag and reports the
    /// press position once.  Returns `false` if the press was ignored.
    pub fn press(&mut self, pointer: PointerId, pos: Point, sink: &mut impl VectorSink) -> bool {
        if self.disabled || self.drag.is_some() {
            return false;
        }
        self.drag = Some(pointer);
        self.update(pos, sink);
        true
    }

    /// Move of the dragging pointer.
    pub fn drag_to(&mut self, pointer: PointerId, pos: Point, sink: &mut impl VectorSink) -> bool {
        if self.disabled || self.drag != Some(pointer) {
            return false;
        }
        self.update(pos, sink);
        true
    }

    /// Release of the dragging pointer: recenters and reports `(0, 0)`.
    pub fn release(&mut self, pointer: PointerId, sink: &mut impl VectorSink) -> bool {
        if self.disabled || self.drag != Some(pointer) {
            return false;
        }
        self.drag = None;
        self.knob = Point::ORIGIN;
        sink.on_vector(JoystickVector::ZERO);
        true
    }

    /// Detach drag handling without reporting (component teardown).
    pub fn teardown(&mut self) {
        self.drag = None;
        self.knob = Point::ORIGIN;
    }

    /// Disabling ends any active drag silently.
    pub fn set_disabled(&mut self, disabled: bool) {
        if disabled && self.drag.is_some() {
            log::debug!("joystick disabled mid-drag, detaching");
            self.teardown();
        }
        self.disabled = disabled;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// True while move/release handling is attached.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Clamped knob offset from the center, for rendering.
    pub fn knob_offset(&self) -> Point {
        self.knob
    }

    /// Move the stick's center, e.g. after a layout change.  An active
    /// drag keeps tracking against the new center.
    pub fn set_center(&mut self, center: Point) {
        self.center = center;
    }

    pub fn set_shaping(&mut self, shaping: InputShaping) {
        self.shaping = shaping;
    }

    pub fn shaping(&self) -> InputShaping {
        self.shaping
    }

    pub fn geometry(&self) -> JoystickGeometry {
        self.geometry
    }

    fn update(&mut self, pos: Point, sink: &mut impl VectorSink) {
        let r = self.geometry.max_radius();
        let (dx, dy) = clamp_offset(pos.x - self.center.x, pos.y - self.center.y, r);
        self.knob = Point::new(dx, dy);
        let v = self.shaping.apply(normalize(dx, dy, r));
        sink.on_vector(v);
    }
}
