//! Device telemetry and its local simulator.
//!
//! While the link is up the simulator walks battery, signal, memory and
//! temperature by small random steps every [`TELEMETRY_PERIOD`].  When the
//! link drops the timer is disarmed at once; the last values stay in memory
//! and the panel shows [`DeviceTelemetry::masked`] instead.

use core::time::Duration;

use log::{debug, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::scheduler::PeriodicTimer;

/// Simulator tick period.
pub const TELEMETRY_PERIOD: Duration = Duration::from_secs(5);

/// Most ticks applied by one advance (12 h of periods).  Anything beyond
/// is skipped, e.g. after the host was suspended.
pub const MAX_CATCH_UP_TICKS: u32 = 8_640;

/// A telemetry snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceTelemetry {
    /// Battery charge (0-100 %).
    pub battery: u8,
    /// Link quality (0-100 %).
    pub signal: u8,
    /// Heap usage (0-100 %).
    pub memory_usage: u8,
    /// Board temperature (20-60 °C).
    pub temperature: u8,
    pub uptime: String,
}

impl DeviceTelemetry {
    /// Values the session starts with.
    pub fn baseline() -> Self {
        Self {
            battery: 85,
            signal: 92,
            memory_usage: 67,
            temperature: 42,
            uptime: String::from("2h 34m"),
        }
    }

    /// What the panel shows while not connected.
    pub fn masked() -> Self {
        Self {
            battery: 0,
            signal: 0,
            memory_usage: 0,
            temperature: 0,
            uptime: String::from("0h 0m"),
        }
    }

    pub fn displayed(&self, connected: bool) -> Self {
        if connected { self.clone() } else { Self::masked() }
    }
}

/// Render an uptime as `"<hours>h <minutes>m"`.
pub fn format_uptime(uptime: Duration) -> String {
    let mins = uptime.as_secs() / 60;
    format!("{}h {}m", mins / 60, mins % 60)
}

// ---------------------------------------------------------------------------
// Random walk
// ---------------------------------------------------------------------------

/// Bounds for one walked field.
#[derive(Debug, Clone, Copy)]
struct Walk {
    step: i16,
    min: u8,
    max: u8,
}

const BATTERY_WALK: Walk = Walk { step: 1, min: 1, max: 100 };
const SIGNAL_WALK: Walk = Walk { step: 2, min: 1, max: 100 };
const MEMORY_WALK: Walk = Walk { step: 2, min: 1, max: 100 };
const TEMPERATURE_WALK: Walk = Walk { step: 1, min: 20, max: 60 };

impl Walk {
    fn apply(self, value: u8, rng: &mut impl Rng) -> u8 {
        let delta = rng.gen_range(-self.step..=self.step);
        (i16::from(value) + delta).clamp(i16::from(self.min), i16::from(self.max)) as u8
    }
}

// ---------------------------------------------------------------------------
// Simulator
// ---------------------------------------------------------------------------

/// Periodic bounded random walk over [`DeviceTelemetry`].
#[derive(Debug, Clone)]
pub struct TelemetrySimulator {
    current: DeviceTelemetry,
    timer: PeriodicTimer,
    rng: SmallRng,
}

impl TelemetrySimulator {
    /// Entropy-seeded simulator.
    pub fn new() -> Self {
        Self::from_rng(SmallRng::from_entropy())
    }

    /// Deterministic simulator for tests and replays.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(SmallRng::seed_from_u64(seed))
    }

    fn from_rng(rng: SmallRng) -> Self {
        Self {
            current: DeviceTelemetry::baseline(),
            timer: PeriodicTimer::new("telemetry", TELEMETRY_PERIOD),
            rng,
        }
    }

    /// Re-establish the baseline and arm the timer.
    pub fn start(&mut self) {
        let uptime = core::mem::take(&mut self.current.uptime);
        self.current = DeviceTelemetry::baseline();
        if !uptime.is_empty() {
            self.current.uptime = uptime;
        }
        self.timer.arm();
    }

    /// Disarm immediately.  Idempotent.
    pub fn stop(&mut self) {
        self.timer.disarm();
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_armed()
    }

    /// Advance wall time and apply every tick that came due, at most
    /// [`MAX_CATCH_UP_TICKS`].  Returns the number of ticks applied.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        self.advance_with(dt, |_| {})
    }

    /// Like [`advance`](Self::advance), handing each post-tick snapshot
    /// to `on_tick`.
    pub fn advance_with(&mut self, dt: Duration, mut on_tick: impl FnMut(&DeviceTelemetry)) -> u32 {
        let due = self.timer.advance(dt);
        let ticks = due.min(MAX_CATCH_UP_TICKS);
        if ticks < due {
            warn!("telemetry: skipping {} overdue tick(s)", due - ticks);
        }
        for _ in 0..ticks {
            self.step();
            on_tick(&self.current);
        }
        ticks
    }

    /// Apply one random-walk step to every simulated field.
    pub fn step(&mut self) {
        let t = &mut self.current;
        t.battery = BATTERY_WALK.apply(t.battery, &mut self.rng);
        t.signal = SIGNAL_WALK.apply(t.signal, &mut self.rng);
        t.memory_usage = MEMORY_WALK.apply(t.memory_usage, &mut self.rng);
        t.temperature = TEMPERATURE_WALK.apply(t.temperature, &mut self.rng);
        debug!(
            "telemetry step: bat={} sig={} mem={} temp={}",
            t.battery, t.signal, t.memory_usage, t.temperature
        );
    }

    /// Stored values (unmasked).
    pub fn current(&self) -> &DeviceTelemetry {
        &self.current
    }

    /// Uptime is supplied from outside; the walk never touches it.
    pub fn set_uptime(&mut self, uptime: impl Into<String>) {
        self.current.uptime = uptime.into();
    }
}

impl Default for TelemetrySimulator {
    fn default() -> Self {
        Self::new()
    }
}
