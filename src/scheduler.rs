//! Periodic timer driven by elapsed time.
//!
//! The panel core never sleeps or spawns; the host loop calls
//! [`PeriodicTimer::advance`] with the time that passed and the timer
//! reports how many periods completed.  Disarming drops any partial
//! period, so nothing fires after [`disarm`](PeriodicTimer::disarm).
//!
//! ```text
//!   arm()           advance(dt)              disarm()
//!     │   ┌─────────────┬─────────────┐         │
//!     ▼   │  period     │  period     │ partial ▼
//!     ●───┴─────────────┴─────────────┴────····─✕   (no further fires)
//!                fire          fire
//! ```

use core::time::Duration;

use log::{debug, warn};

/// A re-armable fixed-period timer.
#[derive(Debug, Clone)]
pub struct PeriodicTimer {
    label: &'static str,
    period: Duration,
    elapsed: Duration,
    armed: bool,
    fired: u64,
}

impl PeriodicTimer {
    /// Create a disarmed timer.  A zero period is bumped to 1 ms.
    pub fn new(label: &'static str, period: Duration) -> Self {
        Self {
            label,
            period: period.max(Duration::from_millis(1)),
            elapsed: Duration::ZERO,
            armed: false,
            fired: 0,
        }
    }

    /// Start counting from zero.  Re-arming an armed timer restarts it.
    pub fn arm(&mut self) {
        self.armed = true;
        self.elapsed = Duration::ZERO;
        debug!("Timer '{}': armed ({:?})", self.label, self.period);
    }

    /// Stop immediately.  Idempotent.
    pub fn disarm(&mut self) {
        if self.armed {
            debug!("Timer '{}': disarmed", self.label);
        }
        self.armed = false;
        self.elapsed = Duration::ZERO;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Total fires since construction.
    pub fn fire_count(&self) -> u64 {
        self.fired
    }

    /// Account for `dt` of wall time.  Returns the number of whole periods
    /// that completed; always 0 while disarmed.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if !self.armed {
            return 0;
        }
        let elapsed = self.elapsed.saturating_add(dt).as_nanos();
        let period = self.period.as_nanos();
        let fires = u32::try_from(elapsed / period).unwrap_or(u32::MAX);
        // The remainder is below one period, so it fits.
        self.elapsed = Duration::from_nanos(u64::try_from(elapsed % period).unwrap_or(u64::MAX));
        if fires == u32::MAX {
            warn!("Timer '{}': fire count saturated", self.label);
        }
        self.fired = self.fired.saturating_add(u64::from(fires));
        fires
    }
}
