//! Periodic tick cadence shared by firmware and host targets.
//!
//! On hardware the cadence programs an auto-reloading countdown timer whose
//! interrupt handler only raises the tick latch. The host targets model the
//! same countdown explicitly so emulator scenarios and tests can advance
//! time one step at a time.

use core::time::Duration;

use crate::latch::IrqNotify;

/// Sample cadences observed across detector deployments.
///
/// Construction-time configuration; the cadence is not runtime-mutable.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum TickCadence {
    /// 125 ms between samples (32 s of pre-alert history).
    Ms125,
    /// 250 ms between samples (64 s of pre-alert history).
    #[default]
    Ms250,
}

impl TickCadence {
    /// Returns the tick period.
    #[must_use]
    pub const fn period(self) -> Duration {
        match self {
            TickCadence::Ms125 => Duration::from_millis(125),
            TickCadence::Ms250 => Duration::from_millis(250),
        }
    }
}

/// Auto-reload countdown model of the hardware tick timer.
///
/// `advance` plays the role of the timer clock; when the countdown expires
/// the ticker notifies its latch and reloads, exactly like the hardware
/// counter re-fires without software involvement.
#[derive(Debug)]
pub struct CountdownTicker {
    reload: u32,
    remaining: u32,
}

impl CountdownTicker {
    /// Creates a ticker that expires every `reload` advance steps.
    ///
    /// A zero reload is clamped to one so the ticker always fires.
    pub const fn new(reload: u32) -> Self {
        let reload = if reload == 0 { 1 } else { reload };
        Self {
            reload,
            remaining: reload,
        }
    }

    /// Steps the countdown once, notifying `latch` on expiry.
    ///
    /// Returns `true` when this step fired the tick.
    pub fn advance<N: IrqNotify>(&mut self, latch: &N) -> bool {
        self.remaining -= 1;
        if self.remaining == 0 {
            self.remaining = self.reload;
            latch.notify();
            true
        } else {
            false
        }
    }

    /// Returns the configured reload value.
    pub const fn reload(&self) -> u32 {
        self.reload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latch::EventLatch;

    #[test]
    fn cadence_periods_match_observed_configurations() {
        assert_eq!(TickCadence::Ms125.period(), Duration::from_millis(125));
        assert_eq!(TickCadence::Ms250.period(), Duration::from_millis(250));
    }

    #[test]
    fn countdown_fires_on_reload_boundary_and_rearms() {
        let latch = EventLatch::new();
        let mut ticker = CountdownTicker::new(3);

        assert!(!ticker.advance(&latch));
        assert!(!ticker.advance(&latch));
        assert!(ticker.advance(&latch));
        assert!(latch.take());

        // Second period behaves identically after the auto-reload.
        assert!(!ticker.advance(&latch));
        assert!(!ticker.advance(&latch));
        assert!(ticker.advance(&latch));
        assert!(latch.take());
    }

    #[test]
    fn zero_reload_is_clamped() {
        let latch = EventLatch::new();
        let mut ticker = CountdownTicker::new(0);
        assert_eq!(ticker.reload(), 1);
        assert!(ticker.advance(&latch));
        assert!(latch.take());
    }
}
