//! Level-triggered software latches for hardware interrupt lines.
//!
//! Each hardware edge sets one boolean flag; the poll loop consumes the flag
//! and clears it before acting. Clearing on the non-interrupt side is
//! deliberate: it defines the "consumed" event boundary. There is no queue;
//! two edges between two polls coalesce into one unit of work. That is the
//! platform's documented policy, not a defect, and the recorder's timing
//! analysis depends on it staying that way.

use portable_atomic::{AtomicBool, Ordering};

/// Capability handed to interrupt handlers: something that can be notified.
///
/// Handlers receive only this surface; they never see recorder state.
pub trait IrqNotify {
    /// Signals that the line fired. Must be safe to call redundantly.
    fn notify(&self);
}

/// One latched interrupt flag with single-consumer semantics.
///
/// `raise` is idempotent (at-least-once-set); `take` clears and reports in a
/// single step (at-most-once-consumed per poll iteration).
#[derive(Debug, Default)]
pub struct EventLatch {
    flag: AtomicBool,
}

impl EventLatch {
    /// Creates a lowered latch.
    pub const fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
        }
    }

    /// Sets the flag from the interrupt side. Redundant sets are harmless.
    pub fn raise(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Consumes the flag: clears it and returns whether it was raised.
    pub fn take(&self) -> bool {
        self.flag.swap(false, Ordering::AcqRel)
    }

    /// Observes the flag without consuming it.
    pub fn is_raised(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

impl IrqNotify for EventLatch {
    fn notify(&self) {
        self.raise();
    }
}

/// The three interrupt lines the monitor consumes, bound at initialization.
#[derive(Debug, Default)]
pub struct MonitorIrqs {
    /// Over-temperature alert line.
    pub alert: EventLatch,
    /// Sensor alert-cleared/configuration line (variant-dependent).
    pub config: EventLatch,
    /// Periodic timer tick line.
    pub tick: EventLatch,
}

impl MonitorIrqs {
    /// Creates the latch bundle with all lines lowered.
    pub const fn new() -> Self {
        Self {
            alert: EventLatch::new(),
            config: EventLatch::new(),
            tick: EventLatch::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_clears_the_flag() {
        let latch = EventLatch::new();
        latch.raise();
        assert!(latch.take());
        assert!(!latch.take());
        assert!(!latch.is_raised());
    }

    #[test]
    fn redundant_raises_coalesce_to_one_consumption() {
        let latch = EventLatch::new();
        latch.raise();
        latch.raise();
        latch.raise();
        assert!(latch.take());
        assert!(!latch.take(), "coalesced edges must yield one unit of work");
    }

    #[test]
    fn is_raised_does_not_consume() {
        let latch = EventLatch::new();
        latch.raise();
        assert!(latch.is_raised());
        assert!(latch.is_raised());
        assert!(latch.take());
    }

    #[test]
    fn notify_maps_to_raise() {
        let latch = EventLatch::new();
        let sink: &dyn IrqNotify = &latch;
        sink.notify();
        assert!(latch.take());
    }
}
