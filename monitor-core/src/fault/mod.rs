//! External fault-status polling and cycle re-arm.
//!
//! Once the post-alert window is full, every tick lands here instead of in
//! the recorder. The check is level-triggered: any number of consecutive
//! cleared reads produce the same reset, and a fault that persists simply
//! keeps the system armed-for-clear until power-cycle or clearance. A fault
//! that clears *before* the window fills is not noticed until the window
//! completes; the fixed-duration capture takes priority.

use crate::recorder::SampleRecorder;
use crate::regs::RegisterBus;

/// Observation from one fault-status read.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FaultPoll {
    /// The register read as zero; the cycle may re-arm.
    Cleared,
    /// The register still reports a fault; the raw value is kept for logs.
    StillFaulted(u32),
}

/// Watches the external fault-status register.
#[derive(Copy, Clone, Debug)]
pub struct FaultMonitor {
    status_offset: u32,
}

impl FaultMonitor {
    /// Creates a monitor bound to the fault-status register offset.
    #[must_use]
    pub const fn new(status_offset: u32) -> Self {
        Self { status_offset }
    }

    /// Reads the fault-status register once.
    pub fn poll<B: RegisterBus>(&self, bus: &mut B) -> Result<FaultPoll, B::Error> {
        let raw = bus.read(self.status_offset)?;
        if raw == 0 {
            Ok(FaultPoll::Cleared)
        } else {
            Ok(FaultPoll::StillFaulted(raw))
        }
    }

    /// Polls the register and re-arms the recorder when the fault cleared.
    ///
    /// Returns the observation so callers can log the raw status while the
    /// fault persists.
    pub fn try_rearm<B: RegisterBus>(
        &self,
        bus: &mut B,
        recorder: &mut SampleRecorder,
    ) -> Result<FaultPoll, B::Error> {
        let observed = self.poll(bus)?;
        if observed == FaultPoll::Cleared {
            recorder.rearm(bus)?;
        }
        Ok(observed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    const STATUS: u32 = 0x34;

    struct StatusBus {
        status: u32,
        writes: usize,
    }

    impl RegisterBus for StatusBus {
        type Error = Infallible;

        fn read(&mut self, offset: u32) -> Result<u32, Infallible> {
            assert_eq!(offset, STATUS);
            Ok(self.status)
        }

        fn write(&mut self, _offset: u32, _value: u32) -> Result<(), Infallible> {
            self.writes += 1;
            Ok(())
        }
    }

    #[test]
    fn nonzero_status_reports_raw_value() {
        let mut bus = StatusBus {
            status: 0x8001,
            writes: 0,
        };
        let monitor = FaultMonitor::new(STATUS);
        assert_eq!(
            monitor.poll(&mut bus).unwrap(),
            FaultPoll::StillFaulted(0x8001)
        );
        assert_eq!(bus.writes, 0);
    }

    #[test]
    fn cleared_status_is_idempotent() {
        let mut bus = StatusBus {
            status: 0,
            writes: 0,
        };
        let monitor = FaultMonitor::new(STATUS);
        assert_eq!(monitor.poll(&mut bus).unwrap(), FaultPoll::Cleared);
        assert_eq!(monitor.poll(&mut bus).unwrap(), FaultPoll::Cleared);
    }
}
