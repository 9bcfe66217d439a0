//! Poll engine tying latches, recorder, and fault monitor together.
//!
//! This is the explicit context object both targets drive: the firmware's
//! monitor task calls [`MonitorEngine::poll_once`] from its busy loop, the
//! emulator calls it from the interactive session. Each call consumes the
//! pending latch flags in a fixed order (alert, config, tick) and reports
//! what happened so the caller can log or display it. The engine never
//! blocks; "waiting" for an event is simply a poll that reports idle.

use crate::fault::{FaultMonitor, FaultPoll};
use crate::latch::MonitorIrqs;
use crate::recorder::{AlertOutcome, SampleRecorder, TickOutcome};
use crate::regs::{RegisterBus, RegisterMap};

/// Value strobed into the sensor configuration-clear register.
pub const SENSOR_CONFIG_CLEAR_STROBE: u32 = 1;

/// What one consumed tick did.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TickEvent {
    /// A sample pair was written at `slot`.
    Recorded {
        /// Ring index that was overwritten.
        slot: u16,
    },
    /// The post-alert window just completed at `last_sample`.
    WindowComplete {
        /// Ring index of the final post-alert sample.
        last_sample: u16,
    },
    /// The fault-status register still reads nonzero.
    FaultPending {
        /// Raw fault-status value.
        status: u32,
    },
    /// The fault cleared and the cycle re-armed.
    CycleRearmed,
}

/// Summary of one poll iteration.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PollReport {
    /// Outcome of a consumed alert latch, if one was pending.
    pub alert: Option<AlertOutcome>,
    /// Whether the config latch was consumed (sensor config strobed).
    pub config_cleared: bool,
    /// Outcome of a consumed tick latch, if one was pending.
    pub tick: Option<TickEvent>,
}

impl PollReport {
    /// Returns `true` when the iteration consumed nothing.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.alert.is_none() && !self.config_cleared && self.tick.is_none()
    }
}

/// Owns all recorder state and consumes the interrupt latches.
pub struct MonitorEngine<'a> {
    irqs: &'a MonitorIrqs,
    recorder: SampleRecorder,
    fault: FaultMonitor,
    config_clear: u32,
}

impl<'a> MonitorEngine<'a> {
    /// Builds an engine over the latch bundle and register layout.
    #[must_use]
    pub const fn new(irqs: &'a MonitorIrqs, map: RegisterMap) -> Self {
        Self {
            irqs,
            recorder: SampleRecorder::new(map),
            fault: FaultMonitor::new(map.fault_status),
            config_clear: map.sensor_config_clear,
        }
    }

    /// Read-only view of the recorder state machine.
    #[must_use]
    pub const fn recorder(&self) -> &SampleRecorder {
        &self.recorder
    }

    /// Runs one poll iteration.
    ///
    /// Each latch is cleared before its action runs, so an edge arriving
    /// mid-action is seen by the next iteration instead of being lost.
    pub fn poll_once<B: RegisterBus>(&mut self, bus: &mut B) -> Result<PollReport, B::Error> {
        let mut report = PollReport::default();

        if self.irqs.alert.take() {
            report.alert = Some(self.recorder.consume_alert(bus)?);
        }

        if self.irqs.config.take() {
            bus.write(self.config_clear, SENSOR_CONFIG_CLEAR_STROBE)?;
            report.config_cleared = true;
        }

        if self.irqs.tick.take() {
            report.tick = Some(match self.recorder.record_tick(bus)? {
                TickOutcome::Recorded { slot } => TickEvent::Recorded { slot },
                TickOutcome::WindowComplete { last_sample } => {
                    TickEvent::WindowComplete { last_sample }
                }
                TickOutcome::AwaitingFaultClear => {
                    match self.fault.try_rearm(bus, &mut self.recorder)? {
                        FaultPoll::Cleared => TickEvent::CycleRearmed,
                        FaultPoll::StillFaulted(status) => TickEvent::FaultPending { status },
                    }
                }
            });
        }

        Ok(report)
    }
}
