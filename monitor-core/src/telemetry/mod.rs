//! Monitor event ring shared by firmware and host targets.
//!
//! The core never logs directly; it records structured events into a
//! fixed-capacity ring and lets each target mirror them to its own sink
//! (defmt on the MCU, stdout in the emulator). Event identifiers are
//! monotonically assigned so downstream consumers can detect gaps after the
//! ring wraps.

use core::time::Duration;

use heapless::{HistoryBuf, OldestOrdered};

use crate::monitor::{PollReport, TickEvent};
use crate::recorder::AlertOutcome;

/// Identifier attached to recorded monitor events.
pub type EventId = u32;

/// Total number of telemetry entries retained in memory.
pub const TELEMETRY_RING_CAPACITY: usize = 64;

/// Trait implemented by monotonic instant wrappers used for event tracking.
pub trait TelemetryInstant: Copy {
    /// Returns the saturating duration from `earlier` to `self`.
    fn saturating_duration_since(&self, earlier: Self) -> Duration;
}

/// Discriminated monitor events.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MonitorEventKind {
    /// First alert of a cycle latched; payload carries the temperatures.
    AlertLatched,
    /// An alert edge arrived while a cycle was already in flight.
    AlertIgnored,
    /// Sensor configuration-clear strobed.
    ConfigCleared,
    /// Post-alert window completed; payload carries the final ring index.
    WindowComplete,
    /// Fault-status register still nonzero; payload carries the raw value.
    FaultPending,
    /// Fault cleared and the cycle re-armed.
    CycleRearmed,
}

/// Payloads carried alongside monitor events.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EventPayload {
    /// No additional metadata accompanies the event.
    None,
    /// Temperatures latched when the alert fired.
    Temps {
        /// Local sensor value.
        local: u8,
        /// Remote sensor value.
        remote: u8,
    },
    /// Ring index of the last post-alert sample.
    Pointer {
        /// Ring slot index.
        slot: u16,
    },
    /// Raw fault-status word.
    Fault {
        /// Register value as read.
        status: u32,
    },
}

/// Event record stored in the ring buffer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MonitorEvent<TInstant>
where
    TInstant: Copy,
{
    pub id: EventId,
    pub timestamp: TInstant,
    pub kind: MonitorEventKind,
    pub details: EventPayload,
}

/// Records monitor events into a fixed-size ring buffer.
pub struct TelemetryRecorder<TInstant, const CAPACITY: usize = TELEMETRY_RING_CAPACITY>
where
    TInstant: Copy,
{
    ring: HistoryBuf<MonitorEvent<TInstant>, CAPACITY>,
    next_event_id: EventId,
}

impl<TInstant, const CAPACITY: usize> TelemetryRecorder<TInstant, CAPACITY>
where
    TInstant: Copy + TelemetryInstant,
{
    /// Creates a recorder with an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ring: HistoryBuf::new(),
            next_event_id: 0,
        }
    }

    /// Returns an iterator over recorded events in chronological order.
    pub fn oldest_first(&self) -> OldestOrdered<'_, MonitorEvent<TInstant>> {
        self.ring.oldest_ordered()
    }

    /// Returns the most recent event, if any.
    pub fn latest(&self) -> Option<&MonitorEvent<TInstant>> {
        self.ring.recent()
    }

    /// Returns the number of events currently stored.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Returns `true` when no events are stored.
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Records an arbitrary event with the supplied payload.
    pub fn record(
        &mut self,
        kind: MonitorEventKind,
        details: EventPayload,
        timestamp: TInstant,
    ) -> EventId {
        let id = self.next_event_id;
        self.next_event_id = self.next_event_id.wrapping_add(1);

        self.ring.write(MonitorEvent {
            id,
            timestamp,
            kind,
            details,
        });

        id
    }

    /// Records every event described by one poll iteration.
    ///
    /// Idle iterations and routine ring writes record nothing; the ring is
    /// for state transitions, not the steady 4–8 Hz sample traffic.
    pub fn record_poll(&mut self, report: &PollReport, timestamp: TInstant) {
        match report.alert {
            Some(AlertOutcome::Latched { local, remote }) => {
                self.record(
                    MonitorEventKind::AlertLatched,
                    EventPayload::Temps { local, remote },
                    timestamp,
                );
            }
            Some(AlertOutcome::AlreadyLatched) => {
                self.record(MonitorEventKind::AlertIgnored, EventPayload::None, timestamp);
            }
            None => {}
        }

        if report.config_cleared {
            self.record(
                MonitorEventKind::ConfigCleared,
                EventPayload::None,
                timestamp,
            );
        }

        match report.tick {
            Some(TickEvent::WindowComplete { last_sample }) => {
                self.record(
                    MonitorEventKind::WindowComplete,
                    EventPayload::Pointer { slot: last_sample },
                    timestamp,
                );
            }
            Some(TickEvent::FaultPending { status }) => {
                self.record(
                    MonitorEventKind::FaultPending,
                    EventPayload::Fault { status },
                    timestamp,
                );
            }
            Some(TickEvent::CycleRearmed) => {
                self.record(MonitorEventKind::CycleRearmed, EventPayload::None, timestamp);
            }
            Some(TickEvent::Recorded { .. }) | None => {}
        }
    }
}

impl<TInstant, const CAPACITY: usize> Default for TelemetryRecorder<TInstant, CAPACITY>
where
    TInstant: Copy + TelemetryInstant,
{
    fn default() -> Self {
        Self::new()
    }
}
