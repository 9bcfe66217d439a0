//! Telemetry binding for the firmware target.
//!
//! Wraps the shared event ring from `monitor-core` around embassy's
//! monotonic clock and mirrors poll-loop transitions to defmt (or stdout on
//! host builds) so bring-up sessions get immediate feedback without touching
//! the ring consumers.

#![cfg_attr(not(target_os = "none"), allow(dead_code))]

use core::time::Duration;

use embassy_time::Instant;
use monitor_core::monitor::{PollReport, TickEvent};
use monitor_core::recorder::AlertOutcome;
use monitor_core::telemetry::TelemetryInstant;

/// Embassy-backed monotonic instant for telemetry records.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct FirmwareInstant(Instant);

impl FirmwareInstant {
    /// Captures the current instant.
    ///
    /// Target-only: host builds have no embassy time driver to link.
    #[cfg(target_os = "none")]
    #[must_use]
    pub fn now() -> Self {
        Self(Instant::now())
    }

    /// Returns the wrapped embassy instant.
    #[must_use]
    pub fn into_embassy(self) -> Instant {
        self.0
    }
}

impl From<Instant> for FirmwareInstant {
    fn from(instant: Instant) -> Self {
        Self(instant)
    }
}

impl TelemetryInstant for FirmwareInstant {
    fn saturating_duration_since(&self, earlier: Self) -> Duration {
        let micros = self
            .0
            .as_micros()
            .saturating_sub(earlier.0.as_micros());
        Duration::from_micros(micros)
    }
}

/// Event ring specialized to the firmware instant.
pub type TelemetryRecorder = monitor_core::telemetry::TelemetryRecorder<FirmwareInstant>;

/// Mirrors one poll report to the log sink.
pub fn log_report(report: &PollReport) {
    match report.alert {
        Some(AlertOutcome::Latched { local, remote }) => {
            log_alert_latched(local, remote);
        }
        Some(AlertOutcome::AlreadyLatched) => log_alert_ignored(),
        None => {}
    }

    if report.config_cleared {
        log_config_cleared();
    }

    match report.tick {
        Some(TickEvent::WindowComplete { last_sample }) => log_window_complete(last_sample),
        Some(TickEvent::FaultPending { status }) => log_fault_pending(status),
        Some(TickEvent::CycleRearmed) => log_rearmed(),
        Some(TickEvent::Recorded { .. }) | None => {}
    }
}

#[cfg(target_os = "none")]
fn log_alert_latched(local: u8, remote: u8) {
    defmt::warn!("monitor: alert latched local={=u8} remote={=u8}", local, remote);
}

#[cfg(target_os = "none")]
fn log_alert_ignored() {
    defmt::debug!("monitor: alert edge ignored, cycle active");
}

#[cfg(target_os = "none")]
fn log_config_cleared() {
    defmt::info!("monitor: sensor config cleared");
}

#[cfg(target_os = "none")]
fn log_window_complete(last_sample: u16) {
    defmt::warn!("monitor: post window complete, last sample {=u16}", last_sample);
}

#[cfg(target_os = "none")]
fn log_fault_pending(status: u32) {
    defmt::debug!("monitor: fault still asserted {=u32:#x}", status);
}

#[cfg(target_os = "none")]
fn log_rearmed() {
    defmt::info!("monitor: fault cleared, cycle re-armed");
}

#[cfg(not(target_os = "none"))]
fn log_alert_latched(local: u8, remote: u8) {
    println!("monitor: alert latched local={local} remote={remote}");
}

#[cfg(not(target_os = "none"))]
fn log_alert_ignored() {
    println!("monitor: alert edge ignored, cycle active");
}

#[cfg(not(target_os = "none"))]
fn log_config_cleared() {
    println!("monitor: sensor config cleared");
}

#[cfg(not(target_os = "none"))]
fn log_window_complete(last_sample: u16) {
    println!("monitor: post window complete, last sample {last_sample}");
}

#[cfg(not(target_os = "none"))]
fn log_fault_pending(status: u32) {
    println!("monitor: fault still asserted {status:#x}");
}

#[cfg(not(target_os = "none"))]
fn log_rearmed() {
    println!("monitor: fault cleared, cycle re-armed");
}
