//! Blocking settle delays for bring-up sequencing.

#![cfg(target_os = "none")]

use core::convert::TryFrom;
use core::time::Duration;

use monitor_core::bringup::SettleDelay;

/// Converts a core duration into the embassy tick domain, saturating.
pub fn core_duration_to_embassy(duration: Duration) -> embassy_time::Duration {
    let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
    embassy_time::Duration::from_micros(micros)
}

/// Settle provider that spins on the embassy time driver.
///
/// Bring-up runs before the monitor tasks are spawned, so blocking here
/// stalls nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct BlockingSettle;

impl SettleDelay for BlockingSettle {
    fn settle(&mut self, duration: Duration) {
        embassy_time::block_for(core_duration_to_embassy(duration));
    }
}
