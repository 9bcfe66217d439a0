use embassy_time::Ticker;
use monitor_core::latch::MonitorIrqs;
use monitor_core::ticker::TickCadence;

use crate::hw::settle::core_duration_to_embassy;

/// Periodic tick source.
///
/// The hardware timer auto-reloads at the configured cadence; this task is
/// the interrupt handler's software half and does exactly one thing per
/// expiry: raise the tick latch. Everything else happens in the poll loop.
#[embassy_executor::task]
pub async fn run(irqs: &'static MonitorIrqs, cadence: TickCadence) -> ! {
    let mut ticker = Ticker::every(core_duration_to_embassy(cadence.period()));
    loop {
        ticker.next().await;
        irqs.tick.raise();
    }
}
