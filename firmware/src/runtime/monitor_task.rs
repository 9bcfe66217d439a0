use embassy_futures::yield_now;
use monitor_core::monitor::MonitorEngine;

use crate::hw::bus::AxiBus;
use crate::hw::unwrap_infallible;
use crate::telemetry::{FirmwareInstant, TelemetryRecorder, log_report};

/// Busy-poll main loop.
///
/// There is no blocking wait anywhere in here on purpose: "waiting" for an
/// event is a poll that consumed nothing. The cooperative yield keeps the
/// other tasks runnable without introducing a scheduling dependency into the
/// latch contract.
#[embassy_executor::task]
pub async fn run(
    mut engine: MonitorEngine<'static>,
    mut bus: AxiBus,
    mut telemetry: TelemetryRecorder,
) -> ! {
    loop {
        let report = unwrap_infallible(engine.poll_once(&mut bus));
        if !report.is_idle() {
            log_report(&report);
            telemetry.record_poll(&report, FirmwareInstant::now());
        }
        yield_now().await;
    }
}
