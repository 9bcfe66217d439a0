use embassy_stm32::exti::ExtiInput;
use monitor_core::latch::MonitorIrqs;

// Each line task mirrors the hardware contract: on an edge, set the flag and
// acknowledge the source (the EXTI driver acks as part of the await), then
// go back to waiting. Edges arriving faster than the poll loop drains them
// coalesce in the latch.

/// Over-temperature alert line (active-low, open-drain).
#[embassy_executor::task]
pub async fn alert_line(mut line: ExtiInput<'static>, irqs: &'static MonitorIrqs) -> ! {
    loop {
        line.wait_for_falling_edge().await;
        irqs.alert.raise();
    }
}

/// Sensor alert-cleared/config strobe line.
#[embassy_executor::task]
pub async fn config_line(mut line: ExtiInput<'static>, irqs: &'static MonitorIrqs) -> ! {
    loop {
        line.wait_for_rising_edge().await;
        irqs.config.raise();
    }
}
