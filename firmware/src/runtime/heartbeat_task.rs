use embassy_time::Timer;

use crate::hw::bus::AxiBus;

/// LED pattern halves for the alternating heartbeat.
const FRAME_A: u32 = 0x5;
const FRAME_B: u32 = 0xA;

/// 1 Hz alternating LED heartbeat so a glance at the board shows the
/// supervisor is alive.
#[embassy_executor::task]
pub async fn run(bus: AxiBus, leds_offset: u32) -> ! {
    loop {
        Timer::after_millis(1_000).await;
        bus.write_word(leds_offset, FRAME_A);
        Timer::after_millis(1_000).await;
        bus.write_word(leds_offset, FRAME_B);
    }
}
