use cortex_m::interrupt;
use cortex_m::register::primask;
use critical_section::{self, RawRestoreState};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_stm32 as hal;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::Pull;

use monitor_core::bringup::{
    self, BringupSequence, power_up_sequence, sensor_init_sequence, slow_adc_sequence,
};
use monitor_core::latch::MonitorIrqs;
use monitor_core::monitor::MonitorEngine;
use monitor_core::regs::RegisterMap;
use monitor_core::ticker::TickCadence;

use crate::hw::bus::{AxiBus, BUS_WINDOW};
use crate::hw::settle::BlockingSettle;
use crate::telemetry::TelemetryRecorder;

mod heartbeat_task;
mod irq_task;
mod monitor_task;
mod tick_task;

critical_section::set_impl!(InterruptCriticalSection);

struct InterruptCriticalSection;

unsafe impl critical_section::Impl for InterruptCriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        let primask = primask::read();
        interrupt::disable();
        primask.is_active()
    }

    unsafe fn release(restore_state: RawRestoreState) {
        if restore_state {
            unsafe {
                interrupt::enable();
            }
        }
    }
}

/// Latch bundle shared between the interrupt-side tasks and the poll loop.
///
/// Handlers only ever raise their own flag; all recorder state lives inside
/// the monitor task.
static MONITOR_IRQS: MonitorIrqs = MonitorIrqs::new();

#[embassy_executor::main]
pub async fn main(spawner: Spawner) {
    let config = hal::Config::default();
    let hal::Peripherals {
        PA0,
        PA1,
        EXTI0,
        EXTI1,
        ..
    } = hal::init(config);

    let map = RegisterMap::lzts_default();
    let mut bus = AxiBus::new(BUS_WINDOW);

    // Single-shot front-end configuration, before any task runs.
    let mut settle = BlockingSettle;
    for sequence in [
        power_up_sequence(),
        slow_adc_sequence(),
        sensor_init_sequence(),
    ] {
        apply_bringup(&mut bus, &mut settle, &map, &sequence);
    }

    // Sensor ALERT* is open-drain active-low; the config line strobes high.
    let alert_line = ExtiInput::new(PA0, EXTI0, Pull::Up);
    let config_line = ExtiInput::new(PA1, EXTI1, Pull::Down);

    let engine = MonitorEngine::new(&MONITOR_IRQS, map);

    spawner
        .spawn(monitor_task::run(engine, bus, TelemetryRecorder::new()))
        .expect("failed to spawn monitor task");
    spawner
        .spawn(tick_task::run(&MONITOR_IRQS, TickCadence::Ms250))
        .expect("failed to spawn tick task");
    spawner
        .spawn(irq_task::alert_line(alert_line, &MONITOR_IRQS))
        .expect("failed to spawn alert line task");
    spawner
        .spawn(irq_task::config_line(config_line, &MONITOR_IRQS))
        .expect("failed to spawn config line task");
    spawner
        .spawn(heartbeat_task::run(bus, map.leds))
        .expect("failed to spawn heartbeat task");

    core::future::pending::<()>().await;
}

fn apply_bringup(
    bus: &mut AxiBus,
    settle: &mut BlockingSettle,
    map: &RegisterMap,
    sequence: &BringupSequence,
) {
    match bringup::run_sequence(bus, settle, map, sequence) {
        Ok(()) => defmt::info!("bringup: {=str} complete", sequence.name),
        Err(err) => defmt::error!(
            "bringup: {=str} failed: {}",
            sequence.name,
            defmt::Debug2Format(&err)
        ),
    }
}
