//! Alert-triggered capture window behavior.

use core::convert::Infallible;

use monitor_core::latch::MonitorIrqs;
use monitor_core::monitor::{MonitorEngine, TickEvent};
use monitor_core::recorder::{AlertOutcome, POST_WINDOW, RecorderPhase};
use monitor_core::regs::{RegisterBus, RegisterMap};

const LOCAL_BASE: u32 = 0x1000;
const REMOTE_BASE: u32 = 0x2000;

fn dense_map() -> RegisterMap {
    RegisterMap {
        power_enable: 0x00,
        power_ok: 0x04,
        leds: 0x08,
        sadc_reset: 0x0C,
        sadc_ctrl1: 0x10,
        sadc_ctrl2: 0x14,
        sample_enable: 0x18,
        sensor_config_clear: 0x1C,
        local_temp: 0x20,
        remote_temp: 0x24,
        current_local: 0x28,
        current_remote: 0x2C,
        alert_count: 0x30,
        fault_status: 0x34,
        fault_temp_ptr: 0x38,
        local_mem_base: LOCAL_BASE,
        remote_mem_base: REMOTE_BASE,
    }
}

struct SimBus {
    words: Vec<u32>,
}

impl SimBus {
    fn new() -> Self {
        Self {
            words: vec![0; 0x3000 / 4],
        }
    }

    fn set_temps(&mut self, local: u8, remote: u8) {
        self.words[0x20 / 4] = u32::from(local);
        self.words[0x24 / 4] = u32::from(remote);
    }

    fn set_fault(&mut self, status: u32) {
        self.words[0x34 / 4] = status;
    }

    fn ring_sample(&self, base: u32, slot: u16) -> u8 {
        let word = self.words[(base / 4 + u32::from(slot >> 2)) as usize];
        ((word >> (u32::from(slot & 3) * 8)) & 0xFF) as u8
    }

    fn word(&self, offset: u32) -> u32 {
        self.words[offset as usize / 4]
    }
}

impl RegisterBus for SimBus {
    type Error = Infallible;

    fn read(&mut self, offset: u32) -> Result<u32, Infallible> {
        Ok(self.words[offset as usize / 4])
    }

    fn write(&mut self, offset: u32, value: u32) -> Result<(), Infallible> {
        self.words[offset as usize / 4] = value;
        Ok(())
    }
}

fn tick(engine: &mut MonitorEngine<'_>, irqs: &MonitorIrqs, bus: &mut SimBus) -> TickEvent {
    irqs.tick.raise();
    engine
        .poll_once(bus)
        .unwrap()
        .tick
        .expect("tick latch was raised")
}

fn alert(engine: &mut MonitorEngine<'_>, irqs: &MonitorIrqs, bus: &mut SimBus) -> AlertOutcome {
    irqs.alert.raise();
    engine
        .poll_once(bus)
        .unwrap()
        .alert
        .expect("alert latch was raised")
}

/// Alert at tick 50: ticks 51..=178 fill the post window, the pointer lands
/// on 178, and further ticks stop writing the ring.
#[test]
fn alert_at_tick_fifty_publishes_pointer_at_one_seventy_eight() {
    let irqs = MonitorIrqs::new();
    let mut engine = MonitorEngine::new(&irqs, dense_map());
    let mut bus = SimBus::new();
    bus.set_fault(0x1);

    // Ring position == tick index for the whole run, so the capture can be
    // checked across the alert boundary.
    for n in 0..=50_u16 {
        bus.set_temps(n as u8, 0);
        tick(&mut engine, &irqs, &mut bus);
    }
    assert_eq!(engine.recorder().sample_counter(), 51);

    bus.set_temps(50, 0x42);
    let latched = alert(&mut engine, &irqs, &mut bus);
    assert_eq!(
        latched,
        AlertOutcome::Latched {
            local: 50,
            remote: 0x42
        }
    );
    assert_eq!(bus.word(dense_map().alert_count), 1);
    assert_eq!(bus.word(dense_map().current_local), 50);
    assert_eq!(bus.word(dense_map().current_remote), 0x42);

    for n in 51..=178_u16 {
        bus.set_temps(n as u8, 0);
        let event = tick(&mut engine, &irqs, &mut bus);
        let expected_post = n - 50;
        assert_eq!(engine.recorder().post_samples(), expected_post);
        if expected_post == POST_WINDOW {
            assert_eq!(event, TickEvent::WindowComplete { last_sample: 178 });
        } else {
            assert_eq!(event, TickEvent::Recorded { slot: n });
            assert_eq!(engine.recorder().phase(), RecorderPhase::Capturing);
        }
    }

    assert_eq!(engine.recorder().phase(), RecorderPhase::ArmedForClear);
    assert_eq!(bus.word(dense_map().fault_temp_ptr), 178);
    assert_eq!(engine.recorder().last_post_sample(), 178);

    // Pre-alert history and the post window are both intact.
    for slot in 0..=178_u16 {
        assert_eq!(bus.ring_sample(LOCAL_BASE, slot), slot as u8);
    }

    // With the window full, ticks poll the fault register and leave the
    // ring and counters untouched.
    let ring_snapshot: Vec<u32> = bus.words.clone();
    let parked = tick(&mut engine, &irqs, &mut bus);
    assert_eq!(parked, TickEvent::FaultPending { status: 0x1 });
    assert_eq!(engine.recorder().sample_counter(), 179);
    assert_eq!(engine.recorder().post_samples(), POST_WINDOW);
    assert_eq!(bus.words, ring_snapshot);
}

#[test]
fn window_counts_exactly_post_window_ticks() {
    let irqs = MonitorIrqs::new();
    let mut engine = MonitorEngine::new(&irqs, dense_map());
    let mut bus = SimBus::new();
    bus.set_fault(0x1);

    alert(&mut engine, &irqs, &mut bus);
    for _ in 0..POST_WINDOW {
        tick(&mut engine, &irqs, &mut bus);
    }
    assert_eq!(engine.recorder().post_samples(), POST_WINDOW);

    // Not one more.
    for _ in 0..10 {
        tick(&mut engine, &irqs, &mut bus);
        assert_eq!(engine.recorder().post_samples(), POST_WINDOW);
    }
}

#[test]
fn repeated_alert_edges_do_not_restart_the_cycle() {
    let irqs = MonitorIrqs::new();
    let mut engine = MonitorEngine::new(&irqs, dense_map());
    let mut bus = SimBus::new();
    bus.set_fault(0x1);
    bus.set_temps(0x70, 0x75);

    assert!(matches!(
        alert(&mut engine, &irqs, &mut bus),
        AlertOutcome::Latched { .. }
    ));

    // Storm of raw interrupts during CAPTURING and ARMED_FOR_CLEAR.
    for n in 0..(POST_WINDOW + 8) {
        bus.set_temps(0x20, 0x21);
        assert_eq!(
            alert(&mut engine, &irqs, &mut bus),
            AlertOutcome::AlreadyLatched
        );
        if n < POST_WINDOW {
            tick(&mut engine, &irqs, &mut bus);
        }
    }

    assert_eq!(engine.recorder().alert_count(), 1);
    assert_eq!(bus.word(dense_map().alert_count), 1);
    // The published temperatures are still the ones from the first edge.
    assert_eq!(bus.word(dense_map().current_local), 0x70);
    assert_eq!(bus.word(dense_map().current_remote), 0x75);
}

#[test]
fn pre_alert_ring_holds_most_recent_history_at_alert_time() {
    let irqs = MonitorIrqs::new();
    let mut engine = MonitorEngine::new(&irqs, dense_map());
    let mut bus = SimBus::new();
    bus.set_fault(0x1);

    // Spin well past one wrap so the ring is all second-pass data.
    for n in 0..400_u16 {
        bus.set_temps((n % 251) as u8, (n / 256) as u8);
        tick(&mut engine, &irqs, &mut bus);
    }

    alert(&mut engine, &irqs, &mut bus);

    // At the alert instant every slot holds the latest sample written at
    // that position: sample index n == slot (mod 256), n < 400.
    for slot in 0..256_u16 {
        let n = if slot < 400 - 256 { slot + 256 } else { slot };
        assert_eq!(bus.ring_sample(LOCAL_BASE, slot), (n % 251) as u8);
    }
}
