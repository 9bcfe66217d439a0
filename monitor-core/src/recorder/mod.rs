//! Temperature-alert circular sample recorder.
//!
//! The recorder owns the pre/post-alert windowing state machine. Every
//! consumed tick overwrites one ring slot with freshly read local/remote
//! temperatures, so at the instant an alert fires the ring already holds the
//! most recent [`RING_SIZE`] ticks of pre-alert history. The alert then
//! bounds the capture: exactly [`POST_WINDOW`] further ticks are recorded,
//! the ring index of the final one is published for downstream readers, and
//! recording stops until the fault monitor re-arms the cycle.
//!
//! All counters are single words and only ever written from the poll loop;
//! interrupt handlers touch nothing here.

use crate::regs::{RegisterBus, RegisterMap};

/// Number of byte-slots in each temperature ring.
pub const RING_SIZE: u16 = 256;

/// Number of post-alert samples captured before recording stops.
pub const POST_WINDOW: u16 = 128;

/// Byte samples packed into each 32-bit memory word.
pub const SAMPLES_PER_WORD: u16 = 4;

/// Recorder lifecycle phase, derived from the post-sample counter.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RecorderPhase {
    /// No alert event in progress; the ring is freely overwritten.
    Idle,
    /// Alert active; collecting the fixed-size post-alert window.
    Capturing,
    /// Window complete; awaiting the external fault-status clear.
    ArmedForClear,
}

/// Result of consuming the alert latch.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AlertOutcome {
    /// First alert of the cycle: temperatures were published and the
    /// post-window armed.
    Latched {
        /// Local sensor value at the alert instant.
        local: u8,
        /// Remote sensor value at the alert instant.
        remote: u8,
    },
    /// A cycle is already in flight; the edge was deliberately ignored.
    AlreadyLatched,
}

/// Result of consuming one tick.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TickOutcome {
    /// One sample pair was written at `slot`.
    Recorded {
        /// Ring index that was overwritten.
        slot: u16,
    },
    /// The 128th post-alert sample landed at `last_sample`; its index was
    /// published to the pointer register and recording has stopped.
    WindowComplete {
        /// Ring index of the final post-alert sample.
        last_sample: u16,
    },
    /// The window is already full; this tick belongs to the fault monitor.
    AwaitingFaultClear,
}

/// Circular sample recorder state machine.
#[derive(Debug)]
pub struct SampleRecorder {
    map: RegisterMap,
    sample_counter: u16,
    post_samples: u16,
    was_alerted: bool,
    alert_count: u8,
    last_post_sample: u16,
}

impl SampleRecorder {
    /// Creates an idle recorder bound to the provided register layout.
    #[must_use]
    pub const fn new(map: RegisterMap) -> Self {
        Self {
            map,
            sample_counter: 0,
            post_samples: 0,
            was_alerted: false,
            alert_count: 0,
            last_post_sample: 0,
        }
    }

    /// Returns the current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> RecorderPhase {
        if self.post_samples == 0 {
            RecorderPhase::Idle
        } else if self.post_samples < POST_WINDOW {
            RecorderPhase::Capturing
        } else {
            RecorderPhase::ArmedForClear
        }
    }

    /// Ring index the next tick will overwrite.
    #[must_use]
    pub const fn sample_counter(&self) -> u16 {
        self.sample_counter
    }

    /// Post-alert samples collected so far this cycle.
    #[must_use]
    pub const fn post_samples(&self) -> u16 {
        self.post_samples
    }

    /// Alert cycles latched since the last re-arm (0 or 1 in practice; the
    /// register policy saturates at 255).
    #[must_use]
    pub const fn alert_count(&self) -> u8 {
        self.alert_count
    }

    /// Whether an alert has been latched this cycle.
    #[must_use]
    pub const fn was_alerted(&self) -> bool {
        self.was_alerted
    }

    /// Mirror of the published last-post-sample pointer.
    #[must_use]
    pub const fn last_post_sample(&self) -> u16 {
        self.last_post_sample
    }

    /// Register layout this recorder was constructed with.
    #[must_use]
    pub const fn map(&self) -> &RegisterMap {
        &self.map
    }

    /// Consumes one alert latch edge.
    ///
    /// Only the first alert of a cycle is acted on: the gate is the
    /// published alert counter, which stays nonzero until the fault monitor
    /// tears the cycle down. The latched temperatures go out to the
    /// current-value status registers immediately so operators see what
    /// tripped the sensor, independent of the ring capture.
    pub fn consume_alert<B: RegisterBus>(
        &mut self,
        bus: &mut B,
    ) -> Result<AlertOutcome, B::Error> {
        if self.alert_count != 0 {
            return Ok(AlertOutcome::AlreadyLatched);
        }

        let local = read_sample(bus, self.map.local_temp)?;
        let remote = read_sample(bus, self.map.remote_temp)?;
        bus.write(self.map.current_local, u32::from(local))?;
        bus.write(self.map.current_remote, u32::from(remote))?;

        self.was_alerted = true;
        self.alert_count = self.alert_count.saturating_add(1);
        bus.write(self.map.alert_count, u32::from(self.alert_count))?;

        Ok(AlertOutcome::Latched { local, remote })
    }

    /// Consumes one tick latch edge.
    ///
    /// Below the full post-window this always records, alert or not; the
    /// pointer register is written on the transition to a full window, using
    /// the pre-advance ring index.
    pub fn record_tick<B: RegisterBus>(&mut self, bus: &mut B) -> Result<TickOutcome, B::Error> {
        if self.post_samples >= POST_WINDOW {
            return Ok(TickOutcome::AwaitingFaultClear);
        }

        let local = read_sample(bus, self.map.local_temp)?;
        let remote = read_sample(bus, self.map.remote_temp)?;

        let slot = self.sample_counter;
        pack_sample(bus, self.map.local_mem_base, slot, local)?;
        pack_sample(bus, self.map.remote_mem_base, slot, remote)?;

        let mut outcome = TickOutcome::Recorded { slot };
        if self.was_alerted && self.post_samples == POST_WINDOW - 1 {
            self.last_post_sample = slot;
            bus.write(self.map.fault_temp_ptr, u32::from(slot))?;
            outcome = TickOutcome::WindowComplete { last_sample: slot };
        }

        self.sample_counter = (slot + 1) % RING_SIZE;
        if self.was_alerted {
            self.post_samples += 1;
        }

        Ok(outcome)
    }

    /// Tears down the alert cycle after the fault condition cleared.
    ///
    /// The sample counter is left alone: the ring keeps free-running so the
    /// next cycle already has warm pre-alert history behind it.
    pub fn rearm<B: RegisterBus>(&mut self, bus: &mut B) -> Result<(), B::Error> {
        self.post_samples = 0;
        self.was_alerted = false;
        self.alert_count = 0;
        self.last_post_sample = 0;
        bus.write(self.map.alert_count, 0)?;
        bus.write(self.map.fault_temp_ptr, 0)?;
        Ok(())
    }
}

fn read_sample<B: RegisterBus>(bus: &mut B, offset: u32) -> Result<u8, B::Error> {
    // Sensors report 8-bit resolution; anything above is truncated.
    Ok((bus.read(offset)? & 0xFF) as u8)
}

fn pack_sample<B: RegisterBus>(
    bus: &mut B,
    base: u32,
    slot: u16,
    sample: u8,
) -> Result<(), B::Error> {
    let word = base + u32::from(slot >> 2) * 4;
    let shift = u32::from(slot & 3) * 8;
    let current = bus.read(word)?;
    let merged = (current & !(0xFF << shift)) | (u32::from(sample) << shift);
    bus.write(word, merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    const WORDS: usize = 0x400 / 4;

    /// Dense layout so a flat word array can back the whole register space.
    fn test_map() -> RegisterMap {
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
            local_mem_base: 0x100,
            remote_mem_base: 0x200,
        }
    }

    struct TestBus {
        words: [u32; WORDS],
    }

    impl TestBus {
        fn new() -> Self {
            Self { words: [0; WORDS] }
        }

        fn word(&self, offset: u32) -> u32 {
            self.words[offset as usize / 4]
        }

        fn set_word(&mut self, offset: u32, value: u32) {
            self.words[offset as usize / 4] = value;
        }
    }

    impl RegisterBus for TestBus {
        type Error = Infallible;

        fn read(&mut self, offset: u32) -> Result<u32, Infallible> {
            Ok(self.word(offset))
        }

        fn write(&mut self, offset: u32, value: u32) -> Result<(), Infallible> {
            self.set_word(offset, value);
            Ok(())
        }
    }

    fn recorder() -> SampleRecorder {
        SampleRecorder::new(test_map())
    }

    #[test]
    fn ticks_pack_four_samples_per_word() {
        let mut bus = TestBus::new();
        let mut rec = recorder();

        for value in 0..8u32 {
            bus.set_word(test_map().local_temp, 0x10 + value);
            bus.set_word(test_map().remote_temp, 0x20 + value);
            rec.record_tick(&mut bus).unwrap();
        }

        assert_eq!(rec.sample_counter(), 8);
        assert_eq!(bus.word(0x100), 0x1312_1110);
        assert_eq!(bus.word(0x104), 0x1716_1514);
        assert_eq!(bus.word(0x200), 0x2322_2120);
        assert_eq!(bus.word(0x204), 0x2726_2524);
    }

    #[test]
    fn samples_truncate_to_eight_bits() {
        let mut bus = TestBus::new();
        let mut rec = recorder();

        bus.set_word(test_map().local_temp, 0x1A5);
        bus.set_word(test_map().remote_temp, 0xFFFF_FF42);
        rec.record_tick(&mut bus).unwrap();

        assert_eq!(bus.word(0x100) & 0xFF, 0xA5);
        assert_eq!(bus.word(0x200) & 0xFF, 0x42);
    }

    #[test]
    fn alert_publishes_temperatures_and_counter_once() {
        let mut bus = TestBus::new();
        let mut rec = recorder();
        bus.set_word(test_map().local_temp, 0x37);
        bus.set_word(test_map().remote_temp, 0x45);

        let first = rec.consume_alert(&mut bus).unwrap();
        assert_eq!(
            first,
            AlertOutcome::Latched {
                local: 0x37,
                remote: 0x45
            }
        );
        assert_eq!(bus.word(test_map().current_local), 0x37);
        assert_eq!(bus.word(test_map().current_remote), 0x45);
        assert_eq!(bus.word(test_map().alert_count), 1);

        // Raw interrupts during an active cycle do not restart anything.
        bus.set_word(test_map().local_temp, 0x60);
        let second = rec.consume_alert(&mut bus).unwrap();
        assert_eq!(second, AlertOutcome::AlreadyLatched);
        assert_eq!(bus.word(test_map().current_local), 0x37);
        assert_eq!(bus.word(test_map().alert_count), 1);
        assert_eq!(rec.alert_count(), 1);
    }

    #[test]
    fn window_completion_publishes_final_slot() {
        let mut bus = TestBus::new();
        let mut rec = recorder();

        rec.consume_alert(&mut bus).unwrap();
        for expected_post in 1..=POST_WINDOW {
            let outcome = rec.record_tick(&mut bus).unwrap();
            assert_eq!(rec.post_samples(), expected_post);
            if expected_post == POST_WINDOW {
                assert_eq!(
                    outcome,
                    TickOutcome::WindowComplete {
                        last_sample: POST_WINDOW - 1
                    }
                );
            } else {
                assert!(matches!(outcome, TickOutcome::Recorded { .. }));
            }
        }

        assert_eq!(rec.phase(), RecorderPhase::ArmedForClear);
        assert_eq!(rec.last_post_sample(), POST_WINDOW - 1);
        assert_eq!(
            bus.word(test_map().fault_temp_ptr),
            u32::from(POST_WINDOW - 1)
        );

        // Further ticks write nothing and defer to the fault monitor.
        let parked = rec.record_tick(&mut bus).unwrap();
        assert_eq!(parked, TickOutcome::AwaitingFaultClear);
        assert_eq!(rec.sample_counter(), POST_WINDOW);
    }

    #[test]
    fn rearm_zeroes_cycle_state_but_keeps_ring_position() {
        let mut bus = TestBus::new();
        let mut rec = recorder();

        rec.consume_alert(&mut bus).unwrap();
        for _ in 0..POST_WINDOW {
            rec.record_tick(&mut bus).unwrap();
        }
        let position = rec.sample_counter();

        rec.rearm(&mut bus).unwrap();
        assert_eq!(rec.phase(), RecorderPhase::Idle);
        assert_eq!(rec.post_samples(), 0);
        assert!(!rec.was_alerted());
        assert_eq!(rec.alert_count(), 0);
        assert_eq!(rec.last_post_sample(), 0);
        assert_eq!(bus.word(test_map().alert_count), 0);
        assert_eq!(bus.word(test_map().fault_temp_ptr), 0);
        assert_eq!(rec.sample_counter(), position);
    }

    #[test]
    fn idle_recording_wraps_modulo_ring_size() {
        let mut bus = TestBus::new();
        let mut rec = recorder();

        for _ in 0..300 {
            rec.record_tick(&mut bus).unwrap();
        }
        assert_eq!(rec.sample_counter(), 300 % RING_SIZE);
        assert_eq!(rec.phase(), RecorderPhase::Idle);
        assert_eq!(rec.post_samples(), 0);
    }
}
