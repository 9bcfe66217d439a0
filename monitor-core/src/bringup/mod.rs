//! Single-shot front-end configuration sequences.
//!
//! Bring-up is plain, ordered register traffic: enable a rail, wait for it
//! to settle, check the power-OK word, move on. The sequences are encoded as
//! const step tables so firmware and host targets execute the exact same
//! data; only the bus and the delay provider differ per target.

use core::time::Duration;

use crate::regs::{RegisterBus, RegisterMap};

pub mod adc;
pub mod power;
pub mod sensor;

pub use adc::{SLOW_ADC_SEQUENCE, slow_adc_sequence};
pub use power::{POWER_DOWN_SEQUENCE, POWER_UP_SEQUENCE, power_down_sequence, power_up_sequence};
pub use sensor::{SENSOR_INIT_SEQUENCE, sensor_init_sequence};

/// Writable registers a bring-up step may target, resolved through the
/// deployment [`RegisterMap`] at execution time.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConfigRegister {
    PowerEnable,
    SadcReset,
    SadcCtrl1,
    SadcCtrl2,
    SampleEnable,
    SensorConfigClear,
    CurrentLocal,
    CurrentRemote,
    AlertCount,
    FaultTempPtr,
    Leds,
}

/// One ordered configuration write with optional settle and verification.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BringupStep {
    /// Target register.
    pub register: ConfigRegister,
    /// Word written to the target.
    pub value: u32,
    /// Time to wait after the write before continuing.
    pub settle: Duration,
    /// Power-OK bits that must read back set after the settle (0 = skip).
    pub power_ok_mask: u32,
}

impl BringupStep {
    pub const fn new(
        register: ConfigRegister,
        value: u32,
        settle: Duration,
        power_ok_mask: u32,
    ) -> Self {
        Self {
            register,
            value,
            settle,
            power_ok_mask,
        }
    }

    /// A bare write with no settle and no verification.
    pub const fn write_only(register: ConfigRegister, value: u32) -> Self {
        Self::new(register, value, Duration::ZERO, 0)
    }
}

/// Named, ordered bring-up sequence shared across targets.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BringupSequence {
    pub name: &'static str,
    pub steps: &'static [BringupStep],
}

impl BringupSequence {
    pub const fn new(name: &'static str, steps: &'static [BringupStep]) -> Self {
        Self { name, steps }
    }

    /// Returns the number of steps in the sequence.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

/// Target-supplied blocking settle delay.
pub trait SettleDelay {
    /// Blocks (or simulates blocking) for `duration`.
    fn settle(&mut self, duration: Duration);
}

/// Settle provider that returns immediately; used by tests and host runs
/// where wall-clock settling is meaningless.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopDelay;

impl SettleDelay for NoopDelay {
    fn settle(&mut self, _: Duration) {}
}

/// Failure surfaced while executing a bring-up sequence.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BringupError<E> {
    /// Underlying register transport failed.
    Bus(E),
    /// A supervised rail did not report power-OK after its settle window.
    RailFault {
        /// Index of the failing step within the sequence.
        step: usize,
        /// Power-OK bits the step required.
        expected: u32,
        /// Power-OK word actually observed.
        observed: u32,
    },
}

fn resolve(map: &RegisterMap, register: ConfigRegister) -> u32 {
    match register {
        ConfigRegister::PowerEnable => map.power_enable,
        ConfigRegister::SadcReset => map.sadc_reset,
        ConfigRegister::SadcCtrl1 => map.sadc_ctrl1,
        ConfigRegister::SadcCtrl2 => map.sadc_ctrl2,
        ConfigRegister::SampleEnable => map.sample_enable,
        ConfigRegister::SensorConfigClear => map.sensor_config_clear,
        ConfigRegister::CurrentLocal => map.current_local,
        ConfigRegister::CurrentRemote => map.current_remote,
        ConfigRegister::AlertCount => map.alert_count,
        ConfigRegister::FaultTempPtr => map.fault_temp_ptr,
        ConfigRegister::Leds => map.leds,
    }
}

/// Executes one sequence against the bus, settling and verifying per step.
pub fn run_sequence<B, D>(
    bus: &mut B,
    delay: &mut D,
    map: &RegisterMap,
    sequence: &BringupSequence,
) -> Result<(), BringupError<B::Error>>
where
    B: RegisterBus,
    D: SettleDelay,
{
    for (index, step) in sequence.steps.iter().enumerate() {
        bus.write(resolve(map, step.register), step.value)
            .map_err(BringupError::Bus)?;

        if !step.settle.is_zero() {
            delay.settle(step.settle);
        }

        if step.power_ok_mask != 0 {
            let observed = bus.read(map.power_ok).map_err(BringupError::Bus)?;
            if observed & step.power_ok_mask != step.power_ok_mask {
                return Err(BringupError::RailFault {
                    step: index,
                    expected: step.power_ok_mask,
                    observed,
                });
            }
        }
    }

    Ok(())
}
