//! Temperature sensor initialization template.
//!
//! Clears any latched sensor configuration from a previous run and zeroes
//! every monitor status register, matching the boot contract: all published
//! state starts at zero/idle.

use super::{BringupSequence, BringupStep, ConfigRegister};
use crate::monitor::SENSOR_CONFIG_CLEAR_STROBE;

/// Ordered sensor initialization steps.
pub const SENSOR_INIT_STEPS: [BringupStep; 5] = [
    BringupStep::write_only(ConfigRegister::SensorConfigClear, SENSOR_CONFIG_CLEAR_STROBE),
    BringupStep::write_only(ConfigRegister::CurrentLocal, 0),
    BringupStep::write_only(ConfigRegister::CurrentRemote, 0),
    BringupStep::write_only(ConfigRegister::AlertCount, 0),
    BringupStep::write_only(ConfigRegister::FaultTempPtr, 0),
];

/// Sensor initialization sequence.
pub const SENSOR_INIT_SEQUENCE: BringupSequence =
    BringupSequence::new("sensor-init", &SENSOR_INIT_STEPS);

/// Returns the shared sensor initialization sequence.
#[must_use]
pub const fn sensor_init_sequence() -> BringupSequence {
    SENSOR_INIT_SEQUENCE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_zeroes_every_published_status_word() {
        let zeroed = [
            ConfigRegister::CurrentLocal,
            ConfigRegister::CurrentRemote,
            ConfigRegister::AlertCount,
            ConfigRegister::FaultTempPtr,
        ];
        for register in zeroed {
            assert!(
                SENSOR_INIT_STEPS
                    .iter()
                    .any(|step| step.register == register && step.value == 0),
                "missing boot zero for {register:?}"
            );
        }
    }

    #[test]
    fn config_clear_strobe_comes_first() {
        assert_eq!(
            SENSOR_INIT_STEPS[0].register,
            ConfigRegister::SensorConfigClear
        );
        assert_eq!(SENSOR_INIT_STEPS[0].value, SENSOR_CONFIG_CLEAR_STROBE);
    }
}
