//! Slow-ADC configuration template.
//!
//! The four slow-ADC channels share one reset strobe and two control words.
//! Reset is held briefly, released, the control words are programmed, and
//! sampling is enabled last so no channel free-runs with stale settings.

use core::time::Duration;

use super::{BringupSequence, BringupStep, ConfigRegister};

/// Reset bits for all four slow-ADC channels.
pub const SADC_RESET_ALL: u32 = 0xF;
/// Reset released on every channel.
pub const SADC_RESET_NONE: u32 = 0x0;
/// Control word 1 default (input range and clock divider selects).
pub const SADC_CTRL1_DEFAULT: u32 = 0x3;
/// Control word 2 default (test pattern off).
pub const SADC_CTRL2_DEFAULT: u32 = 0x0;
/// Sampling enabled on all four channels.
pub const SAMPLE_ENABLE_ALL: u32 = 0xF;
/// Hold time for the reset strobe.
pub const SADC_RESET_HOLD: Duration = Duration::from_millis(5);

/// Ordered slow-ADC configuration steps.
pub const SLOW_ADC_STEPS: [BringupStep; 5] = [
    BringupStep::new(
        ConfigRegister::SadcReset,
        SADC_RESET_ALL,
        SADC_RESET_HOLD,
        0,
    ),
    BringupStep::new(
        ConfigRegister::SadcReset,
        SADC_RESET_NONE,
        SADC_RESET_HOLD,
        0,
    ),
    BringupStep::write_only(ConfigRegister::SadcCtrl1, SADC_CTRL1_DEFAULT),
    BringupStep::write_only(ConfigRegister::SadcCtrl2, SADC_CTRL2_DEFAULT),
    BringupStep::write_only(ConfigRegister::SampleEnable, SAMPLE_ENABLE_ALL),
];

/// Slow-ADC configuration sequence.
pub const SLOW_ADC_SEQUENCE: BringupSequence = BringupSequence::new("slow-adc", &SLOW_ADC_STEPS);

/// Returns the shared slow-ADC sequence.
#[must_use]
pub const fn slow_adc_sequence() -> BringupSequence {
    SLOW_ADC_SEQUENCE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_is_pulsed_before_configuration() {
        assert_eq!(SLOW_ADC_STEPS[0].register, ConfigRegister::SadcReset);
        assert_eq!(SLOW_ADC_STEPS[0].value, SADC_RESET_ALL);
        assert_eq!(SLOW_ADC_STEPS[1].value, SADC_RESET_NONE);
        assert_eq!(SLOW_ADC_STEPS[0].settle, SADC_RESET_HOLD);
    }

    #[test]
    fn sampling_is_enabled_last() {
        let last = SLOW_ADC_STEPS[SLOW_ADC_STEPS.len() - 1];
        assert_eq!(last.register, ConfigRegister::SampleEnable);
        assert_eq!(last.value, SAMPLE_ENABLE_ALL);
    }
}
