//! Power sequencing templates for the analog front end.
//!
//! Rails come up one at a time: each step adds one enable bit, waits for the
//! regulator to settle, and checks the corresponding power-OK bit before the
//! next rail is touched. The input DC/DC converters (±6 V) are supervised
//! but not enable-controlled, so the first step only verifies them.

use core::time::Duration;

use super::{BringupSequence, BringupStep, ConfigRegister};

/// Enable bit for the −6 V analog DC/DC converter.
pub const EN_DCDC_AM6V: u32 = 1 << 0;
/// Enable bit for the +5.4 V analog DC/DC converter.
pub const EN_DCDC_AP5V4: u32 = 1 << 1;
/// Enable bit for the +3.7 V analog DC/DC converter.
pub const EN_DCDC_AP3V7: u32 = 1 << 2;
/// Enable bit for the +2.3 V analog DC/DC converter.
pub const EN_DCDC_AP2V3: u32 = 1 << 3;
/// Enable bit for the +1.6 V analog DC/DC converter.
pub const EN_DCDC_AP1V6: u32 = 1 << 4;
/// Enable bit for the slow-channel LDO group.
pub const EN_LDO_SLOW: u32 = 1 << 5;
/// Enable bit for the fast-channel LDO group.
pub const EN_LDO_FAST: u32 = 1 << 6;
/// Enable bit for the −5 V LDO.
pub const EN_LDO_AM5V: u32 = 1 << 7;

/// Power-OK bits for the input +6 V converters (present at power-on).
pub const POK_INPUT_RAILS: u32 = 0b11;
/// Power-OK bit for the −6 V converter.
pub const POK_DCDC_AM6V: u32 = 1 << 2;
/// Power-OK bit for the +5.4 V converter.
pub const POK_DCDC_AP5V4: u32 = 1 << 3;
/// Power-OK bit for the +3.7 V converter.
pub const POK_DCDC_AP3V7: u32 = 1 << 4;
/// Power-OK bit for the +2.3 V converter.
pub const POK_DCDC_AP2V3: u32 = 1 << 5;
/// Power-OK bit for the +1.6 V converter.
pub const POK_DCDC_AP1V6: u32 = 1 << 6;
/// Power-OK bits for every supervised LDO output.
pub const POK_LDOS: u32 = 0x000F_FF80;

/// Settle window after enabling a DC/DC rail.
pub const DCDC_SETTLE: Duration = Duration::from_millis(20);
/// Settle window after enabling an LDO group.
pub const LDO_SETTLE: Duration = Duration::from_millis(10);

/// Ordered rail-enable steps implementing the power-up sequence.
pub const POWER_UP_STEPS: [BringupStep; 9] = [
    // Input converters must already be good before any rail is enabled.
    BringupStep::new(
        ConfigRegister::PowerEnable,
        0,
        Duration::ZERO,
        POK_INPUT_RAILS,
    ),
    BringupStep::new(
        ConfigRegister::PowerEnable,
        EN_DCDC_AM6V,
        DCDC_SETTLE,
        POK_INPUT_RAILS | POK_DCDC_AM6V,
    ),
    BringupStep::new(
        ConfigRegister::PowerEnable,
        EN_DCDC_AM6V | EN_DCDC_AP5V4,
        DCDC_SETTLE,
        POK_INPUT_RAILS | POK_DCDC_AM6V | POK_DCDC_AP5V4,
    ),
    BringupStep::new(
        ConfigRegister::PowerEnable,
        EN_DCDC_AM6V | EN_DCDC_AP5V4 | EN_DCDC_AP3V7,
        DCDC_SETTLE,
        POK_INPUT_RAILS | POK_DCDC_AM6V | POK_DCDC_AP5V4 | POK_DCDC_AP3V7,
    ),
    BringupStep::new(
        ConfigRegister::PowerEnable,
        EN_DCDC_AM6V | EN_DCDC_AP5V4 | EN_DCDC_AP3V7 | EN_DCDC_AP2V3,
        DCDC_SETTLE,
        POK_INPUT_RAILS | POK_DCDC_AM6V | POK_DCDC_AP5V4 | POK_DCDC_AP3V7 | POK_DCDC_AP2V3,
    ),
    BringupStep::new(
        ConfigRegister::PowerEnable,
        EN_DCDC_AM6V | EN_DCDC_AP5V4 | EN_DCDC_AP3V7 | EN_DCDC_AP2V3 | EN_DCDC_AP1V6,
        DCDC_SETTLE,
        POK_INPUT_RAILS
            | POK_DCDC_AM6V
            | POK_DCDC_AP5V4
            | POK_DCDC_AP3V7
            | POK_DCDC_AP2V3
            | POK_DCDC_AP1V6,
    ),
    // LDO groups ride on the DC/DC rails; verification waits for the last group.
    BringupStep::new(
        ConfigRegister::PowerEnable,
        EN_DCDC_AM6V
            | EN_DCDC_AP5V4
            | EN_DCDC_AP3V7
            | EN_DCDC_AP2V3
            | EN_DCDC_AP1V6
            | EN_LDO_SLOW,
        LDO_SETTLE,
        0,
    ),
    BringupStep::new(
        ConfigRegister::PowerEnable,
        EN_DCDC_AM6V
            | EN_DCDC_AP5V4
            | EN_DCDC_AP3V7
            | EN_DCDC_AP2V3
            | EN_DCDC_AP1V6
            | EN_LDO_SLOW
            | EN_LDO_FAST,
        LDO_SETTLE,
        0,
    ),
    BringupStep::new(
        ConfigRegister::PowerEnable,
        EN_DCDC_AM6V
            | EN_DCDC_AP5V4
            | EN_DCDC_AP3V7
            | EN_DCDC_AP2V3
            | EN_DCDC_AP1V6
            | EN_LDO_SLOW
            | EN_LDO_FAST
            | EN_LDO_AM5V,
        LDO_SETTLE,
        POK_INPUT_RAILS
            | POK_DCDC_AM6V
            | POK_DCDC_AP5V4
            | POK_DCDC_AP3V7
            | POK_DCDC_AP2V3
            | POK_DCDC_AP1V6
            | POK_LDOS,
    ),
];

/// Power-up sequence for the analog front end.
pub const POWER_UP_SEQUENCE: BringupSequence = BringupSequence::new("power-up", &POWER_UP_STEPS);

/// Returns the shared power-up sequence.
#[must_use]
pub const fn power_up_sequence() -> BringupSequence {
    POWER_UP_SEQUENCE
}

/// Single step dropping every enable bit at once.
pub const POWER_DOWN_STEPS: [BringupStep; 1] =
    [BringupStep::write_only(ConfigRegister::PowerEnable, 0)];

/// Power-down sequence for the analog front end.
pub const POWER_DOWN_SEQUENCE: BringupSequence =
    BringupSequence::new("power-down", &POWER_DOWN_STEPS);

/// Returns the shared power-down sequence.
#[must_use]
pub const fn power_down_sequence() -> BringupSequence {
    POWER_DOWN_SEQUENCE
}
