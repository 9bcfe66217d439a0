//! Memory-mapped register access shared by firmware and host targets.
//!
//! The monitor never talks to hardware directly; everything flows through a
//! [`RegisterBus`] implementation supplied at initialization. The firmware
//! provides a volatile AXI-window bus, the emulator an array-backed register
//! file, and tests use small mock buses that record traffic.

/// Word-addressed read/write access to the device register space.
///
/// Offsets are byte addresses relative to the bus window; every access moves
/// a full 32-bit word, matching the AXI register fabric on the detector.
pub trait RegisterBus {
    /// Transport-specific error type.
    type Error;

    /// Reads the 32-bit word at `offset`.
    fn read(&mut self, offset: u32) -> Result<u32, Self::Error>;

    /// Writes the 32-bit word at `offset`.
    fn write(&mut self, offset: u32, value: u32) -> Result<(), Self::Error>;
}

/// Base offset of the power/monitor register block.
pub const POWER_BLOCK_BASE: u32 = 0x0100_0000;

/// Base offset of the local-temperature history memory.
pub const LOCAL_MEM_BASE: u32 = 0x0110_0000;

/// Base offset of the remote-temperature history memory.
pub const REMOTE_MEM_BASE: u32 = 0x0120_0000;

/// Deployment register layout consumed by the monitor core.
///
/// Every field is a byte offset into the register bus. The default layout
/// reproduces the observed detector deployment, but boards that move blocks
/// around construct their own map; nothing in the core hard-codes offsets.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RegisterMap {
    /// Rail enable bits (RW), one bit per DC/DC or LDO rail.
    pub power_enable: u32,
    /// Rail power-OK bits (RO), one bit per supervised rail.
    pub power_ok: u32,
    /// Front-panel LED word (RW).
    pub leds: u32,
    /// Slow-ADC reset strobe word (RW).
    pub sadc_reset: u32,
    /// Slow-ADC control word 1 (RW).
    pub sadc_ctrl1: u32,
    /// Slow-ADC control word 2 (RW).
    pub sadc_ctrl2: u32,
    /// Slow-ADC sampling enable bits (RW).
    pub sample_enable: u32,
    /// Sensor configuration-clear strobe (WO).
    pub sensor_config_clear: u32,
    /// Raw local temperature sensor value (RO, 8 significant bits).
    pub local_temp: u32,
    /// Raw remote temperature sensor value (RO, 8 significant bits).
    pub remote_temp: u32,
    /// Published local temperature at the moment the alert latched (RW).
    pub current_local: u32,
    /// Published remote temperature at the moment the alert latched (RW).
    pub current_remote: u32,
    /// Published alert cycle counter (RW, saturates at 255).
    pub alert_count: u32,
    /// Fault status word (RO from the monitor's perspective; 0 == cleared).
    pub fault_status: u32,
    /// Ring index of the last post-alert sample (RW; 0 == no completed event).
    pub fault_temp_ptr: u32,
    /// First word of the local-temperature ring memory.
    pub local_mem_base: u32,
    /// First word of the remote-temperature ring memory.
    pub remote_mem_base: u32,
}

impl RegisterMap {
    /// Layout matching the observed detector deployment.
    #[must_use]
    pub const fn lzts_default() -> Self {
        Self {
            power_enable: POWER_BLOCK_BASE,
            power_ok: POWER_BLOCK_BASE + 0x004,
            leds: POWER_BLOCK_BASE + 0x100,
            sadc_reset: POWER_BLOCK_BASE + 0x200,
            sadc_ctrl1: POWER_BLOCK_BASE + 0x204,
            sadc_ctrl2: POWER_BLOCK_BASE + 0x208,
            sample_enable: POWER_BLOCK_BASE + 0x20C,
            sensor_config_clear: POWER_BLOCK_BASE + 0x300,
            local_temp: POWER_BLOCK_BASE + 0x304,
            remote_temp: POWER_BLOCK_BASE + 0x308,
            current_local: POWER_BLOCK_BASE + 0x30C,
            current_remote: POWER_BLOCK_BASE + 0x310,
            alert_count: POWER_BLOCK_BASE + 0x314,
            fault_status: POWER_BLOCK_BASE + 0x318,
            fault_temp_ptr: POWER_BLOCK_BASE + 0x31C,
            local_mem_base: LOCAL_MEM_BASE,
            remote_mem_base: REMOTE_MEM_BASE,
        }
    }
}

impl Default for RegisterMap {
    fn default() -> Self {
        Self::lzts_default()
    }
}
