//! Array-backed register file standing in for the detector fabric.

use std::collections::HashMap;

use monitor_core::regs::{RegisterBus, RegisterMap};

/// Bytes covered by each temperature ring memory (256 packed byte slots).
const RING_BYTES: u32 = 0x100;
/// Bytes covered by the power/monitor block.
const POWER_BLOCK_BYTES: u32 = 0x400;

/// Error produced when an access leaves the simulated windows.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct UnmappedOffset(pub u32);

impl std::fmt::Display for UnmappedOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unmapped register offset {:#010x}", self.0)
    }
}

/// Simulated register file with the same sparse layout as the hardware.
pub struct SimBus {
    map: RegisterMap,
    words: HashMap<u32, u32>,
}

impl SimBus {
    /// Creates an all-zero register file for the given layout.
    #[must_use]
    pub fn new(map: RegisterMap) -> Self {
        Self {
            map,
            words: HashMap::new(),
        }
    }

    fn mapped(&self, offset: u32) -> bool {
        let in_block = |base: u32, len: u32| (base..base + len).contains(&offset);
        in_block(self.map.power_enable, POWER_BLOCK_BYTES)
            || in_block(self.map.local_mem_base, RING_BYTES)
            || in_block(self.map.remote_mem_base, RING_BYTES)
    }

    /// Reads a word without going through the bus trait (test/UI access).
    #[must_use]
    pub fn peek(&self, offset: u32) -> u32 {
        self.words.get(&offset).copied().unwrap_or(0)
    }

    /// Writes a word without going through the bus trait (fault injection,
    /// sensor value updates).
    pub fn poke(&mut self, offset: u32, value: u32) {
        self.words.insert(offset, value);
    }

    /// Sets the raw sensor values the next tick will observe.
    pub fn set_temps(&mut self, local: u8, remote: u8) {
        self.poke(self.map.local_temp, u32::from(local));
        self.poke(self.map.remote_temp, u32::from(remote));
    }

    /// Sets the external fault-status word.
    pub fn set_fault(&mut self, status: u32) {
        self.poke(self.map.fault_status, status);
    }

    /// Reads one packed byte sample out of a ring memory.
    #[must_use]
    pub fn ring_sample(&self, base: u32, slot: u16) -> u8 {
        let word = self.peek(base + u32::from(slot >> 2) * 4);
        ((word >> (u32::from(slot & 3) * 8)) & 0xFF) as u8
    }

    /// Register layout backing this file.
    #[must_use]
    pub fn map(&self) -> &RegisterMap {
        &self.map
    }
}

impl RegisterBus for SimBus {
    type Error = UnmappedOffset;

    fn read(&mut self, offset: u32) -> Result<u32, UnmappedOffset> {
        if !self.mapped(offset) {
            return Err(UnmappedOffset(offset));
        }
        Ok(self.peek(offset))
    }

    fn write(&mut self, offset: u32, value: u32) -> Result<(), UnmappedOffset> {
        if !self.mapped(offset) {
            return Err(UnmappedOffset(offset));
        }
        self.poke(offset, value);
        Ok(())
    }
}
