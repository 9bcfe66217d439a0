//! Volatile access to the AXI register window.
//!
//! The detector fabric maps every register and the temperature memories into
//! one contiguous window. Word access only; the fabric does not support
//! sub-word strobes.

#![cfg(target_os = "none")]

use core::convert::Infallible;
use core::ptr;

use monitor_core::regs::RegisterBus;

/// Base address of the register window on the processor bus.
pub const BUS_WINDOW: u32 = 0x8000_0000;

/// Word-addressed volatile bus over the AXI window.
#[derive(Copy, Clone, Debug)]
pub struct AxiBus {
    base: u32,
}

impl AxiBus {
    /// Creates a bus rooted at `base`.
    #[must_use]
    pub const fn new(base: u32) -> Self {
        Self { base }
    }

    fn addr(self, offset: u32) -> *mut u32 {
        (self.base + offset) as *mut u32
    }

    /// Reads one register word.
    #[must_use]
    pub fn read_word(self, offset: u32) -> u32 {
        unsafe { ptr::read_volatile(self.addr(offset)) }
    }

    /// Writes one register word.
    pub fn write_word(self, offset: u32, value: u32) {
        unsafe { ptr::write_volatile(self.addr(offset), value) }
    }
}

impl RegisterBus for AxiBus {
    type Error = Infallible;

    fn read(&mut self, offset: u32) -> Result<u32, Infallible> {
        Ok(self.read_word(offset))
    }

    fn write(&mut self, offset: u32, value: u32) -> Result<(), Infallible> {
        self.write_word(offset, value);
        Ok(())
    }
}
