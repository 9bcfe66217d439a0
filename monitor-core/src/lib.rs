#![no_std]

// Shared logic for the LZTS detector monitor feature set.
//
// This crate stays portable across MCU firmware and host tooling by avoiding
// the Rust standard library and exposing abstractions the other crates can
// adopt.

pub mod bringup;
pub mod fault;
pub mod latch;
pub mod monitor;
pub mod recorder;
pub mod regs;
pub mod telemetry;
pub mod ticker;
