//! Hardware access for the detector register fabric.

#![cfg_attr(not(target_os = "none"), allow(dead_code))]

#[cfg(target_os = "none")]
pub mod bus;

#[cfg(target_os = "none")]
pub mod settle;

use core::convert::Infallible;

/// Unwraps a bus result whose error type is uninhabited.
pub fn unwrap_infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
