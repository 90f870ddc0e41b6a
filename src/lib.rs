//! Hobby servo control for block-based programs on microcontroller boards.
//!
//! Set an absolute angle, sweep back and forth between two angles with a stop button that can
//! end the sweep early, and read back the last commanded angle. Servos are connected by pin
//! number through a [`ServoHub`](hub::ServoHub), which keeps exactly one controller per pin.
//!
//! The core is hardware independent:
//!
//! - [`pwm::ServoPwm`] is the PWM output (set period, write pulse width, disable).
//! - [`stop::StopInput`] is the stop button (or any other stop request).
//! - Delays come from `embedded-hal` / `embedded-hal-async` `DelayNs`.
//!
//! With the `pico1` or `pico2` feature, the `rp` module provides these on `embassy-rp`.
//!
//! # Glossary
//!
//! - **Pulse width:** how long (µs) the output is held high each period. Hobby servos read it
//!   as a target angle: 500 µs is 0°, 2500 µs is 180° by default.
//! - **Period:** one PWM cycle, 20 ms (50 Hz) for hobby servos.
//! - **Sweep:** repeated back-and-forth motion as one-degree steps with a fixed pause between.
//! - **PWM ([Pulse Width Modulation](https://en.wikipedia.org/wiki/Pulse-width_modulation)) Slices:**
//!   Both Pico 1 and 2 have 8 slices (& 16 channels); the Pico 2B has 12. These "slices" are
//!   unrelated to Rust slices.
#![cfg_attr(not(test), no_std)]

// Compile-time checks: at most one board
#[cfg(all(feature = "pico1", feature = "pico2"))]
compile_error!("Cannot enable both 'pico1' and 'pico2' features simultaneously");

// Compile-time check: firmware builds need a board
#[cfg(all(feature = "arm", not(any(feature = "pico1", feature = "pico2"))))]
compile_error!("The 'arm' feature needs a board feature: 'pico1' or 'pico2'");

#[macro_use]
mod fmt;

pub mod config;
mod error;
pub mod hub;
pub mod pulse;
pub mod pwm;
#[cfg(any(feature = "pico1", feature = "pico2"))]
pub mod rp;
pub mod servo;
pub mod stop;
pub mod sweep;

// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};
