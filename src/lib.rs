//! Character LCD Driver for Embedded Rust
//!
//! This crate drives an HD44780-compatible 16x2 character LCD whose 4-bit
//! data bus, register-select and strobe lines are bit-banged on one GPIO
//! port. There is no busy-flag read-back: every transfer is followed by a
//! fixed wait sized to the controller's worst case.
//!
//! # Features
//! - Blocking synchronous API using `embedded-hal` traits
//! - Designed for `no_std` environments, no allocation
//! - Interrupts masked for the duration of each transfer, with the previous
//!   state restored on every exit path
//! - Optional logging support via `defmt`
//!
//! # Dependencies
//! This driver depends on the following traits:
//! - [`Port`] for the GPIO port, or [`PinPort`] over individual [`OutputPin`]s
//! - [`InterruptControl`], or [`CriticalSectionInterrupts`] on top of `critical-section`
//! - [`DelayNs`] for timing, or the calibrated [`BusyWait`]
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` for logging support
//!
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(test), no_std)]

pub mod command;
pub mod delay;
pub mod error;
pub mod interrupt;
pub mod lcd;
pub mod port;
pub mod presence;

pub use command::{Command, Mode};
pub use delay::{BusyWait, Timing};
pub use error::LcdError;
pub use interrupt::{CriticalSectionInterrupts, InterruptControl, InterruptGuard, NoInterrupts};
pub use lcd::Lcd;
pub use port::{PinPort, Port};
pub use presence::PresenceCounter;
