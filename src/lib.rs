//! Control core for a tethered twin-rotor helicopter rig.
//!
//! The crate is split the same way the firmware is wired:
//!
//! - [`drivers`]: sensor estimators (quadrature yaw, analog height), the
//!   integer PI controller and the duty to PWM conversion.
//! - [`control`]: the flight state machine and one periodic control tick.
//! - [`sync`]: the hand-off between interrupt-side producers and tasks.
//! - [`telemetry`]: labelled readings and the text report built from them.
//!
//! Everything here is hardware independent and `no_std`; the embassy tasks
//! that drive it live in the firmware binary.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod state;
pub mod sync;
pub mod telemetry;

pub use error::Error;
