//! SC6607 flashlight driver.
//!
//! Controls the two LED channels of the SC6607 flash/torch block: brightness
//! level mapping, the shared enable register, high-current signalling towards
//! the charger, and per-channel auto-off countdowns.
//!
//! The register map, level table, register port and channel controller are
//! `no_std`. The timeout scheduler and the reference-counted [`Flashlight`]
//! facade need threads and live behind the `std` feature.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

#[macro_use]
mod fmt;

pub mod command;
pub mod config;
pub mod controller;
pub mod data_types;
pub mod driver;
pub mod error;
pub mod levels;
pub mod registers;

#[cfg(feature = "std")]
pub mod flashlight;
#[cfg(feature = "std")]
pub mod timer;

pub use config::Config;
pub use controller::{ChannelController, ChargeCoordinator};
pub use data_types::Channel;
pub use driver::{RegisterPort, Sc6607};
pub use error::Error;
pub use registers::DEFAULT_I2C_ADDRESS;

#[cfg(feature = "std")]
pub use flashlight::Flashlight;
