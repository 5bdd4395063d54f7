//! Telemetry core for a solar-powered remote weather station.
//!
//! The board counts rain-gauge and anemometer pulses, derives wind direction
//! from an analog vane, integrates solar panel power into accumulated energy,
//! and serves the resulting state as a 13-byte checksummed frame over the TWI
//! bus in slave mode, polled by a data-logger master.
//!
//! The portable core (state, numeric algorithms, frame layout, slave protocol
//! engine) compiles on any target and carries the unit tests; everything that
//! touches ATmega128A registers lives in `hal`/`drivers` and is only built for
//! AVR.
#![cfg_attr(not(test), no_std)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

pub mod config;
pub mod frame;
pub mod scheduler;
pub mod slave;
pub mod solar;
pub mod telemetry;
pub mod wind;

#[cfg(target_arch = "avr")]
pub mod drivers;
#[cfg(target_arch = "avr")]
pub mod hal;
