//! Water heater thermostat logic.
//!
//! Everything here runs on the ATmega328p firmware as well as on the host:
//! the key debounce and rotary encoder engine fed from the timer tick, the
//! interrupt-safe wrapper the main loop reads it through, and the control
//! loop that drives the relay and the 7-segment display.
//!
//! Hardware is reached only through the traits in [`io`] and
//! [`display::SegmentDisplay`]; `thermostat-board` implements them for the
//! real board.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod control;
pub mod display;
pub mod encoder;
pub mod error;
pub mod io;
pub mod keys;
pub mod sampler;
pub mod temperature;

pub use control::{ControlState, Controller, StepReport};
pub use error::Error;
pub use sampler::SharedInputs;
