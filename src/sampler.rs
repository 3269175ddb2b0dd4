//! The periodic input sampler and the interrupt-safe handle around it.
//!
//! [`InputSampler`] is fed one PORTD snapshot per timer tick. The firmware
//! keeps it in a [`SharedInputs`] static: the timer interrupt calls
//! [`SharedInputs::tick`], the main loop calls the read methods. Every read
//! that also clears runs inside one critical section, so a tick can never
//! land between the read and the clear.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::config::{KEY_MASK, PHASE_A, PHASE_B};
use crate::encoder::QuadratureDecoder;
use crate::keys::KeyDebouncer;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSampler {
    pub keys: KeyDebouncer,
    pub encoder: QuadratureDecoder,
}

// pins outside the key mask always read as released
const fn key_levels(pins: u8) -> u8 {
    pins | !KEY_MASK
}

impl InputSampler {
    pub const fn new() -> InputSampler {
        InputSampler {
            keys: KeyDebouncer::new(),
            encoder: QuadratureDecoder::new(),
        }
    }

    /// Take the initial key state and encoder phase from a port snapshot.
    pub fn seed(&mut self, pins: u8) {
        self.keys = KeyDebouncer::seeded(key_levels(pins));
        self.encoder = QuadratureDecoder::with_phase(pins & PHASE_A != 0, pins & PHASE_B != 0);
    }

    /// One timer tick.
    pub fn sample(&mut self, pins: u8) {
        self.keys.sample(key_levels(pins));
        self.encoder.sample(pins & PHASE_A != 0, pins & PHASE_B != 0);
    }
}

/// [`InputSampler`] shared between the timer interrupt and the main loop.
pub struct SharedInputs {
    inner: Mutex<RefCell<InputSampler>>,
}

impl SharedInputs {
    pub const fn new() -> SharedInputs {
        SharedInputs {
            inner: Mutex::new(RefCell::new(InputSampler::new())),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut InputSampler) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }

    pub fn seed(&self, pins: u8) {
        self.with(|s| s.seed(pins))
    }

    /// Called from the timer interrupt with the current PORTD levels.
    pub fn tick(&self, pins: u8) {
        self.with(|s| s.sample(pins))
    }

    /// Return and clear the key presses selected by `mask`.
    pub fn key_press(&self, mask: u8) -> u8 {
        self.with(|s| s.keys.take_press(mask))
    }

    /// Keys in `mask` that are currently held down.
    pub fn key_state(&self, mask: u8) -> u8 {
        self.with(|s| s.keys.state(mask))
    }

    /// Encoder counts since the last read, single step encoders.
    pub fn read_delta(&self) -> i8 {
        self.with(|s| s.encoder.take_delta())
    }

    /// Encoder counts since the last read, two steps per detent.
    pub fn read_two_step_delta(&self) -> i8 {
        self.with(|s| s.encoder.take_two_step())
    }

    /// Encoder counts since the last read, four steps per detent.
    pub fn read_four_step_delta(&self) -> i8 {
        self.with(|s| s.encoder.take_four_step())
    }
}

impl Default for SharedInputs {
    fn default() -> Self {
        SharedInputs::new()
    }
}
