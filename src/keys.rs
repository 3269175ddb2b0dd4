//! routines associated with key state and key press
//! determination
//!
//! Every key owns one bit of a packed byte. Two further bytes hold a 2-bit
//! vertical counter per key (`ct0` the low bit, `ct1` the high bit) that
//! counts sample ticks on which the pin disagrees with the debounced state.
//! The debounced state flips only when that count reaches four in a row;
//! any tick that agrees resets the counter.

// capture debounced key state, the counters, and the latched presses
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyDebouncer {
    ct0: u8,
    ct1: u8,
    state: u8,
    press: u8,
}

impl KeyDebouncer {
    /// Start with all keys released.
    pub const fn new() -> KeyDebouncer {
        KeyDebouncer {
            ct0: 0xFF,
            ct1: 0xFF,
            state: 0,
            press: 0,
        }
    }

    /// Start with the debounced state taken from the current pin levels,
    /// so a key held during reset does not produce a press.
    pub const fn seeded(levels: u8) -> KeyDebouncer {
        KeyDebouncer {
            ct0: 0xFF,
            ct1: 0xFF,
            state: !levels,
            press: 0,
        }
    }

    /// One sample tick. `levels` are the raw pin levels, keys are active low.
    pub fn sample(&mut self, levels: u8) {
        // bits that differ from the accepted state
        let mut changed = !levels ^ self.state;

        // reset or count
        self.ct0 = !(self.ct0 & changed);
        self.ct1 = self.ct0 ^ (self.ct1 & changed);

        // counted to four ?
        changed &= self.ct0 & self.ct1;
        self.state ^= changed;

        // 0->1: key press detect
        self.press |= self.state & changed;
    }

    /// Return and clear the latched presses selected by `mask`.
    pub fn take_press(&mut self, mask: u8) -> u8 {
        let hit = mask & self.press;
        self.press ^= hit;
        hit
    }

    /// Debounced held state of the keys selected by `mask`.
    pub fn state(&self, mask: u8) -> u8 {
        self.state & mask
    }
}

impl Default for KeyDebouncer {
    fn default() -> Self {
        KeyDebouncer::new()
    }
}
