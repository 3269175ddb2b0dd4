//! quadrature decoding for the rotary encoder
//!
//! The two phase lines are converted from gray code to a 2-bit binary phase.
//! Only moves to an adjacent phase count; a jump of two phases is taken as
//! noise and dropped rather than guessed as two steps.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuadratureDecoder {
    last: i8,
    delta: i8,
}

// gray to binary: 00 -> 0, 01 -> 1, 11 -> 2, 10 -> 3 (A is the high bit)
const fn phase(a: bool, b: bool) -> i8 {
    let mut p = if a { 3 } else { 0 };
    if b {
        p ^= 1;
    }
    p
}

impl QuadratureDecoder {
    /// Decoder assuming the encoder rests at phase 0.
    pub const fn new() -> QuadratureDecoder {
        QuadratureDecoder { last: 0, delta: 0 }
    }

    /// Decoder starting at the phase currently on the lines.
    pub const fn with_phase(a: bool, b: bool) -> QuadratureDecoder {
        QuadratureDecoder {
            last: phase(a, b),
            delta: 0,
        }
    }

    /// One sample tick with the current phase line levels.
    pub fn sample(&mut self, a: bool, b: bool) {
        let new = phase(a, b);
        let diff = self.last.wrapping_sub(new);
        // bit 0 set: single step
        if diff & 1 != 0 {
            self.last = new;
            // bit 1 is the direction
            self.delta = self.delta.wrapping_add((diff & 2) - 1);
        }
    }

    /// Counts since the last read, one per phase step.
    pub fn take_delta(&mut self) -> i8 {
        let val = self.delta;
        self.delta = 0;
        val
    }

    /// Counts for encoders with two phase steps per detent. The odd step
    /// stays behind for the next read.
    pub fn take_two_step(&mut self) -> i8 {
        let val = self.delta;
        self.delta = val & 1;
        val >> 1
    }

    /// Counts for encoders with four phase steps per detent.
    pub fn take_four_step(&mut self) -> i8 {
        let val = self.delta;
        self.delta = val & 3;
        val >> 2
    }

    /// Steps accumulated and not yet read.
    pub fn pending(&self) -> i8 {
        self.delta
    }
}

impl Default for QuadratureDecoder {
    fn default() -> Self {
        QuadratureDecoder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // (A, B) for one full cycle in each direction, starting and ending at 00
    const FORWARD: [(bool, bool); 4] = [(true, false), (true, true), (false, true), (false, false)];
    const BACKWARD: [(bool, bool); 4] = [(false, true), (true, true), (true, false), (false, false)];

    fn turn(dec: &mut QuadratureDecoder, seq: &[(bool, bool)], cycles: usize) {
        for _ in 0..cycles {
            for &(a, b) in seq {
                dec.sample(a, b);
            }
        }
    }

    #[test]
    fn full_cycle_counts_four() {
        let mut dec = QuadratureDecoder::new();
        turn(&mut dec, &FORWARD, 1);
        assert_eq!(dec.take_delta(), -4);
        assert_eq!(dec.take_delta(), 0);

        turn(&mut dec, &BACKWARD, 1);
        assert_eq!(dec.take_delta(), 4);
    }

    #[test]
    fn repeated_samples_do_not_count() {
        let mut dec = QuadratureDecoder::new();
        for &(a, b) in &BACKWARD {
            dec.sample(a, b);
            dec.sample(a, b);
            dec.sample(a, b);
        }
        assert_eq!(dec.take_delta(), 4);
    }

    #[test]
    fn skipped_phase_is_ignored() {
        let mut dec = QuadratureDecoder::new();
        // 00 -> 11 jumps two phases
        dec.sample(true, true);
        assert_eq!(dec.pending(), 0);
        // the decoder still sits at 00, so 01 is one step from there
        dec.sample(false, true);
        assert_eq!(dec.take_delta(), 1);
    }

    #[test]
    fn back_and_forth_nets_zero() {
        let mut dec = QuadratureDecoder::new();
        dec.sample(true, false);
        dec.sample(false, false);
        dec.sample(false, true);
        dec.sample(false, false);
        assert_eq!(dec.take_delta(), 0);
    }

    #[test]
    fn seeded_phase_avoids_false_start() {
        let mut dec = QuadratureDecoder::with_phase(true, true);
        dec.sample(true, true);
        dec.sample(false, true);
        dec.sample(false, false);
        assert_eq!(dec.take_delta(), -2);
    }

    #[test]
    fn four_step_keeps_remainder() {
        let mut dec = QuadratureDecoder::new();
        turn(&mut dec, &BACKWARD, 1);
        dec.sample(false, true);
        dec.sample(true, true);
        assert_eq!(dec.pending(), 6);
        assert_eq!(dec.take_four_step(), 1);
        assert_eq!(dec.pending(), 2);
        dec.sample(true, false);
        dec.sample(false, false);
        assert_eq!(dec.take_four_step(), 1);
        assert_eq!(dec.pending(), 0);
    }

    #[test]
    fn two_step_keeps_remainder() {
        let mut dec = QuadratureDecoder::new();
        dec.sample(false, true);
        dec.sample(true, true);
        dec.sample(true, false);
        assert_eq!(dec.take_two_step(), 1);
        assert_eq!(dec.pending(), 1);
    }

    #[test]
    fn negative_counts_floor_with_positive_remainder() {
        let mut dec = QuadratureDecoder::new();
        turn(&mut dec, &FORWARD, 1);
        dec.sample(true, false);
        // -5 = 4 * -2 + 3
        assert_eq!(dec.take_four_step(), -2);
        assert_eq!(dec.pending(), 3);
    }

    #[test]
    fn granular_reads_add_up_to_single_steps() {
        let mut fine = QuadratureDecoder::new();
        let mut coarse = QuadratureDecoder::new();
        let mut total_fine: i32 = 0;
        let mut total_coarse: i32 = 0;
        let mut seed: u32 = 42;
        let mut at = 0usize;
        let ring = [(false, false), (false, true), (true, true), (true, false)];

        for i in 0..2000 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12345);
            at = match (seed >> 16) % 3 {
                0 => (at + 1) % 4,
                1 => (at + 3) % 4,
                _ => at,
            };
            let (a, b) = ring[at];
            fine.sample(a, b);
            coarse.sample(a, b);
            if i % 7 == 0 {
                total_fine += fine.take_delta() as i32;
                total_coarse += 4 * coarse.take_four_step() as i32;
            }
        }
        total_fine += fine.take_delta() as i32;
        let rem = coarse.pending() as i32;
        assert!((0..4).contains(&rem));
        assert_eq!(total_coarse + rem, total_fine);
    }
}
