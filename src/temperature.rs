//! Fixed-point temperature conversion and the user setpoint.
//!
//! The LM50 puts out 500 mV at 0 °C and 10 mV/°C, so with readings taken in
//! millivolts one millivolt is 0.1 °C. Calibration constants are scaled by
//! 256 and the result shifted back down; no floating point anywhere.

use ufmt::{uDisplay, uWrite, uwrite, Formatter};

use crate::config::{
    FIXED_POINT_SHIFT, OVERSAMPLE_SHIFT, SETPOINT_DEFAULT, SETPOINT_MAX, SETPOINT_MIN,
    SETPOINT_UNSET,
};

/// Temperature in tenths of a degree Celsius.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct DeciCelsius(pub i16);

impl uDisplay for DeciCelsius {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        let v = self.0 as i32;
        if v < 0 {
            f.write_str("-")?;
        }
        let v = v.abs();
        uwrite!(f, "{}.{}", v / 10, v % 10)
    }
}

/// ADC scaling, both values multiplied by 256.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Calibration {
    /// millivolts per ADC count
    pub millivolt_step_256: i32,
    /// sensor output at 0 °C in millivolts
    pub zero_celsius_256: i32,
}

impl Calibration {
    /// red LED as reference, measured at 1.556 V
    pub const LED_REFERENCE: Calibration = Calibration {
        millivolt_step_256: 389,
        zero_celsius_256: 128_000,
    };

    /// 1.6 V reference, 1600 / 1023 * 256
    pub const VREF_1V6: Calibration = Calibration {
        millivolt_step_256: 400,
        zero_celsius_256: 128_000,
    };

    pub fn to_deci_celsius(&self, reading: u16) -> DeciCelsius {
        let scaled = reading as i32 * self.millivolt_step_256 - self.zero_celsius_256;
        DeciCelsius((scaled >> FIXED_POINT_SHIFT) as i16)
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Calibration::LED_REFERENCE
    }
}

/// Average 2^OVERSAMPLE_SHIFT conversions, busy waiting on each one.
pub fn oversample<E>(mut read: impl FnMut() -> nb::Result<u16, E>) -> Result<u16, E> {
    let mut sum: u16 = 0;
    for _ in 0..(1u8 << OVERSAMPLE_SHIFT) {
        sum = sum.wrapping_add(nb::block!(read())?);
    }
    Ok(sum >> OVERSAMPLE_SHIFT)
}

/// Water temperature limit in whole degrees, always within
/// [`SETPOINT_MIN`]..=[`SETPOINT_MAX`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Setpoint(u8);

impl Setpoint {
    pub const fn new(celsius: u8) -> Setpoint {
        if celsius < SETPOINT_MIN {
            Setpoint(SETPOINT_MIN)
        } else if celsius > SETPOINT_MAX {
            Setpoint(SETPOINT_MAX)
        } else {
            Setpoint(celsius)
        }
    }

    /// Setpoint from the stored byte; an erased cell gives the default.
    pub const fn from_stored(byte: u8) -> Setpoint {
        if byte == SETPOINT_UNSET {
            Setpoint(SETPOINT_DEFAULT)
        } else {
            Setpoint::new(byte)
        }
    }

    pub const fn to_stored(self) -> u8 {
        self.0
    }

    /// Move by `steps` degrees, saturating at the limits.
    pub fn adjust(&mut self, steps: i8) {
        let v = (self.0 as i16 + steps as i16).clamp(SETPOINT_MIN as i16, SETPOINT_MAX as i16);
        self.0 = v as u8;
    }

    pub const fn celsius(self) -> u8 {
        self.0
    }

    pub const fn deci_celsius(self) -> DeciCelsius {
        DeciCelsius(self.0 as i16 * 10)
    }
}

impl Default for Setpoint {
    fn default() -> Self {
        Setpoint(SETPOINT_DEFAULT)
    }
}

impl uDisplay for Setpoint {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        uwrite!(f, "{}C", self.0)
    }
}

/// The relay has to be off once the water reaches the setpoint.
pub fn relay_must_open(temperature: DeciCelsius, setpoint: Setpoint) -> bool {
    temperature >= setpoint.deci_celsius()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_celsius_at_500mv() {
        let cal = Calibration::VREF_1V6;
        // 320 counts * 400 = 128000
        assert_eq!(cal.to_deci_celsius(320), DeciCelsius(0));
        assert_eq!(cal.to_deci_celsius(0), DeciCelsius(-500));
    }

    #[test]
    fn led_reference_scaling() {
        let cal = Calibration::LED_REFERENCE;
        // (600 * 389 - 128000) >> 8 = 105400 >> 8 = 411
        assert_eq!(cal.to_deci_celsius(600), DeciCelsius(411));
        assert_eq!(cal.to_deci_celsius(1023), DeciCelsius(1054));
    }

    #[test]
    fn negative_readings_round_down() {
        let cal = Calibration::LED_REFERENCE;
        // 300 * 389 - 128000 = -11300, >> 8 = -45 (floor of -44.1)
        assert_eq!(cal.to_deci_celsius(300), DeciCelsius(-45));
    }

    #[test]
    fn oversample_averages_eight() {
        let mut samples = [1000u16, 1002, 1004, 1006, 1000, 1002, 1004, 1006].into_iter();
        let avg = oversample::<()>(|| Ok(samples.next().unwrap_or(0))).unwrap();
        assert_eq!(avg, 1003);
    }

    #[test]
    fn oversample_waits_on_would_block() {
        let mut calls = 0;
        let avg = oversample::<()>(|| {
            calls += 1;
            if calls % 2 == 1 {
                Err(nb::Error::WouldBlock)
            } else {
                Ok(1023)
            }
        })
        .unwrap();
        assert_eq!(avg, 1023);
        assert_eq!(calls, 16);
    }

    #[test]
    fn oversample_passes_errors() {
        let res = oversample(|| Err(nb::Error::Other("adc")));
        assert_eq!(res, Err("adc"));
    }

    #[test]
    fn erased_cell_gives_default() {
        assert_eq!(Setpoint::from_stored(0xFF).celsius(), 80);
        assert_eq!(Setpoint::from_stored(55).celsius(), 55);
        assert_eq!(Setpoint::from_stored(5).celsius(), 20);
        assert_eq!(Setpoint::from_stored(200).celsius(), 100);
    }

    #[test]
    fn adjust_saturates() {
        let mut sp = Setpoint::new(22);
        for _ in 0..10 {
            sp.adjust(-1);
        }
        assert_eq!(sp.celsius(), 20);
        sp.adjust(i8::MIN);
        assert_eq!(sp.celsius(), 20);

        let mut sp = Setpoint::new(98);
        for _ in 0..10 {
            sp.adjust(1);
        }
        assert_eq!(sp.celsius(), 100);
        sp.adjust(i8::MAX);
        assert_eq!(sp.celsius(), 100);

        sp.adjust(-7);
        assert_eq!(sp.celsius(), 93);
    }

    #[test]
    fn relay_opens_at_setpoint() {
        let sp = Setpoint::new(60);
        assert!(!relay_must_open(DeciCelsius(599), sp));
        assert!(relay_must_open(DeciCelsius(600), sp));
        assert!(relay_must_open(DeciCelsius(1000), sp));
    }

    #[test]
    fn formats_tenths() {
        let mut s = String::new();
        ufmt::uwrite!(s, "{} {} {}", DeciCelsius(234), DeciCelsius(-5), Setpoint::new(80)).unwrap();
        assert_eq!(s, "23.4 -0.5 80C");
    }
}
