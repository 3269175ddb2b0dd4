//! 4 digit 7-segment display on a pair of chained 74HC595.
//!
//! The module has no memory of its own: only one digit is lit at a time, so
//! the main loop has to keep redrawing or the display flickers. Position 1
//! is the rightmost digit.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::error::Error;

/// Index into [`SEGMENTS`]: 0-9 digits, 10-19 digits with decimal point,
/// 20 minus sign, 21 blank.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentCode(pub u8);

impl SegmentCode {
    pub const MINUS: SegmentCode = SegmentCode(20);
    pub const BLANK: SegmentCode = SegmentCode(21);

    pub const fn digit(d: u8) -> SegmentCode {
        SegmentCode(d)
    }

    pub const fn with_point(self) -> SegmentCode {
        SegmentCode(self.0 + 10)
    }
}

// common anode, segment on when the bit is low
const SEGMENTS: [u8; 22] = [
    0xC0, 0xF9, 0xA4, 0xB0, 0x99, 0x92, 0x82, 0xF8, 0x80, 0x90, // 0-9
    0x40, 0x79, 0x24, 0x30, 0x19, 0x12, 0x02, 0x78, 0x00, 0x10, // 0.-9.
    0xBF, // -
    0xFF, // blank
];

/// Segment byte for `code`. Codes past the table are dark.
pub fn segment_pattern(code: SegmentCode) -> u8 {
    SEGMENTS
        .get(code.0 as usize)
        .copied()
        .unwrap_or(SEGMENTS[SegmentCode::BLANK.0 as usize])
}

/// Split `value` into codes for positions 1..=4.
///
/// The tens digit is always drawn and carries the point when `point` is
/// set, so 5 tenths shows as `0.5`. Hundreds appear only above 99 and a
/// minus sign goes to the leftmost digit. Values beyond 999 produce
/// meaningless digits.
pub fn digits(value: i16, point: bool) -> [SegmentCode; 4] {
    let mut out = [SegmentCode::BLANK; 4];
    let mut v = value.unsigned_abs();

    if value < 0 {
        out[3] = SegmentCode::MINUS;
    }
    if v > 99 {
        out[2] = SegmentCode((v / 100) as u8);
        v %= 100;
    }
    let tens = SegmentCode::digit((v / 10) as u8);
    out[1] = if point { tens.with_point() } else { tens };
    out[0] = SegmentCode::digit((v % 10) as u8);
    out
}

pub trait SegmentDisplay {
    /// Light one digit; `position` is 1..=4.
    fn show_digit(&mut self, code: SegmentCode, position: u8) -> Result<(), Error>;

    fn clear(&mut self) -> Result<(), Error> {
        for position in 1..=4 {
            self.show_digit(SegmentCode::BLANK, position)?;
        }
        Ok(())
    }
}

/// Draw every digit once, leftmost first, holding each for `dwell_ms`.
pub fn refresh<D, T>(
    display: &mut D,
    delay: &mut T,
    codes: &[SegmentCode; 4],
    dwell_ms: u32,
) -> Result<(), Error>
where
    D: SegmentDisplay + ?Sized,
    T: DelayNs,
{
    for position in (1..=4u8).rev() {
        display.show_digit(codes[position as usize - 1], position)?;
        delay.delay_ms(dwell_ms);
    }
    Ok(())
}

/// Bit-banged driver: data, shift clock and latch clock lines.
pub struct Display595<DIO, SCLK, RCLK> {
    dio: DIO,
    sclk: SCLK,
    rclk: RCLK,
}

impl<DIO, SCLK, RCLK> Display595<DIO, SCLK, RCLK>
where
    DIO: OutputPin,
    SCLK: OutputPin,
    RCLK: OutputPin,
{
    pub fn new(dio: DIO, sclk: SCLK, rclk: RCLK) -> Self {
        Display595 { dio, sclk, rclk }
    }

    pub fn release(self) -> (DIO, SCLK, RCLK) {
        (self.dio, self.sclk, self.rclk)
    }

    // msb first, data is taken on the rising shift clock
    fn shift_byte(&mut self, mut byte: u8) -> Result<(), Error> {
        for _ in 0..8 {
            if byte & 0x80 != 0 {
                self.dio.set_high().map_err(|_| Error::Display)?;
            } else {
                self.dio.set_low().map_err(|_| Error::Display)?;
            }
            byte <<= 1;
            self.sclk.set_low().map_err(|_| Error::Display)?;
            self.sclk.set_high().map_err(|_| Error::Display)?;
        }
        Ok(())
    }
}

impl<DIO, SCLK, RCLK> SegmentDisplay for Display595<DIO, SCLK, RCLK>
where
    DIO: OutputPin,
    SCLK: OutputPin,
    RCLK: OutputPin,
{
    fn show_digit(&mut self, code: SegmentCode, position: u8) -> Result<(), Error> {
        if !(1..=4).contains(&position) {
            return Ok(());
        }
        self.shift_byte(segment_pattern(code))?;
        self.shift_byte(1 << (position - 1))?;
        // storage register clock, moves the shifted bits to the outputs
        self.rclk.set_low().map_err(|_| Error::Display)?;
        self.rclk.set_high().map_err(|_| Error::Display)?;
        Ok(())
    }
}
