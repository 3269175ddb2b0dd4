//! board wiring and tuning constants

use crate::temperature::Calibration;

//==========================================================
// inputs, all on PORTD

/// encoder push button, enters and leaves setpoint editing
pub const KEY_SELECT: u8 = 1 << 4;
/// on/off button
pub const KEY_MODE: u8 = 1 << 5;
pub const KEY_MASK: u8 = KEY_SELECT | KEY_MODE;

/// rotary encoder phase lines
pub const PHASE_A: u8 = 1 << 2;
pub const PHASE_B: u8 = 1 << 3;

/// Timer0 overflow period, 16MHz / 64 / 256
pub const TICK_PERIOD_US: u16 = 1024;

//==========================================================
// setpoint

pub const SETPOINT_MIN: u8 = 20;
pub const SETPOINT_MAX: u8 = 100;
pub const SETPOINT_DEFAULT: u8 = 80;
/// value of an erased eeprom cell
pub const SETPOINT_UNSET: u8 = 0xFF;
pub const SETPOINT_EEPROM_ADDR: u16 = 0;

//==========================================================
// temperature sensor

/// LM50 output on ADC3
pub const SENSOR_CHANNEL: u8 = 3;
/// 8 conversions per reading
pub const OVERSAMPLE_SHIFT: u8 = 3;
/// calibration constants are scaled by 256
pub const FIXED_POINT_SHIFT: u8 = 8;

//==========================================================
// display and relay timing

/// display redraws per main loop pass
pub const REFRESH_BURST: u8 = 20;
/// time each digit stays lit
pub const DIGIT_DWELL_MS: u32 = 5;
/// delay between waking in the off state and pulsing the relay
pub const RELAY_SETTLE_MS: u32 = 50;

/// Tunables for the control loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    pub calibration: Calibration,
    pub refresh_burst: u8,
    pub digit_dwell_ms: u32,
    pub relay_settle_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            calibration: Calibration::LED_REFERENCE,
            refresh_burst: REFRESH_BURST,
            digit_dwell_ms: DIGIT_DWELL_MS,
            relay_settle_ms: RELAY_SETTLE_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_matches_timer0_prescaler() {
        // 256 counts at 16MHz / 64
        assert_eq!(TICK_PERIOD_US as u32, 256 * 64 / 16);
    }

    #[test]
    fn default_settings_use_led_reference() {
        let s = Settings::default();
        assert_eq!(s.calibration, Calibration::LED_REFERENCE);
        assert_eq!(s.refresh_burst, 20);
        assert_eq!(s.digit_dwell_ms, 5);
        assert_eq!(s.relay_settle_ms, 50);
    }
}
