//! Hardware side of the [`thermostat::io`] traits.

use atmega_hal::adc::{AdcSettings, ClockDivider, ReferenceVoltage};
use atmega_hal::port::mode::{Analog, Input, Output, PullUp};
use atmega_hal::port::{Pin, PB1, PB5, PC3, PD2, PD3, PD4, PD5};

use thermostat::config::{
    KEY_MODE, KEY_SELECT, PHASE_A, PHASE_B, SENSOR_CHANNEL, SETPOINT_EEPROM_ADDR,
};
use thermostat::io::{Relay, SetpointStore, Standby, TemperatureSensor};
use thermostat::temperature::oversample;
use thermostat::Error;

use crate::{pac, Adc, SensorPin};

/// The encoder phases and the two keys, read as one port D image.
pub struct InputPins {
    phase_a: Pin<Input<PullUp>, PD2>,
    phase_b: Pin<Input<PullUp>, PD3>,
    key_select: Pin<Input<PullUp>, PD4>,
    key_mode: Pin<Input<PullUp>, PD5>,
}

impl InputPins {
    pub fn new(
        phase_a: Pin<Input<PullUp>, PD2>,
        phase_b: Pin<Input<PullUp>, PD3>,
        key_select: Pin<Input<PullUp>, PD4>,
        key_mode: Pin<Input<PullUp>, PD5>,
    ) -> Self {
        InputPins {
            phase_a,
            phase_b,
            key_select,
            key_mode,
        }
    }

    /// Pin levels at the bit positions of PIND, bits we don't own read high.
    pub fn levels(&self) -> u8 {
        let mut levels = 0xFF;
        if self.phase_a.is_low() {
            levels &= !PHASE_A;
        }
        if self.phase_b.is_low() {
            levels &= !PHASE_B;
        }
        if self.key_select.is_low() {
            levels &= !KEY_SELECT;
        }
        if self.key_mode.is_low() {
            levels &= !KEY_MODE;
        }
        levels
    }
}

/// SSR control line and its status LED, switched together.
pub struct SsrOutput {
    ssr: Pin<Output, PB1>,
    led: Pin<Output, PB5>,
}

impl SsrOutput {
    pub fn new(ssr: Pin<Output, PB1>, led: Pin<Output, PB5>) -> Self {
        SsrOutput { ssr, led }
    }
}

impl Relay for SsrOutput {
    fn set(&mut self, on: bool) -> Result<(), Error> {
        if on {
            self.ssr.set_high();
            self.led.set_high();
        } else {
            self.ssr.set_low();
            self.led.set_low();
        }
        Ok(())
    }
}

// the sensor pin below is PC3
const _: () = assert!(SENSOR_CHANNEL == 3);

/// LM50 on ADC3, referenced to the voltage on `AREF`.
pub struct AdcSensor {
    adc: Adc,
    pin: Pin<Analog, PC3>,
}

impl AdcSensor {
    pub fn new(adc: pac::ADC, pin: SensorPin) -> Self {
        // 16MHz/128 = 125kHz conversion clock
        let mut adc = Adc::new(
            adc,
            AdcSettings {
                clock_divider: ClockDivider::Factor128,
                ref_voltage: ReferenceVoltage::Aref,
            },
        );
        let pin = pin.into_analog_input(&mut adc);
        AdcSensor { adc, pin }
    }
}

impl TemperatureSensor for AdcSensor {
    fn read_averaged(&mut self) -> Result<u16, Error> {
        let adc = &mut self.adc;
        let pin = &self.pin;
        oversample(|| adc.read_nonblocking(pin)).map_err(|_| Error::Sensor)
    }
}

/// The setpoint byte in the internal EEPROM.
pub struct EepromSetpoint {
    eeprom: atmega_hal::Eeprom,
}

impl EepromSetpoint {
    pub fn new(eeprom: pac::EEPROM) -> Self {
        EepromSetpoint {
            eeprom: atmega_hal::Eeprom::new(eeprom),
        }
    }
}

impl SetpointStore for EepromSetpoint {
    fn read_byte(&mut self) -> Result<u8, Error> {
        Ok(self.eeprom.read_byte(SETPOINT_EEPROM_ADDR))
    }

    fn write_byte(&mut self, value: u8) -> Result<(), Error> {
        self.eeprom.write_byte(SETPOINT_EEPROM_ADDR, value);
        Ok(())
    }
}

/// Idle sleep: the CPU stops but Timer0 keeps running and its overflow wakes us.
pub struct IdleStandby {
    cpu: pac::CPU,
}

impl IdleStandby {
    pub fn new(cpu: pac::CPU) -> Self {
        cpu.smcr().write(|w| w.sm().idle());
        IdleStandby { cpu }
    }
}

impl Standby for IdleStandby {
    fn suspend(&mut self) {
        // sleep enable
        self.cpu.smcr().modify(|_, w| w.se().set_bit());
        // sleep cpu
        avr_device::asm::sleep();
        // sleep disable
        self.cpu.smcr().modify(|_, w| w.se().clear_bit());
    }
}
