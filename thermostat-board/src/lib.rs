//! Board support crate for the water heater thermostat module (Arduino Pro Mini 5 V, 16 MHz).
//!
//! This crate names the ATmega328p pins by what they are wired to on the thermostat PCB and
//! provides the hardware side of the [`thermostat`] collaborator traits: the solid state
//! relay, the LM50 sensor on `ADC3`, the setpoint byte in EEPROM and the idle mode standby.
//!
//! A rough skeleton for an application looks like this:
//!
//! ```no_run
//! #![no_std]
//! #![no_main]
//!
//! use panic_halt as _;
//!
//! #[avr_device::entry]
//! fn main() -> ! {
//!     let dp = thermostat_board::pac::Peripherals::take().unwrap();
//!     let pins = thermostat_board::Pins::with_mcu_pins(thermostat_board::hal::pins!(dp));
//!
//!     unimplemented!()
//! }
//! ```

#![no_std]

// Expose hal & pac crates
pub use atmega_hal as hal;
pub use crate::hal::pac;

mod pins;
pub use crate::pins::*;

mod io;
pub use crate::io::*;

/// The board runs from a 16 MHz crystal.
pub type CoreClock = hal::clock::MHz16;

/// Busy-Delay, used by the control loop for digit dwell and relay settling.
pub type Delay = hal::delay::Delay<CoreClock>;

/// Analog to Digital Converter clocked from [`CoreClock`].
pub type Adc = hal::Adc<CoreClock>;

/// The 4 digit display, shift register lines `DIO`, `SCLK` and `RCLK`.
pub type Display = thermostat::display::Display595<
    Pin<mode::Output, hal::port::PB2>,
    Pin<mode::Output, hal::port::PB4>,
    Pin<mode::Output, hal::port::PB3>,
>;

/// Serial (UART) interface on pins `RX` and `TX`, debug builds log through it.
pub type Serial = hal::usart::Usart0<CoreClock>;

/// Open [`Serial`] at `baudrate`.
pub fn serial(usart: pac::USART0, rx: RxPin, tx: TxPin, baudrate: u32) -> Serial {
    Serial::new(
        usart,
        rx,
        tx.into_output(),
        hal::usart::Baudrate::<CoreClock>::new(baudrate),
    )
}
