pub use atmega_hal::port::{mode, Pin, PinMode, PinOps};
use atmega_hal::port::{PC3, PD0, PD1};

avr_hal_generic::renamed_pins! {
    /// Reexport of the thermostat module pins, with the names they have on the board
    pub struct Pins {
        /// `RX`
        pub rx: atmega_hal::port::PD0 = pd0,
        /// `TX`
        pub tx: atmega_hal::port::PD1 = pd1,
        /// `ENC_A`
        ///
        /// * rotary encoder phase A, external pullup
        pub phase_a: atmega_hal::port::PD2 = pd2,
        /// `ENC_B`
        ///
        /// * rotary encoder phase B, external pullup
        pub phase_b: atmega_hal::port::PD3 = pd3,
        /// `SELECT`
        ///
        /// * encoder push button, active low
        /// * PCINT20 (pin change interrupt 20)
        pub key_select: atmega_hal::port::PD4 = pd4,
        /// `MODE`
        ///
        /// * on/off switch, active low
        /// * PCINT21 (pin change interrupt 21)
        pub key_mode: atmega_hal::port::PD5 = pd5,
        /// `SSR`
        ///
        /// * solid state relay control
        pub ssr: atmega_hal::port::PB1 = pb1,
        /// `DIO`
        ///
        /// * 74HC595 serial data in (DS, pin 14)
        pub dio: atmega_hal::port::PB2 = pb2,
        /// `RCLK`
        ///
        /// * 74HC595 storage register clock
        pub rclk: atmega_hal::port::PB3 = pb3,
        /// `SCLK`
        ///
        /// * 74HC595 shift register clock
        pub sclk: atmega_hal::port::PB4 = pb4,
        /// `SSR_LED`
        ///
        /// * relay status LED
        pub ssr_led: atmega_hal::port::PB5 = pb5,
        /// `TEMP`
        ///
        /// * ADC3 (ADC input channel 3), LM50 output
        pub sensor: atmega_hal::port::PC3 = pc3,
    }

    impl Pins {
        type Pin = Pin;
        type McuPins = atmega_hal::Pins;
    }
}

pub type RxPin = Pin<mode::Input<mode::Floating>, PD0>;
pub type TxPin = Pin<mode::Input<mode::Floating>, PD1>;
pub type SensorPin = Pin<mode::Input<mode::Floating>, PC3>;
