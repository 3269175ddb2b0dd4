//! firmware for the water heater thermostat
//! cuts the solid state relay once the water reaches the setpoint,
//! the setpoint is set with a rotary encoder and kept in eeprom

#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]

extern crate panic_halt;

use avr_device::interrupt;
use core::cell::RefCell;

use thermostat::config::{Settings, KEY_MASK};
use thermostat::temperature::Calibration;
use thermostat::{Controller, SharedInputs};
use thermostat_board::{AdcSensor, Delay, Display, EepromSetpoint, IdleStandby, InputPins, SsrOutput};

//==========================================================

#[cfg(debug_assertions)]
mod utility;

//==========================================================
// Keys and encoder

// debounce and quadrature state, advanced once per timer0 overflow
static INPUTS: SharedInputs = SharedInputs::new();

// the ISR owns the pins after startup
static INPUTPINSHANDLE: interrupt::Mutex<RefCell<Option<InputPins>>> =
    interrupt::Mutex::new(RefCell::new(None));

//==========================================================

fn settings() -> Settings {
    #[cfg(feature = "vref-1v6")]
    let calibration = Calibration::VREF_1V6;
    #[cfg(not(feature = "vref-1v6"))]
    let calibration = Calibration::LED_REFERENCE;

    Settings {
        calibration,
        ..Settings::default()
    }
}

//==========================================================

#[avr_device::entry]
fn main() -> ! {
    let dp = thermostat_board::pac::Peripherals::take().unwrap();

    // turn off unused modules
    let cpu = dp.CPU;
    cpu.prr().write(|w| {
        w.prtim1().set_bit();
        w.prtim2().set_bit();
        w.prspi().set_bit();
        w.prtwi().set_bit()
    });
    #[cfg(not(debug_assertions))]
    cpu.prr().modify(|_, w| w.prusart0().set_bit());
    // turn off analog comparator
    dp.AC.acsr().write(|w| w.acd().set_bit());

    let pins = thermostat_board::Pins::with_mcu_pins(thermostat_board::hal::pins!(dp));

    // setup serial
    #[cfg(debug_assertions)]
    let mut serial = thermostat_board::serial(dp.USART0, pins.rx, pins.tx, 57600);

    // SSR and its LED, output, start off
    let relay = SsrOutput::new(pins.ssr.into_output(), pins.ssr_led.into_output());

    // 595 control lines, output
    let display = Display::new(
        pins.dio.into_output(),
        pins.sclk.into_output(),
        pins.rclk.into_output(),
    );

    let sensor = AdcSensor::new(dp.ADC, pins.sensor);
    let store = EepromSetpoint::new(dp.EEPROM);
    let mut standby = IdleStandby::new(cpu);

    // KEYs and encoder, input, pull-up on
    let input_pins = InputPins::new(
        pins.phase_a.into_pull_up_input(),
        pins.phase_b.into_pull_up_input(),
        pins.key_select.into_pull_up_input(),
        pins.key_mode.into_pull_up_input(),
    );

    interrupt::free(|cs| {
        // no action on a key held during reset
        INPUTS.seed(input_pins.levels());
        // transfer to static variable
        INPUTPINSHANDLE.borrow(cs).replace(Some(input_pins));
    });

    // setup Timer0, CK/64, overflow interrupt enabled, 1.024ms tick
    let timer0 = dp.TC0;
    timer0.tccr0b().write(|w| w.cs0().prescale_64());
    timer0.timsk0().write(|w| w.toie0().set_bit());

    // pin change interrupt 2 on the keys, only there to wake the cpu
    dp.EXINT.pcicr().write(|w| unsafe { w.bits(0b100) });
    dp.EXINT.pcmsk2().write(|w| unsafe { w.bits(KEY_MASK) });

    let mut controller = Controller::new(display, relay, sensor, store, settings()).unwrap();
    let mut delay = Delay::new();

    // enable interrupts
    unsafe {
        interrupt::enable();
    }

    #[cfg(debug_assertions)]
    ufmt::uwriteln!(
        &mut serial,
        "\r\nThermostat Start setpoint:{}\r",
        controller.setpoint()
    )
    .ok();

    loop {
        match controller.step(&INPUTS, &mut delay, &mut standby) {
            Ok(_report) => {
                #[cfg(debug_assertions)]
                utility::send_report(&mut serial, &_report);
            }
            Err(_e) => {
                // nothing to recover, the next pass tries again
                #[cfg(debug_assertions)]
                utility::send_error(&mut serial, _e);
            }
        }
    }
}

//==========================================================

// interrupt handler for Timer0 overflow
#[avr_device::interrupt(atmega328p)]
fn TIMER0_OVF() {
    // create unneeded interrupt context for static functions
    // unneeded because we are in interrupt and can't be interrupted
    // again in avr
    interrupt::free(|cs| {
        if let Some(pins) = INPUTPINSHANDLE.borrow(cs).borrow().as_ref() {
            INPUTS.tick(pins.levels());
        }
    });
}

//==========================================================

// interrupt handler for pin change on port D
#[avr_device::interrupt(atmega328p)]
fn PCINT2() {
    // wake up only, sampling happens on the timer
}
