//! logging over the serial port
//! These functions are only used in debug builds

use thermostat::{Error, StepReport};
use thermostat_board::Serial;

pub fn send_report(serial: &mut Serial, report: &StepReport) {
    if report.changed_state() {
        ufmt::uwriteln!(serial, "{}\r", report).ok();
    }
    if report.saved {
        ufmt::uwriteln!(serial, "setpoint saved:{}\r", report.setpoint).ok();
    }
}

pub fn send_error(serial: &mut Serial, e: Error) {
    ufmt::uwriteln!(serial, "error:{:?}\r", e).ok();
}
