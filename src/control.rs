//! the main loop state machine
//!
//! One [`Controller::step`] is one pass of the firmware main loop: read the
//! temperature, apply the over-temperature cutoff, do the work of the
//! current state, then look at the buttons. Nothing in here blocks longer
//! than a display burst or one suspend.

use embedded_hal::delay::DelayNs;
use ufmt::{uDisplay, uWrite, uwrite, Formatter};

use crate::config::{Settings, KEY_MODE, KEY_SELECT};
use crate::display::{digits, refresh, SegmentCode, SegmentDisplay};
use crate::error::Error;
use crate::io::{Relay, SetpointStore, Standby, TemperatureSensor};
use crate::sampler::SharedInputs;
use crate::temperature::{relay_must_open, DeciCelsius, Setpoint};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ControlState {
    Off,
    ShowTemperature,
    SetLimit,
}

impl ControlState {
    /// mode key: switch on from off, anything else goes off
    pub fn on_mode_press(self) -> ControlState {
        match self {
            ControlState::Off => ControlState::ShowTemperature,
            _ => ControlState::Off,
        }
    }

    /// select key: toggle setpoint editing. The flag is set when leaving
    /// the editor, which is when the setpoint gets saved.
    pub fn on_select_press(self) -> (ControlState, bool) {
        match self {
            ControlState::ShowTemperature => (ControlState::SetLimit, false),
            ControlState::SetLimit => (ControlState::ShowTemperature, true),
            ControlState::Off => (ControlState::Off, false),
        }
    }
}

impl Default for ControlState {
    fn default() -> Self {
        ControlState::Off
    }
}

impl uDisplay for ControlState {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        let s = match self {
            ControlState::Off => "Off",
            ControlState::ShowTemperature => "ShowTemperature",
            ControlState::SetLimit => "SetLimit",
        };
        f.write_str(s)
    }
}

/// What one pass of the loop did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepReport {
    /// state the pass ran in
    pub previous: ControlState,
    /// state for the next pass
    pub state: ControlState,
    pub temperature: DeciCelsius,
    pub setpoint: Setpoint,
    pub relay_on: bool,
    /// setpoint was handed to the store, which skips unchanged bytes
    pub saved: bool,
}

impl StepReport {
    pub fn changed_state(&self) -> bool {
        self.previous != self.state
    }
}

impl uDisplay for StepReport {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        let relay = if self.relay_on { "on" } else { "off" };
        uwrite!(
            f,
            "{} -> {} temp:{} set:{} relay:{}",
            self.previous,
            self.state,
            self.temperature,
            self.setpoint,
            relay
        )
    }
}

pub struct Controller<D, R, T, S> {
    display: D,
    relay: R,
    sensor: T,
    store: S,
    settings: Settings,
    state: ControlState,
    setpoint: Setpoint,
    relay_on: bool,
}

impl<D, R, T, S> Controller<D, R, T, S>
where
    D: SegmentDisplay,
    R: Relay,
    T: TemperatureSensor,
    S: SetpointStore,
{
    /// Relay off, setpoint loaded from the store, state off.
    pub fn new(
        display: D,
        mut relay: R,
        sensor: T,
        mut store: S,
        settings: Settings,
    ) -> Result<Self, Error> {
        relay.set(false)?;
        let setpoint = Setpoint::from_stored(store.read_byte()?);
        Ok(Controller {
            display,
            relay,
            sensor,
            store,
            settings,
            state: ControlState::Off,
            setpoint,
            relay_on: false,
        })
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn setpoint(&self) -> Setpoint {
        self.setpoint
    }

    pub fn relay_on(&self) -> bool {
        self.relay_on
    }

    pub fn release(self) -> (D, R, T, S) {
        (self.display, self.relay, self.sensor, self.store)
    }

    fn switch_relay(&mut self, on: bool) -> Result<(), Error> {
        self.relay.set(on)?;
        self.relay_on = on;
        Ok(())
    }

    // the display forgets everything, draw it a burst of times
    fn redraw(&mut self, delay: &mut impl DelayNs, codes: [SegmentCode; 4]) -> Result<(), Error> {
        for _ in 0..self.settings.refresh_burst {
            refresh(&mut self.display, delay, &codes, self.settings.digit_dwell_ms)?;
        }
        Ok(())
    }

    /// One pass of the main loop.
    pub fn step(
        &mut self,
        inputs: &SharedInputs,
        delay: &mut impl DelayNs,
        standby: &mut impl Standby,
    ) -> Result<StepReport, Error> {
        let raw = self.sensor.read_averaged()?;
        let temperature = self.settings.calibration.to_deci_celsius(raw);

        // the only place temperature switches the relay, and only off
        if relay_must_open(temperature, self.setpoint) {
            self.switch_relay(false)?;
        }

        match self.state {
            ControlState::Off => {
                self.display.clear()?;
                self.switch_relay(false)?;
                standby.suspend();
                delay.delay_ms(self.settings.relay_settle_ms);
                // standby pulse, checked again on the next pass
                self.switch_relay(true)?;
            }
            ControlState::ShowTemperature => {
                self.redraw(delay, digits(temperature.0, true))?;
            }
            ControlState::SetLimit => {
                self.setpoint.adjust(inputs.read_four_step_delta());
                let shown = self.setpoint.celsius() as i16;
                self.redraw(delay, digits(shown, false))?;
            }
        }

        let previous = self.state;
        let mut saved = false;

        if inputs.key_press(KEY_MODE) != 0 {
            self.state = self.state.on_mode_press();
        }

        if inputs.key_press(KEY_SELECT) != 0 {
            let (next, save) = self.state.on_select_press();
            self.state = next;
            if save {
                self.store.update_byte(self.setpoint.to_stored())?;
                saved = true;
            }
        }

        Ok(StepReport {
            previous,
            state: self.state,
            temperature,
            setpoint: self.setpoint,
            relay_on: self.relay_on,
            saved,
        })
    }
}
