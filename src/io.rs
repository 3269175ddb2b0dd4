//! Hardware the control loop talks to, other than the display.

use crate::error::Error;

/// Solid state relay together with its status LED.
pub trait Relay {
    fn set(&mut self, on: bool) -> Result<(), Error>;
}

/// Oversampled temperature sensor, raw ADC counts 0..=1023.
pub trait TemperatureSensor {
    /// Busy waits until all conversions are done.
    fn read_averaged(&mut self) -> Result<u16, Error>;
}

/// The single persisted setpoint byte. An erased cell reads 0xFF.
pub trait SetpointStore {
    fn read_byte(&mut self) -> Result<u8, Error>;

    fn write_byte(&mut self, value: u8) -> Result<(), Error>;

    /// Write only when the stored value differs.
    fn update_byte(&mut self, value: u8) -> Result<(), Error> {
        if self.read_byte()? != value {
            self.write_byte(value)?;
        }
        Ok(())
    }
}

/// Low power wait until the next interrupt, at most one timer tick.
pub trait Standby {
    fn suspend(&mut self);
}
