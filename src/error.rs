//! Crate-wide error type.
//!
//! Variants carry no data so the type stays `Copy` and costs a single byte
//! on the AVR. On the real board every source is infallible; the variants
//! exist for the generic drivers and for host fakes.

use ufmt::{uDebug, uWrite, Formatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// a shift register line could not be driven
    Display,
    /// the SSR or status LED line could not be driven
    Relay,
    /// ADC conversion failed
    Sensor,
    /// setpoint byte could not be read or written
    Storage,
}

impl uDebug for Error {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        let s = match self {
            Error::Display => "Display",
            Error::Relay => "Relay",
            Error::Sensor => "Sensor",
            Error::Storage => "Storage",
        };
        f.write_str(s)
    }
}
