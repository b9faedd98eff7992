//! Channel selection and sample assembly.
//!
//! The AD7746 has one converter shared between the capacitive and the
//! voltage/temperature channels. With both channels enabled the converter
//! alternates between them, so each channel updates at roughly half the rate.
//!
//! The two 24-bit result fields sit next to each other in the register file
//! (0x01 to 0x06), so whatever channels are wanted can be fetched with one read.

use crate::conversion::{assemble_code, capacitance_farads, temperature_celsius};
use crate::registers::Register;

/// Which channels to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channels {
    /// Fetch the capacitive channel.
    pub capacitance: bool,
    /// Fetch the temperature (voltage/temperature) channel.
    pub temperature: bool,
}

impl Channels {
    /// Capacitance only.
    pub const CAPACITANCE: Channels = Channels {
        capacitance: true,
        temperature: false,
    };
    /// Temperature only.
    pub const TEMPERATURE: Channels = Channels {
        capacitance: false,
        temperature: true,
    };
    /// Both channels.
    pub const BOTH: Channels = Channels {
        capacitance: true,
        temperature: true,
    };

    /// Capacitance, and temperature if `temperature` is true.
    pub fn capacitance_and(temperature: bool) -> Self {
        Self {
            capacitance: true,
            temperature,
        }
    }

    /// True if no channel is selected.
    pub fn is_empty(&self) -> bool {
        !self.capacitance && !self.temperature
    }

    /// First register and byte count covering the selected channels.
    ///
    /// Returns `None` if no channel is selected.
    pub fn register_window(&self) -> Option<(Register, usize)> {
        match (self.capacitance, self.temperature) {
            (true, true) => Some((Register::CapDataH, 6)),
            (true, false) => Some((Register::CapDataH, 3)),
            (false, true) => Some((Register::VtDataH, 3)),
            (false, false) => None,
        }
    }

    /// Split the bytes read from [`Channels::register_window`] into raw codes.
    ///
    /// The capacitive code is the first three bytes and the temperature code the
    /// last three.
    pub(crate) fn demultiplex(&self, data: &[u8]) -> RawSample {
        let first = || assemble_code([data[0], data[1], data[2]]);
        let last = || {
            let n = data.len();
            assemble_code([data[n - 3], data[n - 2], data[n - 1]])
        };
        RawSample {
            capacitance: self.capacitance.then(first),
            temperature: self.temperature.then(last),
        }
    }
}

/// Raw 24-bit codes for the requested channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawSample {
    /// Capacitive code, if requested.
    pub capacitance: Option<u32>,
    /// Temperature code, if requested.
    pub temperature: Option<u32>,
}

impl RawSample {
    /// Convert the raw codes to physical units.
    pub fn convert(&self) -> Sample {
        Sample {
            capacitance_farads: self.capacitance.map(capacitance_farads),
            temperature_celsius: self.temperature.map(temperature_celsius),
        }
    }
}

/// A sample in physical units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sample {
    /// Capacitance in farads, if requested.
    pub capacitance_farads: Option<f64>,
    /// Temperature in degrees Celsius, if requested.
    pub temperature_celsius: Option<f64>,
}

impl Sample {
    /// Capacitance in picofarads, if requested.
    pub fn capacitance_picofarads(&self) -> Option<f64> {
        self.capacitance_farads.map(|farads| farads * 1e12)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows() {
        assert_eq!(Channels::BOTH.register_window(), Some((Register::CapDataH, 6)));
        assert_eq!(
            Channels::CAPACITANCE.register_window(),
            Some((Register::CapDataH, 3))
        );
        assert_eq!(
            Channels::TEMPERATURE.register_window(),
            Some((Register::VtDataH, 3))
        );
        assert_eq!(Channels::capacitance_and(false).register_window().map(|w| w.1), Some(3));
        let none = Channels {
            capacitance: false,
            temperature: false,
        };
        assert!(none.is_empty());
        assert_eq!(none.register_window(), None);
    }

    #[test]
    fn demultiplex_both() {
        let raw = Channels::BOTH.demultiplex(&[0x80, 0x00, 0x01, 0x80, 0x00, 0x00]);
        assert_eq!(raw.capacitance, Some(0x80_0001));
        assert_eq!(raw.temperature, Some(0x80_0000));
    }

    #[test]
    fn demultiplex_single_channels() {
        let cap = Channels::CAPACITANCE.demultiplex(&[0x12, 0x34, 0x56]);
        assert_eq!(cap, RawSample {
            capacitance: Some(0x12_3456),
            temperature: None
        });
        let temp = Channels::TEMPERATURE.demultiplex(&[0x12, 0x34, 0x56]);
        assert_eq!(temp, RawSample {
            capacitance: None,
            temperature: Some(0x12_3456)
        });
    }

    #[test]
    fn convert() {
        let sample = RawSample {
            capacitance: Some(0x80_0001),
            temperature: Some(0x80_0000),
        }
        .convert();
        let pf = sample.capacitance_picofarads().unwrap();
        assert!((pf - 4.8828125e-7).abs() < 1e-18);
        assert_eq!(sample.temperature_celsius, Some(0.0));

        let empty = RawSample::default().convert();
        assert_eq!(empty, Sample::default());
    }
}
