//! Register values written by the configuration sequence.

use std::time::Duration;

use crate::acquisition::Channels;
use crate::registers::{CapDac, CapSetup, ConfigurationSetup, ExcSetup, VtSetup};

/// Converter setup applied by [`EvalBoard::configure`].
///
/// The default is the reference board setup: CIN1 differential, internal
/// temperature sensor enabled, excitation always on at ±VDD/2, both CAPDACs
/// enabled at code 0x49, slowest filters and continuous conversion.
///
/// With both channels enabled the converter alternates between them, which with
/// the default filters (9.1 Hz and 8.2 Hz) gives about 4.3 Hz overall.
///
/// [`EvalBoard::configure`]: crate::EvalBoard::configure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorSetup {
    /// Excitation setup.
    pub excitation: ExcSetup,
    /// CAPDAC A trim.
    pub capdac_a: CapDac,
    /// CAPDAC B trim.
    pub capdac_b: CapDac,
    /// Voltage/temperature channel setup, or `None` to leave it disabled.
    pub voltage_temperature: Option<VtSetup>,
    /// Capacitive channel setup.
    pub capacitance: CapSetup,
    /// Filter rates and conversion mode.
    pub configuration: ConfigurationSetup,
    /// Delay after the reset before writing the setup.
    pub reset_settle: Duration,
    /// Delay after the setup before checking that a conversion completed.
    pub conversion_settle: Duration,
}

impl SensorSetup {
    /// Enable or disable the temperature channel.
    pub fn with_temperature(mut self, enabled: bool) -> Self {
        self.voltage_temperature = enabled.then(VtSetup::default);
        self
    }

    /// Set both CAPDAC codes, enabling them.
    pub fn with_capdacs(mut self, a: u8, b: u8) -> Self {
        self.capdac_a = CapDac::enabled(a);
        self.capdac_b = CapDac::enabled(b);
        self
    }

    /// True if the temperature channel will be enabled.
    pub fn temperature_enabled(&self) -> bool {
        self.voltage_temperature.is_some_and(|vt| vt.enabled)
    }

    /// Channels that produce data with this setup.
    pub fn channels(&self) -> Channels {
        Channels {
            capacitance: self.capacitance.enabled,
            temperature: self.temperature_enabled(),
        }
    }
}

impl Default for SensorSetup {
    fn default() -> Self {
        Self {
            excitation: ExcSetup::default(),
            capdac_a: CapDac::enabled(0x49),
            capdac_b: CapDac::enabled(0x49),
            voltage_temperature: Some(VtSetup::default()),
            capacitance: CapSetup::default(),
            configuration: ConfigurationSetup::default(),
            reset_settle: Duration::from_micros(500),
            conversion_settle: Duration::from_millis(300),
        }
    }
}
