//! AD7746 register map and typed setup register values.
//!
//! Register addresses and bit layouts follow table 5 and tables 6 through 18 of the
//! AD7745/AD7746 datasheet. The register file auto-increments, so contiguous
//! registers can be read or written in a single transfer.

use bit_field::BitField;

/// Access mode of a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Can only be read.
    ReadOnly,
    /// Can only be written.
    WriteOnly,
    /// Can be read and written.
    ReadWrite,
}

impl Access {
    /// True if the register can be read.
    pub fn readable(self) -> bool {
        !matches!(self, Access::WriteOnly)
    }

    /// True if the register can be written.
    pub fn writable(self) -> bool {
        !matches!(self, Access::ReadOnly)
    }
}

/// AD7746 registers.
///
/// Multi-byte fields are stored most-significant byte first, starting at the `H`
/// register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    /// Status (conversion pending and excitation fault bits).
    Status,
    /// Capacitive channel data, bits 23:16.
    CapDataH,
    /// Capacitive channel data, bits 15:8.
    CapDataM,
    /// Capacitive channel data, bits 7:0.
    CapDataL,
    /// Voltage/temperature channel data, bits 23:16.
    VtDataH,
    /// Voltage/temperature channel data, bits 15:8.
    VtDataM,
    /// Voltage/temperature channel data, bits 7:0.
    VtDataL,
    /// Capacitive channel setup.
    CapSetup,
    /// Voltage/temperature channel setup.
    VtSetup,
    /// Excitation setup.
    ExcSetup,
    /// Conversion rate and mode.
    Configuration,
    /// CAPDAC A trim (positive input).
    CapDacA,
    /// CAPDAC B trim (negative input).
    CapDacB,
    /// Capacitive offset calibration, high byte.
    CapOffsetH,
    /// Capacitive offset calibration, low byte.
    CapOffsetL,
    /// Capacitive gain calibration, high byte (factory set).
    CapGainH,
    /// Capacitive gain calibration, low byte (factory set).
    CapGainL,
    /// Voltage gain calibration, high byte (factory set).
    VoltGainH,
    /// Voltage gain calibration, low byte (factory set).
    VoltGainL,
    /// Reset pseudo-register. Writing any byte resets the converter.
    Reset,
}

impl Register {
    /// Every register in the readable register file, in address order.
    pub const REGISTER_FILE: [Register; 19] = [
        Register::Status,
        Register::CapDataH,
        Register::CapDataM,
        Register::CapDataL,
        Register::VtDataH,
        Register::VtDataM,
        Register::VtDataL,
        Register::CapSetup,
        Register::VtSetup,
        Register::ExcSetup,
        Register::Configuration,
        Register::CapDacA,
        Register::CapDacB,
        Register::CapOffsetH,
        Register::CapOffsetL,
        Register::CapGainH,
        Register::CapGainL,
        Register::VoltGainH,
        Register::VoltGainL,
    ];

    /// Register address sent in `wValue`.
    pub fn address(self) -> u8 {
        match self {
            Register::Status => 0x00,
            Register::CapDataH => 0x01,
            Register::CapDataM => 0x02,
            Register::CapDataL => 0x03,
            Register::VtDataH => 0x04,
            Register::VtDataM => 0x05,
            Register::VtDataL => 0x06,
            Register::CapSetup => 0x07,
            Register::VtSetup => 0x08,
            Register::ExcSetup => 0x09,
            Register::Configuration => 0x0A,
            Register::CapDacA => 0x0B,
            Register::CapDacB => 0x0C,
            Register::CapOffsetH => 0x0D,
            Register::CapOffsetL => 0x0E,
            Register::CapGainH => 0x0F,
            Register::CapGainL => 0x10,
            Register::VoltGainH => 0x11,
            Register::VoltGainL => 0x12,
            Register::Reset => 0xBF,
        }
    }

    /// Access mode of the register.
    pub fn access(self) -> Access {
        use Register::*;
        match self {
            Status | CapDataH | CapDataM | CapDataL | VtDataH | VtDataM | VtDataL => {
                Access::ReadOnly
            }
            Reset => Access::WriteOnly,
            _ => Access::ReadWrite,
        }
    }

    /// Width in bits of the field that starts at this register.
    ///
    /// The middle and low bytes of a wide field report 8, as they are only
    /// meaningful as part of the wider read.
    pub fn field_width(self) -> u8 {
        use Register::*;
        match self {
            CapDataH | VtDataH => 24,
            CapOffsetH | CapGainH | VoltGainH => 16,
            _ => 8,
        }
    }

    /// Look up the register at the given address.
    pub fn from_address(address: u8) -> Option<Register> {
        if address == Register::Reset.address() {
            return Some(Register::Reset);
        }
        Register::REGISTER_FILE.get(usize::from(address)).copied()
    }
}

/// Capacitive channel setup (register 0x07).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapSetup {
    /// Enable the capacitive channel.
    pub enabled: bool,
    /// Measure CIN2 instead of CIN1.
    pub cin2: bool,
    /// Differential mode.
    pub differential: bool,
    /// Chop the capacitive channel (lower noise, one third of the rate).
    pub chop: bool,
}

impl Default for CapSetup {
    /// CIN1, differential, no chopping, enabled.
    fn default() -> Self {
        Self {
            enabled: true,
            cin2: false,
            differential: true,
            chop: false,
        }
    }
}

impl From<CapSetup> for u8 {
    fn from(value: CapSetup) -> Self {
        let mut byte = 0u8;
        byte.set_bit(7, value.enabled)
            .set_bit(6, value.cin2)
            .set_bit(5, value.differential)
            .set_bit(0, value.chop);
        byte
    }
}

impl From<u8> for CapSetup {
    fn from(byte: u8) -> Self {
        Self {
            enabled: byte.get_bit(7),
            cin2: byte.get_bit(6),
            differential: byte.get_bit(5),
            chop: byte.get_bit(0),
        }
    }
}

/// Voltage/temperature channel input selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VtMode {
    /// On-chip temperature sensor.
    #[default]
    InternalTemperature,
    /// External temperature sensor diode.
    ExternalTemperature,
    /// VDD monitor.
    SupplyMonitor,
    /// External voltage input.
    ExternalVoltage,
}

impl From<VtMode> for u8 {
    fn from(value: VtMode) -> Self {
        match value {
            VtMode::InternalTemperature => 0b00,
            VtMode::ExternalTemperature => 0b01,
            VtMode::SupplyMonitor => 0b10,
            VtMode::ExternalVoltage => 0b11,
        }
    }
}

impl From<u8> for VtMode {
    fn from(value: u8) -> Self {
        assert!(value <= 0b11, "Invalid bit pattern for VT mode");
        match value {
            0b00 => VtMode::InternalTemperature,
            0b01 => VtMode::ExternalTemperature,
            0b10 => VtMode::SupplyMonitor,
            0b11 => VtMode::ExternalVoltage,
            _ => unreachable!("Precondition assert covers > 3."),
        }
    }
}

/// Voltage/temperature channel setup (register 0x08).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VtSetup {
    /// Enable the voltage/temperature channel.
    pub enabled: bool,
    /// Input selection.
    pub mode: VtMode,
    /// Use an external reference instead of the internal 1.17 V reference.
    pub external_reference: bool,
    /// Internally short the voltage input (for noise measurements).
    pub short: bool,
    /// Chop the voltage/temperature channel.
    pub chop: bool,
}

impl Default for VtSetup {
    /// Internal sensor, internal reference, chopped, enabled.
    fn default() -> Self {
        Self {
            enabled: true,
            mode: VtMode::InternalTemperature,
            external_reference: false,
            short: false,
            chop: true,
        }
    }
}

impl From<VtSetup> for u8 {
    fn from(value: VtSetup) -> Self {
        let mut byte = 0u8;
        byte.set_bit(7, value.enabled)
            .set_bits(5..7, value.mode.into())
            .set_bit(4, value.external_reference)
            .set_bit(1, value.short)
            .set_bit(0, value.chop);
        byte
    }
}

impl From<u8> for VtSetup {
    fn from(byte: u8) -> Self {
        Self {
            enabled: byte.get_bit(7),
            mode: byte.get_bits(5..7).into(),
            external_reference: byte.get_bit(4),
            short: byte.get_bit(1),
            chop: byte.get_bit(0),
        }
    }
}

/// Excitation voltage level, as a fraction of VDD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExcitationLevel {
    /// ±VDD/8.
    VddOver8,
    /// ±VDD/4.
    VddOver4,
    /// ±VDD × 3/8.
    Vdd3Over8,
    /// ±VDD/2.
    #[default]
    VddOver2,
}

impl From<ExcitationLevel> for u8 {
    fn from(value: ExcitationLevel) -> Self {
        match value {
            ExcitationLevel::VddOver8 => 0b00,
            ExcitationLevel::VddOver4 => 0b01,
            ExcitationLevel::Vdd3Over8 => 0b10,
            ExcitationLevel::VddOver2 => 0b11,
        }
    }
}

impl From<u8> for ExcitationLevel {
    fn from(value: u8) -> Self {
        assert!(value <= 0b11, "Invalid bit pattern for excitation level");
        match value {
            0b00 => ExcitationLevel::VddOver8,
            0b01 => ExcitationLevel::VddOver4,
            0b10 => ExcitationLevel::Vdd3Over8,
            0b11 => ExcitationLevel::VddOver2,
            _ => unreachable!("Precondition assert covers > 3."),
        }
    }
}

/// Excitation setup (register 0x09).
///
/// The `_inverted` fields drive the complementary excitation output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExcSetup {
    /// Halve the modulator clock (for sensors with large capacitance to ground).
    pub clock_halved: bool,
    /// Keep the excitation on between conversions.
    pub always_on: bool,
    /// Enable EXCB.
    pub exc_b: bool,
    /// Enable the inverted EXCB.
    pub exc_b_inverted: bool,
    /// Enable EXCA.
    pub exc_a: bool,
    /// Enable the inverted EXCA.
    pub exc_a_inverted: bool,
    /// Excitation voltage level.
    pub level: ExcitationLevel,
}

impl Default for ExcSetup {
    /// Always on, EXCB normal, ±VDD/2.
    fn default() -> Self {
        Self {
            clock_halved: false,
            always_on: true,
            exc_b: true,
            exc_b_inverted: false,
            exc_a: false,
            exc_a_inverted: false,
            level: ExcitationLevel::VddOver2,
        }
    }
}

impl From<ExcSetup> for u8 {
    fn from(value: ExcSetup) -> Self {
        let mut byte = 0u8;
        byte.set_bit(7, value.clock_halved)
            .set_bit(6, value.always_on)
            .set_bit(5, value.exc_b)
            .set_bit(4, value.exc_b_inverted)
            .set_bit(3, value.exc_a)
            .set_bit(2, value.exc_a_inverted)
            .set_bits(0..2, value.level.into());
        byte
    }
}

impl From<u8> for ExcSetup {
    fn from(byte: u8) -> Self {
        Self {
            clock_halved: byte.get_bit(7),
            always_on: byte.get_bit(6),
            exc_b: byte.get_bit(5),
            exc_b_inverted: byte.get_bit(4),
            exc_a: byte.get_bit(3),
            exc_a_inverted: byte.get_bit(2),
            level: byte.get_bits(0..2).into(),
        }
    }
}

/// Capacitive channel digital filter setting.
///
/// Variants are named by the resulting output data rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapFilter {
    /// 90.9 Hz, 11.0 ms conversion time.
    Hz90_9,
    /// 83.8 Hz, 11.9 ms.
    Hz83_8,
    /// 50.0 Hz, 20.0 ms.
    Hz50_0,
    /// 26.3 Hz, 38.0 ms.
    Hz26_3,
    /// 16.1 Hz, 62.0 ms.
    Hz16_1,
    /// 13.0 Hz, 77.0 ms.
    Hz13_0,
    /// 10.9 Hz, 92.0 ms.
    Hz10_9,
    /// 9.1 Hz, 109.6 ms.
    #[default]
    Hz9_1,
}

impl From<CapFilter> for u8 {
    fn from(value: CapFilter) -> Self {
        match value {
            CapFilter::Hz90_9 => 0b000,
            CapFilter::Hz83_8 => 0b001,
            CapFilter::Hz50_0 => 0b010,
            CapFilter::Hz26_3 => 0b011,
            CapFilter::Hz16_1 => 0b100,
            CapFilter::Hz13_0 => 0b101,
            CapFilter::Hz10_9 => 0b110,
            CapFilter::Hz9_1 => 0b111,
        }
    }
}

impl From<u8> for CapFilter {
    fn from(value: u8) -> Self {
        assert!(value <= 0b111, "Invalid bit pattern for capacitive filter");
        match value {
            0b000 => CapFilter::Hz90_9,
            0b001 => CapFilter::Hz83_8,
            0b010 => CapFilter::Hz50_0,
            0b011 => CapFilter::Hz26_3,
            0b100 => CapFilter::Hz16_1,
            0b101 => CapFilter::Hz13_0,
            0b110 => CapFilter::Hz10_9,
            0b111 => CapFilter::Hz9_1,
            _ => unreachable!("Precondition assert covers > 7."),
        }
    }
}

/// Voltage/temperature channel digital filter setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VtFilter {
    /// 49.8 Hz, 20.1 ms conversion time.
    Hz49_8,
    /// 31.2 Hz, 32.1 ms.
    Hz31_2,
    /// 16.1 Hz, 62.1 ms.
    Hz16_1,
    /// 8.2 Hz, 122.1 ms.
    #[default]
    Hz8_2,
}

impl From<VtFilter> for u8 {
    fn from(value: VtFilter) -> Self {
        match value {
            VtFilter::Hz49_8 => 0b00,
            VtFilter::Hz31_2 => 0b01,
            VtFilter::Hz16_1 => 0b10,
            VtFilter::Hz8_2 => 0b11,
        }
    }
}

impl From<u8> for VtFilter {
    fn from(value: u8) -> Self {
        assert!(value <= 0b11, "Invalid bit pattern for VT filter");
        match value {
            0b00 => VtFilter::Hz49_8,
            0b01 => VtFilter::Hz31_2,
            0b10 => VtFilter::Hz16_1,
            0b11 => VtFilter::Hz8_2,
            _ => unreachable!("Precondition assert covers > 3."),
        }
    }
}

/// Converter operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversionMode {
    /// Idle.
    Idle,
    /// Convert continuously.
    #[default]
    Continuous,
    /// Single conversion, then idle.
    Single,
    /// Power down.
    PowerDown,
    /// Capacitive system offset calibration.
    OffsetCalibration,
    /// Capacitive or voltage system gain calibration.
    GainCalibration,
}

impl From<ConversionMode> for u8 {
    fn from(value: ConversionMode) -> Self {
        match value {
            ConversionMode::Idle => 0b000,
            ConversionMode::Continuous => 0b001,
            ConversionMode::Single => 0b010,
            ConversionMode::PowerDown => 0b011,
            ConversionMode::OffsetCalibration => 0b101,
            ConversionMode::GainCalibration => 0b110,
        }
    }
}

impl From<u8> for ConversionMode {
    /// Reserved patterns decode as [`ConversionMode::Idle`].
    fn from(value: u8) -> Self {
        match value {
            0b001 => ConversionMode::Continuous,
            0b010 => ConversionMode::Single,
            0b011 => ConversionMode::PowerDown,
            0b101 => ConversionMode::OffsetCalibration,
            0b110 => ConversionMode::GainCalibration,
            _ => ConversionMode::Idle,
        }
    }
}

/// Configuration register (0x0A): filter rates and conversion mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigurationSetup {
    /// Voltage/temperature filter.
    pub vt_filter: VtFilter,
    /// Capacitive filter.
    pub cap_filter: CapFilter,
    /// Operating mode.
    pub mode: ConversionMode,
}

impl From<ConfigurationSetup> for u8 {
    fn from(value: ConfigurationSetup) -> Self {
        let mut byte = 0u8;
        byte.set_bits(6..8, value.vt_filter.into())
            .set_bits(3..6, value.cap_filter.into())
            .set_bits(0..3, value.mode.into());
        byte
    }
}

impl From<u8> for ConfigurationSetup {
    fn from(byte: u8) -> Self {
        Self {
            vt_filter: byte.get_bits(6..8).into(),
            cap_filter: byte.get_bits(3..6).into(),
            mode: byte.get_bits(0..3).into(),
        }
    }
}

/// CAPDAC trim setting (registers 0x0B and 0x0C).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapDac {
    /// Connect the CAPDAC to the input.
    pub enabled: bool,
    /// 7-bit DAC code. The upper bit is ignored.
    pub value: u8,
}

impl CapDac {
    /// An enabled CAPDAC with the given 7-bit code.
    pub fn enabled(value: u8) -> Self {
        Self {
            enabled: true,
            value,
        }
    }

    /// A disconnected CAPDAC.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            value: 0,
        }
    }
}

impl From<CapDac> for u8 {
    fn from(value: CapDac) -> Self {
        let mut byte = 0u8;
        byte.set_bit(7, value.enabled)
            .set_bits(0..7, value.value.get_bits(0..7));
        byte
    }
}

impl From<u8> for CapDac {
    fn from(byte: u8) -> Self {
        Self {
            enabled: byte.get_bit(7),
            value: byte.get_bits(0..7),
        }
    }
}
