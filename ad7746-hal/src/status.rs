//! Status register of the AD7746.

use bit_field::BitField;

/// Decoded status register (address 0x00).
///
/// The pending bits are active high: a set bit means the conversion on that
/// channel has not finished yet. The status register is always read fresh from
/// the device, never cached.
///
/// # Datasheet
///
/// See table 6 for the bit definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    raw: u8,
}

impl Status {
    /// The capacitive channel conversion is still in progress (RDYCAP).
    pub fn capacitance_pending(&self) -> bool {
        self.raw.get_bit(0)
    }

    /// The voltage/temperature conversion is still in progress (RDYVT).
    pub fn voltage_temperature_pending(&self) -> bool {
        self.raw.get_bit(1)
    }

    /// At least one enabled channel is still converting (RDY).
    pub fn conversion_pending(&self) -> bool {
        self.raw.get_bit(2)
    }

    /// The excitation output could not be driven (EXCERR).
    ///
    /// This usually indicates the capacitive load on the excitation pin is too
    /// large, or the sensor is shorted.
    pub fn excitation_fault(&self) -> bool {
        self.raw.get_bit(3)
    }

    /// All enabled channels have a fresh result.
    pub fn is_ready(&self) -> bool {
        !self.conversion_pending()
    }

    /// True if no status bit is set.
    pub fn is_clear(&self) -> bool {
        self.raw == 0
    }

    /// The raw register byte.
    pub fn raw(&self) -> u8 {
        self.raw
    }
}

impl From<u8> for Status {
    fn from(raw: u8) -> Self {
        Self { raw }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#04X}", self.raw)?;
        let mut flags = Vec::new();
        if self.capacitance_pending() {
            flags.push("cap pending");
        }
        if self.voltage_temperature_pending() {
            flags.push("vt pending");
        }
        if self.excitation_fault() {
            flags.push("excitation fault");
        }
        if !flags.is_empty() {
            write!(f, " ({})", flags.join(", "))?;
        }
        Ok(())
    }
}
