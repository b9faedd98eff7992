//! Conversion of raw 24-bit codes to physical units.
//!
//! The scale factors are the fixed ones from the AD7746 datasheet. No per-board
//! calibration is applied here; the factory gain calibration is applied inside the
//! converter before the code is read out.

/// Largest value a 24-bit code can take.
pub const RAW_MAX: u32 = (1 << 24) - 1;

/// Mid-scale code, which decodes to zero capacitance.
pub const RAW_MID_SCALE: u32 = 1 << 23;

/// Full-scale span of the capacitive input, in farads (±4.096 pF).
pub const CAPACITANCE_SPAN_FARADS: f64 = 8.192e-12;

/// Farads per LSB of the capacitive code.
pub const CAPACITANCE_LSB_FARADS: f64 = CAPACITANCE_SPAN_FARADS / (1u32 << 24) as f64;

/// Temperature codes per degree Celsius.
pub const TEMPERATURE_CODES_PER_DEGREE: f64 = 2048.0;

/// Temperature offset, in degrees, subtracted after scaling.
pub const TEMPERATURE_OFFSET_CELSIUS: f64 = 4096.0;

/// Convert a capacitive code to farads.
///
/// The code is offset binary about mid-scale, so `0x800000` is zero, `0x000000` is
/// -4.096 pF and `0xFFFFFF` is just under +4.096 pF. This is in addition to any
/// CAPDAC offset configured on the input.
///
/// ```
/// use ad7746_hal::conversion::capacitance_farads;
///
/// assert_eq!(capacitance_farads(0x800000), 0.0);
/// assert!(capacitance_farads(0x800001) > 0.0);
/// ```
pub fn capacitance_farads(raw: u32) -> f64 {
    CAPACITANCE_LSB_FARADS * (f64::from(raw) - f64::from(RAW_MID_SCALE))
}

/// Convert a capacitance in farads back to the nearest capacitive code.
///
/// Values outside the converter range saturate at the ends of the 24-bit code.
pub fn capacitance_raw(farads: f64) -> u32 {
    let code = (farads / CAPACITANCE_LSB_FARADS + f64::from(RAW_MID_SCALE)).round();
    code.clamp(0.0, f64::from(RAW_MAX)) as u32
}

/// Convert a temperature code to degrees Celsius.
///
/// One LSB is 1/2048 °C, and code `4096 * 2048` is 0 °C.
pub fn temperature_celsius(raw: u32) -> f64 {
    f64::from(raw) / TEMPERATURE_CODES_PER_DEGREE - TEMPERATURE_OFFSET_CELSIUS
}

/// Assemble a 24-bit code from three bytes, most significant first.
pub fn assemble_code(bytes: [u8; 3]) -> u32 {
    u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]])
}
