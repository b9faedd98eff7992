use ad7746_hal::gpio::PortState;

fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

pub(crate) fn u16_from_hex(value: &str) -> Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(strip_hex_prefix(value), 16)
}

pub(crate) fn u8_from_hex(value: &str) -> Result<u8, std::num::ParseIntError> {
    u8::from_str_radix(strip_hex_prefix(value), 16)
}

/// Parse a 7-bit CAPDAC code, in hexadecimal.
pub(crate) fn capdac_from_hex(value: &str) -> Result<u8, String> {
    let code = u8_from_hex(value).map_err(|e| e.to_string())?;
    if code > 0x7F {
        return Err(format!("CAPDAC code {code:#04X} is wider than 7 bits"));
    }
    Ok(code)
}

/// Parse a port as `value:direction`, both bytes in hexadecimal.
pub(crate) fn port_state_from_str(value: &str) -> Result<PortState, String> {
    let (level, direction) = value
        .split_once(':')
        .ok_or_else(|| format!("expected value:direction, got {value:?}"))?;
    Ok(PortState {
        value: u8_from_hex(level).map_err(|e| format!("value {level:?}: {e}"))?,
        direction: u8_from_hex(direction).map_err(|e| format!("direction {direction:?}: {e}"))?,
    })
}
