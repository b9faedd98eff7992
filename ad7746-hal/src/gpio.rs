//! I/O ports of the bridge.
//!
//! The FX2 firmware exposes ports A, B and D, in that order. Each port has a
//! direction byte (a set bit is an output) and a value byte (the output level of
//! output pins, zero for inputs). Ports are always transferred starting from
//! port A, so configuring port B means also configuring port A.
//!
//! On the EVAL-AD7746EB:
//!
//! - Port A bit 7 drives the red LED, active low.
//! - Port A bit 3 is the RDY output of the AD7746.
//! - Port D bit 0 is an open-drain wakeup line (unused).
//! - Every other pin is unconnected.

use bit_field::BitField;

/// A bridge I/O port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Port {
    /// Port A.
    A,
    /// Port B.
    B,
    /// Port D.
    D,
}

impl Port {
    /// Ports in transfer order.
    pub const ALL: [Port; 3] = [Port::A, Port::B, Port::D];

    /// Position of the port in a transfer.
    pub fn index(self) -> usize {
        match self {
            Port::A => 0,
            Port::B => 1,
            Port::D => 2,
        }
    }
}

/// Direction and value bytes for one port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PortState {
    /// Pin directions; a set bit is an output.
    pub direction: u8,
    /// Output levels; ignored for input pins.
    pub value: u8,
}

impl PortState {
    /// All pins inputs.
    pub const ALL_INPUTS: PortState = PortState {
        direction: 0,
        value: 0,
    };

    /// True if `pin` is an output.
    pub fn is_output(&self, pin: usize) -> bool {
        self.direction.get_bit(pin)
    }

    /// Output level of `pin`.
    pub fn level(&self, pin: usize) -> bool {
        self.value.get_bit(pin)
    }

    /// Make `pin` an output driving `level`.
    pub fn with_output(mut self, pin: usize, level: bool) -> Self {
        self.direction.set_bit(pin, true);
        self.value.set_bit(pin, level);
        self
    }
}

/// Pin of port A driving the red LED (active low).
pub const LED_PIN: usize = 7;

/// Pin of port A connected to the AD7746 RDY output.
pub const RDY_PIN: usize = 3;

/// Port A state with the LED pin as an output, lit or not.
pub fn led_port_state(lit: bool) -> PortState {
    // Active low.
    PortState::ALL_INPUTS.with_output(LED_PIN, !lit)
}

/// Default board pin configuration: LED output (lit), everything else inputs.
pub fn board_port_states() -> [PortState; 3] {
    [led_port_state(true), PortState::ALL_INPUTS, PortState::ALL_INPUTS]
}

/// Lay out port states as the firmware expects: (value, direction) pairs.
pub(crate) fn encode_ports(ports: &[PortState]) -> Vec<u8> {
    ports
        .iter()
        .flat_map(|port| [port.value, port.direction])
        .collect()
}

/// Parse (value, direction) pairs read back from the firmware.
pub(crate) fn decode_ports(buf: &[u8]) -> Vec<PortState> {
    buf.chunks_exact(2)
        .map(|pair| PortState {
            value: pair[0],
            direction: pair[1],
        })
        .collect()
}
