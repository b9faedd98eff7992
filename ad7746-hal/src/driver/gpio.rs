use super::EvalBoard;
use crate::Error;
use crate::constants::MAX_GPIO_PORTS;
use crate::gpio::{PortState, board_port_states, decode_ports, encode_ports, led_port_state};
use crate::poll::Clock;
use crate::transport::{ControlTransport, VendorRequest};

/// # Bridge I/O ports
///
/// Ports are transferred in the order A, B, D, always starting with port A.
impl<T: ControlTransport, C: Clock> EvalBoard<T, C> {
    /// Write the direction and value of the first `ports.len()` ports.
    ///
    /// # Errors
    ///
    /// [`Error::PortCount`] if `ports` is empty or has more than three entries; no
    /// transfer is issued in that case.
    pub fn gpio_write(&self, ports: &[PortState]) -> Result<(), Error> {
        check_port_count(ports.len())?;
        self.vendor_write(VendorRequest::IoPorts, 0, 0, &encode_ports(ports))
    }

    /// Read the direction and value of the first `count` ports.
    ///
    /// # Errors
    ///
    /// [`Error::PortCount`] if `count` is outside `1..=3`, and
    /// [`Error::ShortTransfer`] if the bridge returns fewer than `2 * count`
    /// bytes.
    pub fn gpio_read(&self, count: usize) -> Result<Vec<PortState>, Error> {
        check_port_count(count)?;
        let mut buf = [0u8; 2 * MAX_GPIO_PORTS];
        let data = &mut buf[..2 * count];
        self.vendor_read(VendorRequest::IoPorts, 0, 0, data)?;
        Ok(decode_ports(data))
    }

    /// Set up the board's pins: LED output (lit), every other pin an input.
    pub fn configure_board(&self) -> Result<(), Error> {
        self.gpio_write(&board_port_states())
    }

    /// Turn the red LED on or off.
    ///
    /// Only port A is written.
    pub fn set_led(&self, on: bool) -> Result<(), Error> {
        self.gpio_write(&[led_port_state(on)])
    }
}

fn check_port_count(count: usize) -> Result<(), Error> {
    if (1..=MAX_GPIO_PORTS).contains(&count) {
        Ok(())
    } else {
        Err(Error::PortCount(count))
    }
}
