//! Vendor control transfers understood by the EVAL-AD7746EB bridge firmware.
//!
//! The board is an EZ-USB FX2 running Analog Devices firmware. The firmware does
//! not expose the I2C bus directly; instead each I2C transaction (or GPIO port
//! access) is tunnelled through a single vendor-specific control transfer. The
//! direction of the control transfer selects read or write.
//!
//! | Request | Meaning                                   | `wValue`          | `wIndex`          |
//! |---------|-------------------------------------------|-------------------|-------------------|
//! | `0xDB`  | Read/write the I/O port configuration     | 0                 | 0                 |
//! | `0xDC`  | I2C transfer without register index       | 0                 | slave address << 1 |
//! | `0xDD`  | I2C transfer with an 8-bit register index  | register index    | slave address << 1 |
//! | `0xDE`  | I2C transfer with a 16-bit register index | register index    | slave address << 1 |
//!
//! Payloads are between 1 and 64 bytes.

use nusb::transfer::TransferError;

/// Vendor request codes supported by the bridge firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorRequest {
    /// Read or write the I/O port direction and value bytes.
    IoPorts,
    /// Simple I2C transfer, no register index.
    I2c,
    /// I2C transfer preceded by an 8-bit register index.
    ///
    /// This is what is used for the AD7746 register file.
    I2cIndexed8,
    /// I2C transfer preceded by a 16-bit register index.
    I2cIndexed16,
}

impl VendorRequest {
    /// The `bRequest` byte of the control transfer.
    pub fn code(self) -> u8 {
        match self {
            VendorRequest::IoPorts => 0xDB,
            VendorRequest::I2c => 0xDC,
            VendorRequest::I2cIndexed8 => 0xDD,
            VendorRequest::I2cIndexed16 => 0xDE,
        }
    }
}

impl TryFrom<u8> for VendorRequest {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0xDB => Ok(VendorRequest::IoPorts),
            0xDC => Ok(VendorRequest::I2c),
            0xDD => Ok(VendorRequest::I2cIndexed8),
            0xDE => Ok(VendorRequest::I2cIndexed16),
            other => Err(other),
        }
    }
}

/// Encode a 7-bit I2C address the way the bridge expects it in `wIndex`.
pub(crate) fn slave_address_index(seven_bit_address: u8) -> u16 {
    u16::from(seven_bit_address) << 1
}

/// Vendor-type, device-recipient USB control transfers.
///
/// This is the only thing the driver needs from USB. [`UsbBridge`] implements it
/// for real hardware; tests implement it with a simulated register file.
///
/// Both methods return the number of bytes actually moved. The driver, not the
/// transport, is responsible for rejecting short transfers.
///
/// [`UsbBridge`]: crate::UsbBridge
pub trait ControlTransport {
    /// Device-to-host vendor request, filling `buf`.
    fn control_in(
        &self,
        request: VendorRequest,
        value: u16,
        index: u16,
        buf: &mut [u8],
    ) -> Result<usize, TransferError>;

    /// Host-to-device vendor request, sending `data`.
    fn control_out(
        &self,
        request: VendorRequest,
        value: u16,
        index: u16,
        data: &[u8],
    ) -> Result<usize, TransferError>;
}

impl<T: ControlTransport + ?Sized> ControlTransport for &T {
    fn control_in(
        &self,
        request: VendorRequest,
        value: u16,
        index: u16,
        buf: &mut [u8],
    ) -> Result<usize, TransferError> {
        (**self).control_in(request, value, index, buf)
    }

    fn control_out(
        &self,
        request: VendorRequest,
        value: u16,
        index: u16,
        data: &[u8],
    ) -> Result<usize, TransferError> {
        (**self).control_out(request, value, index, data)
    }
}
