use std::time::Duration;

use nusb::transfer::TransferError;
use thiserror::Error;

use crate::registers::Register;
use crate::status::Status;

/// Wrapper for problems when communicating with the EVAL-AD7746EB.
#[derive(Debug, Error)]
pub enum Error {
    /// A vendor control transfer was rejected or the device went away.
    #[error("register access failed: {0}")]
    Transport(#[from] TransferError),
    /// The bridge moved fewer bytes than were requested.
    ///
    /// Callers should treat this exactly like [`Error::Transport`]; the data of a
    /// short read is never returned.
    #[error("register access failed: short transfer, expected {expected} bytes, moved {actual}")]
    ShortTransfer {
        /// Number of bytes requested.
        expected: usize,
        /// Number of bytes the bridge reported as transferred.
        actual: usize,
    },
    /// The AD7746 did not report ready before the deadline.
    #[error("timed out after {timeout:?} waiting for ready (last status {last_status})")]
    ReadyTimeout {
        /// Deadline that elapsed.
        timeout: Duration,
        /// Last status register value read before giving up.
        last_status: Status,
    },
    /// The status register was not clear after the configuration sequence.
    #[error("sensor configuration failed, status {0}")]
    ConfigurationFailed(Status),
    /// Attempt to transfer a length outside `1..=64`.
    #[error("transfer length {0} outside 1..=64")]
    TransferLength(usize),
    /// Attempt to read or write a number of GPIO ports outside `1..=3`.
    #[error("GPIO port count {0} outside 1..=3")]
    PortCount(usize),
    /// Attempt to read a write-only register.
    #[error("register {0:?} is write-only")]
    RegisterNotReadable(Register),
    /// Attempt to write a read-only register.
    #[error("register {0:?} is read-only")]
    RegisterNotWritable(Register),
    /// No USB device with the requested vendor and product ID is attached.
    #[error("no USB device found with VID {vendor_id:#06X} and PID {product_id:#06X}")]
    DeviceNotFound {
        /// Vendor ID searched for.
        vendor_id: u16,
        /// Product ID searched for.
        product_id: u16,
    },
    /// An error occurred when enumerating or opening the USB device.
    #[error("USB error: {0}")]
    Usb(#[from] std::io::Error),
    /// An `embedded-hal` I2C transaction the bridge firmware cannot express.
    ///
    /// The bridge supports a plain read, a plain write, or a write of a one- or
    /// two-byte register index followed by a read.
    #[error("I2C transaction shape not supported by the bridge")]
    UnsupportedI2cTransaction,
}

impl Error {
    /// Returns true for the errors that mean "register access failed".
    ///
    /// Transport failures and short transfers are reported separately for
    /// diagnostics but callers are not expected to distinguish them.
    pub fn is_register_access_failure(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::ShortTransfer { .. })
    }
}
