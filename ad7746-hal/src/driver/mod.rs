use std::cell::RefCell;

use crate::constants::{AD7746_SLAVE_ADDRESS, MAX_TRANSFER_LENGTH};
use crate::error::Error;
use crate::poll::{Clock, SystemClock};
use crate::registers::Register;
use crate::transport::{ControlTransport, VendorRequest, slave_address_index};

mod gpio;
mod i2c_eh;
mod sensor;
mod usb;

pub use usb::{UsbBridge, UsbDeviceInfo};

/// Driver for the EVAL-AD7746EB.
///
/// # Quick start
///
/// Connect to the board with [`EvalBoard::connect`], configure the converter with
/// [`EvalBoard::configure`], then call [`EvalBoard::acquire`] in a loop.
///
/// ```no_run
/// use ad7746_hal::{EvalBoard, PollSettings, SensorSetup};
///
/// let board = EvalBoard::connect()?;
/// let setup = SensorSetup::default();
/// board.configure(&setup)?;
/// let sample = board.acquire(setup.channels(), &PollSettings::default())?;
/// println!("{:?} pF", sample.capacitance_picofarads());
/// # Ok::<(), ad7746_hal::Error>(())
/// ```
///
/// # Overview
///
/// The board is a Cypress EZ-USB FX2 acting as a USB to I2C bridge in front of an
/// AD7746 capacitance-to-digital converter. The driver is layered:
///
/// - [`EvalBoard::vendor_read`] and [`EvalBoard::vendor_write`] frame a single
///   vendor control transfer and reject short transfers.
/// - [`EvalBoard::read_registers`] and friends address the AD7746 register file.
/// - [`EvalBoard::wait_for_ready`] polls the status register.
/// - [`EvalBoard::acquire_raw`] and [`EvalBoard::acquire`] fetch samples.
/// - [`EvalBoard::configure`] runs the one-off setup sequence.
///
/// The struct also implements the blocking [`embedded_hal::i2c::I2c`] trait, so
/// other I2C devices wired to the bridge can be driven with their own drivers.
///
/// The driver owns the USB session. Dropping it (or calling
/// [`EvalBoard::close`]) releases the interface, on error paths too. Every
/// operation is blocking and there is no internal locking; one thread owns the
/// board.
#[derive(Debug)]
pub struct EvalBoard<T = UsbBridge, C = SystemClock> {
    /// Vendor control transfer implementation.
    transport: T,
    /// Time source for the status poll and settle delays.
    ///
    /// Only sleeping needs mutable access to the clock, so it sits in a `RefCell`
    /// to keep every driver method on a shared reference.
    clock: RefCell<C>,
    /// 7-bit I2C address of the AD7746.
    slave_address: u8,
}

impl EvalBoard {
    ////////////////////////////////////////////////////////////////////////////////
    // Constructors - USB methods
    ////////////////////////////////////////////////////////////////////////////////

    /// Connect to the first board found with the default vendor and product ID.
    ///
    /// The firmware must already be loaded (the board re-enumerates as VID 0x0456,
    /// PID 0xB481 once it is).
    ///
    /// # Errors
    ///
    /// An error will be returned if the USB device cannot be found or opened.
    pub fn connect() -> Result<Self, Error> {
        Self::connect_with_vid_and_pid(crate::EVAL_AD7746EB_VID, crate::EVAL_AD7746EB_PID)
    }

    /// Connect to the first board found with the given vendor and product ID.
    ///
    /// # Errors
    ///
    /// An error will be returned if the USB device cannot be found or opened.
    pub fn connect_with_vid_and_pid(vendor_id: u16, product_id: u16) -> Result<Self, Error> {
        Ok(Self::from_transport(UsbBridge::open(vendor_id, product_id)?))
    }

    /// USB information about the connected board.
    pub fn usb_device_info(&self) -> &UsbDeviceInfo {
        self.transport.device_info()
    }
}

impl<T: ControlTransport> EvalBoard<T, SystemClock> {
    /// Create the driver over any control transport, using the system clock.
    pub fn from_transport(transport: T) -> Self {
        Self::from_parts(transport, SystemClock::new())
    }
}

impl<T: ControlTransport, C: Clock> EvalBoard<T, C> {
    /// Create the driver from a transport and a clock.
    pub fn from_parts(transport: T, clock: C) -> Self {
        Self {
            transport,
            clock: RefCell::new(clock),
            slave_address: AD7746_SLAVE_ADDRESS,
        }
    }

    /// Use a different 7-bit I2C address for the converter.
    pub fn with_slave_address(mut self, seven_bit_address: u8) -> Self {
        self.slave_address = seven_bit_address;
        self
    }

    /// The 7-bit I2C address used for the converter.
    pub fn slave_address(&self) -> u8 {
        self.slave_address
    }

    /// Release the USB session.
    ///
    /// This is the same as dropping the driver, spelled out.
    pub fn close(self) {
        tracing::debug!("closing board session");
    }

    /// Take the driver apart, returning the transport and clock.
    pub fn into_parts(self) -> (T, C) {
        (self.transport, self.clock.into_inner())
    }

    /// Sleep on the driver's clock.
    pub(crate) fn sleep(&self, duration: std::time::Duration) {
        self.clock.borrow_mut().sleep(duration);
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Vendor control transfers
    ////////////////////////////////////////////////////////////////////////////////

    /// Perform a device-to-host vendor request, filling `buf`.
    ///
    /// `index` and `value` are passed through as `wIndex` and `wValue`. For I2C
    /// requests `index` is the slave address shifted left by one and `value` is the
    /// register index.
    ///
    /// # Errors
    ///
    /// - [`Error::TransferLength`] if `buf` is empty or longer than 64 bytes. No
    ///   transfer is issued.
    /// - [`Error::Transport`] if the transfer fails.
    /// - [`Error::ShortTransfer`] if fewer than `buf.len()` bytes arrive. The
    ///   contents of `buf` are then unspecified.
    pub fn vendor_read(
        &self,
        request: VendorRequest,
        index: u16,
        value: u16,
        buf: &mut [u8],
    ) -> Result<(), Error> {
        check_transfer_length(buf.len())?;
        tracing::debug!(
            request = request.code(),
            index,
            value,
            len = buf.len(),
            "vendor read"
        );
        let read = self.transport.control_in(request, value, index, buf)?;
        check_transferred(buf.len(), read)
    }

    /// Perform a host-to-device vendor request, sending `data`.
    ///
    /// # Errors
    ///
    /// - [`Error::TransferLength`] if `data` is empty or longer than 64 bytes. No
    ///   transfer is issued.
    /// - [`Error::Transport`] if the transfer fails.
    /// - [`Error::ShortTransfer`] if the bridge accepts fewer than `data.len()`
    ///   bytes.
    pub fn vendor_write(
        &self,
        request: VendorRequest,
        index: u16,
        value: u16,
        data: &[u8],
    ) -> Result<(), Error> {
        check_transfer_length(data.len())?;
        tracing::debug!(
            request = request.code(),
            index,
            value,
            len = data.len(),
            "vendor write"
        );
        let written = self.transport.control_out(request, value, index, data)?;
        check_transferred(data.len(), written)
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Register access
    ////////////////////////////////////////////////////////////////////////////////

    /// Read contiguous registers of an I2C target with an 8-bit register index.
    ///
    /// This is the untyped form of [`EvalBoard::read_registers`] for any target on
    /// the bridge's I2C bus.
    pub fn i2c_read_registers(
        &self,
        seven_bit_address: u8,
        register_address: u8,
        buf: &mut [u8],
    ) -> Result<(), Error> {
        self.vendor_read(
            VendorRequest::I2cIndexed8,
            slave_address_index(seven_bit_address),
            register_address.into(),
            buf,
        )
    }

    /// Write contiguous registers of an I2C target with an 8-bit register index.
    pub fn i2c_write_registers(
        &self,
        seven_bit_address: u8,
        register_address: u8,
        data: &[u8],
    ) -> Result<(), Error> {
        self.vendor_write(
            VendorRequest::I2cIndexed8,
            slave_address_index(seven_bit_address),
            register_address.into(),
            data,
        )
    }

    /// Read `buf.len()` consecutive AD7746 registers starting at `start`.
    ///
    /// Between 1 and 64 registers can be read at once. On error the contents of
    /// `buf` must not be used.
    ///
    /// # Errors
    ///
    /// [`Error::RegisterNotReadable`] if `start` is write-only, otherwise as
    /// [`EvalBoard::vendor_read`].
    pub fn read_registers(&self, start: Register, buf: &mut [u8]) -> Result<(), Error> {
        if !start.access().readable() {
            return Err(Error::RegisterNotReadable(start));
        }
        self.i2c_read_registers(self.slave_address, start.address(), buf)
    }

    /// Write `data` to consecutive AD7746 registers starting at `start`.
    ///
    /// # Errors
    ///
    /// [`Error::RegisterNotWritable`] if any register covered by the write is
    /// read-only, otherwise as [`EvalBoard::vendor_write`].
    pub fn write_registers(&self, start: Register, data: &[u8]) -> Result<(), Error> {
        let covered = (0..data.len())
            .filter_map(|offset| u8::try_from(offset).ok())
            .filter_map(|offset| Register::from_address(start.address().wrapping_add(offset)));
        if let Some(register) = std::iter::once(start)
            .chain(covered)
            .find(|register| !register.access().writable())
        {
            return Err(Error::RegisterNotWritable(register));
        }
        self.i2c_write_registers(self.slave_address, start.address(), data)
    }

    /// Read a single AD7746 register.
    pub fn read_register(&self, register: Register) -> Result<u8, Error> {
        let mut data = [0u8];
        self.read_registers(register, &mut data)?;
        Ok(data[0])
    }

    /// Write a single AD7746 register.
    pub fn write_register(&self, register: Register, value: u8) -> Result<(), Error> {
        self.write_registers(register, &[value])
    }
}

fn check_transfer_length(len: usize) -> Result<(), Error> {
    if (1..=MAX_TRANSFER_LENGTH).contains(&len) {
        Ok(())
    } else {
        Err(Error::TransferLength(len))
    }
}

fn check_transferred(expected: usize, actual: usize) -> Result<(), Error> {
    if actual < expected {
        tracing::debug!(expected, actual, "short transfer");
        return Err(Error::ShortTransfer { expected, actual });
    }
    Ok(())
}
