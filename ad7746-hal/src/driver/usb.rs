use std::time::Duration;

use nusb::transfer::{Control, ControlType, Recipient, TransferError};

use crate::Error;
use crate::constants::{BRIDGE_INTERFACE, DEFAULT_TRANSFER_TIMEOUT};
use crate::transport::{ControlTransport, VendorRequest};

/// USB identity of a connected board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsbDeviceInfo {
    /// USB vendor ID.
    pub vendor_id: u16,
    /// USB product ID.
    pub product_id: u16,
    /// Number of the bus the device is attached to.
    pub bus_number: u8,
    /// Address of the device on its bus.
    pub device_address: u8,
    /// Manufacturer string descriptor, if the device has one.
    pub manufacturer: Option<String>,
    /// Product string descriptor, if the device has one.
    pub product: Option<String>,
    /// Serial number string descriptor, if the device has one.
    pub serial_number: Option<String>,
}

impl From<&nusb::DeviceInfo> for UsbDeviceInfo {
    fn from(info: &nusb::DeviceInfo) -> Self {
        Self {
            vendor_id: info.vendor_id(),
            product_id: info.product_id(),
            bus_number: info.bus_number(),
            device_address: info.device_address(),
            manufacturer: info.manufacturer_string().map(String::from),
            product: info.product_string().map(String::from),
            serial_number: info.serial_number().map(String::from),
        }
    }
}

/// The FX2 bridge reached through `nusb`.
///
/// The interface is claimed for as long as the value lives.
pub struct UsbBridge {
    interface: nusb::Interface,
    info: UsbDeviceInfo,
    timeout: Duration,
}

impl std::fmt::Debug for UsbBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsbBridge")
            .field("info", &self.info)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl UsbBridge {
    /// Open the first attached device with the given vendor and product ID.
    ///
    /// Transfers time out after one second; see [`UsbBridge::with_timeout`].
    ///
    /// # Errors
    ///
    /// [`Error::DeviceNotFound`] if no such device is attached, and
    /// [`Error::Usb`] if it cannot be opened or its interface claimed.
    pub fn open(vendor_id: u16, product_id: u16) -> Result<Self, Error> {
        let device_info = nusb::list_devices()?
            .find(|d| d.vendor_id() == vendor_id && d.product_id() == product_id)
            .ok_or(Error::DeviceNotFound {
                vendor_id,
                product_id,
            })?;
        let info = UsbDeviceInfo::from(&device_info);
        tracing::info!(
            bus = info.bus_number,
            address = info.device_address,
            "opening EVAL-AD7746EB"
        );
        let device = device_info.open()?;
        let interface = device.claim_interface(BRIDGE_INTERFACE)?;
        Ok(Self {
            interface,
            info,
            timeout: DEFAULT_TRANSFER_TIMEOUT,
        })
    }

    /// Set the per-transfer timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// USB identity of the opened device.
    pub fn device_info(&self) -> &UsbDeviceInfo {
        &self.info
    }
}

fn vendor_control(request: VendorRequest, value: u16, index: u16) -> Control {
    Control {
        control_type: ControlType::Vendor,
        recipient: Recipient::Device,
        request: request.code(),
        value,
        index,
    }
}

impl ControlTransport for UsbBridge {
    fn control_in(
        &self,
        request: VendorRequest,
        value: u16,
        index: u16,
        buf: &mut [u8],
    ) -> Result<usize, TransferError> {
        self.interface
            .control_in_blocking(vendor_control(request, value, index), buf, self.timeout)
    }

    fn control_out(
        &self,
        request: VendorRequest,
        value: u16,
        index: u16,
        data: &[u8],
    ) -> Result<usize, TransferError> {
        self.interface
            .control_out_blocking(vendor_control(request, value, index), data, self.timeout)
    }
}
