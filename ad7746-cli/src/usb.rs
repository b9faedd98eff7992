use ad7746_hal::{EvalBoard, UsbDeviceInfo};

pub(crate) fn print_info(board: &EvalBoard) {
    print!("{}", describe(board.usb_device_info()));
}

fn describe(info: &UsbDeviceInfo) -> String {
    let unknown = "(none)";
    format!(
        "Bus {:03} Device {:03}\n  ID {:04x}:{:04x}\n  Manufacturer: {}\n  Product: {}\n  Serial number: {}\n",
        info.bus_number,
        info.device_address,
        info.vendor_id,
        info.product_id,
        info.manufacturer.as_deref().unwrap_or(unknown),
        info.product.as_deref().unwrap_or(unknown),
        info.serial_number.as_deref().unwrap_or(unknown),
    )
}
