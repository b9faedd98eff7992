use std::time::Duration;

/// USB vendor ID of the EVAL-AD7746EB once the Analog Devices firmware is loaded.
pub const EVAL_AD7746EB_VID: u16 = 0x0456;
/// USB product ID of the EVAL-AD7746EB once the Analog Devices firmware is loaded.
pub const EVAL_AD7746EB_PID: u16 = 0xB481;

/// 7-bit I2C address of the AD7746 on the evaluation board.
pub const AD7746_SLAVE_ADDRESS: u8 = 0x48;

/// Largest payload the bridge firmware accepts in a single vendor request.
pub const MAX_TRANSFER_LENGTH: usize = 64;

/// Interface claimed on the FX2 to issue control transfers.
pub(crate) const BRIDGE_INTERFACE: u8 = 0;

/// Default timeout for a single USB control transfer.
pub(crate) const DEFAULT_TRANSFER_TIMEOUT: Duration = Duration::from_secs(1);

/// Number of ports (A, B and D) the bridge firmware exposes for GPIO.
pub(crate) const MAX_GPIO_PORTS: usize = 3;
