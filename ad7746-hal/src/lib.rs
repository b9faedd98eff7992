#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod acquisition;
mod constants;
pub mod conversion;
mod driver;
mod error;
pub mod gpio;
pub mod poll;
pub mod registers;
pub mod setup;
pub mod status;
pub mod transport;

pub use acquisition::{Channels, RawSample, Sample};
pub use constants::{
    AD7746_SLAVE_ADDRESS, EVAL_AD7746EB_PID, EVAL_AD7746EB_VID, MAX_TRANSFER_LENGTH,
};
pub use driver::{EvalBoard, UsbBridge, UsbDeviceInfo};
pub use error::Error;
pub use poll::{Clock, PollSettings, SystemClock};
pub use setup::SensorSetup;
pub use status::Status;
