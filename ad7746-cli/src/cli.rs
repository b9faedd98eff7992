use crate::gpio::{GpioCommand, LedState};
use crate::run::{RunArgs, SetupArgs};
use crate::util;

use clap::Parser;

/// Acquisition CLI for the EVAL-AD7746EB capacitance and temperature board
///
/// The run command configures the AD7746, lights the board LED and prints one
/// line per conversion until interrupted with Ctrl-C. The other commands are
/// for poking at the board: configure the converter without acquiring, read the
/// status or the whole register file, drive the LED or the bridge I/O ports, and
/// show the USB device information.
///
/// Samples go to stdout, diagnostics to stderr.
#[derive(Debug, Parser)]
#[command(version, about)]
pub(crate) struct Cli {
    /// Device vendor ID in hexadecimal
    #[arg(short, long = "vid", default_value = "0x0456", value_parser = util::u16_from_hex)]
    pub(crate) vid: u16,
    /// Device product ID in hexadecimal
    #[arg(short, long = "pid", default_value = "0xB481", value_parser = util::u16_from_hex)]
    pub(crate) pid: u16,
    /// Most verbose diagnostics to print (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub(crate) log_level: tracing::Level,
    /// USB control transfer timeout in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub(crate) transfer_timeout_ms: u64,
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Debug, Parser)]
pub(crate) enum Commands {
    /// Configure the converter and print samples until interrupted.
    ///
    /// Each line holds the capture time, then capacitance_raw and capacitance_pF,
    /// then temp_raw and temp_C. The temperature fields are left out when
    /// --no-temperature is given.
    Run(RunArgs),
    /// Reset and configure the converter, then exit.
    Configure(SetupArgs),
    /// Read the status register.
    Status,
    /// Read registers 0x00 to 0x12.
    Dump,
    /// Turn the red LED on or off.
    Led {
        state: LedState,
    },
    /// Read or write the bridge I/O ports.
    #[command(subcommand)]
    Gpio(GpioCommand),
    /// Show the USB device information.
    Usb,
}
