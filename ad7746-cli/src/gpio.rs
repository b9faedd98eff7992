use ad7746_hal::EvalBoard;
use ad7746_hal::gpio::{Port, PortState};
use anyhow::Context;

use crate::util;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub(crate) enum LedState {
    On,
    Off,
}

#[derive(Debug, clap::Parser)]
#[command(flatten_help = true)]
pub(crate) enum GpioCommand {
    /// Read the direction and value of ports A, B and D.
    Read {
        /// Number of ports to read, starting from port A
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=3))]
        ports: u8,
    },
    /// Write ports, starting from port A.
    ///
    /// Each port is given as value:direction in hexadecimal, where a set direction
    /// bit makes the pin an output. For example `00:80` makes A7 an output driven
    /// low, which lights the LED.
    Write {
        #[arg(required = true, num_args = 1..=3, value_parser = util::port_state_from_str)]
        ports: Vec<PortState>,
    },
}

pub(crate) fn led_action(board: &EvalBoard, state: LedState) -> anyhow::Result<()> {
    board
        .set_led(matches!(state, LedState::On))
        .context("failed to set the LED")
}

pub(crate) fn action(board: &EvalBoard, command: GpioCommand) -> anyhow::Result<()> {
    match command {
        GpioCommand::Read { ports } => {
            let states = board
                .gpio_read(usize::from(ports))
                .context("failed to read the I/O ports")?;
            for (port, state) in Port::ALL.iter().zip(states) {
                println!(
                    "{port:?}: direction {:08b}  value {:08b}",
                    state.direction, state.value
                );
            }
        }
        GpioCommand::Write { ports } => {
            board
                .gpio_write(&ports)
                .context("failed to write the I/O ports")?;
        }
    }
    Ok(())
}
