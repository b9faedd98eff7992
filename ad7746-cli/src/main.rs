use std::time::Duration;

use ad7746_hal::{EvalBoard, UsbBridge};
use anyhow::Context;
use clap::Parser;
use tracing_subscriber::FmtSubscriber;

use cli::Commands;

mod cli;
mod gpio;
mod registers;
mod run;
mod usb;
mod util;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let bridge = UsbBridge::open(cli.vid, cli.pid)
        .with_context(|| format!("failed to open board {:04x}:{:04x}", cli.vid, cli.pid))?
        .with_timeout(Duration::from_millis(cli.transfer_timeout_ms));
    let board = EvalBoard::from_transport(bridge);

    match cli.command {
        Commands::Run(args) => run::run(&board, args)?,
        Commands::Configure(args) => run::configure(&board, &args)?,
        Commands::Status => registers::print_status(&board)?,
        Commands::Dump => registers::print_dump(&board)?,
        Commands::Led { state } => gpio::led_action(&board, state)?,
        Commands::Gpio(command) => gpio::action(&board, command)?,
        Commands::Usb => usb::print_info(&board),
    }
    board.close();
    Ok(())
}

#[cfg(test)]
mod test {
    use crate::cli::Cli;

    use clap::{CommandFactory, Parser};

    #[test]
    fn check_cli_debug_asserts() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_defaults() {
        let cli = Cli::try_parse_from(["ad7746", "run"]).unwrap();
        assert_eq!(cli.vid, 0x0456);
        assert_eq!(cli.pid, 0xB481);
        assert_eq!(cli.log_level, tracing::Level::WARN);
        assert_eq!(cli.transfer_timeout_ms, 1000);
    }

    #[test]
    fn gpio_write_takes_up_to_three_ports() {
        assert!(Cli::try_parse_from(["ad7746", "gpio", "write", "00:80"]).is_ok());
        assert!(Cli::try_parse_from(["ad7746", "gpio", "write", "0:0", "0:0", "0:0", "0:0"]).is_err());
        assert!(Cli::try_parse_from(["ad7746", "gpio", "read", "--ports", "4"]).is_err());
        assert!(Cli::try_parse_from(["ad7746", "run", "--capdac-a", "0x80"]).is_err());
    }

    #[test]
    fn run_help_describes_output_without_temperature() {
        let mut command = Cli::command();
        let run = command.find_subcommand_mut("run").unwrap();
        let help = run.render_long_help().to_string();
        let help = help.split_whitespace().collect::<Vec<_>>().join(" ");
        assert!(help.contains("temperature fields are left out"));
        assert!(help.contains("no temp_raw or temp_C fields"));
    }
}
