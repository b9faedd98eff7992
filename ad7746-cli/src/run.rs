use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use ad7746_hal::{EvalBoard, PollSettings, RawSample, SensorSetup};
use anyhow::Context;
use chrono::{DateTime, Utc};

use crate::{registers, util};

/// Converter setup shared by `run` and `configure`.
#[derive(Debug, clap::Args)]
pub(crate) struct SetupArgs {
    /// Leave the temperature channel disabled and read capacitance only.
    /// Output lines then have no temp_raw or temp_C fields
    #[arg(long)]
    no_temperature: bool,
    /// CAPDAC A code (7 bits, hexadecimal)
    #[arg(long, default_value = "0x49", value_parser = util::capdac_from_hex)]
    capdac_a: u8,
    /// CAPDAC B code (7 bits, hexadecimal)
    #[arg(long, default_value = "0x49", value_parser = util::capdac_from_hex)]
    capdac_b: u8,
}

impl SetupArgs {
    pub(crate) fn sensor_setup(&self) -> SensorSetup {
        SensorSetup::default()
            .with_temperature(!self.no_temperature)
            .with_capdacs(self.capdac_a, self.capdac_b)
    }
}

#[derive(Debug, clap::Args)]
pub(crate) struct RunArgs {
    #[command(flatten)]
    setup: SetupArgs,
    /// Give up on a conversion after this many milliseconds
    #[arg(long, default_value_t = 300)]
    ready_timeout_ms: u64,
    /// Delay between status register reads in milliseconds
    #[arg(long, default_value_t = 10)]
    poll_interval_ms: u64,
    /// Stop after this many samples
    #[arg(long)]
    count: Option<u64>,
    /// Use the converter as it is, without resetting and configuring it
    #[arg(long)]
    skip_configure: bool,
    /// Print the register file after configuration
    #[arg(long)]
    dump: bool,
}

pub(crate) fn configure(board: &EvalBoard, args: &SetupArgs) -> anyhow::Result<()> {
    board
        .configure(&args.sensor_setup())
        .context("failed to configure the AD7746")
}

pub(crate) fn run(board: &EvalBoard, args: RunArgs) -> anyhow::Result<()> {
    let setup = args.setup.sensor_setup();
    if !args.skip_configure {
        configure(board, &args.setup)?;
    }
    if args.dump {
        registers::print_dump(board)?;
    }
    board
        .configure_board()
        .context("failed to configure the board I/O")?;

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("failed to install the Ctrl-C handler")?;

    let poll = PollSettings {
        interval: Duration::from_millis(args.poll_interval_ms),
        timeout: Duration::from_millis(args.ready_timeout_ms),
    };
    let channels = setup.channels();
    tracing::info!(?channels, ?poll, "starting acquisition");

    let mut taken = 0;
    let result = loop {
        if !running.load(Ordering::SeqCst) || args.count.is_some_and(|count| taken >= count) {
            break Ok(());
        }
        match board.acquire_raw(channels, &poll) {
            Ok(raw) => println!("{}", sample_line(Utc::now(), &raw)),
            Err(e) => break Err(e),
        }
        taken += 1;
    };
    tracing::info!(samples = taken, "acquisition stopped");

    if let Err(e) = board.set_led(false) {
        tracing::warn!("failed to switch the LED off: {e}");
    }
    result.context("acquisition failed")
}

/// Format one output line. Channels that were not acquired are left out.
fn sample_line(time: DateTime<Utc>, raw: &RawSample) -> String {
    let sample = raw.convert();
    let mut line = format!(
        "time: {}.{:06}",
        time.timestamp(),
        time.timestamp_subsec_micros()
    );
    if let (Some(code), Some(pf)) = (raw.capacitance, sample.capacitance_picofarads()) {
        line.push_str(&format!("  capacitance_raw: {code:06x}  capacitance_pF: {pf:.6}"));
    }
    if let (Some(code), Some(celsius)) = (raw.temperature, sample.temperature_celsius) {
        line.push_str(&format!("  temp_raw: {code}  temp_C: {celsius:.3}"));
    }
    line
}
