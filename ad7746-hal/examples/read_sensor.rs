//! Configure the AD7746 and print a handful of samples.
//!
//! This is the library flow that the `ad7746 run` command wraps: reset and set up
//! the converter, light the LED, then poll the status register and fetch both
//! channels in a single read for every sample.
//!
//! You may wish to read this alongside the "Register map" section of the AD7746
//! datasheet.
use ad7746_hal::registers::{CapFilter, VtFilter};
use ad7746_hal::{EvalBoard, PollSettings, SensorSetup};

fn main() -> Result<(), ad7746_hal::Error> {
    let board = EvalBoard::connect()?;
    println!("{:?}", board.usb_device_info());

    // Faster filters than the default trade noise for update rate. With both
    // channels enabled the converter alternates between them, so each filter
    // setting only applies to half the conversions.
    let mut setup = SensorSetup::default();
    setup.configuration.cap_filter = CapFilter::Hz16_1;
    setup.configuration.vt_filter = VtFilter::Hz16_1;
    board.configure(&setup)?;
    board.configure_board()?;

    let poll = PollSettings::default();
    for _ in 0..20 {
        let raw = board.acquire_raw(setup.channels(), &poll)?;
        let sample = raw.convert();
        println!(
            "capacitance {:06x} = {:.6} pF    temperature {} = {:.3} °C",
            raw.capacitance.unwrap_or_default(),
            sample.capacitance_picofarads().unwrap_or_default(),
            raw.temperature.unwrap_or_default(),
            sample.temperature_celsius.unwrap_or_default(),
        );
    }

    board.set_led(false)?;
    board.close();
    Ok(())
}
