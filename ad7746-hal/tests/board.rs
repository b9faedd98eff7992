//! Tests against a real EVAL-AD7746EB.
//!
//! These need the board attached with its firmware loaded, so they are ignored by
//! default. Run them serially, because only one test can claim the USB interface
//! at a time:
//!
//! ```text
//! cargo test -p ad7746-hal --test board -- --ignored --test-threads=1
//! ```
use std::time::Duration;

use ad7746_hal::registers::Register;
use ad7746_hal::{AD7746_SLAVE_ADDRESS, Error, EvalBoard, PollSettings, SensorSetup};

use embedded_hal::i2c::I2c;

#[test]
#[ignore = "needs an EVAL-AD7746EB"]
fn board_configures_cleanly() -> Result<(), Error> {
    let board = EvalBoard::connect()?;
    board.configure(&SensorSetup::default())?;
    assert_eq!(board.read_register(Register::CapSetup)?, 0xA0);
    assert_eq!(board.read_register(Register::Configuration)?, 0xF9);
    Ok(())
}

#[test]
#[ignore = "needs an EVAL-AD7746EB"]
fn board_acquires_a_few_samples() -> Result<(), Error> {
    let board = EvalBoard::connect()?;
    let setup = SensorSetup::default();
    board.configure(&setup)?;
    for _ in 0..3 {
        let sample = board.acquire(setup.channels(), &PollSettings::default())?;
        let celsius = sample.temperature_celsius.unwrap();
        assert!((-40.0..=125.0).contains(&celsius), "{celsius} °C");
        assert!(sample.capacitance_farads.is_some());
    }
    Ok(())
}

#[test]
#[ignore = "needs an EVAL-AD7746EB"]
fn board_times_out_when_idle() -> Result<(), Error> {
    let board = EvalBoard::connect()?;
    // Reset leaves the converter idle, so no conversion ever completes.
    board.write_register(Register::Reset, 0)?;
    std::thread::sleep(Duration::from_millis(1));
    let result = board.wait_for_ready(&PollSettings::with_timeout(Duration::from_millis(50)));
    assert!(matches!(result, Err(Error::ReadyTimeout { .. })));
    Ok(())
}

#[test]
#[ignore = "needs an EVAL-AD7746EB"]
fn board_led_blinks() -> Result<(), Error> {
    let board = EvalBoard::connect()?;
    board.configure_board()?;
    std::thread::sleep(Duration::from_millis(250));
    board.set_led(false)?;
    let ports = board.gpio_read(1)?;
    assert_eq!(ports[0].direction & 0x80, 0x80);
    Ok(())
}

#[test]
#[ignore = "needs an EVAL-AD7746EB"]
fn board_eh_i2c_write_read() -> Result<(), Error> {
    let mut board = EvalBoard::connect()?;
    board.write_register(Register::CapDacA, 0x80)?;
    let mut buf = [0u8; 2];
    board.write_read(AD7746_SLAVE_ADDRESS, &[0x0B], &mut buf)?;
    assert_eq!(buf[0], 0x80);
    Ok(())
}
