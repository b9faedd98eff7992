//! # I2C bus-scanning example
//!
//! This tries a one-byte read at every 7-bit address on the bridge's I2C bus and
//! prints the addresses that answered. The bridge firmware has no zero-length
//! transfer, so unlike the usual write-based scan this reads a byte from each
//! target. That is harmless for the parts on the EVAL-AD7746EB (the AD7746 at
//! 0x48 and the FX2 boot EEPROM at 0x51), but be careful with anything else you
//! hang off the bus.
//!
//! A target that does not acknowledge its address makes the firmware stall the
//! control pipe, which the driver reports as an I2C NACK.
use ad7746_hal::EvalBoard;
use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

fn main() -> Result<(), ad7746_hal::Error> {
    let mut board = EvalBoard::connect()?;

    println!("Scanning the I2C bus...\n");
    for address in 0..128u8 {
        if start_line(address) {
            print!("{address:02X}:  ");
        }
        let mut buf = [0u8];
        match board.read(address, &mut buf) {
            Ok(()) => print!("{address:02X} "),
            Err(e) if matches!(e.kind(), ErrorKind::NoAcknowledge(_)) => print!("-- "),
            Err(e) => return Err(e),
        }
        if end_line(address) {
            println!();
        }
    }
    println!("{}", TRAILER);

    Ok(())
}

fn start_line(n: u8) -> bool {
    n % 16 == 0
}

fn end_line(n: u8) -> bool {
    n % 16 == 15
}

const TRAILER: &str = r#"
A two-digit number is an address (in hex) that was acknowledged."#;
