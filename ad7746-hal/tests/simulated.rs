//! Driver tests against a simulated EVAL-AD7746EB.
//!
//! The simulated bridge holds an AD7746 register file and the I/O port state of
//! the FX2, and answers vendor control transfers the way the firmware does. The
//! status register can be scripted so the readiness poll can be exercised without
//! real conversions.
use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use ad7746_hal::gpio::{LED_PIN, PortState};
use ad7746_hal::registers::{CapDac, Register};
use ad7746_hal::transport::{ControlTransport, VendorRequest};
use ad7746_hal::{
    AD7746_SLAVE_ADDRESS, Channels, Clock, Error, EvalBoard, PollSettings, SensorSetup,
};
use nusb::transfer::TransferError;

/// Power-on values of registers 0x00 to 0x12.
const POWER_ON: [u8; 19] = [
    0x07, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03, 0xA0, 0x00, 0x00, 0x80, 0x00,
    0x5A, 0x3C, 0x5B, 0x12,
];

#[derive(Debug)]
struct SimulatedBridge {
    registers: RefCell<[u8; 19]>,
    /// Status bytes returned by successive status reads before falling back to
    /// the register file.
    status_script: RefCell<VecDeque<u8>>,
    ports: RefCell<[u8; 6]>,
    resets: RefCell<usize>,
    /// Every transfer as (request, wValue, length, is_read).
    log: RefCell<Vec<(VendorRequest, u16, usize, bool)>>,
    /// Truncate reads to this many bytes.
    read_limit: Option<usize>,
    unplugged: bool,
}

impl Default for SimulatedBridge {
    fn default() -> Self {
        Self {
            registers: RefCell::new(POWER_ON),
            status_script: RefCell::default(),
            ports: RefCell::default(),
            resets: RefCell::default(),
            log: RefCell::default(),
            read_limit: None,
            unplugged: false,
        }
    }
}

impl SimulatedBridge {
    fn script_status(&self, statuses: &[u8]) {
        self.status_script.borrow_mut().extend(statuses);
    }

    fn load_results(&self, cap: [u8; 3], vt: [u8; 3]) {
        let mut registers = self.registers.borrow_mut();
        registers[1..4].copy_from_slice(&cap);
        registers[4..7].copy_from_slice(&vt);
        registers[0] = 0x00;
    }

    fn reads(&self) -> Vec<(u16, usize)> {
        self.log
            .borrow()
            .iter()
            .filter(|(request, _, _, is_read)| *request == VendorRequest::I2cIndexed8 && *is_read)
            .map(|&(_, value, len, _)| (value, len))
            .collect()
    }
}

impl ControlTransport for SimulatedBridge {
    fn control_in(
        &self,
        request: VendorRequest,
        value: u16,
        index: u16,
        buf: &mut [u8],
    ) -> Result<usize, TransferError> {
        self.log
            .borrow_mut()
            .push((request, value, buf.len(), true));
        if self.unplugged {
            return Err(TransferError::Disconnected);
        }
        let len = self.read_limit.unwrap_or(buf.len()).min(buf.len());
        match request {
            VendorRequest::IoPorts => {
                let ports = self.ports.borrow();
                let len = len.min(ports.len());
                buf[..len].copy_from_slice(&ports[..len]);
                Ok(len)
            }
            VendorRequest::I2cIndexed8 if index == u16::from(AD7746_SLAVE_ADDRESS) << 1 => {
                let registers = self.registers.borrow();
                for (offset, byte) in buf[..len].iter_mut().enumerate() {
                    let address = usize::from(value) + offset;
                    *byte = if address == 0 {
                        self.status_script
                            .borrow_mut()
                            .pop_front()
                            .unwrap_or(registers[0])
                    } else {
                        registers.get(address).copied().unwrap_or(0)
                    };
                }
                Ok(len)
            }
            // Nothing else answers on the bus.
            _ => Err(TransferError::Stall),
        }
    }

    fn control_out(
        &self,
        request: VendorRequest,
        value: u16,
        index: u16,
        data: &[u8],
    ) -> Result<usize, TransferError> {
        self.log
            .borrow_mut()
            .push((request, value, data.len(), false));
        if self.unplugged {
            return Err(TransferError::Disconnected);
        }
        match request {
            VendorRequest::IoPorts => {
                self.ports.borrow_mut()[..data.len()].copy_from_slice(data);
                Ok(data.len())
            }
            VendorRequest::I2cIndexed8 if index == u16::from(AD7746_SLAVE_ADDRESS) << 1 => {
                if value == 0xBF {
                    *self.registers.borrow_mut() = POWER_ON;
                    *self.resets.borrow_mut() += 1;
                    return Ok(data.len());
                }
                let mut registers = self.registers.borrow_mut();
                let start = usize::from(value);
                for (offset, byte) in data.iter().enumerate() {
                    if let Some(register) = registers.get_mut(start + offset) {
                        *register = *byte;
                    }
                }
                // Writing the configuration register starts conversions, which
                // finish instantly here.
                if (start..start + data.len()).contains(&0x0A) {
                    registers[0] = 0x00;
                }
                Ok(data.len())
            }
            _ => Err(TransferError::Stall),
        }
    }
}

/// Clock that only moves when slept.
#[derive(Debug, Default)]
struct SimulatedClock {
    now: Duration,
    sleeps: Vec<Duration>,
}

impl Clock for SimulatedClock {
    fn elapsed(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        self.now += duration;
        self.sleeps.push(duration);
    }
}

fn board(bridge: SimulatedBridge) -> EvalBoard<SimulatedBridge, SimulatedClock> {
    EvalBoard::from_parts(bridge, SimulatedClock::default())
}

fn fast_poll() -> PollSettings {
    PollSettings {
        interval: Duration::from_millis(10),
        timeout: Duration::from_millis(50),
    }
}

#[test]
fn configure_then_acquire_both_channels() -> Result<(), Error> {
    let board = board(SimulatedBridge::default());
    let setup = SensorSetup::default();
    board.configure(&setup)?;

    let (bridge, clock) = board.into_parts();
    assert_eq!(*bridge.resets.borrow(), 1);
    let registers = *bridge.registers.borrow();
    assert_eq!(
        &registers[0x07..=0x0C],
        &[0xA0, 0x81, 0x63, 0xF9, 0xC9, 0xC9]
    );
    assert_eq!(clock.now, Duration::from_micros(300_500));

    bridge.load_results([0x80, 0x00, 0x01], [0x80, 0x00, 0x00]);
    bridge.script_status(&[0x04, 0x04]);
    let board = EvalBoard::from_parts(bridge, clock);
    let sample = board.acquire(setup.channels(), &fast_poll())?;

    let pf = sample.capacitance_picofarads().unwrap();
    assert!((pf - 4.8828125e-7).abs() < 1e-15);
    assert_eq!(sample.temperature_celsius, Some(0.0));

    let (bridge, clock) = board.into_parts();
    // Three status reads, then one six-byte data read.
    assert_eq!(&bridge.reads()[1..], &[(0x00, 1), (0x00, 1), (0x00, 1), (0x01, 6)]);
    assert_eq!(clock.sleeps.len(), 4);
    Ok(())
}

#[test]
fn capacitance_only_run() -> Result<(), Error> {
    let board = board(SimulatedBridge::default());
    let setup = SensorSetup::default().with_temperature(false);
    board.configure(&setup)?;
    let (bridge, clock) = board.into_parts();
    assert_eq!(bridge.registers.borrow()[0x08], 0x00);
    bridge.load_results([0x7F, 0xFF, 0xFF], [0x81, 0x00, 0x00]);
    let board = EvalBoard::from_parts(bridge, clock);

    let raw = board.acquire_raw(setup.channels(), &fast_poll())?;
    assert_eq!(raw.capacitance, Some(0x7F_FFFF));
    assert_eq!(raw.temperature, None);
    let farads = raw.convert().capacitance_farads.unwrap();
    assert!(farads < 0.0);

    let (bridge, _) = board.into_parts();
    assert_eq!(bridge.reads().last(), Some(&(0x01, 3)));
    Ok(())
}

#[test]
fn temperature_only_reads_from_vt_registers() -> Result<(), Error> {
    let bridge = SimulatedBridge::default();
    bridge.load_results([0, 0, 0], [0x80, 0x10, 0x00]);
    let board = board(bridge);
    let sample = board.acquire(Channels::TEMPERATURE, &fast_poll())?;
    assert_eq!(sample.temperature_celsius, Some(2.0));
    let (bridge, _) = board.into_parts();
    assert_eq!(bridge.reads().last(), Some(&(0x04, 3)));
    Ok(())
}

#[test]
fn configuration_rejects_pending_status() {
    let bridge = SimulatedBridge::default();
    // Conversion still running and the excitation failed.
    bridge.script_status(&[0x0C]);
    let board = board(bridge);
    match board.configure(&SensorSetup::default()) {
        Err(Error::ConfigurationFailed(status)) => {
            assert!(status.excitation_fault());
            assert!(!status.is_ready());
        }
        other => panic!("expected configuration failure, got {other:?}"),
    }
}

#[test]
fn never_ready_times_out_without_reading_data() {
    let bridge = SimulatedBridge::default();
    bridge.script_status(&[0x04; 20]);
    let board = board(bridge);
    let result = board.acquire_raw(Channels::BOTH, &fast_poll());
    assert!(matches!(result, Err(Error::ReadyTimeout { .. })));
    let (bridge, clock) = board.into_parts();
    assert!(bridge.reads().iter().all(|&(value, len)| value == 0 && len == 1));
    assert!(clock.now >= Duration::from_millis(50));
}

#[test]
fn short_read_gives_no_sample() {
    let bridge = SimulatedBridge {
        read_limit: Some(1),
        ..Default::default()
    };
    bridge.load_results([0x80, 0x00, 0x01], [0x80, 0x00, 0x00]);
    let board = board(bridge);
    let error = board.acquire_raw(Channels::BOTH, &fast_poll()).unwrap_err();
    assert!(error.is_register_access_failure());
    assert!(matches!(
        error,
        Error::ShortTransfer {
            expected: 6,
            actual: 1
        }
    ));
}

#[test]
fn unplugged_board_fails_every_access() {
    let board = board(SimulatedBridge {
        unplugged: true,
        ..Default::default()
    });
    assert!(board.status().unwrap_err().is_register_access_failure());
    assert!(board.configure(&SensorSetup::default()).is_err());
    assert!(board.set_led(true).is_err());
}

#[test]
fn register_dump_after_configuration() -> Result<(), Error> {
    let board = board(SimulatedBridge::default());
    board.configure(&SensorSetup::default().with_capdacs(0x10, 0x00))?;
    let dump = board.dump_registers()?;
    assert_eq!(dump.len(), 19);
    assert_eq!(dump[0x0B], (Register::CapDacA, u8::from(CapDac::enabled(0x10))));
    assert_eq!(dump[0x0F], (Register::CapGainH, 0x5A));
    Ok(())
}

#[test]
fn board_pins_and_led() -> Result<(), Error> {
    let board = board(SimulatedBridge::default());
    board.configure_board()?;
    let ports = board.gpio_read(3)?;
    assert_eq!(ports.len(), 3);
    assert!(ports[0].is_output(LED_PIN));
    // Active low, so lit means a low output.
    assert!(!ports[0].level(LED_PIN));
    assert_eq!(ports[1], PortState::ALL_INPUTS);

    board.set_led(false)?;
    let ports = board.gpio_read(1)?;
    assert!(ports[0].level(LED_PIN));
    Ok(())
}

#[test]
fn embedded_hal_reads_the_register_file() -> Result<(), Error> {
    use embedded_hal::i2c::I2c;

    let mut board = board(SimulatedBridge::default());
    let mut config = [0u8; 1];
    board.write_read(AD7746_SLAVE_ADDRESS, &[0x0A], &mut config)?;
    assert_eq!(config, [0xA0]);

    // Nothing else is on the bus.
    let mut buf = [0u8; 2];
    let error = board.read(0x50, &mut buf).unwrap_err();
    assert!(matches!(error, Error::Transport(TransferError::Stall)));
    Ok(())
}
