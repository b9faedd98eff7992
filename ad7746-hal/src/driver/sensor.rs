use super::EvalBoard;
use crate::Error;
use crate::acquisition::{Channels, RawSample, Sample};
use crate::poll::{Clock, PollSettings, poll_until_ready};
use crate::registers::Register;
use crate::setup::SensorSetup;
use crate::status::Status;
use crate::transport::ControlTransport;

/// # AD7746 conversions
impl<T: ControlTransport, C: Clock> EvalBoard<T, C> {
    /// Read the status register.
    ///
    /// The status is read fresh every time.
    pub fn status(&self) -> Result<Status, Error> {
        self.read_register(Register::Status).map(Status::from)
    }

    /// Poll the status register until every enabled channel has a result.
    ///
    /// The status is read immediately, then every `settings.interval` until it
    /// reports ready. An excitation fault is logged but does not stop the poll.
    ///
    /// # Errors
    ///
    /// [`Error::ReadyTimeout`] once more than `settings.timeout` has passed
    /// without the converter becoming ready, or any error from reading the
    /// status register.
    pub fn wait_for_ready(&self, settings: &PollSettings) -> Result<Status, Error> {
        let mut clock = self.clock.borrow_mut();
        poll_until_ready(&mut *clock, settings, || self.status())
    }

    /// Wait for a conversion and read the raw codes of `channels`.
    ///
    /// Both channels are fetched in a single six-byte read. Selecting no channel
    /// returns an empty sample without touching the device.
    ///
    /// # Errors
    ///
    /// Any error of [`EvalBoard::wait_for_ready`], or a failed or short read of the
    /// data registers. No partial sample is ever returned.
    pub fn acquire_raw(
        &self,
        channels: Channels,
        settings: &PollSettings,
    ) -> Result<RawSample, Error> {
        let Some((start, len)) = channels.register_window() else {
            return Ok(RawSample::default());
        };
        self.wait_for_ready(settings)?;

        let mut buf = [0u8; 6];
        let data = &mut buf[..len];
        self.read_registers(start, data)?;
        Ok(channels.demultiplex(data))
    }

    /// Wait for a conversion and read `channels` in physical units.
    ///
    /// See [`EvalBoard::acquire_raw`].
    pub fn acquire(&self, channels: Channels, settings: &PollSettings) -> Result<Sample, Error> {
        self.acquire_raw(channels, settings).map(|raw| raw.convert())
    }

    /// Reset the converter and write `setup`.
    ///
    /// The sequence is: reset, wait `setup.reset_settle`, then write the
    /// excitation, CAPDAC A, CAPDAC B, voltage/temperature (if enabled),
    /// capacitive and configuration registers in that order. After waiting
    /// `setup.conversion_settle` the status register is read once.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigurationFailed`] if the status register is not clear after
    /// the settle time, and any register access error. The sequence stops at the
    /// first failed write.
    pub fn configure(&self, setup: &SensorSetup) -> Result<(), Error> {
        tracing::debug!(?setup, "configuring AD7746");
        self.write_register(Register::Reset, 0x00)?;
        self.sleep(setup.reset_settle);

        self.write_register(Register::ExcSetup, setup.excitation.into())?;
        self.write_register(Register::CapDacA, setup.capdac_a.into())?;
        self.write_register(Register::CapDacB, setup.capdac_b.into())?;
        if let Some(vt) = setup.voltage_temperature {
            self.write_register(Register::VtSetup, vt.into())?;
        }
        self.write_register(Register::CapSetup, setup.capacitance.into())?;
        self.write_register(Register::Configuration, setup.configuration.into())?;
        self.sleep(setup.conversion_settle);

        let status = self.status()?;
        if status.is_clear() {
            return Ok(());
        }
        if status.excitation_fault() {
            tracing::warn!(%status, "failed to drive the excitation signal");
        }
        if status.conversion_pending() {
            tracing::warn!(%status, "conversion not finished after configuration");
        }
        Err(Error::ConfigurationFailed(status))
    }

    /// Read the whole register file (0x00 to 0x12) in one transfer.
    pub fn dump_registers(&self) -> Result<Vec<(Register, u8)>, Error> {
        let mut buf = [0u8; Register::REGISTER_FILE.len()];
        self.read_registers(Register::Status, &mut buf)?;
        Ok(Register::REGISTER_FILE.into_iter().zip(buf).collect())
    }
}
