//! Waiting for the AD7746 to finish a conversion.
//!
//! The RDY pin of the AD7746 is wired to port A bit 3 of the bridge, but polling
//! the status register over I2C is simpler and just as fast at the output data
//! rates the converter supports.

use std::time::{Duration, Instant};

use crate::error::Error;
use crate::status::Status;

/// Source of elapsed time and blocking delays.
///
/// The poller and configuration sequence only ever need "how long since I
/// started" and "sleep for this long", which keeps them testable with a clock
/// that advances only when slept.
pub trait Clock {
    /// Monotonic time since an arbitrary, fixed origin.
    fn elapsed(&self) -> Duration;

    /// Block the calling thread for `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// [`Clock`] backed by [`Instant`] and [`std::thread::sleep`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// How to wait for a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Delay between status register reads.
    pub interval: Duration,
    /// Give up once this much time has passed since the first status read.
    pub timeout: Duration,
}

impl PollSettings {
    /// Poll every 10 ms for up to `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }
}

impl Default for PollSettings {
    /// 10 ms interval and a 300 ms timeout, long enough for the slowest filter
    /// setting of a single channel.
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(10),
            timeout: Duration::from_millis(300),
        }
    }
}

/// Read the status with `read_status` until it reports ready.
///
/// Each iteration reads the status once. A ready status ends the poll
/// successfully. An excitation fault is logged and polling continues. Once more
/// than `settings.timeout` has passed since the poll started the poll fails with
/// [`Error::ReadyTimeout`]; otherwise the clock sleeps for `settings.interval`.
///
/// Errors from `read_status` end the poll immediately.
pub fn poll_until_ready<C, F>(
    clock: &mut C,
    settings: &PollSettings,
    mut read_status: F,
) -> Result<Status, Error>
where
    C: Clock + ?Sized,
    F: FnMut() -> Result<Status, Error>,
{
    let started = clock.elapsed();
    loop {
        let status = read_status()?;
        if status.is_ready() {
            return Ok(status);
        }

        // TODO: decide whether an excitation fault should abort the poll. It means
        // the sensor is not being driven, so the poll will only ever time out.
        if status.excitation_fault() {
            tracing::warn!(%status, "failed to drive the excitation signal");
        }

        if clock.elapsed().saturating_sub(started) > settings.timeout {
            return Err(Error::ReadyTimeout {
                timeout: settings.timeout,
                last_status: status,
            });
        }

        clock.sleep(settings.interval);
    }
}
