//! Linux GPIO character-device line.
//!
//! Implements [`OpenDrainLine`] over `/dev/gpiochipN`.  Direction changes
//! re-request the line from the kernel: the previous handle must be
//! dropped first, otherwise the new request fails with `EBUSY`.

use std::path::Path;

use embedded_hal::digital::{ErrorKind, ErrorType, InputPin};
use gpio_cdev::{Chip, Line, LineHandle, LineRequestFlags};

use crate::sensors::dht::OpenDrainLine;

/// Consumer label shown by `gpioinfo`.
const CONSUMER: &str = "climate-reporter";

#[derive(Debug)]
pub enum GpioError {
    /// The kernel rejected a chip, line or value operation.
    Cdev(gpio_cdev::errors::Error),
    /// A previous re-request failed and no handle is held.
    NotRequested,
}

impl core::fmt::Display for GpioError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Cdev(e) => write!(f, "{e}"),
            Self::NotRequested => write!(f, "line not requested"),
        }
    }
}

impl embedded_hal::digital::Error for GpioError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl From<gpio_cdev::errors::Error> for GpioError {
    fn from(e: gpio_cdev::errors::Error) -> Self {
        Self::Cdev(e)
    }
}

/// One GPIO line, switched between open-drain low and input.
pub struct CdevLine {
    line: Line,
    handle: Option<LineHandle>,
    driving: bool,
}

impl CdevLine {
    /// Request `offset` on `chip` as an input.
    pub fn open(chip: &Path, offset: u32) -> Result<Self, GpioError> {
        let mut chip = Chip::new(chip)?;
        let line = chip.get_line(offset)?;
        let handle = line.request(LineRequestFlags::INPUT, 0, CONSUMER)?;
        Ok(Self {
            line,
            handle: Some(handle),
            driving: false,
        })
    }

    fn request(&mut self, flags: LineRequestFlags, default: u8) -> Result<(), GpioError> {
        self.handle = None;
        self.handle = Some(self.line.request(flags, default, CONSUMER)?);
        Ok(())
    }

    fn handle(&self) -> Result<&LineHandle, GpioError> {
        self.handle.as_ref().ok_or(GpioError::NotRequested)
    }
}

impl ErrorType for CdevLine {
    type Error = GpioError;
}

impl InputPin for CdevLine {
    fn is_high(&mut self) -> Result<bool, GpioError> {
        Ok(self.handle()?.get_value()? != 0)
    }

    fn is_low(&mut self) -> Result<bool, GpioError> {
        self.is_high().map(|high| !high)
    }
}

impl OpenDrainLine for CdevLine {
    fn drive_low(&mut self) -> Result<(), GpioError> {
        if self.driving {
            self.handle()?.set_value(0)?;
        } else {
            self.request(LineRequestFlags::OUTPUT | LineRequestFlags::OPEN_DRAIN, 0)?;
            self.driving = true;
        }
        Ok(())
    }

    /// Re-requests the line as input.  The ioctl must return within the
    /// sensor's 20-40 µs pull-up phase plus the first part of its 80 µs
    /// response low; a slower host misses the response edge and the read
    /// fails with `Timeout` or `Checksum`, to be retried next period.
    fn release(&mut self) -> Result<(), GpioError> {
        self.driving = false;
        self.request(LineRequestFlags::INPUT, 0)
    }
}
