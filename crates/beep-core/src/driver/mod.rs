//! Driver contract and the closed set of output mechanisms.
//!
//! A [`Driver`] is a stateless capability: it knows how to recognise and open
//! one class of device. Opening yields an [`OpenHandle`], which owns the OS
//! resource and tracks where it is in its lifecycle.

use std::path::{Path, PathBuf};

use enum_dispatch::enum_dispatch;

use crate::error::Error;

mod console;
mod evdev;
mod node;
mod noop;

pub use console::{ConsoleDevice, ConsoleDriver};
pub use evdev::{EvdevDevice, EvdevDriver};
pub use noop::{NoopDevice, NoopDriver};

/// Hardware commands available on an opened device.
#[enum_dispatch]
pub trait ToneDevice {
    /// Starts sounding `frequency` Hz until [`stop_tone`](Self::stop_tone).
    fn start_tone(&mut self, frequency: u16) -> Result<(), Error>;
    /// Silences the device. Safe to call when nothing is sounding.
    fn stop_tone(&mut self) -> Result<(), Error>;
    /// Releases the OS resource. Calling it again is a no-op.
    fn close(&mut self) -> Result<(), Error>;
}

#[enum_dispatch(ToneDevice)]
#[derive(Debug)]
pub enum Device {
    ConsoleDevice,
    EvdevDevice,
    NoopDevice,
}

#[enum_dispatch]
pub trait Driver {
    fn name(&self) -> &'static str;

    /// Opens the device at `path`, or this driver's default device when no
    /// path is given.
    ///
    /// With an explicit path, a driver must answer [`Error::NotApplicable`]
    /// without side effects when the path is not of its device class.
    fn open(&self, path: Option<&Path>) -> Result<OpenHandle, Error>;
}

#[enum_dispatch(Driver)]
#[derive(Debug, Clone, Copy)]
pub enum DriverKind {
    ConsoleDriver,
    EvdevDriver,
    NoopDriver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Opened,
    Sounding,
    Closed,
}

/// The single live device of a run.
///
/// Dropping a handle that is still open silences and closes it.
#[derive(Debug)]
pub struct OpenHandle<T: ToneDevice = Device> {
    driver: &'static str,
    path: PathBuf,
    device: T,
    state: Lifecycle,
}

impl<T: ToneDevice> OpenHandle<T> {
    pub fn new(driver: &'static str, path: impl Into<PathBuf>, device: T) -> Self {
        Self {
            driver,
            path: path.into(),
            device,
            state: Lifecycle::Opened,
        }
    }

    /// Name of the driver that opened this handle.
    pub fn driver_name(&self) -> &'static str {
        self.driver
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn start_tone(&mut self, frequency: u16) -> Result<(), Error> {
        if self.state == Lifecycle::Closed {
            return Err(Error::DeviceClosed);
        }
        self.device.start_tone(frequency)?;
        self.state = Lifecycle::Sounding;
        Ok(())
    }

    pub fn stop_tone(&mut self) -> Result<(), Error> {
        if self.state == Lifecycle::Closed {
            return Ok(());
        }
        self.device.stop_tone()?;
        self.state = Lifecycle::Opened;
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), Error> {
        if self.state == Lifecycle::Closed {
            return Ok(());
        }
        self.state = Lifecycle::Closed;
        self.device.close()
    }
}

impl<T: ToneDevice> Drop for OpenHandle<T> {
    fn drop(&mut self) {
        if self.state == Lifecycle::Sounding {
            if let Err(e) = self.device.stop_tone() {
                log::warn!("failed to silence {}: {}", self.path.display(), e);
            }
        }
        if let Err(e) = self.close() {
            log::warn!("failed to close {}: {}", self.path.display(), e);
        }
    }
}
