use std::path::{Path, PathBuf};

use super::{Driver, OpenHandle, ToneDevice};
use crate::error::Error;

/// Accepts any path and does nothing. Used for testing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDriver;

impl Driver for NoopDriver {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn open(&self, path: Option<&Path>) -> Result<OpenHandle, Error> {
        let path = path.map_or_else(|| PathBuf::from("/dev/null"), Path::to_path_buf);
        log::debug!("noop: opened {}", path.display());
        Ok(OpenHandle::new(self.name(), path, NoopDevice::default().into()))
    }
}

#[derive(Debug, Default)]
pub struct NoopDevice;

impl ToneDevice for NoopDevice {
    fn start_tone(&mut self, frequency: u16) -> Result<(), Error> {
        log::trace!("noop: start {} Hz", frequency);
        Ok(())
    }

    fn stop_tone(&mut self) -> Result<(), Error> {
        log::trace!("noop: stop");
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        Ok(())
    }
}
