//! Legacy PC speaker control through a virtual console (`KIOCSOUND`).

use std::fs::File;
use std::io;
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};

use super::node::{self, NodeClass};
use super::{Driver, OpenHandle, ToneDevice};
use crate::error::Error;

const KIOCSOUND: u64 = 0x4B2F;

/// PIT input clock; `KIOCSOUND` takes a divisor of it.
const CLOCK_TICK_RATE: u32 = 1_193_180;

const DEFAULT_DEVICES: &[&str] = &["/dev/tty0", "/dev/vc/0"];

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleDriver;

impl ConsoleDriver {
    fn open_path(&self, path: &Path) -> Result<OpenHandle, Error> {
        let file = node::open_write_only(path)?;
        let mut device = ConsoleDevice {
            file: Some(file),
            path: path.to_path_buf(),
        };
        // A console that refuses KIOCSOUND cannot beep
        device.stop_tone()?;
        Ok(OpenHandle::new(self.name(), path, device.into()))
    }
}

impl Driver for ConsoleDriver {
    fn name(&self) -> &'static str {
        "console"
    }

    fn open(&self, path: Option<&Path>) -> Result<OpenHandle, Error> {
        if let Some(path) = path {
            if node::classify(path)? != NodeClass::Console {
                return Err(Error::NotApplicable(path.to_path_buf()));
            }
            return self.open_path(path);
        }

        let mut last = Error::NoDeviceAvailable;
        for candidate in DEFAULT_DEVICES {
            match self.open_path(Path::new(candidate)) {
                Ok(handle) => return Ok(handle),
                Err(e) => {
                    log::debug!("console: {}", e);
                    last = e;
                }
            }
        }
        Err(last)
    }
}

#[derive(Debug)]
pub struct ConsoleDevice {
    file: Option<File>,
    path: PathBuf,
}

impl ConsoleDevice {
    fn sound(&self, divisor: u32) -> Result<(), Error> {
        let Some(file) = &self.file else {
            return Err(Error::DeviceClosed);
        };
        // SAFETY: KIOCSOUND takes its argument by value and the fd is open.
        let ret = unsafe { libc::ioctl(file.as_raw_fd(), KIOCSOUND as _, divisor as libc::c_ulong) };
        if ret < 0 {
            return Err(Error::from_io(&self.path, io::Error::last_os_error()));
        }
        Ok(())
    }
}

fn divisor(frequency: u16) -> u32 {
    match frequency {
        0 => 0,
        f => CLOCK_TICK_RATE / u32::from(f),
    }
}

impl ToneDevice for ConsoleDevice {
    fn start_tone(&mut self, frequency: u16) -> Result<(), Error> {
        self.sound(divisor(frequency))
    }

    fn stop_tone(&mut self) -> Result<(), Error> {
        if self.file.is_none() {
            return Ok(());
        }
        self.sound(0)
    }

    fn close(&mut self) -> Result<(), Error> {
        self.file.take();
        Ok(())
    }
}
