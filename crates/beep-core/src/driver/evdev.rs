//! PC speaker driven through its input event node (`EV_SND`/`SND_TONE`).

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::{mem, slice};

use super::node::{self, NodeClass};
use super::{Driver, OpenHandle, ToneDevice};
use crate::error::Error;

const EV_SND: u16 = 0x12;
const SND_TONE: u16 = 0x02;

const DEFAULT_DEVICE: &str = "/dev/input/by-path/platform-pcspkr-event-spkr";

/// Kernel `struct input_event`.
#[repr(C)]
struct InputEvent {
    time: libc::timeval,
    kind: u16,
    code: u16,
    value: i32,
}

impl InputEvent {
    fn tone(frequency: u16) -> Self {
        Self {
            time: libc::timeval {
                tv_sec: 0,
                tv_usec: 0,
            },
            kind: EV_SND,
            code: SND_TONE,
            value: i32::from(frequency),
        }
    }

    fn as_bytes(&self) -> &[u8] {
        // SAFETY: repr(C) plain-old-data, viewed for its own size and lifetime.
        unsafe { slice::from_raw_parts((self as *const Self).cast::<u8>(), mem::size_of::<Self>()) }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EvdevDriver;

impl Driver for EvdevDriver {
    fn name(&self) -> &'static str {
        "evdev"
    }

    fn open(&self, path: Option<&Path>) -> Result<OpenHandle, Error> {
        let path = match path {
            Some(path) => {
                if node::classify(path)? != NodeClass::Input {
                    return Err(Error::NotApplicable(path.to_path_buf()));
                }
                path
            }
            None => Path::new(DEFAULT_DEVICE),
        };

        let file = node::open_write_only(path)?;
        let device = EvdevDevice {
            file: Some(file),
            path: path.to_path_buf(),
        };
        Ok(OpenHandle::new(self.name(), path, device.into()))
    }
}

#[derive(Debug)]
pub struct EvdevDevice {
    file: Option<File>,
    path: PathBuf,
}

impl EvdevDevice {
    fn send(&mut self, frequency: u16) -> Result<(), Error> {
        let Some(file) = self.file.as_mut() else {
            return Err(Error::DeviceClosed);
        };
        file.write_all(InputEvent::tone(frequency).as_bytes())
            .map_err(|e| Error::from_io(&self.path, e))
    }
}

impl ToneDevice for EvdevDevice {
    fn start_tone(&mut self, frequency: u16) -> Result<(), Error> {
        self.send(frequency)
    }

    fn stop_tone(&mut self) -> Result<(), Error> {
        if self.file.is_none() {
            return Ok(());
        }
        self.send(0)
    }

    fn close(&mut self) -> Result<(), Error> {
        self.file.take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    #[test]
    fn test_declines_non_input_nodes() {
        let err = EvdevDriver.open(Some(Path::new("/dev/null"))).unwrap_err();
        assert!(err.is_not_applicable());
    }

    #[test]
    fn test_tone_event_layout() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut device = EvdevDevice {
            file: Some(file.reopen().unwrap()),
            path: file.path().to_path_buf(),
        };
        device.start_tone(880).unwrap();
        device.stop_tone().unwrap();
        device.close().unwrap();

        let mut written = Vec::new();
        file.read_to_end(&mut written).unwrap();
        let size = mem::size_of::<InputEvent>();
        assert_eq!(written.len(), 2 * size);

        let tail = size - 8;
        assert_eq!(&written[tail..tail + 2], &EV_SND.to_ne_bytes());
        assert_eq!(&written[tail + 2..tail + 4], &SND_TONE.to_ne_bytes());
        assert_eq!(&written[tail + 4..size], &880i32.to_ne_bytes());
        assert_eq!(&written[size + tail + 4..], &0i32.to_ne_bytes());
    }
}
