//! Device node inspection shared by the Linux drivers.

use std::fs::{self, File, OpenOptions};
use std::os::unix::fs::{FileTypeExt, MetadataExt};
use std::path::Path;

use crate::error::Error;

const TTY_MAJOR: u32 = 4;
const TTYAUX_MAJOR: u32 = 5;
const INPUT_MAJOR: u32 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeClass {
    Console,
    Input,
    Other,
}

/// Classifies `path` from its metadata alone, without opening it.
pub(crate) fn classify(path: &Path) -> Result<NodeClass, Error> {
    let metadata = fs::metadata(path).map_err(|e| Error::from_io(path, e))?;
    if !metadata.file_type().is_char_device() {
        return Ok(NodeClass::Other);
    }
    Ok(match major(metadata.rdev()) {
        TTY_MAJOR | TTYAUX_MAJOR => NodeClass::Console,
        INPUT_MAJOR => NodeClass::Input,
        _ => NodeClass::Other,
    })
}

pub(crate) fn open_write_only(path: &Path) -> Result<File, Error> {
    OpenOptions::new()
        .write(true)
        .open(path)
        .map_err(|e| Error::from_io(path, e))
}

// glibc encoding of dev_t
fn major(rdev: u64) -> u32 {
    (((rdev >> 32) & 0xffff_f000) | ((rdev >> 8) & 0x0000_0fff)) as u32
}
