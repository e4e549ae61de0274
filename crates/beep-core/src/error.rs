//! Error types shared by the drivers, the detector and the playback engine.
//!
//! Drivers never hand raw OS codes to their callers. Everything is folded into
//! the closed [`Error`] set so the detector can branch on the failure kind.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The path is not of the device class the driver controls.
    #[error("{0} is not a device this driver can handle")]
    NotApplicable(PathBuf),

    #[error("permission denied for {0}")]
    PermissionDenied(PathBuf),

    #[error("no such device {0}")]
    NotFound(PathBuf),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Every registered driver declined or failed.
    #[error("could not open any device")]
    NoDeviceAvailable,

    /// Reading the trigger input or echoing it failed.
    #[error("I/O error on standard streams: {0}")]
    Stream(#[source] io::Error),

    #[error("device has already been closed")]
    DeviceClosed,

    /// A termination signal arrived while a tone request was playing.
    #[error("interrupted during playback")]
    Interrupted,
}

impl Error {
    /// Folds an OS error for `path` into the closed set.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Error::PermissionDenied(path.to_path_buf()),
            _ => Error::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    pub fn is_not_applicable(&self) -> bool {
        matches!(self, Error::NotApplicable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_classifies_kinds() {
        let path = Path::new("/dev/tty0");

        let err = Error::from_io(path, io::Error::from_raw_os_error(libc::ENOENT));
        assert!(matches!(err, Error::NotFound(p) if p == path));

        let err = Error::from_io(path, io::Error::from_raw_os_error(libc::EACCES));
        assert!(matches!(err, Error::PermissionDenied(_)));

        let err = Error::from_io(path, io::Error::from_raw_os_error(libc::EPERM));
        assert!(matches!(err, Error::PermissionDenied(_)));

        let err = Error::from_io(path, io::Error::from_raw_os_error(libc::EIO));
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_only_not_applicable_is_not_applicable() {
        assert!(Error::NotApplicable(PathBuf::from("/tmp/x")).is_not_applicable());
        assert!(!Error::NoDeviceAvailable.is_not_applicable());
        assert!(!Error::NotFound(PathBuf::from("/tmp/x")).is_not_applicable());
    }
}
