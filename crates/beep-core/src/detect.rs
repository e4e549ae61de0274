//! Picks and opens the output device for a run.

use std::path::Path;

use crate::driver::{Driver, OpenHandle};
use crate::error::Error;
use crate::registry::Registry;

/// Opens a device using the first suitable driver in `registry`.
///
/// With an explicit `path`, drivers that answer [`Error::NotApplicable`] are
/// skipped and the first driver that recognises the path decides the outcome:
/// its error is returned as-is. Without a path, every failure moves on to the
/// next driver. Either way an exhausted registry gives
/// [`Error::NoDeviceAvailable`].
pub fn detect<D: Driver>(registry: &Registry<D>, path: Option<&Path>) -> Result<OpenHandle, Error> {
    for driver in registry.iter() {
        match driver.open(path) {
            Ok(handle) => {
                log::debug!("{}: opened {}", driver.name(), handle.path().display());
                return Ok(handle);
            }
            Err(e) if e.is_not_applicable() => {
                log::debug!("{}: {}", driver.name(), e);
            }
            Err(e) if path.is_some() => return Err(e),
            Err(e) => {
                log::debug!("{}: {}", driver.name(), e);
            }
        }
    }
    Err(Error::NoDeviceAvailable)
}
