use crate::driver::{Driver, DriverKind};

/// Drivers in detection priority order.
#[derive(Debug)]
pub struct Registry<D: Driver = DriverKind> {
    drivers: Vec<D>,
}

impl<D: Driver> Registry<D> {
    pub fn new() -> Self {
        Self { drivers: Vec::new() }
    }

    /// Appends `driver` behind everything registered so far.
    pub fn register(&mut self, driver: impl Into<D>) {
        let driver = driver.into();
        log::trace!("registered driver {}", driver.name());
        self.drivers.push(driver);
    }

    pub fn iter(&self) -> impl Iterator<Item = &D> {
        self.drivers.iter()
    }
}

impl<D: Driver> Default for Registry<D> {
    fn default() -> Self {
        Self::new()
    }
}
