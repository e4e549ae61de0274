//! Cooperative cancellation of the playback waits.
//!
//! A signal handler thread calls [`Interrupt::raise`]. While a request is
//! playing the interrupt is armed and the raise is latched; the next (or the
//! current) [`Pause::pause`] returns [`Error::Interrupted`] and the player tears
//! the device down. Outside playback nothing listens: the raise is latched as
//! termination, every later [`Pause::arm`] refuses, and the caller decides how
//! to leave.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::error::Error;

/// The suspension point of the playback engine.
pub trait Pause {
    /// Waits for `duration` unless cancelled first.
    fn pause(&self, duration: Duration) -> Result<(), Error>;

    /// Playback of a request is starting. Refuses once termination is under
    /// way, before any tone has been started.
    fn arm(&self) -> Result<(), Error> {
        Ok(())
    }

    /// Playback of a request has finished. Reports a cancellation that
    /// arrived after the last pause.
    fn disarm(&self) -> Result<(), Error> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Playback is in progress and will stop at its next wait.
    Delivered,
    /// No playback is in progress, and none will start.
    Unobserved,
}

#[derive(Debug, Default)]
struct Flags {
    armed: bool,
    pending: bool,
    terminating: bool,
}

#[derive(Debug, Default)]
pub struct Interrupt {
    flags: Mutex<Flags>,
    wake: Condvar,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) -> Delivery {
        let mut flags = self.lock();
        if !flags.armed {
            flags.terminating = true;
            return Delivery::Unobserved;
        }
        flags.pending = true;
        self.wake.notify_all();
        Delivery::Delivered
    }

    fn lock(&self) -> MutexGuard<'_, Flags> {
        self.flags.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Pause for Interrupt {
    fn pause(&self, duration: Duration) -> Result<(), Error> {
        let deadline = Instant::now() + duration;
        let mut flags = self.lock();
        loop {
            if flags.pending || flags.terminating {
                return Err(Error::Interrupted);
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            flags = match self.wake.wait_timeout(flags, deadline - now) {
                Ok((flags, _)) => flags,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
    }

    fn arm(&self) -> Result<(), Error> {
        let mut flags = self.lock();
        if flags.terminating {
            return Err(Error::Interrupted);
        }
        flags.armed = true;
        Ok(())
    }

    fn disarm(&self) -> Result<(), Error> {
        let mut flags = self.lock();
        flags.armed = false;
        if flags.pending || flags.terminating {
            return Err(Error::Interrupted);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn test_pause_waits_full_duration() {
        let interrupt = Interrupt::new();
        interrupt.arm().unwrap();
        let start = Instant::now();
        interrupt.pause(Duration::from_millis(30)).unwrap();
        assert!(start.elapsed() >= Duration::from_millis(30));
        assert!(interrupt.disarm().is_ok());
    }

    #[test]
    fn test_unarmed_raise_refuses_later_playback() {
        let interrupt = Interrupt::new();
        assert_eq!(interrupt.raise(), Delivery::Unobserved);
        assert!(matches!(interrupt.arm(), Err(Error::Interrupted)));
        assert!(matches!(interrupt.pause(Duration::from_secs(10)), Err(Error::Interrupted)));
        assert!(matches!(interrupt.disarm(), Err(Error::Interrupted)));
    }

    #[test]
    fn test_raise_after_disarm_is_unobserved() {
        let interrupt = Interrupt::new();
        interrupt.arm().unwrap();
        interrupt.disarm().unwrap();
        assert_eq!(interrupt.raise(), Delivery::Unobserved);
        assert!(interrupt.arm().is_err());
    }

    #[test]
    fn test_raise_cuts_pause_short() {
        let interrupt = Arc::new(Interrupt::new());
        interrupt.arm().unwrap();

        let raiser = {
            let interrupt = interrupt.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                interrupt.raise()
            })
        };

        let start = Instant::now();
        let result = interrupt.pause(Duration::from_secs(10));
        assert!(matches!(result, Err(Error::Interrupted)));
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(raiser.join().unwrap(), Delivery::Delivered);
    }

    #[test]
    fn test_raise_between_pauses_is_latched() {
        let interrupt = Interrupt::new();
        interrupt.arm().unwrap();
        assert_eq!(interrupt.raise(), Delivery::Delivered);

        let start = Instant::now();
        assert!(matches!(interrupt.pause(Duration::from_secs(10)), Err(Error::Interrupted)));
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(matches!(interrupt.disarm(), Err(Error::Interrupted)));
    }
}
