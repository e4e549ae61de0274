//! Refuses to run with borrowed privileges.
//!
//! beep opens device files for writing and tries them in turn, which cannot be made
//! safe for setuid, setgid or sudo use. Access should come from the device
//! file permissions instead.

use std::env;

const SUDO_VARS: &[&str] = &["SUDO_COMMAND", "SUDO_USER", "SUDO_UID", "SUDO_GID"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ids {
    pub uid: u32,
    pub euid: u32,
    pub gid: u32,
    pub egid: u32,
}

impl Ids {
    pub fn current() -> Self {
        // SAFETY: these calls always succeed and touch no memory.
        unsafe {
            Self {
                uid: libc::getuid(),
                euid: libc::geteuid(),
                gid: libc::getgid(),
                egid: libc::getegid(),
            }
        }
    }
}

/// Returns why the process must not run, if it must not.
pub fn refusal(ids: Ids, is_set: impl Fn(&str) -> bool) -> Option<&'static str> {
    if ids.uid != ids.euid || ids.gid != ids.egid {
        return Some("Running setuid or setgid, which is not supported for security reasons.");
    }
    if SUDO_VARS.iter().any(|var| is_set(var)) {
        return Some("Running under sudo, which is not supported for security reasons.");
    }
    None
}

pub fn check() -> anyhow::Result<()> {
    if let Some(reason) = refusal(Ids::current(), |var| env::var_os(var).is_some()) {
        log::error!("{}", reason);
        anyhow::bail!("Set up permissions for the pcspkr evdev device file instead.");
    }
    Ok(())
}
