use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use beep_core::driver::{ConsoleDriver, EvdevDriver};
use beep_core::{Delivery, Error, Interrupt, Player, Registry, detect};

mod cli;
mod logger;
mod privileges;

fn main() -> ExitCode {
    logger::init(log::LevelFilter::Warn);

    if let Err(e) = privileges::check() {
        log::error!("{e}");
        return ExitCode::FAILURE;
    }

    let invocation = match cli::parse(std::env::args_os()) {
        Ok(invocation) => invocation,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    log::set_max_level(logger::level_for(invocation.verbosity));

    match run(invocation) {
        Ok(()) => ExitCode::SUCCESS,
        // Already reported, or the device was released on interrupt
        Err(e)
            if matches!(
                e.downcast_ref::<Error>(),
                Some(Error::Interrupted | Error::NoDeviceAvailable)
            ) =>
        {
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(invocation: cli::Invocation) -> anyhow::Result<()> {
    let interrupt = Arc::new(Interrupt::new());
    {
        let interrupt = interrupt.clone();
        // Unobserved means no tone is sounding and playback can no longer
        // start, so die as SIGINT would
        ctrlc::set_handler(move || {
            if interrupt.raise() == Delivery::Unobserved {
                std::process::exit(1);
            }
        })
        .context("Error setting signal handler")?;
    }

    let mut registry: Registry = Registry::new();
    registry.register(ConsoleDriver);
    registry.register(EvdevDriver);

    let device = invocation.device.as_deref();
    let mut handle = match (detect(&registry, device), device) {
        (Ok(handle), _) => handle,
        (Err(Error::NoDeviceAvailable), None) => {
            let mut stdout = io::stdout();
            let is_terminal = stdout.is_terminal();
            fallback_beep(&mut stdout, is_terminal, |message| log::error!("{message}"));
            return Err(Error::NoDeviceAvailable.into());
        }
        (Err(Error::NoDeviceAvailable), Some(path)) => {
            anyhow::bail!("{} is not a console or input event device", path.display());
        }
        (Err(e), Some(path)) => {
            return Err(e).with_context(|| format!("Could not open {} for writing", path.display()));
        }
        (Err(e), None) => return Err(e.into()),
    };
    log::info!(
        "using driver {} on {}",
        handle.driver_name(),
        handle.path().display()
    );

    Player::new(&*interrupt).play_chain(
        &mut handle,
        invocation.chain,
        &mut io::stdin().lock(),
        &mut io::stdout().lock(),
    )?;
    Ok(())
}

/// Reports that no device opened, then rings the terminal bell, the only
/// beep left.
fn fallback_beep<W: Write>(stdout: &mut W, is_terminal: bool, report: impl FnOnce(&str)) {
    report("Could not open any device");
    if is_terminal {
        let _ = stdout.write_all(b"\x07");
        let _ = stdout.flush();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct Bell<'a> {
        seen: &'a RefCell<Vec<String>>,
    }

    impl Write for Bell<'_> {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.seen.borrow_mut().push(format!("{buf:?}"));
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_fallback_reports_before_ringing() {
        let seen = RefCell::new(Vec::new());
        fallback_beep(&mut Bell { seen: &seen }, true, |message| {
            seen.borrow_mut().push(message.to_string())
        });
        assert_eq!(*seen.borrow(), vec!["Could not open any device".to_string(), "[7]".to_string()]);
    }

    #[test]
    fn test_fallback_stays_quiet_off_terminal() {
        let seen = RefCell::new(Vec::new());
        fallback_beep(&mut Bell { seen: &seen }, false, |message| {
            seen.borrow_mut().push(message.to_string())
        });
        assert_eq!(*seen.borrow(), vec!["Could not open any device".to_string()]);
    }
}
