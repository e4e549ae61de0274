//! The playback engine.
//!
//! Every request runs as repetitions of start, wait, stop and an optional
//! delay. Waits go through a [`Pause`], the only place where playback can be
//! cancelled; a cancelled request silences and closes the device before the
//! error is handed back.

use std::io::{BufRead, Read, Write};
use std::time::Duration;

use crate::driver::{OpenHandle, ToneDevice};
use crate::error::Error;
use crate::interrupt::Pause;
use crate::request::{RequestChain, StdinTrigger, ToneRequest};

pub struct Player<'a, P: Pause> {
    pause: &'a P,
}

impl<'a, P: Pause> Player<'a, P> {
    pub fn new(pause: &'a P) -> Self {
        Self { pause }
    }

    /// Plays `request` once on `handle`.
    ///
    /// On [`Error::Interrupted`] the handle has already been silenced and
    /// closed.
    pub fn play<T: ToneDevice>(
        &self,
        handle: &mut OpenHandle<T>,
        request: &ToneRequest,
    ) -> Result<(), Error> {
        log::info!(
            "{} times {} ms beeps ({} ms delay between, {} after) @ {} Hz",
            request.reps(),
            request.length_ms(),
            request.delay_ms(),
            if request.end_delay() { "delay" } else { "no delay" },
            request.frequency(),
        );

        let played = self
            .pause
            .arm()
            .and_then(|()| self.repeat(handle, request));
        let settled = self.pause.disarm();

        match played.and(settled) {
            Err(Error::Interrupted) => {
                teardown(handle);
                Err(Error::Interrupted)
            }
            other => other,
        }
    }

    fn repeat<T: ToneDevice>(
        &self,
        handle: &mut OpenHandle<T>,
        request: &ToneRequest,
    ) -> Result<(), Error> {
        // The hardware divisor register is 16 bits wide
        let frequency = (request.frequency() & 0xffff) as u16;

        for i in 0..request.reps() {
            handle.start_tone(frequency)?;
            self.pause.pause(millis(request.length_ms()))?;
            handle.stop_tone()?;
            if request.end_delay() || i + 1 < request.reps() {
                self.pause.pause(millis(request.delay_ms()))?;
            }
        }
        Ok(())
    }

    /// Plays every request of `chain` in order, then silences and closes
    /// `handle`.
    ///
    /// Requests with a stdin trigger read `input` to its end, echoing each
    /// line or byte to `output` before playing the request once for it.
    pub fn play_chain<T, R, W>(
        &self,
        handle: &mut OpenHandle<T>,
        chain: RequestChain,
        input: &mut R,
        output: &mut W,
    ) -> Result<(), Error>
    where
        T: ToneDevice,
        R: BufRead,
        W: Write,
    {
        for request in chain {
            match request.trigger() {
                StdinTrigger::None => self.play(handle, &request)?,
                StdinTrigger::Line => self.per_line(handle, &request, input, output)?,
                StdinTrigger::Char => self.per_char(handle, &request, input, output)?,
            }
        }

        handle.stop_tone()?;
        handle.close()
    }

    fn per_line<T, R, W>(
        &self,
        handle: &mut OpenHandle<T>,
        request: &ToneRequest,
        input: &mut R,
        output: &mut W,
    ) -> Result<(), Error>
    where
        T: ToneDevice,
        R: BufRead,
        W: Write,
    {
        let mut line = Vec::new();
        loop {
            line.clear();
            if input.read_until(b'\n', &mut line).map_err(Error::Stream)? == 0 {
                return Ok(());
            }
            echo(output, &line)?;
            self.play(handle, request)?;
        }
    }

    fn per_char<T, R, W>(
        &self,
        handle: &mut OpenHandle<T>,
        request: &ToneRequest,
        input: &mut R,
        output: &mut W,
    ) -> Result<(), Error>
    where
        T: ToneDevice,
        R: BufRead,
        W: Write,
    {
        for byte in input.bytes() {
            let byte = byte.map_err(Error::Stream)?;
            echo(output, &[byte])?;
            self.play(handle, request)?;
        }
        Ok(())
    }
}

fn millis(ms: u32) -> Duration {
    Duration::from_millis(u64::from(ms))
}

fn echo<W: Write>(output: &mut W, bytes: &[u8]) -> Result<(), Error> {
    output.write_all(bytes).map_err(Error::Stream)?;
    output.flush().map_err(Error::Stream)
}

fn teardown<T: ToneDevice>(handle: &mut OpenHandle<T>) {
    log::debug!("interrupted, releasing {}", handle.path().display());
    if let Err(e) = handle.stop_tone() {
        log::warn!("failed to silence {}: {}", handle.path().display(), e);
    }
    if let Err(e) = handle.close() {
        log::warn!("failed to close {}: {}", handle.path().display(), e);
    }
}
