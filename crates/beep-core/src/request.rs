//! Tone requests and chains of them.

use thiserror::Error;

pub const DEFAULT_FREQUENCY: u32 = 440;
pub const DEFAULT_LENGTH_MS: u32 = 200;
pub const DEFAULT_REPS: u32 = 1;
pub const DEFAULT_DELAY_MS: u32 = 100;

pub const MAX_FREQUENCY: f32 = 20_000.0;
/// Upper bound shared by length, repetitions and delay.
pub const MAX_COUNT: u32 = 300_000;

#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("frequency {0} Hz is outside 0..={max}", max = MAX_FREQUENCY)]
    Frequency(f32),
    #[error("length {0} ms exceeds {max}", max = MAX_COUNT)]
    Length(u32),
    #[error("repetition count {0} exceeds {max}", max = MAX_COUNT)]
    Reps(u32),
    #[error("delay {0} ms exceeds {max}", max = MAX_COUNT)]
    Delay(u32),
}

/// What, if anything, on stdin triggers playback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StdinTrigger {
    #[default]
    None,
    Line,
    Char,
}

/// One fully specified beep. Built through [`ToneRequest::builder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneRequest {
    frequency: u32,
    length_ms: u32,
    reps: u32,
    delay_ms: u32,
    end_delay: bool,
    trigger: StdinTrigger,
}

impl ToneRequest {
    pub fn builder() -> ToneRequestBuilder {
        ToneRequestBuilder::default()
    }

    /// Frequency in Hz, already rounded.
    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    pub fn length_ms(&self) -> u32 {
        self.length_ms
    }

    pub fn reps(&self) -> u32 {
        self.reps
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    /// Whether the delay also follows the last repetition.
    pub fn end_delay(&self) -> bool {
        self.end_delay
    }

    pub fn trigger(&self) -> StdinTrigger {
        self.trigger
    }
}

impl Default for ToneRequest {
    fn default() -> Self {
        Self {
            frequency: DEFAULT_FREQUENCY,
            length_ms: DEFAULT_LENGTH_MS,
            reps: DEFAULT_REPS,
            delay_ms: DEFAULT_DELAY_MS,
            end_delay: false,
            trigger: StdinTrigger::None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ToneRequestBuilder {
    frequency: Option<f32>,
    length_ms: Option<u32>,
    reps: Option<u32>,
    delay: Option<(u32, bool)>,
    trigger: StdinTrigger,
}

impl ToneRequestBuilder {
    pub fn frequency(mut self, hz: f32) -> Self {
        self.frequency = Some(hz);
        self
    }

    pub fn length_ms(mut self, ms: u32) -> Self {
        self.length_ms = Some(ms);
        self
    }

    pub fn reps(mut self, reps: u32) -> Self {
        self.reps = Some(reps);
        self
    }

    /// Delay between repetitions; `end_delay` also applies it after the last one.
    pub fn delay_ms(mut self, ms: u32, end_delay: bool) -> Self {
        self.delay = Some((ms, end_delay));
        self
    }

    pub fn trigger(mut self, trigger: StdinTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn build(self) -> Result<ToneRequest, RequestError> {
        let defaults = ToneRequest::default();

        let frequency = match self.frequency {
            Some(hz) => round_frequency(hz)?,
            None => defaults.frequency,
        };
        let length_ms = bounded(self.length_ms, defaults.length_ms, RequestError::Length)?;
        let reps = bounded(self.reps, defaults.reps, RequestError::Reps)?;
        let (delay_ms, end_delay) = match self.delay {
            Some((ms, _)) if ms > MAX_COUNT => return Err(RequestError::Delay(ms)),
            Some(delay) => delay,
            None => (defaults.delay_ms, defaults.end_delay),
        };

        Ok(ToneRequest {
            frequency,
            length_ms,
            reps,
            delay_ms,
            end_delay,
            trigger: self.trigger,
        })
    }
}

/// Validates `hz` and rounds it to the nearest integer.
pub fn round_frequency(hz: f32) -> Result<u32, RequestError> {
    if !(0.0..=MAX_FREQUENCY).contains(&hz) {
        return Err(RequestError::Frequency(hz));
    }
    Ok((hz + 0.5) as u32)
}

fn bounded(
    value: Option<u32>,
    default: u32,
    err: impl FnOnce(u32) -> RequestError,
) -> Result<u32, RequestError> {
    match value {
        Some(v) if v > MAX_COUNT => Err(err(v)),
        Some(v) => Ok(v),
        None => Ok(default),
    }
}

/// Requests played one after another on the same device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestChain {
    requests: Vec<ToneRequest>,
}

impl RequestChain {
    pub fn new(requests: Vec<ToneRequest>) -> Self {
        Self { requests }
    }
}

impl From<Vec<ToneRequest>> for RequestChain {
    fn from(requests: Vec<ToneRequest>) -> Self {
        Self::new(requests)
    }
}

impl IntoIterator for RequestChain {
    type Item = ToneRequest;
    type IntoIter = std::vec::IntoIter<ToneRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.into_iter()
    }
}
