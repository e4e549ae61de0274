//! Command line configuration.
//!
//! `-n`/`--new` splits the command line into one segment per tone. Each
//! segment is parsed on its own; the device path and verbosity are gathered
//! across all of them.

use std::ffi::OsString;
use std::iter;
use std::path::PathBuf;

use beep_core::request::{self, MAX_COUNT};
use beep_core::{RequestChain, RequestError, StdinTrigger, ToneRequest};
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command, CommandFactory, FromArgMatches, Parser};

const MAX_COUNT_I64: i64 = MAX_COUNT as i64;

#[derive(Parser, Debug)]
#[command(
    name = "beep",
    version,
    about = "Beep the PC speaker any number of ways",
    disable_version_flag = true,
    after_help = "Use -n/--new to start another tone; options after it apply to the new tone."
)]
struct ToneArgs {
    /// Frequency in Hz (0 to 20000)
    #[arg(short = 'f', value_name = "FREQ", allow_negative_numbers = true, value_parser = parse_frequency)]
    frequency: Vec<f32>,

    /// Length of the tone in milliseconds
    #[arg(short = 'l', value_name = "LEN", overrides_with = "length",
          value_parser = clap::value_parser!(u32).range(..=MAX_COUNT_I64))]
    length: Option<u32>,

    /// Number of repetitions
    #[arg(short = 'r', value_name = "REPS", overrides_with = "reps",
          value_parser = clap::value_parser!(u32).range(..=MAX_COUNT_I64))]
    reps: Option<u32>,

    /// Delay between repetitions in milliseconds
    #[arg(short = 'd', value_name = "DELAY", overrides_with_all = ["delay", "end_delay"],
          value_parser = clap::value_parser!(u32).range(..=MAX_COUNT_I64))]
    delay: Option<u32>,

    /// Delay after every repetition, including the last, in milliseconds
    #[arg(short = 'D', value_name = "DELAY", overrides_with_all = ["delay", "end_delay"],
          value_parser = clap::value_parser!(u32).range(..=MAX_COUNT_I64))]
    end_delay: Option<u32>,

    /// Beep once per line of stdin, echoing it to stdout
    #[arg(short = 's', overrides_with_all = ["line", "char"])]
    line: bool,

    /// Beep once per character of stdin, echoing it to stdout
    #[arg(short = 'c', overrides_with_all = ["line", "char"])]
    char: bool,

    /// Start a new tone
    #[arg(short = 'n', long = "new")]
    new: bool,

    /// Device to beep on instead of probing for one
    #[arg(short = 'e', long = "device", value_name = "PATH")]
    device: Vec<PathBuf>,

    /// Log more; may be repeated
    #[arg(long = "verbose", visible_alias = "debug", action = ArgAction::Count)]
    verbose: u8,
}

impl ToneArgs {
    fn request(&self) -> Result<ToneRequest, RequestError> {
        let mut builder = ToneRequest::builder();
        if let Some(&hz) = self.frequency.last() {
            builder = builder.frequency(hz);
        }
        if let Some(ms) = self.length {
            builder = builder.length_ms(ms);
        }
        if let Some(reps) = self.reps {
            builder = builder.reps(reps);
        }
        if let Some(ms) = self.delay {
            builder = builder.delay_ms(ms, false);
        } else if let Some(ms) = self.end_delay {
            builder = builder.delay_ms(ms, true);
        }
        let trigger = if self.char {
            StdinTrigger::Char
        } else if self.line {
            StdinTrigger::Line
        } else {
            StdinTrigger::None
        };
        builder.trigger(trigger).build()
    }
}

fn parse_frequency(s: &str) -> Result<f32, String> {
    let hz: f32 = s.parse().map_err(|e| format!("{e}"))?;
    request::round_frequency(hz).map_err(|e| e.to_string())?;
    Ok(hz)
}

fn command() -> Command {
    ToneArgs::command().arg(
        Arg::new("version")
            .short('v')
            .short_alias('V')
            .long("version")
            .action(ArgAction::Version)
            .help("Print version"),
    )
}

#[derive(Debug)]
pub struct Invocation {
    pub chain: RequestChain,
    pub device: Option<PathBuf>,
    pub verbosity: u8,
}

pub fn parse<I, T>(args: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let program = args.next().unwrap_or_else(|| OsString::from("beep"));

    let mut segments = vec![Vec::new()];
    for arg in args {
        if arg == "-n" || arg == "--new" {
            segments.push(Vec::new());
        } else if let Some(segment) = segments.last_mut() {
            segment.push(arg);
        }
    }

    let mut cmd = command();
    let mut requests = Vec::with_capacity(segments.len());
    let mut device = None;
    let mut verbosity = 0u8;

    for segment in segments {
        let matches = cmd.try_get_matches_from_mut(iter::once(program.clone()).chain(segment))?;
        let tone = ToneArgs::from_arg_matches(&matches)?;

        if tone.new {
            return Err(cmd.error(
                ErrorKind::ArgumentConflict,
                "-n/--new must be given as a separate argument",
            ));
        }
        if tone.frequency.len() > 1 {
            log::warn!("multiple -f values given, only last one is used.");
        }
        for path in &tone.device {
            if device.replace(path.clone()).is_some() {
                return Err(cmd.error(
                    ErrorKind::ArgumentConflict,
                    "You cannot give the --device parameter more than once.",
                ));
            }
        }
        verbosity = verbosity.saturating_add(tone.verbose);

        let request = tone
            .request()
            .map_err(|e| cmd.error(ErrorKind::ValueValidation, e))?;
        requests.push(request);
    }

    Ok(Invocation {
        chain: RequestChain::new(requests),
        device,
        verbosity,
    })
}
