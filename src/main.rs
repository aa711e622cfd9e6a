//! Decode the [DCF77] time signal from a textual capture.
//!
//! Receiving hardware differs too much to read the signal directly, so this program decodes a
//! capture file instead. The capture has one line per second of received signal:
//!
//! | Line          | Meaning                                  |
//! | ------------- | ---------------------------------------- |
//! | empty         | Missing pulse, the start of a new minute |
//! | `0`           | Bit 0 (100 ms pulse)                     |
//! | `1`           | Bit 1 (200 ms pulse)                     |
//! | anything else | Garbage, decoded as an invalid bit       |
//!
//! Every decoded minute is printed as an ISO 8601 timestamp with its UTC offset, along with the
//! weather broadcast bits, announcements and warnings about inconsistent data.
//!
//! [DCF77]: https://en.wikipedia.org/wiki/DCF77
//!
//! # Command Line Arguments
//!
//! General form: `dcf77decode [options...] datafile`
//!
//! | Short form | Long form   | Argument       | Default | Description                              |
//! | ---------- | ----------- | -------------- | ------- | ---------------------------------------- |
//! | `-f`       | `--format`  | `text`, `json` | `text`  | Output format                            |
//! |            | `--no-sync` |                | Off     | Decode from the first line of the input  |
//!
//! If `-` is given as the datafile, the capture is read from standard input. Without a datafile, a
//! short usage text is printed.
//!
//! By default, everything up to the first minute boundary is skipped so that the first decoded
//! frame comes from a complete minute. With `--no-sync`, decoding starts at the first line and the
//! first frame may be incomplete.
//!
//! Diagnostic logging goes to stderr and is configured with the `DCF77_LOG` environment variable,
//! using [`EnvFilter`] syntax. The default level is `warn`.
//!
//! # Examples
//!
//! Decode a capture file
//! ```sh
//! dcf77decode capture.txt
//! ```
//!
//! Decode from a receiver script as JSON, with debug logging
//! ```sh
//! receiver | DCF77_LOG=debug dcf77decode -f json -
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::process::ExitCode;
use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use args::{Arguments, Format, Input};
use input::LineSource;
use output::{Json, Report, Text};

mod args;
mod decode;
mod input;
mod output;

const USAGE: &str = "\
This program decodes the data coming from the DCF77 time signal station.
Due to the differences in receiving hardware, the data is read from a file.
If \"-\" is specified as the datafile, input is read from stdin.

The datafile is expected to be in the following format:
Empty line (\"\\n\") = Missing pulse at the start of a minute
Line only with a 1 (\"1\\n\") = Bit 1
Line only with a 0 (\"0\\n\") = Bit 0

Options:
  -f, --format <FORMAT>  output format, text or json, default text
  --no-sync              decode from the first line instead of the first minute boundary
  -h, --help             print detailed help
  -V, --version          print version";

/// Decode the capture from `input`, writing the report to stdout.
///
/// # Errors
///
/// Fails if the capture cannot be opened or read, or stdout cannot be written.
fn decode(input: Input, format: Format, sync: bool) -> Result<()> {
	let reader: Box<dyn BufRead> = match input {
		Input::Stdin => Box::new(io::stdin().lock()),
		Input::File(path) => {
			let file = File::open(&path)
				.with_context(|| format!("Could not open file {}", path.display()))?;
			debug!(path = %path.display(), "reading capture");
			Box::new(BufReader::new(file))
		}
	};

	let stdout = io::stdout().lock();
	let mut report: Box<dyn Report> = match format {
		Format::Text => Box::new(Text(stdout)),
		Format::Json => Box::new(Json(stdout))
	};

	decode::run(&mut LineSource::new(reader), report.as_mut(), sync)
		.context("Failed to decode capture")?;
	Ok(())
}

/// Main program entry point.
///
/// Parses input arguments and decodes the capture. See [`crate`] documentation for details.
fn main() -> ExitCode {
	let args = Arguments::parse();
	tracing_subscriber::fmt()
		.with_target(false)
		.with_writer(io::stderr)
		.with_ansi(false)
		.without_time()
		.with_env_filter(
			EnvFilter::try_from_env("DCF77_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
		)
		.init();

	debug!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

	let Some(input) = args.input() else {
		println!("Usage: {} [OPTIONS] [DATAFILE]\n\n{}", env!("CARGO_PKG_NAME"), USAGE);
		return ExitCode::SUCCESS;
	};

	decode(input, args.format, !args.no_sync)
		.inspect_err(|e| eprintln!("{:#}", e))
		.map(|()| ExitCode::SUCCESS)
		.unwrap_or(ExitCode::FAILURE)
}
