//! Support for command line argument parsing.
//!
//! See [crate] documentation for details on command line arguments and examples.

use std::path::PathBuf;
use clap::{Parser, ValueEnum};

/// Output format for decoded events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
	/// Human readable report, one line per notice.
	#[default]
	Text,
	/// One JSON object per event.
	Json
}

/// Where to read the capture from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
	/// Standard input, selected with `-`.
	Stdin,
	/// A capture file.
	File(PathBuf)
}

/// Parsed command line arguments.
#[derive(Parser, Debug)]
#[command(version, about = "Decode DCF77 time signal data captured to a file")]
pub struct Arguments {
	/// Capture file to decode, or "-" to read standard input.
	pub datafile: Option<PathBuf>,

	/// Output format.
	#[arg(short, long, value_enum, default_value_t = Format::Text)]
	pub format: Format,

	/// Decode from the first line instead of waiting for the first minute boundary.
	#[arg(long)]
	pub no_sync: bool
}

impl Arguments {
	/// The input to decode, or `None` if no datafile was given.
	///
	/// # Examples
	///
	/// ```ignore
	/// let args = Arguments::try_parse_from(["dcf77decode", "-"]).unwrap();
	/// assert_eq!(args.input(), Some(Input::Stdin));
	/// ```
	pub fn input(&self) -> Option<Input> {
		self.datafile.as_ref().map(|p| {
			if p.as_os_str() == "-" {
				Input::Stdin
			} else {
				Input::File(p.clone())
			}
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(args: &[&str]) -> Result<Arguments, clap::Error> {
		Arguments::try_parse_from(std::iter::once("dcf77decode").chain(args.iter().copied()))
	}

	#[test]
	fn input_test() {
		let args = parse(&[]).unwrap();
		assert_eq!(args.input(), None);

		let args = parse(&["-"]).unwrap();
		assert_eq!(args.input(), Some(Input::Stdin));

		let args = parse(&["capture.txt"]).unwrap();
		assert_eq!(args.input(), Some(Input::File(PathBuf::from("capture.txt"))));
	}

	#[test]
	fn arguments_parse_test() {
		let args = parse(&["capture.txt"]).unwrap();
		assert_eq!(args.format, Format::Text);
		assert!(!args.no_sync);

		let args = parse(&["-f", "json", "--no-sync", "-"]).unwrap();
		assert_eq!(args.format, Format::Json);
		assert!(args.no_sync);
		assert_eq!(args.input(), Some(Input::Stdin));

		let args = parse(&["--format", "text", "capture.txt"]).unwrap();
		assert_eq!(args.format, Format::Text);

		assert!(parse(&["--format", "xml", "capture.txt"]).is_err());
		assert!(parse(&["--count", "5", "capture.txt"]).is_err());
		assert!(parse(&["a.txt", "b.txt"]).is_err());
	}
}
