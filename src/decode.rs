//! Feeding a capture through the decoder.

use std::io::{self, BufRead};
use tracing::{debug, info};
use signals::dcf77::{Decoder, Event};
use crate::input::LineSource;
use crate::output::{Notice, Report};

/// Counts of what was decoded, for logging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
	/// Lines consumed, including those skipped while synchronizing.
	pub lines: usize,
	/// Minute frames emitted.
	pub frames: usize,
	/// Decoder warnings and invalid lines.
	pub warnings: usize
}

/// Decode a whole capture, writing everything to `report`.
///
/// If `sync` is set, lines up to and including the first minute boundary are skipped so that the
/// first frame comes from a complete minute. Decoding stops at the end of input.
///
/// # Errors
///
/// Returns any I/O error from reading the capture or writing the report. Malformed input is never
/// an error.
pub fn run<R: BufRead>(source: &mut LineSource<R>, report: &mut dyn Report, sync: bool)
	-> io::Result<Summary>
{
	let mut summary = Summary::default();

	if sync {
		report.notice(&Notice::Waiting)?;
		if !source.synchronize()? {
			debug!(lines = source.line(), "no minute boundary before end of input");
			summary.lines = source.line();
			return Ok(summary);
		}
	}

	let mut decoder = Decoder::new();
	while let Some(token) = source.next_token()? {
		if token.is_invalid() {
			debug!(line = source.line(), "invalid line in input");
			summary.warnings += 1;
			report.notice(&Notice::InvalidLine { line: source.line() })?;
		}

		let mut written = Ok(());
		decoder.push(token, |event| {
			match event {
				Event::Frame(_) => summary.frames += 1,
				Event::Warning(_) => summary.warnings += 1,
				_ => ()
			}
			if written.is_ok() {
				written = report.event(&event);
			}
		});
		written?;
	}

	summary.lines = source.line();
	info!(lines = summary.lines, frames = summary.frames, warnings = summary.warnings, "end of input");
	Ok(summary)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::output::{Json, Text};

	/// Sunday, May 26, 2024. 18:58 CEST.
	const MAY_2024: u64 = 0x090BE631B120000;

	/// A capture of one full minute, without the boundary that ends it.
	fn minute(packed: u64) -> String {
		(0..59).map(|i| if (packed >> i) & 1 > 0 { "1\n" } else { "0\n" }).collect()
	}

	fn decode_text(capture: &str, sync: bool) -> (String, Summary) {
		let mut source = LineSource::new(capture.as_bytes());
		let mut report = Text(Vec::new());
		let summary = run(&mut source, &mut report, sync).unwrap();
		(String::from_utf8(report.0).unwrap(), summary)
	}

	const MAY_2024_REPORT: &str = "
Weather broadcast data: 00000000000000
Call bit: 0
Weekday (1 = Monday): 7
2024-05-26T18:58+02:00
";

	#[test]
	fn run_test() {
		// Second 0 of a minute, then a full minute
		let capture = format!("0\n\n{}\n", minute(MAY_2024));
		let (out, summary) = decode_text(&capture, true);
		assert_eq!(out, format!("Waiting for the beginning of the next minute...\n{}", MAY_2024_REPORT));
		assert_eq!(summary, Summary { lines: 62, frames: 1, warnings: 0 });

		// Without synchronizing, the first boundary emits a frame from an incomplete minute
		let (out, summary) = decode_text(&capture, false);
		assert!(out.starts_with("\nWarning: Timezone data is invalid.\n2000-00-00T00:00+00:00\n"));
		assert!(out.ends_with(MAY_2024_REPORT));
		assert_eq!(summary, Summary { lines: 62, frames: 2, warnings: 1 });
	}

	#[test]
	fn invalid_line_test() {
		// Second 3 is garbage, but still occupies its second
		let mut capture = minute(MAY_2024);
		capture.replace_range(6..7, "x");
		let (out, summary) = decode_text(&format!("\n{}\n", capture), true);
		assert_eq!(out, "\
Waiting for the beginning of the next minute...

Weather broadcast data: 00Warning: Invalid line in input.
?00000000000
Call bit: 0
Weekday (1 = Monday): 7
2024-05-26T18:58+02:00
");
		assert_eq!(summary.warnings, 1);
	}

	#[test]
	fn no_boundary_test() {
		let (out, summary) = decode_text("0\n1\n", true);
		assert_eq!(out, "Waiting for the beginning of the next minute...\n");
		assert_eq!(summary, Summary { lines: 2, frames: 0, warnings: 0 });

		let (out, summary) = decode_text("", false);
		assert_eq!(out, "");
		assert_eq!(summary, Summary::default());
	}

	#[test]
	fn json_test() {
		let capture = format!("\n{}\n", minute(MAY_2024));
		let mut source = LineSource::new(capture.as_bytes());
		let mut report = Json(Vec::new());
		let summary = run(&mut source, &mut report, true).unwrap();
		assert_eq!(summary.frames, 1);

		let out = String::from_utf8(report.0).unwrap();
		let lines: Vec<_> = out.lines().collect();
		// Waiting notice, second 0, 14 weather bits, call bit, weekday, frame
		assert_eq!(lines.len(), 19);
		assert_eq!(lines[0], "\"Waiting\"");
		assert_eq!(lines[1], "\"MinuteStarted\"");
		assert_eq!(lines[18], "{\"Frame\":{\"year\":24,\"month\":5,\"day\":26,\"hour\":18,\"minute\":58,\"tz_offset\":2}}");
	}
}
