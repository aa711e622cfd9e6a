//! Rendering decoder events.
//!
//! [`Text`] writes the classic human readable report, [`Json`] writes one JSON object per line for
//! further processing.

use std::io::{self, Write};
use serde::Serialize;
use signals::dcf77::Event;

/// Notices from the line source, as opposed to the decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Notice {
	/// Skipping input until the first minute boundary.
	Waiting,
	/// A line that is neither empty nor starts with `0` or `1`.
	InvalidLine { line: usize }
}

/// A destination for notices and events.
pub trait Report {
	/// Write a line source notice.
	fn notice(&mut self, notice: &Notice) -> io::Result<()>;

	/// Write a decoder event.
	fn event(&mut self, event: &Event) -> io::Result<()>;
}

/// Human readable output.
///
/// Weather broadcast bits are echoed on a single line, everything else gets a line of its own.
/// Second 0 of every minute starts with an empty line.
pub struct Text<W>(pub W);

impl<W: Write> Report for Text<W> {
	fn notice(&mut self, notice: &Notice) -> io::Result<()> {
		match notice {
			Notice::Waiting => writeln!(self.0, "Waiting for the beginning of the next minute..."),
			Notice::InvalidLine { .. } => writeln!(self.0, "Warning: Invalid line in input.")
		}
	}

	fn event(&mut self, event: &Event) -> io::Result<()> {
		let w = &mut self.0;
		match event {
			Event::MinuteStarted => writeln!(w),
			Event::Weather { second, bit } => {
				if *second == 1 {
					write!(w, "Weather broadcast data: ")?;
				}
				write!(w, "{}", bit.as_char())?;
				if *second == 14 {
					writeln!(w)?;
				}
				Ok(())
			},
			Event::CallBit(bit) => writeln!(w, "Call bit: {}", bit.as_char()),
			Event::SummerTimeAnnouncement => writeln!(w, "Summer time announcement."),
			Event::LeapSecondAnnouncement => writeln!(w, "Leap second announcement."),
			Event::Weekday(n) => writeln!(w, "Weekday (1 = Monday): {}", n),
			Event::LeapSecond => writeln!(w, "Leap second now."),
			Event::Frame(frame) => writeln!(w, "{}", frame),
			Event::Warning(warning) => writeln!(w, "Warning: {}", warning)
		}
	}
}

/// JSON lines output.
pub struct Json<W>(pub W);

impl<W: Write> Json<W> {
	fn write<T: Serialize>(&mut self, value: &T) -> io::Result<()> {
		serde_json::to_writer(&mut self.0, value)?;
		writeln!(self.0)
	}
}

impl<W: Write> Report for Json<W> {
	fn notice(&mut self, notice: &Notice) -> io::Result<()> {
		self.write(notice)
	}

	fn event(&mut self, event: &Event) -> io::Result<()> {
		self.write(event)
	}
}
