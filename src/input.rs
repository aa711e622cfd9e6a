//! Reading captures line by line.
//!
//! A capture has one line per received second: an empty line for the missing pulse at the start
//! of a minute, or a line starting with `0` or `1` for a bit. Both `\n` and `\r\n` line endings are
//! accepted. Lines are read as bytes, so a capture with stray non-UTF-8 data still decodes (those
//! lines become invalid bits).

use std::io::{self, BufRead};
use tracing::trace;
use signals::Token;

/// Reads [`Token`]s from a capture, one per line.
pub struct LineSource<R> {
	reader: R,
	buf: Vec<u8>,
	/// Number of lines read so far.
	line: usize
}

impl<R: BufRead> LineSource<R> {
	/// Wrap a reader.
	pub fn new(reader: R) -> LineSource<R> {
		LineSource {
			reader,
			buf: Vec::with_capacity(8),
			line: 0
		}
	}

	/// The 1-indexed number of the last line read, or 0 if nothing was read yet.
	pub fn line(&self) -> usize {
		self.line
	}

	/// Read the next line as a token.
	///
	/// Returns `Ok(None)` at the end of input.
	///
	/// # Errors
	///
	/// Returns any I/O error from the underlying reader.
	pub fn next_token(&mut self) -> io::Result<Option<Token>> {
		self.buf.clear();
		if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
			return Ok(None);
		}
		self.line += 1;

		let line = self.buf.as_slice();
		let line = line.strip_suffix(b"\n").unwrap_or(line);
		let line = line.strip_suffix(b"\r").unwrap_or(line);
		Ok(Some(Token::from_line(&String::from_utf8_lossy(line))))
	}

	/// Skip lines up to and including the next minute boundary.
	///
	/// Returns `false` if the input ended first.
	///
	/// # Errors
	///
	/// Returns any I/O error from the underlying reader.
	pub fn synchronize(&mut self) -> io::Result<bool> {
		while let Some(token) = self.next_token()? {
			if token == Token::MinuteBoundary {
				trace!(line = self.line, "synchronized");
				return Ok(true);
			}
		}
		Ok(false)
	}
}
