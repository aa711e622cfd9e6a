//! Decode time signals.
//!
//! This crate decodes captured [DCF77] minute frames. The input is a pre-demodulated stream of
//! [`Token`]s, one per received second: either a [`Bit`] or a minute boundary (the missing pulse
//! in second 59). Demodulating the longwave carrier itself is left to whatever produced the
//! capture.
//!
//! The crate is split in two halves:
//! - [`bcd`]: stateless decoding of BCD encoded fields and their parity bits.
//! - [`dcf77`]: the [`Decoder`](dcf77::Decoder) state machine, which assigns meaning to each
//!   second of the minute and emits [`Event`](dcf77::Event)s.
//!
//! Enabling feature `serde` derives `Serialize` for every public type emitted by the decoder.
//!
//! [DCF77]: https://en.wikipedia.org/wiki/DCF77
//!
//! # Examples
//!
//! ```
//! # use signals::{Token, dcf77::{Decoder, Event}};
//! // Sunday, May 26, 2024. 18:58 CEST, packed LSB first (second 0 is bit 0).
//! let packed: u64 = 0x090BE631B120000;
//!
//! let mut decoder = Decoder::new();
//! let mut frames = Vec::new();
//! let tokens = (0..59)
//! 	.map(|i| Token::from_line(if (packed >> i) & 1 > 0 { "1" } else { "0" }))
//! 	.chain([Token::MinuteBoundary]);
//! for token in tokens {
//! 	decoder.push(token, |event| {
//! 		if let Event::Frame(f) = event {
//! 			frames.push(f.to_string());
//! 		}
//! 	});
//! }
//! assert_eq!(frames, ["2024-05-26T18:58+02:00"]);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod bcd;
pub mod dcf77;
mod error;

pub use error::{Error, Result};

/// A single received bit.
///
/// DCF77 bits are binary, but a capture can contain lines that are neither `0` nor `1`. Those are
/// kept as [`Bit::Invalid`] rather than being dropped, so that every line still occupies one
/// second of the minute. Invalid bits never count as set when decoding or checking parity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Bit {
	/// A `0` bit (100ms amplitude reduction).
	#[default]
	Zero,
	/// A `1` bit (200ms amplitude reduction).
	One,
	/// Anything else.
	Invalid
}

impl Bit {
	/// Map a capture character to a bit.
	///
	/// # Examples
	///
	/// ```
	/// # use signals::Bit;
	/// assert_eq!(Bit::from_char('0'), Bit::Zero);
	/// assert_eq!(Bit::from_char('1'), Bit::One);
	/// assert_eq!(Bit::from_char('x'), Bit::Invalid);
	/// ```
	pub fn from_char(c: char) -> Bit {
		match c {
			'0' => Bit::Zero,
			'1' => Bit::One,
			_ => Bit::Invalid
		}
	}

	/// The character echoed for this bit: `0`, `1`, or `?`.
	pub fn as_char(self) -> char {
		match self {
			Bit::Zero => '0',
			Bit::One => '1',
			Bit::Invalid => '?'
		}
	}

	/// The numeric sentinel for this bit: 0, 1, or 2 for [`Bit::Invalid`].
	pub fn value(self) -> u8 {
		match self {
			Bit::Zero => 0,
			Bit::One => 1,
			Bit::Invalid => 2
		}
	}

	/// Whether this bit is [`Bit::One`].
	#[inline(always)]
	pub fn is_set(self) -> bool {
		self == Bit::One
	}
}

impl TryFrom<u8> for Bit {
	type Error = Error;

	/// Convert a numeric sentinel (see [`Bit::value`]) back to a bit.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidBitValue`] for anything greater than 2.
	fn try_from(value: u8) -> Result<Self> {
		match value {
			0 => Ok(Bit::Zero),
			1 => Ok(Bit::One),
			2 => Ok(Bit::Invalid),
			v => Err(Error::InvalidBitValue(v))
		}
	}
}

/// One line of a capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Token {
	/// The missing pulse marking the start of a new minute.
	MinuteBoundary,
	/// The bit received in the current second.
	Bit(Bit)
}

impl Token {
	/// Parse a capture line, with its line terminator already removed.
	///
	/// An empty line is a [`Token::MinuteBoundary`]. Otherwise only the first character counts:
	/// `0` and `1` are bits, anything else is [`Bit::Invalid`].
	///
	/// # Examples
	///
	/// ```
	/// # use signals::{Bit, Token};
	/// assert_eq!(Token::from_line(""), Token::MinuteBoundary);
	/// assert_eq!(Token::from_line("1"), Token::Bit(Bit::One));
	/// assert_eq!(Token::from_line("0 # comment"), Token::Bit(Bit::Zero));
	/// assert_eq!(Token::from_line("?"), Token::Bit(Bit::Invalid));
	/// ```
	pub fn from_line(line: &str) -> Token {
		match line.chars().next() {
			None => Token::MinuteBoundary,
			Some(c) => Token::Bit(Bit::from_char(c))
		}
	}

	/// Whether this token came from a line that is neither empty nor a valid bit.
	#[inline(always)]
	pub fn is_invalid(&self) -> bool {
		*self == Token::Bit(Bit::Invalid)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bit_test() {
		for b in [Bit::Zero, Bit::One, Bit::Invalid] {
			assert_eq!(Bit::try_from(b.value()), Ok(b));
			assert_eq!(Bit::from_char(b.as_char()), b);
		}
		assert_eq!(Bit::try_from(3), Err(Error::InvalidBitValue(3)));
		assert_eq!(Bit::default(), Bit::Zero);
		assert!(Bit::One.is_set());
		assert!(!Bit::Zero.is_set());
		assert!(!Bit::Invalid.is_set());
	}

	#[test]
	fn token_test() {
		assert_eq!(Token::from_line(""), Token::MinuteBoundary);
		assert_eq!(Token::from_line("0"), Token::Bit(Bit::Zero));
		assert_eq!(Token::from_line("1"), Token::Bit(Bit::One));
		assert_eq!(Token::from_line("10"), Token::Bit(Bit::One));
		assert_eq!(Token::from_line(" 1"), Token::Bit(Bit::Invalid));
		assert_eq!(Token::from_line("\r"), Token::Bit(Bit::Invalid));

		assert!(Token::from_line("a").is_invalid());
		assert!(!Token::from_line("").is_invalid());
		assert!(!Token::from_line("0").is_invalid());
	}
}
