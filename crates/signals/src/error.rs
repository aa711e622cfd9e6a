//! Error types used across modules.
//!
//! Decoding a capture never fails: anomalies in the received bits are reported as
//! [`Warning`](crate::dcf77::Warning) events. These errors only arise when converting values out
//! of the decoder's types.

/// The error type for this crate.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
	/// A numeric bit sentinel outside of 0, 1, 2.
	#[error("Invalid bit value: {0}")]
	InvalidBitValue(u8),

	/// The decoded year, month, and day are not a calendar date.
	#[error("Invalid date: {year:04}-{month:02}-{day:02}")]
	InvalidDate { year: u16, month: u8, day: u8 },

	/// The decoded hour and minute are not a time of day.
	#[error("Invalid time: {hour:02}:{minute:02}")]
	InvalidTime { hour: u8, minute: u8 },

	/// The UTC offset (in hours) is out of range.
	#[error("Invalid UTC offset: {0} hours")]
	InvalidOffset(i8),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
