//! Support for decoding the DCF77 time signal.
//!
//! See [DCF77 documentation](https://en.wikipedia.org/wiki/DCF77#Time_code_details) for details.
//!
//! Each minute of the signal carries 59 bits, one per second, followed by a missing pulse in
//! second 59 that marks the start of the next minute. [`Decoder`] consumes one [`Token`] per
//! received second and reports what it learns as [`Event`]s:
//!
//! | Second  | Meaning                          | Decoder action                                  |
//! | ------- | -------------------------------- | ----------------------------------------------- |
//! | 0       | Start of minute, always 0        | [`Event::MinuteStarted`], warn if not 0         |
//! | 1-14    | Weather broadcast (encrypted)    | [`Event::Weather`], echoed verbatim             |
//! | 15      | Call bit                         | [`Event::CallBit`]                              |
//! | 16      | Summer time announcement         | [`Event::SummerTimeAnnouncement`] if set        |
//! | 17-18   | CEST / CET in effect             | Stored until the end of the minute              |
//! | 19      | Leap second announcement         | [`Event::LeapSecondAnnouncement`] if set        |
//! | 20      | Start of encoded time, always 1  | Warn if not 1                                   |
//! | 21-27   | Minute (BCD)                     | Stored                                          |
//! | 28      | Minute parity                    | Warn on mismatch                                |
//! | 29-34   | Hour (BCD)                       | Stored                                          |
//! | 35      | Hour parity                      | Warn on mismatch                                |
//! | 36-41   | Day of month (BCD)               | Stored                                          |
//! | 42-44   | Day of week (BCD)                | Stored, [`Event::Weekday`] after second 44      |
//! | 45-49   | Month (BCD)                      | Stored                                          |
//! | 50-57   | Year of century (BCD)            | Stored                                          |
//! | 58      | Date parity (seconds 36-57)      | Warn on mismatch                                |
//! | 59      | Leap second (only when inserted) | [`Event::LeapSecond`]                           |
//! | Missing | Start of the next minute         | [`Event::Frame`], cursor reset to 0             |
//!
//! # Examples
//!
//! ```
//! # use signals::{Bit, Token, dcf77::{Decoder, Event, Warning}};
//! let mut decoder = Decoder::new();
//!
//! // Second 0 must always be 0
//! let events = decoder.feed(Token::Bit(Bit::One));
//! assert_eq!(events, [Event::MinuteStarted, Event::Warning(Warning::StartBitNotZero(Bit::One))]);
//! assert_eq!(decoder.cursor(), Some(1));
//!
//! // A boundary always produces a frame, even from incomplete data
//! let events = decoder.feed(Token::MinuteBoundary);
//! assert!(matches!(events.last(), Some(Event::Frame(_))));
//! assert_eq!(decoder.cursor(), Some(0));
//! ```

use core::fmt;
use chrono::{DateTime, FixedOffset, NaiveDate};
use tracing::{debug, trace};
use crate::bcd::{decode, parity_ok};
use crate::{Bit, Error, Result, Token};

/// Number of second positions in a minute.
pub const SECONDS_PER_MINUTE: u8 = 60;

/// The first two digits of the year are not transmitted.
pub const CENTURY: u16 = 2000;

/// A BCD encoded field within the minute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Field {
	/// Minute, seconds 21-27.
	Minutes,
	/// Hour, seconds 29-34.
	Hours,
	/// Day of month, seconds 36-41.
	Day,
	/// Day of week, seconds 42-44. 1 = Monday, 7 = Sunday.
	Weekday,
	/// Month, seconds 45-49.
	Month,
	/// Year of century, seconds 50-57.
	Year
}

impl Field {
	/// All fields, in transmission order.
	pub const ALL: [Field; 6] = [
		Field::Minutes, Field::Hours, Field::Day, Field::Weekday, Field::Month, Field::Year
	];

	/// The second in which the first (least significant) bit of this field is transmitted.
	pub const fn start(self) -> u8 {
		match self {
			Field::Minutes => 21,
			Field::Hours => 29,
			Field::Day => 36,
			Field::Weekday => 42,
			Field::Month => 45,
			Field::Year => 50
		}
	}

	/// The number of bits in this field.
	pub const fn len(self) -> usize {
		match self {
			Field::Minutes => 7,
			Field::Hours => 6,
			Field::Day => 6,
			Field::Weekday => 3,
			Field::Month => 5,
			Field::Year => 8
		}
	}

	/// Find the field transmitted in `second`, and the bit offset within that field.
	///
	/// # Examples
	/// ```
	/// # use signals::dcf77::Field;
	/// assert_eq!(Field::at(21), Some((Field::Minutes, 0)));
	/// assert_eq!(Field::at(44), Some((Field::Weekday, 2)));
	/// assert_eq!(Field::at(28), None);
	/// ```
	pub fn at(second: u8) -> Option<(Field, usize)> {
		Field::ALL.into_iter()
			.find(|f| second >= f.start() && usize::from(second - f.start()) < f.len())
			.map(|f| (f, usize::from(second - f.start())))
	}
}

/// Number of bits covered by the date parity bit: day, weekday, month, and year.
const DATE_BITS: usize = Field::Day.len() + Field::Weekday.len() + Field::Month.len() + Field::Year.len();

/// A group of bits protected by one parity bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ParityGroup {
	/// Minute, checked in second 28.
	Minutes,
	/// Hour, checked in second 35.
	Hours,
	/// Day, weekday, month, and year, checked in second 58.
	Date
}

/// An anomaly in the received bits. Decoding always continues after a warning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Warning {
	/// Second 0 was not a `0`. The received bit is the payload.
	StartBitNotZero(Bit),
	/// Second 20 was not a `1`. The received bit is the payload.
	TimeMarkerNotOne(Bit),
	/// A parity bit did not match its group. The decoded values are still reported.
	Parity(ParityGroup),
	/// Seconds 17 and 18 were not exactly one of `10` (CEST) or `01` (CET). The UTC offset falls
	/// back to +0.
	InvalidTimezone { tz1: Bit, tz2: Bit },
	/// A bit arrived after second 59 without a minute boundary. It is ignored.
	Overrun { second: u8 }
}

impl Warning {
	/// Human readable description of the warning.
	pub fn message(&self) -> &'static str {
		match self {
			Warning::StartBitNotZero(_) => "First bit is not 0, this should never happen.",
			Warning::TimeMarkerNotOne(_) => "Bit 20 is not 1, this should never happen.",
			Warning::Parity(ParityGroup::Minutes) => "Parity check for the minutes failed.",
			Warning::Parity(ParityGroup::Hours) => "Parity check for the hours failed.",
			Warning::Parity(ParityGroup::Date) => "Parity check for the date failed.",
			Warning::InvalidTimezone { .. } => "Timezone data is invalid.",
			Warning::Overrun { .. } => "More than 60 bits in this minute, ignoring bit."
		}
	}
}

impl fmt::Display for Warning {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.message())
	}
}

/// Everything the decoder reports, in the order it is learned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Event {
	/// Second 0 was received.
	MinuteStarted,
	/// A weather broadcast bit (seconds 1-14). The payload is encrypted and only echoed.
	Weather { second: u8, bit: Bit },
	/// The call bit (second 15), set when the transmitter has an irregularity.
	CallBit(Bit),
	/// Summer time begins or ends at the end of this hour.
	SummerTimeAnnouncement,
	/// A leap second will be inserted at the end of this hour.
	LeapSecondAnnouncement,
	/// The day of week, decoded after second 44. 1 = Monday, 7 = Sunday.
	Weekday(u8),
	/// A bit was received in second 59, i.e. a leap second is being inserted now.
	LeapSecond,
	/// The minute ended and the decoded date and time are available.
	Frame(Frame),
	/// Something was wrong with the received data.
	Warning(Warning)
}

impl Event {
	/// Whether this event is an [`Event::Warning`].
	#[inline(always)]
	pub fn is_warning(&self) -> bool {
		matches!(self, Event::Warning(_))
	}
}

/// The date and time decoded from one minute.
///
/// Values are exactly what was decoded, without validation. Use [`Frame::to_datetime`] to check
/// that they form a real instant.
///
/// # Examples
///
/// ```
/// # use signals::dcf77::Frame;
/// let f = Frame { year: 24, month: 5, day: 26, hour: 18, minute: 58, tz_offset: 2 };
/// assert_eq!(f.to_string(), "2024-05-26T18:58+02:00");
/// assert_eq!(f.unix_timestamp(), Ok(1716742680));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Frame {
	/// Year of century, ranged [0, 99] when valid.
	pub year: u8,
	/// Month, ranged [1, 12] when valid.
	pub month: u8,
	/// Day of month, ranged [1, 31] when valid.
	pub day: u8,
	/// Hour, ranged [0, 23] when valid.
	pub hour: u8,
	/// Minute, ranged [0, 59] when valid.
	pub minute: u8,
	/// UTC offset in hours: 1 (CET), 2 (CEST), or 0 if the timezone bits were invalid.
	pub tz_offset: i8
}

impl Frame {
	/// The absolute Gregorian calendar year, assuming the 21st century.
	#[inline(always)]
	pub fn year(&self) -> u16 {
		CENTURY + u16::from(self.year)
	}

	/// Convert to a calendar date and time with a fixed UTC offset.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidDate`] or [`Error::InvalidTime`] if the decoded values are out of
	/// range, or [`Error::InvalidOffset`] if the offset cannot be represented.
	pub fn to_datetime(&self) -> Result<DateTime<FixedOffset>> {
		let offset = FixedOffset::east_opt(i32::from(self.tz_offset) * 3600)
			.ok_or(Error::InvalidOffset(self.tz_offset))?;
		let date = NaiveDate::from_ymd_opt(i32::from(self.year()), self.month.into(), self.day.into())
			.ok_or(Error::InvalidDate { year: self.year(), month: self.month, day: self.day })?;
		let datetime = date.and_hms_opt(self.hour.into(), self.minute.into(), 0)
			.ok_or(Error::InvalidTime { hour: self.hour, minute: self.minute })?;
		datetime.and_local_timezone(offset)
			.single()
			.ok_or(Error::InvalidOffset(self.tz_offset))
	}

	/// The Unix timestamp of the start of this minute.
	///
	/// # Errors
	///
	/// See [`Frame::to_datetime`].
	pub fn unix_timestamp(&self) -> Result<i64> {
		self.to_datetime().map(|d| d.timestamp())
	}
}

impl fmt::Display for Frame {
	/// Format as `20YY-MM-DDThh:mm+OO:00`.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{:02}-{:02}-{:02}T{:02}:{:02}+{:02}:00",
			CENTURY / 100, self.year, self.month, self.day, self.hour, self.minute, self.tz_offset)
	}
}

/// Resolve the timezone bits into a UTC offset in hours.
///
/// Returns `None` for any combination other than `10` (CEST, +2) and `01` (CET, +1).
#[inline(always)]
fn utc_offset(tz1: Bit, tz2: Bit) -> Option<i8> {
	match (tz1, tz2) {
		(Bit::One, Bit::Zero) => Some(2),
		(Bit::Zero, Bit::One) => Some(1),
		_ => None
	}
}

/// DCF77 minute frame decoder.
///
/// The decoder holds a cursor (the current second within the minute) and a buffer for each
/// [`Field`]. Buffers are only overwritten as their seconds are received and are never cleared,
/// so a frame emitted before a full minute has been received reflects whatever the buffers held
/// before: all zeros for a new decoder, or leftovers from the previous minute.
///
/// # Examples
///
/// ```
/// # use signals::{Token, dcf77::{Decoder, Event, Frame}};
/// let mut decoder = Decoder::new();
/// let mut warnings = 0;
/// let mut frame = None;
/// for token in [Token::MinuteBoundary] {
/// 	decoder.push(token, |e| match e {
/// 		Event::Frame(f) => frame = Some(f),
/// 		Event::Warning(_) => warnings += 1,
/// 		_ => ()
/// 	});
/// }
/// // Timezone bits are both zero in a new decoder
/// assert_eq!(warnings, 1);
/// assert_eq!(frame, Some(Frame::default()));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Decoder {
	/// The second of the next bit, ranged [0, 60]. 60 means the minute has overrun.
	second: u8,
	minutes: [Bit; Field::Minutes.len()],
	hours: [Bit; Field::Hours.len()],
	day: [Bit; Field::Day.len()],
	weekday: [Bit; Field::Weekday.len()],
	month: [Bit; Field::Month.len()],
	year: [Bit; Field::Year.len()],
	/// CEST in effect, second 17.
	tz1: Bit,
	/// CET in effect, second 18.
	tz2: Bit
}

impl Decoder {
	/// Construct a new decoder, positioned at second 0 with all fields zero.
	pub fn new() -> Decoder {
		Decoder::default()
	}

	/// The second the next bit will be assigned to, ranged [0, 59].
	///
	/// Returns `None` if more than 60 bits were received since the last minute boundary.
	pub fn cursor(&self) -> Option<u8> {
		(self.second < SECONDS_PER_MINUTE).then_some(self.second)
	}

	/// The current contents of a field buffer, least significant bit first.
	pub fn field(&self, field: Field) -> &[Bit] {
		match field {
			Field::Minutes => &self.minutes,
			Field::Hours => &self.hours,
			Field::Day => &self.day,
			Field::Weekday => &self.weekday,
			Field::Month => &self.month,
			Field::Year => &self.year
		}
	}

	fn field_mut(&mut self, field: Field) -> &mut [Bit] {
		match field {
			Field::Minutes => &mut self.minutes,
			Field::Hours => &mut self.hours,
			Field::Day => &mut self.day,
			Field::Weekday => &mut self.weekday,
			Field::Month => &mut self.month,
			Field::Year => &mut self.year
		}
	}

	/// Concatenation of the fields covered by the date parity bit.
	fn date_bits(&self) -> [Bit; DATE_BITS] {
		let mut date = [Bit::Zero; DATE_BITS];
		let bits = self.day.iter()
			.chain(self.weekday.iter())
			.chain(self.month.iter())
			.chain(self.year.iter());
		for (d, b) in date.iter_mut().zip(bits) {
			*d = *b;
		}
		date
	}

	/// Decode the buffered fields into a frame. Does not modify the decoder.
	///
	/// Returns the frame and whether the timezone bits were valid.
	pub fn frame(&self) -> (Frame, bool) {
		let offset = utc_offset(self.tz1, self.tz2);
		// Field lengths bound every value to at most 165, so the casts cannot truncate
		let frame = Frame {
			year: decode(&self.year) as u8,
			month: decode(&self.month) as u8,
			day: decode(&self.day) as u8,
			hour: decode(&self.hours) as u8,
			minute: decode(&self.minutes) as u8,
			tz_offset: offset.unwrap_or(0)
		};
		(frame, offset.is_some())
	}

	/// Process one token, passing any resulting events to `emit`.
	///
	/// A [`Token::MinuteBoundary`] emits the decoded [`Frame`] (preceded by a timezone warning if
	/// needed) and resets the cursor to second 0. A [`Token::Bit`] is handled according to the
	/// current second (see the [module](self) documentation) and advances the cursor. No input
	/// is ever fatal.
	pub fn push<F: FnMut(Event)>(&mut self, token: Token, mut emit: F) {
		let bit = match token {
			Token::Bit(b) => b,
			Token::MinuteBoundary => {
				let (frame, tz_valid) = self.frame();
				if !tz_valid {
					emit(Event::Warning(Warning::InvalidTimezone { tz1: self.tz1, tz2: self.tz2 }));
				}
				debug!(%frame, tz_valid, "minute complete");
				emit(Event::Frame(frame));
				self.second = 0;
				return;
			}
		};

		let second = self.second;
		trace!(second, bit = %bit.as_char(), "bit");

		let warn = |w: Warning, emit: &mut F| {
			debug!(second, warning = %w, "warning");
			emit(Event::Warning(w));
		};

		match second {
			0 => {
				emit(Event::MinuteStarted);
				if bit != Bit::Zero {
					warn(Warning::StartBitNotZero(bit), &mut emit);
				}
			},
			1..=14 => emit(Event::Weather { second, bit }),
			15 => emit(Event::CallBit(bit)),
			16 => if bit.is_set() { emit(Event::SummerTimeAnnouncement) },
			17 => self.tz1 = bit,
			18 => self.tz2 = bit,
			19 => if bit.is_set() { emit(Event::LeapSecondAnnouncement) },
			20 => if bit != Bit::One {
				warn(Warning::TimeMarkerNotOne(bit), &mut emit);
			},
			28 => if parity_ok(&self.minutes, bit) {
				warn(Warning::Parity(ParityGroup::Minutes), &mut emit);
			},
			35 => if parity_ok(&self.hours, bit) {
				warn(Warning::Parity(ParityGroup::Hours), &mut emit);
			},
			58 => if parity_ok(&self.date_bits(), bit) {
				warn(Warning::Parity(ParityGroup::Date), &mut emit);
			},
			59 => emit(Event::LeapSecond),
			SECONDS_PER_MINUTE.. => {
				warn(Warning::Overrun { second }, &mut emit);
				return;
			},
			_ => if let Some((field, offset)) = Field::at(second) {
				if let Some(slot) = self.field_mut(field).get_mut(offset) {
					*slot = bit;
				}
				if field == Field::Weekday && offset + 1 == field.len() {
					emit(Event::Weekday(decode(&self.weekday) as u8));
				}
			}
		}

		self.second += 1;
	}

	/// Process one token, collecting the resulting events.
	///
	/// This is a convenience wrapper around [`Decoder::push`].
	pub fn feed(&mut self, token: Token) -> Vec<Event> {
		let mut events = Vec::new();
		self.push(token, |e| events.push(e));
		events
	}
}
