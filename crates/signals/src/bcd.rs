//! BCD field decoding and parity checking.
//!
//! DCF77 transmits every time and date field as binary-coded decimal, least significant bit
//! first: the first four bits of a field are the ones digit (weights 1, 2, 4, 8), the next four
//! bits the tens digit (weights 10, 20, 40, 80), and so on. Fields shorter than 8 bits simply
//! omit the upper weights, e.g. the 6 bit hour field only carries tens weights 10 and 20.
//!
//! See [DCF77 documentation](https://en.wikipedia.org/wiki/DCF77#Time_code_details) for details.

use crate::Bit;

/// Weights for the bits within one BCD digit.
const DIGIT_WEIGHTS: [u32; 4] = [1, 2, 4, 8];

/// The BCD weight of the bit at `index` within a field.
///
/// # Examples
/// ```ignore
/// let weights: Vec<_> = (0..10).map(weight).collect();
/// assert_eq!(weights, [1, 2, 4, 8, 10, 20, 40, 80, 100, 200]);
/// ```
#[inline(always)]
fn weight(index: usize) -> u32 {
	DIGIT_WEIGHTS[index % 4].saturating_mul(10u32.saturating_pow((index / 4) as u32))
}

/// Decode a BCD field into its value.
///
/// Sums the weight of every bit that is [`Bit::One`]. [`Bit::Zero`] and [`Bit::Invalid`] both
/// contribute nothing, so a field containing invalid bits still decodes, just not meaningfully.
/// Fields longer than 36 bits (9 digits) saturate.
///
/// # Examples
///
/// ```
/// # use signals::{Bit, bcd::decode};
/// use Bit::*;
/// // Minute 58 as transmitted in seconds 21-27
/// assert_eq!(decode(&[Zero, Zero, Zero, One, One, Zero, One]), 58);
/// assert_eq!(decode(&[One, Invalid, Zero]), 1);
/// ```
pub fn decode(field: &[Bit]) -> u32 {
	field.iter()
		.enumerate()
		.filter(|(_, b)| b.is_set())
		.fold(0, |acc, (i, _)| acc.saturating_add(weight(i)))
}

/// Check a field against its transmitted parity bit.
///
/// **Returns `true` when the check fails**, i.e. when a warning should be reported. DCF77 uses
/// even parity: the parity bit is set when the field contains an odd number of set bits, so the
/// check fails when `popcount(field) % 2` differs from `parity`. [`Bit::Invalid`] bits in the field
/// count as unset. A [`Bit::Invalid`] parity bit is treated the same as [`Bit::Zero`].
///
/// | `parity`            | popcount even | popcount odd |
/// | ------------------- | ------------- | ------------ |
/// | `Zero` / `Invalid`  | `false`       | `true`       |
/// | `One`               | `true`        | `false`      |
///
/// # Examples
///
/// ```
/// # use signals::{Bit, bcd::parity_ok};
/// use Bit::*;
/// assert_eq!(parity_ok(&[One, Zero, One], Zero), false);
/// assert_eq!(parity_ok(&[One, Zero, One], One), true);
/// assert_eq!(parity_ok(&[One, Zero, Zero], One), false);
/// ```
pub fn parity_ok(field: &[Bit], parity: Bit) -> bool {
	let odd = field.iter().filter(|b| b.is_set()).count() % 2 == 1;
	match parity {
		Bit::One => !odd,
		Bit::Zero | Bit::Invalid => odd
	}
}
