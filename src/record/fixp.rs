use std::fmt;

use crate::record::{RecordError, Result};

/// Number of fractional bits in a [`Fixp`].
pub const FIXP_FRACTION_BITS: u32 = 24;

const FIXP_ONE: f64 = (1_u64 << FIXP_FRACTION_BITS) as f64;

/// Signed 64-bit fixed-point number with 24 fractional bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fixp(i64);

impl Fixp {
	/// Wrap a raw fixed-point representation.
	pub const fn from_raw(raw: i64) -> Self {
		Self(raw)
	}

	/// Raw fixed-point representation.
	pub const fn raw(self) -> i64 {
		self.0
	}

	/// Convert an integer, failing when the integer part overflows.
	pub fn from_int(value: i64) -> Result<Self> {
		value
			.checked_mul(1_i64 << FIXP_FRACTION_BITS)
			.map(Self)
			.ok_or_else(|| RecordError::NumericRange {
				value: value.to_string(),
				kind: "fixed",
			})
	}

	/// Convert a float, rounding to the nearest representable step.
	pub fn from_f64(value: f64) -> Result<Self> {
		let scaled = (value * FIXP_ONE).round();
		if !scaled.is_finite() || scaled < i64::MIN as f64 || scaled >= i64::MAX as f64 {
			return Err(RecordError::NumericRange {
				value: value.to_string(),
				kind: "fixed",
			});
		}
		Ok(Self(scaled as i64))
	}

	/// Nearest `f64` value.
	pub fn to_f64(self) -> f64 {
		self.0 as f64 / FIXP_ONE
	}
}

impl fmt::Display for Fixp {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.to_f64())
	}
}
