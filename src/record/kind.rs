use std::fmt;
use std::str::FromStr;

use crate::record::{RecordError, Result};

/// Interpretation of the bytes stored in a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
	/// Opaque bytes; width shared by all elements of the value.
	Bytes,
	/// UTF-8 text; width is the byte length of each element.
	Text,
	/// Big-endian `i64`.
	Signed,
	/// Big-endian `u64`.
	Unsigned,
	/// Big-endian IEEE-754 `f64`.
	Decimal,
	/// Big-endian `i64` with 24 fractional bits.
	Fixed,
	/// One byte, zero is false.
	Bool,
	/// Encoded nested array.
	Array,
}

impl ValueKind {
	/// Every kind, in wire-id order.
	pub const ALL: [ValueKind; 8] = [
		Self::Bytes,
		Self::Text,
		Self::Signed,
		Self::Unsigned,
		Self::Decimal,
		Self::Fixed,
		Self::Bool,
		Self::Array,
	];

	/// Width of one element for fixed-width kinds, `None` when derived from data.
	pub fn fixed_width(self) -> Option<usize> {
		match self {
			Self::Signed | Self::Unsigned | Self::Decimal | Self::Fixed => Some(8),
			Self::Bool => Some(1),
			Self::Bytes | Self::Text | Self::Array => None,
		}
	}

	/// True when element width comes from the stored data.
	pub fn is_variable(self) -> bool {
		self.fixed_width().is_none()
	}

	/// Render kind as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Bytes => "bytes",
			Self::Text => "text",
			Self::Signed => "signed",
			Self::Unsigned => "unsigned",
			Self::Decimal => "decimal",
			Self::Fixed => "fixed",
			Self::Bool => "bool",
			Self::Array => "array",
		}
	}

	/// Stable one-byte identifier used by the frame codec.
	pub fn wire_id(self) -> u8 {
		match self {
			Self::Bytes => 1,
			Self::Text => 2,
			Self::Signed => 3,
			Self::Unsigned => 4,
			Self::Decimal => 5,
			Self::Fixed => 6,
			Self::Bool => 7,
			Self::Array => 8,
		}
	}

	/// Map a frame codec identifier back to a kind.
	pub fn from_wire_id(id: u8) -> Result<Self> {
		Self::ALL
			.into_iter()
			.find(|kind| kind.wire_id() == id)
			.ok_or(RecordError::UnknownId { what: "value kind", id })
	}
}

impl fmt::Display for ValueKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ValueKind {
	type Err = RecordError;

	fn from_str(label: &str) -> Result<Self> {
		match label {
			"bytes" | "blob" => Ok(Self::Bytes),
			"text" | "str" => Ok(Self::Text),
			"signed" | "i64" => Ok(Self::Signed),
			"unsigned" | "u64" => Ok(Self::Unsigned),
			"decimal" | "f64" => Ok(Self::Decimal),
			"fixed" | "fixp" => Ok(Self::Fixed),
			"bool" => Ok(Self::Bool),
			"array" => Ok(Self::Array),
			_ => Err(RecordError::InvalidValueSpec { spec: label.to_owned() }),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::ValueKind;

	#[test]
	fn wire_ids_round_trip_for_every_kind() {
		for kind in ValueKind::ALL {
			assert_eq!(ValueKind::from_wire_id(kind.wire_id()).expect("known id"), kind);
		}
		assert!(ValueKind::from_wire_id(0).is_err());
	}

	#[test]
	fn labels_parse_including_short_aliases() {
		assert_eq!("str".parse::<ValueKind>().expect("alias"), ValueKind::Text);
		assert_eq!("fixp".parse::<ValueKind>().expect("alias"), ValueKind::Fixed);
		for kind in ValueKind::ALL {
			assert_eq!(kind.as_str().parse::<ValueKind>().expect("label"), kind);
		}
	}
}
