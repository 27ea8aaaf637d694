use crate::record::wire::{WireLimits, decode_array, encode_array};
use crate::record::{Array, Charset, Fixp, RecordError, Result, ValueKind};

/// One decoded element of a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
	/// Opaque bytes.
	Bytes(Vec<u8>),
	/// Decoded text.
	Text(String),
	/// Signed integer.
	Signed(i64),
	/// Unsigned integer.
	Unsigned(u64),
	/// Floating-point number.
	Decimal(f64),
	/// Fixed-point number.
	Fixed(Fixp),
	/// Boolean flag.
	Bool(bool),
	/// Nested array.
	Array(Array),
}

impl Element {
	/// Natural kind of this element.
	pub fn kind(&self) -> ValueKind {
		match self {
			Self::Bytes(_) => ValueKind::Bytes,
			Self::Text(_) => ValueKind::Text,
			Self::Signed(_) => ValueKind::Signed,
			Self::Unsigned(_) => ValueKind::Unsigned,
			Self::Decimal(_) => ValueKind::Decimal,
			Self::Fixed(_) => ValueKind::Fixed,
			Self::Bool(_) => ValueKind::Bool,
			Self::Array(_) => ValueKind::Array,
		}
	}

	/// Encode to the stored byte layout of [`Element::kind`].
	pub fn to_bytes(&self) -> Result<Vec<u8>> {
		Ok(match self {
			Self::Bytes(bytes) => bytes.clone(),
			Self::Text(text) => text.as_bytes().to_vec(),
			Self::Signed(value) => value.to_be_bytes().to_vec(),
			Self::Unsigned(value) => value.to_be_bytes().to_vec(),
			Self::Decimal(value) => value.to_be_bytes().to_vec(),
			Self::Fixed(value) => value.raw().to_be_bytes().to_vec(),
			Self::Bool(value) => vec![u8::from(*value)],
			Self::Array(array) => encode_array(array)?,
		})
	}

	/// Decode one stored element of `kind`.
	pub fn from_bytes(kind: ValueKind, bytes: &[u8]) -> Result<Self> {
		if let Some(width) = kind.fixed_width() {
			if bytes.len() != width {
				return Err(RecordError::SizeMismatch {
					kind: kind.as_str(),
					byte_len: bytes.len(),
					width,
				});
			}
		}

		Ok(match kind {
			ValueKind::Bytes => Self::Bytes(bytes.to_vec()),
			ValueKind::Text => Self::Text(Charset::Utf8.decode(bytes)?),
			ValueKind::Signed => Self::Signed(i64::from_be_bytes(word(bytes))),
			ValueKind::Unsigned => Self::Unsigned(u64::from_be_bytes(word(bytes))),
			ValueKind::Decimal => Self::Decimal(f64::from_be_bytes(word(bytes))),
			ValueKind::Fixed => Self::Fixed(Fixp::from_raw(i64::from_be_bytes(word(bytes)))),
			ValueKind::Bool => Self::Bool(bytes[0] != 0),
			ValueKind::Array => Self::Array(decode_array(bytes, &WireLimits::default())?),
		})
	}

	/// Convert to `kind`, parsing text and range-checking numbers.
	pub fn coerce_to(self, kind: ValueKind) -> Result<Self> {
		if self.kind() == kind {
			return Ok(self);
		}

		let from = self.kind();
		let mismatch = RecordError::TypeMismatch {
			from: from.as_str(),
			to: kind.as_str(),
		};

		match (self, kind) {
			(Self::Text(text), ValueKind::Bytes) => Ok(Self::Bytes(text.into_bytes())),
			(Self::Bytes(bytes), ValueKind::Text) => Ok(Self::Text(Charset::Utf8.decode(&bytes)?)),
			(Self::Text(text), kind) => parse_text(&text, kind),
			(Self::Signed(value), ValueKind::Unsigned) => u64::try_from(value).map(Self::Unsigned).map_err(|_| out_of_range(value, kind)),
			(Self::Unsigned(value), ValueKind::Signed) => i64::try_from(value).map(Self::Signed).map_err(|_| out_of_range(value, kind)),
			(Self::Signed(value), ValueKind::Decimal) => Ok(Self::Decimal(value as f64)),
			(Self::Unsigned(value), ValueKind::Decimal) => Ok(Self::Decimal(value as f64)),
			(Self::Signed(value), ValueKind::Fixed) => Ok(Self::Fixed(Fixp::from_int(value)?)),
			(Self::Unsigned(value), ValueKind::Fixed) => {
				let value = i64::try_from(value).map_err(|_| out_of_range(value, kind))?;
				Ok(Self::Fixed(Fixp::from_int(value)?))
			}
			(Self::Decimal(value), ValueKind::Fixed) => Ok(Self::Fixed(Fixp::from_f64(value)?)),
			(Self::Fixed(value), ValueKind::Decimal) => Ok(Self::Decimal(value.to_f64())),
			(Self::Bool(value), ValueKind::Signed) => Ok(Self::Signed(i64::from(value))),
			(Self::Bool(value), ValueKind::Unsigned) => Ok(Self::Unsigned(u64::from(value))),
			_ => Err(mismatch),
		}
	}

	/// Decode raw-bytes or text content from `charset` into a string.
	pub fn decode(&self, charset: Charset) -> Result<String> {
		match self {
			Self::Bytes(bytes) => charset.decode(bytes),
			Self::Text(text) => charset.decode(text.as_bytes()),
			other => Err(RecordError::TypeMismatch {
				from: other.kind().as_str(),
				to: "text",
			}),
		}
	}

	/// Encode text content into `charset` bytes.
	pub fn encode(&self, charset: Charset) -> Result<Vec<u8>> {
		match self {
			Self::Text(text) => charset.encode(text),
			other => Err(RecordError::TypeMismatch {
				from: other.kind().as_str(),
				to: "bytes",
			}),
		}
	}

	/// Text content, if this is a text element.
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(text) => Some(text),
			_ => None,
		}
	}

	/// Byte content, if this is a raw-bytes element.
	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			Self::Bytes(bytes) => Some(bytes),
			_ => None,
		}
	}

	/// Integer content widened to `i64`, if representable.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::Signed(value) => Some(*value),
			Self::Unsigned(value) => i64::try_from(*value).ok(),
			_ => None,
		}
	}
}

fn word(bytes: &[u8]) -> [u8; 8] {
	let mut out = [0_u8; 8];
	out.copy_from_slice(bytes);
	out
}

fn out_of_range(value: impl ToString, kind: ValueKind) -> RecordError {
	RecordError::NumericRange {
		value: value.to_string(),
		kind: kind.as_str(),
	}
}

fn parse_text(text: &str, kind: ValueKind) -> Result<Element> {
	let trimmed = text.trim();
	match kind {
		ValueKind::Signed => trimmed.parse().map(Element::Signed).map_err(|_| out_of_range(text, kind)),
		ValueKind::Unsigned => trimmed.parse().map(Element::Unsigned).map_err(|_| out_of_range(text, kind)),
		ValueKind::Decimal => trimmed.parse().map(Element::Decimal).map_err(|_| out_of_range(text, kind)),
		ValueKind::Fixed => {
			let value: f64 = trimmed.parse().map_err(|_| out_of_range(text, kind))?;
			Ok(Element::Fixed(Fixp::from_f64(value)?))
		}
		ValueKind::Bool => match trimmed {
			"true" | "yes" | "1" => Ok(Element::Bool(true)),
			"false" | "no" | "0" => Ok(Element::Bool(false)),
			_ => Err(out_of_range(text, kind)),
		},
		_ => Err(RecordError::TypeMismatch {
			from: "text",
			to: kind.as_str(),
		}),
	}
}

impl From<&str> for Element {
	fn from(value: &str) -> Self {
		Self::Text(value.to_owned())
	}
}

impl From<String> for Element {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<Vec<u8>> for Element {
	fn from(value: Vec<u8>) -> Self {
		Self::Bytes(value)
	}
}

impl From<&[u8]> for Element {
	fn from(value: &[u8]) -> Self {
		Self::Bytes(value.to_vec())
	}
}

impl From<i64> for Element {
	fn from(value: i64) -> Self {
		Self::Signed(value)
	}
}

impl From<u64> for Element {
	fn from(value: u64) -> Self {
		Self::Unsigned(value)
	}
}

impl From<f64> for Element {
	fn from(value: f64) -> Self {
		Self::Decimal(value)
	}
}

impl From<bool> for Element {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<Fixp> for Element {
	fn from(value: Fixp) -> Self {
		Self::Fixed(value)
	}
}

impl From<Array> for Element {
	fn from(value: Array) -> Self {
		Self::Array(value)
	}
}

#[cfg(test)]
mod tests {
	use super::Element;
	use crate::record::{Array, Charset, Fixp, RecordError, Value, ValueKind};

	#[test]
	fn fixed_width_elements_round_trip_through_bytes() {
		let cases = [
			Element::Signed(-42),
			Element::Unsigned(u64::MAX),
			Element::Decimal(2.5),
			Element::Fixed(Fixp::from_raw(-77)),
			Element::Bool(true),
		];
		for element in cases {
			let bytes = element.to_bytes().expect("encodes");
			assert_eq!(Some(bytes.len()), element.kind().fixed_width());
			assert_eq!(Element::from_bytes(element.kind(), &bytes).expect("decodes"), element);
		}
	}

	#[test]
	fn from_bytes_rejects_wrong_width_for_fixed_kinds() {
		let err = Element::from_bytes(ValueKind::Signed, &[0, 1, 2]).expect_err("three bytes");
		assert!(matches!(err, RecordError::SizeMismatch { kind: "signed", byte_len: 3, width: 8 }));
	}

	#[test]
	fn text_and_bytes_coerce_both_ways() {
		let bytes = Element::from("abc").coerce_to(ValueKind::Bytes).expect("text to bytes");
		assert_eq!(bytes, Element::Bytes(b"abc".to_vec()));

		let text = bytes.coerce_to(ValueKind::Text).expect("bytes to text");
		assert_eq!(text.as_text(), Some("abc"));

		let err = Element::Bytes(vec![0xFF]).coerce_to(ValueKind::Text).expect_err("not utf-8");
		assert!(matches!(err, RecordError::Encoding { .. }));
	}

	#[test]
	fn numeric_coercions_check_range() {
		assert_eq!(Element::Signed(5).coerce_to(ValueKind::Unsigned).expect("fits"), Element::Unsigned(5));
		assert!(matches!(
			Element::Signed(-1).coerce_to(ValueKind::Unsigned),
			Err(RecordError::NumericRange { kind: "unsigned", .. })
		));
		assert!(Element::Unsigned(u64::MAX).coerce_to(ValueKind::Signed).is_err());
		assert_eq!(
			Element::Decimal(1.5).coerce_to(ValueKind::Fixed).expect("fits"),
			Element::Fixed(Fixp::from_f64(1.5).expect("fixp"))
		);
		assert_eq!(Element::Bool(true).coerce_to(ValueKind::Signed).expect("bool"), Element::Signed(1));
	}

	#[test]
	fn text_parses_into_numeric_kinds() {
		assert_eq!(Element::from(" 12 ").coerce_to(ValueKind::Signed).expect("parses"), Element::Signed(12));
		assert_eq!(Element::from("yes").coerce_to(ValueKind::Bool).expect("parses"), Element::Bool(true));
		assert!(matches!(
			Element::from("twelve").coerce_to(ValueKind::Unsigned),
			Err(RecordError::NumericRange { .. })
		));
	}

	#[test]
	fn unrelated_kinds_are_a_type_mismatch() {
		let err = Element::Bool(true).coerce_to(ValueKind::Array).expect_err("no conversion");
		assert!(matches!(err, RecordError::TypeMismatch { from: "bool", to: "array" }));
	}

	#[test]
	fn decode_and_encode_only_apply_to_text_like_elements() {
		let decoded = Element::Bytes(vec![0xE9]).decode(Charset::Latin1).expect("latin1");
		assert_eq!(decoded, "é");
		assert_eq!(Element::Text(decoded).encode(Charset::Latin1).expect("encodes"), vec![0xE9]);
		assert!(Element::Signed(1).decode(Charset::Utf8).is_err());
		assert!(Element::Bytes(vec![1]).encode(Charset::Utf8).is_err());
	}

	#[test]
	fn nested_array_survives_byte_encoding() {
		let mut inner = Array::new();
		inner.append(Value::tagged("n", 3_i64).expect("value"));
		let element = Element::Array(inner);

		let bytes = element.to_bytes().expect("encodes");
		assert_eq!(Element::from_bytes(ValueKind::Array, &bytes).expect("decodes"), element);
	}
}
