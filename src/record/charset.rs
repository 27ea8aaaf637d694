use std::fmt;
use std::str::FromStr;

use crate::record::{RecordError, Result};

/// Text encodings supported by element decode/encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Charset {
	/// UTF-8; decoding validates.
	Utf8,
	/// ISO-8859-1; every byte maps to the code point of the same value.
	Latin1,
	/// 7-bit US-ASCII.
	Ascii,
}

impl Charset {
	/// Canonical label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Utf8 => "utf-8",
			Self::Latin1 => "iso-8859-1",
			Self::Ascii => "us-ascii",
		}
	}

	/// Decode bytes into a string.
	pub fn decode(self, bytes: &[u8]) -> Result<String> {
		match self {
			Self::Utf8 => match std::str::from_utf8(bytes) {
				Ok(text) => Ok(text.to_owned()),
				Err(err) => Err(RecordError::Encoding {
					charset: self.as_str(),
					at: err.valid_up_to(),
				}),
			},
			Self::Latin1 => Ok(bytes.iter().map(|byte| char::from(*byte)).collect()),
			Self::Ascii => {
				if let Some(at) = bytes.iter().position(|byte| !byte.is_ascii()) {
					return Err(RecordError::Encoding { charset: self.as_str(), at });
				}
				Ok(bytes.iter().map(|byte| char::from(*byte)).collect())
			}
		}
	}

	/// Encode a string into bytes; characters outside the charset fail.
	pub fn encode(self, text: &str) -> Result<Vec<u8>> {
		let limit = match self {
			Self::Utf8 => return Ok(text.as_bytes().to_vec()),
			Self::Latin1 => 0xFF,
			Self::Ascii => 0x7F,
		};

		let mut out = Vec::with_capacity(text.len());
		for (at, ch) in text.chars().enumerate() {
			let code = u32::from(ch);
			if code > limit {
				return Err(RecordError::Encoding { charset: self.as_str(), at });
			}
			out.push(code as u8);
		}
		Ok(out)
	}
}

impl fmt::Display for Charset {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Charset {
	type Err = RecordError;

	fn from_str(label: &str) -> Result<Self> {
		match label.trim().to_ascii_lowercase().as_str() {
			"utf-8" | "utf8" => Ok(Self::Utf8),
			"iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" => Ok(Self::Latin1),
			"us-ascii" | "ascii" => Ok(Self::Ascii),
			_ => Err(RecordError::UnknownCharset { label: label.to_owned() }),
		}
	}
}
