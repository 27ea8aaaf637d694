use crate::record::wire::{WireLimits, decode_array};
use crate::record::{Charset, Element, RecordError, Result, ValueKind};

/// Tagged value holding one or more elements of the same kind.
///
/// Elements are stored back to back in one buffer. Every element occupies
/// `element_width` bytes, so `byte_len() == element_count() * element_width()`
/// holds after every successful or failed mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
	tag: Option<Box<str>>,
	kind: ValueKind,
	kind_set: bool,
	width: usize,
	count: usize,
	data: Vec<u8>,
}

impl Default for Value {
	fn default() -> Self {
		Self::new()
	}
}

impl Value {
	/// Empty, untagged value. The first `set` decides its kind.
	pub fn new() -> Self {
		Self {
			tag: None,
			kind: ValueKind::Bytes,
			kind_set: false,
			width: 0,
			count: 0,
			data: Vec::new(),
		}
	}

	/// Empty value whose elements will be coerced to `kind`.
	pub fn with_kind(kind: ValueKind) -> Self {
		Self {
			kind,
			kind_set: true,
			width: kind.fixed_width().unwrap_or(0),
			..Self::new()
		}
	}

	/// Single-element value with a tag.
	pub fn tagged(tag: &str, element: impl Into<Element>) -> Result<Self> {
		let mut value = Self::new();
		value.set_tag(tag);
		value.set(0, element)?;
		Ok(value)
	}

	/// Build a value from stored parts, validating layout and element content.
	///
	/// `count` is capped by [`WireLimits::max_elements`] since zero-width
	/// elements occupy no bytes.
	pub fn from_raw(tag: Option<&str>, kind: ValueKind, width: usize, count: usize, data: Vec<u8>) -> Result<Self> {
		let max = WireLimits::default().max_elements;
		if count > max {
			return Err(RecordError::WireTooManyValues { what: "elements", count, max });
		}
		let value = Self::from_parts(tag, kind, width, count, data)?;
		if kind == ValueKind::Array {
			for chunk in value.chunks() {
				let _ = decode_array(chunk, &WireLimits::default())?;
			}
		}
		Ok(value)
	}

	/// Layout and text validation only; nested arrays are the caller's concern.
	pub(crate) fn from_parts(tag: Option<&str>, kind: ValueKind, width: usize, count: usize, data: Vec<u8>) -> Result<Self> {
		if let Some(fixed) = kind.fixed_width() {
			if width != fixed {
				return Err(RecordError::SizeMismatch {
					kind: kind.as_str(),
					byte_len: width,
					width: fixed,
				});
			}
		}

		let expected = width.checked_mul(count).ok_or(RecordError::SizeMismatch {
			kind: kind.as_str(),
			byte_len: data.len(),
			width,
		})?;
		if expected != data.len() {
			return Err(RecordError::SizeMismatch {
				kind: kind.as_str(),
				byte_len: data.len(),
				width,
			});
		}

		let value = Self {
			tag: tag.map(Into::into),
			kind,
			kind_set: true,
			width,
			count,
			data,
		};
		if kind == ValueKind::Text {
			for chunk in value.chunks() {
				let _ = Charset::Utf8.decode(chunk)?;
			}
		}
		Ok(value)
	}

	/// Tag, if set.
	pub fn tag(&self) -> Option<&str> {
		self.tag.as_deref()
	}

	/// Replace the tag.
	pub fn set_tag(&mut self, tag: &str) {
		self.tag = Some(tag.into());
	}

	/// Remove the tag.
	pub fn clear_tag(&mut self) {
		self.tag = None;
	}

	/// Kind used to interpret the stored bytes.
	pub fn kind(&self) -> ValueKind {
		self.kind
	}

	/// Number of stored elements.
	pub fn element_count(&self) -> usize {
		self.count
	}

	/// Bytes occupied by one element.
	pub fn element_width(&self) -> usize {
		self.width
	}

	/// Total stored bytes.
	pub fn byte_len(&self) -> usize {
		self.data.len()
	}

	/// True when no element has been stored.
	pub fn is_empty(&self) -> bool {
		self.count == 0
	}

	/// Stored bytes of all elements.
	pub fn bytes(&self) -> &[u8] {
		&self.data
	}

	/// Stored bytes of one element.
	pub fn element_bytes(&self, index: usize) -> Result<&[u8]> {
		self.check_index(index)?;
		let start = index * self.width;
		Ok(&self.data[start..start + self.width])
	}

	/// Decode the element at `index`.
	pub fn get(&self, index: usize) -> Result<Element> {
		Element::from_bytes(self.kind, self.element_bytes(index)?)
	}

	/// Decode every element in order.
	pub fn elements(&self) -> Result<Vec<Element>> {
		(0..self.count).map(|index| self.get(index)).collect()
	}

	/// Overwrite the element at `index`, or append when `index == element_count()`.
	///
	/// A fresh value from [`Value::new`] adopts the element's own kind. Otherwise
	/// the element is coerced to the value's kind and its width re-derived from
	/// the new data: a value holding at most one element of a variable-width
	/// kind is resized, while a multi-element value rejects a differing width.
	pub fn set(&mut self, index: usize, element: impl Into<Element>) -> Result<()> {
		if index > self.count {
			return Err(RecordError::IndexOutOfRange { index, count: self.count });
		}

		let element = element.into();
		let kind = if self.kind_set { self.kind } else { element.kind() };
		let bytes = element.coerce_to(kind)?.to_bytes()?;
		if self.count == 0 {
			self.kind = kind;
			self.kind_set = true;
			self.width = bytes.len();
			self.count = 1;
			self.data = bytes;
			return Ok(());
		}
		if bytes.len() != self.width {
			if self.count == 1 && index == 0 {
				self.width = bytes.len();
				self.data = bytes;
				return Ok(());
			}
			return Err(RecordError::ElementWidthMismatch {
				kind: self.kind.as_str(),
				width: self.width,
				got: bytes.len(),
			});
		}

		if index == self.count {
			self.data.extend_from_slice(&bytes);
			self.count += 1;
		} else {
			let start = index * self.width;
			self.data[start..start + self.width].copy_from_slice(&bytes);
		}
		Ok(())
	}

	/// Append an element after the last one.
	pub fn push(&mut self, element: impl Into<Element>) -> Result<()> {
		self.set(self.count, element)
	}

	/// Reinterpret the stored bytes as `kind`.
	///
	/// Fixed-width kinds require the byte length to be a whole multiple of the
	/// new width; the element count is recomputed from it. Variable-width kinds
	/// keep the current element boundaries and validate each element. The
	/// value is left untouched when validation fails.
	pub fn set_type(&mut self, kind: ValueKind) -> Result<()> {
		if kind == self.kind {
			self.kind_set = true;
			return Ok(());
		}

		let (width, count) = match kind.fixed_width() {
			Some(width) if self.count == 0 => (width, 0),
			Some(width) => {
				if self.data.is_empty() || self.data.len() % width != 0 {
					return Err(RecordError::SizeMismatch {
						kind: kind.as_str(),
						byte_len: self.data.len(),
						width,
					});
				}
				(width, self.data.len() / width)
			}
			None => {
				for chunk in self.chunks() {
					match kind {
						ValueKind::Text => {
							let _ = Charset::Utf8.decode(chunk)?;
						}
						ValueKind::Array => {
							let _ = decode_array(chunk, &WireLimits::default())?;
						}
						_ => {}
					}
				}
				(self.width, self.count)
			}
		};

		self.kind = kind;
		self.kind_set = true;
		self.width = width;
		self.count = count;
		Ok(())
	}

	/// Decode the raw content of element `index` from `charset` into text.
	pub fn decode(&self, index: usize, charset: Charset) -> Result<Element> {
		self.check_text_like(index)?;
		Ok(Element::Text(charset.decode(self.element_bytes(index)?)?))
	}

	/// Encode text element `index` into `charset` bytes.
	pub fn encode(&self, index: usize, charset: Charset) -> Result<Element> {
		Ok(Element::Bytes(self.get(index)?.encode(charset)?))
	}

	fn check_text_like(&self, index: usize) -> Result<()> {
		self.check_index(index)?;
		match self.kind {
			ValueKind::Bytes | ValueKind::Text => Ok(()),
			other => Err(RecordError::TypeMismatch {
				from: other.as_str(),
				to: "text",
			}),
		}
	}

	fn check_index(&self, index: usize) -> Result<()> {
		if index >= self.count {
			return Err(RecordError::IndexOutOfRange { index, count: self.count });
		}
		Ok(())
	}

	fn chunks(&self) -> impl Iterator<Item = &[u8]> {
		(0..self.count).map(move |index| &self.data[index * self.width..(index + 1) * self.width])
	}
}

#[cfg(test)]
mod tests;
