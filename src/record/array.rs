use crate::record::{RecordError, Result, Value};

/// Ordered collection of values addressed by (non-unique) tag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array {
	values: Vec<Value>,
}

impl Array {
	/// Empty array.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of values.
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// True when no values are stored.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// First value whose tag equals `tag`.
	pub fn get(&self, tag: &str) -> Option<&Value> {
		self.values.iter().find(|value| value.tag() == Some(tag))
	}

	/// Mutable access to the first value whose tag equals `tag`.
	pub fn get_mut(&mut self, tag: &str) -> Option<&mut Value> {
		self.values.iter_mut().find(|value| value.tag() == Some(tag))
	}

	/// Like [`Array::get_mut`], but absence is an error.
	pub fn require(&mut self, tag: &str) -> Result<&mut Value> {
		self.get_mut(tag).ok_or_else(|| RecordError::TagNotFound { tag: tag.to_owned() })
	}

	/// Position of the first value whose tag equals `tag`.
	pub fn position(&self, tag: &str) -> Option<usize> {
		self.values.iter().position(|value| value.tag() == Some(tag))
	}

	/// Value at `index` in insertion order.
	pub fn at(&self, index: usize) -> Option<&Value> {
		self.values.get(index)
	}

	/// Append a value at the end.
	pub fn append(&mut self, value: Value) {
		self.values.push(value);
	}

	/// Remove and return the first value whose tag equals `tag`.
	pub fn remove(&mut self, tag: &str) -> Option<Value> {
		let index = self.position(tag)?;
		Some(self.values.remove(index))
	}

	/// Values in order.
	pub fn values(&self) -> &[Value] {
		&self.values
	}

	/// Tags in order; untagged values yield `None`.
	pub fn tags(&self) -> impl Iterator<Item = Option<&str>> {
		self.values.iter().map(Value::tag)
	}

	/// Iterate `(tag, value)` pairs in order.
	pub fn iter(&self) -> ArrayIter<'_> {
		ArrayIter { inner: self.values.iter() }
	}
}

/// Borrowing iterator over `(tag, value)` pairs.
pub struct ArrayIter<'a> {
	inner: std::slice::Iter<'a, Value>,
}

impl<'a> Iterator for ArrayIter<'a> {
	type Item = (Option<&'a str>, &'a Value);

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(|value| (value.tag(), value))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl<'a> IntoIterator for &'a Array {
	type Item = (Option<&'a str>, &'a Value);
	type IntoIter = ArrayIter<'a>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl IntoIterator for Array {
	type Item = Value;
	type IntoIter = std::vec::IntoIter<Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.values.into_iter()
	}
}

impl FromIterator<Value> for Array {
	fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
		Self {
			values: iter.into_iter().collect(),
		}
	}
}
