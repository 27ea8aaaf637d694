use crate::record::{RecordError, Result};

/// Simple bounded cursor over an immutable byte slice.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	/// Return current byte offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(RecordError::UnexpectedEof {
				at: self.pos,
				need: n,
				rem: self.remaining(),
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Read a four-byte code.
	pub fn read_code4(&mut self) -> Result<[u8; 4]> {
		let raw = self.read_exact(4)?;
		let mut out = [0_u8; 4];
		out.copy_from_slice(raw);
		Ok(out)
	}

	/// Read one byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_exact(1)?[0])
	}

	/// Read a big-endian `u16`.
	pub fn read_u16(&mut self) -> Result<u16> {
		let raw = self.read_exact(2)?;
		let mut buf = [0_u8; 2];
		buf.copy_from_slice(raw);
		Ok(u16::from_be_bytes(buf))
	}

	/// Read a big-endian `u32`.
	pub fn read_u32(&mut self) -> Result<u32> {
		let raw = self.read_exact(4)?;
		let mut buf = [0_u8; 4];
		buf.copy_from_slice(raw);
		Ok(u32::from_be_bytes(buf))
	}

	/// Read a big-endian `u64`.
	pub fn read_u64(&mut self) -> Result<u64> {
		let raw = self.read_exact(8)?;
		let mut buf = [0_u8; 8];
		buf.copy_from_slice(raw);
		Ok(u64::from_be_bytes(buf))
	}

	/// Read a `u16` length prefix followed by that many bytes.
	pub fn read_short_bytes(&mut self) -> Result<&'a [u8]> {
		let len = usize::from(self.read_u16()?);
		self.read_exact(len)
	}

	/// Read a `u32` length prefix followed by that many bytes.
	pub fn read_long_bytes(&mut self) -> Result<&'a [u8]> {
		let len = self.read_u32()? as usize;
		self.read_exact(len)
	}
}

/// Append a `u16` length prefix and the bytes.
pub fn put_short_bytes(out: &mut Vec<u8>, what: &'static str, bytes: &[u8]) -> Result<()> {
	let len = u16::try_from(bytes.len()).map_err(|_| RecordError::WireTooLong { what, len: bytes.len() })?;
	out.extend_from_slice(&len.to_be_bytes());
	out.extend_from_slice(bytes);
	Ok(())
}

/// Append a `u32` length prefix and the bytes.
pub fn put_long_bytes(out: &mut Vec<u8>, what: &'static str, bytes: &[u8]) -> Result<()> {
	put_u32(out, what, bytes.len())?;
	out.extend_from_slice(bytes);
	Ok(())
}

/// Append a length or count as a big-endian `u32`.
pub fn put_u32(out: &mut Vec<u8>, what: &'static str, value: usize) -> Result<()> {
	let value = u32::try_from(value).map_err(|_| RecordError::WireTooLong { what, len: value })?;
	out.extend_from_slice(&value.to_be_bytes());
	Ok(())
}

/// Return the first up-to-4 bytes, zero padded.
pub fn first4(bytes: &[u8]) -> [u8; 4] {
	let mut magic = [0_u8; 4];
	let take = bytes.len().min(4);
	magic[..take].copy_from_slice(&bytes[..take]);
	magic
}
