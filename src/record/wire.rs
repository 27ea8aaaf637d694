use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use crate::record::bytes::{Cursor, first4, put_long_bytes, put_short_bytes, put_u32};
use crate::record::{Array, Message, MessageType, Protocol, RecordError, Result, Value, ValueKind};

/// Leading magic of an encoded message stream.
pub const STREAM_MAGIC: [u8; 4] = *b"RRMS";
/// Current stream format version.
pub const WIRE_VERSION: u8 = 1;

/// Safety limits applied while decoding.
#[derive(Debug, Clone)]
pub struct WireLimits {
	/// Maximum nesting of array-kind values.
	pub max_depth: u32,
	/// Maximum values in one array.
	pub max_values: usize,
	/// Maximum elements in one value, whatever their width.
	pub max_elements: usize,
	/// Maximum messages in one stream.
	pub max_messages: usize,
}

impl Default for WireLimits {
	fn default() -> Self {
		Self {
			max_depth: 16,
			max_values: 65_535,
			max_elements: 1 << 20,
			max_messages: 1_000_000,
		}
	}
}

/// Encode an array as `count` followed by each value.
pub fn encode_array(array: &Array) -> Result<Vec<u8>> {
	let mut out = Vec::new();
	put_array(&mut out, array)?;
	Ok(out)
}

/// Decode a complete encoded array; trailing bytes are an error.
pub fn decode_array(bytes: &[u8], limits: &WireLimits) -> Result<Array> {
	let mut cursor = Cursor::new(bytes);
	let array = read_array(&mut cursor, limits, 0)?;
	expect_end(&cursor, "array")?;
	Ok(array)
}

/// Encode messages into a stream with magic and version header.
pub fn encode_stream(messages: &[Message]) -> Result<Vec<u8>> {
	let mut out = Vec::new();
	out.extend_from_slice(&STREAM_MAGIC);
	out.push(WIRE_VERSION);
	put_u32(&mut out, "message count", messages.len())?;
	for message in messages {
		put_message(&mut out, message)?;
	}
	Ok(out)
}

/// Decode a stream produced by [`encode_stream`].
pub fn decode_stream(bytes: &[u8], limits: &WireLimits) -> Result<Vec<Message>> {
	let mut cursor = Cursor::new(bytes);
	let magic = cursor.read_code4().map_err(|_| RecordError::UnknownMagic { magic: first4(bytes) })?;
	if magic != STREAM_MAGIC {
		return Err(RecordError::UnknownMagic { magic });
	}

	let version = cursor.read_u8()?;
	if version != WIRE_VERSION {
		return Err(RecordError::UnsupportedWireVersion { version });
	}

	let count = cursor.read_u32()? as usize;
	if count > limits.max_messages {
		return Err(RecordError::WireTooManyValues {
			what: "messages",
			count,
			max: limits.max_messages,
		});
	}

	let mut messages = Vec::with_capacity(count.min(1024));
	for _ in 0..count {
		messages.push(read_message(&mut cursor, limits)?);
	}
	expect_end(&cursor, "stream")?;
	Ok(messages)
}

fn put_message(out: &mut Vec<u8>, message: &Message) -> Result<()> {
	out.push(message.msg_type().wire_id());
	out.extend_from_slice(&message.timestamp().to_be_bytes());
	put_short_bytes(out, "topic", message.topic().as_bytes())?;
	put_long_bytes(out, "data", message.data())?;
	out.push(match message.protocol() {
		None => 0,
		Some(Protocol::Udp) => 1,
		Some(Protocol::Tcp) => 2,
	});

	match message.addr() {
		None => out.push(0),
		Some(addr) => {
			match addr.ip() {
				IpAddr::V4(ip) => {
					out.push(4);
					out.extend_from_slice(&ip.octets());
				}
				IpAddr::V6(ip) => {
					out.push(6);
					out.extend_from_slice(&ip.octets());
				}
			}
			out.extend_from_slice(&addr.port().to_be_bytes());
		}
	}

	match message.array() {
		None => out.push(0),
		Some(array) => {
			out.push(1);
			put_array(out, array)?;
		}
	}
	Ok(())
}

fn read_message(cursor: &mut Cursor<'_>, limits: &WireLimits) -> Result<Message> {
	let msg_type = MessageType::from_wire_id(cursor.read_u8()?)?;
	let timestamp = cursor.read_u64()?;

	let mut message = Message::with_timestamp(timestamp);
	message.set_type(msg_type);

	let topic = String::from_utf8(cursor.read_short_bytes()?.to_vec()).map_err(|err| RecordError::Encoding {
		charset: "utf-8",
		at: err.utf8_error().valid_up_to(),
	})?;
	message.set_topic(&topic)?;
	message.set_data(cursor.read_long_bytes()?);

	let protocol = match cursor.read_u8()? {
		0 => "",
		1 => "udp",
		2 => "tcp",
		id => return Err(RecordError::UnknownId { what: "protocol", id }),
	};
	message.set_protocol(protocol)?;

	let ip = match cursor.read_u8()? {
		0 => None,
		4 => {
			let mut octets = [0_u8; 4];
			octets.copy_from_slice(cursor.read_exact(4)?);
			Some(IpAddr::V4(Ipv4Addr::from(octets)))
		}
		6 => {
			let mut octets = [0_u8; 16];
			octets.copy_from_slice(cursor.read_exact(16)?);
			Some(IpAddr::V6(Ipv6Addr::from(octets)))
		}
		id => return Err(RecordError::UnknownId { what: "address family", id }),
	};
	if let Some(ip) = ip {
		let port = cursor.read_u16()?;
		message.set_socket_addr(Some(SocketAddr::new(ip, port)));
	}

	match cursor.read_u8()? {
		0 => {}
		1 => message.set_array(read_array(cursor, limits, 0)?),
		id => return Err(RecordError::UnknownId { what: "array flag", id }),
	}
	Ok(message)
}

fn put_array(out: &mut Vec<u8>, array: &Array) -> Result<()> {
	put_u32(out, "value count", array.len())?;
	for value in array.values() {
		put_value(out, value)?;
	}
	Ok(())
}

fn put_value(out: &mut Vec<u8>, value: &Value) -> Result<()> {
	out.push(value.kind().wire_id());
	match value.tag() {
		None => out.push(0),
		Some(tag) => {
			out.push(1);
			put_short_bytes(out, "tag", tag.as_bytes())?;
		}
	}
	put_u32(out, "element width", value.element_width())?;
	put_u32(out, "element count", value.element_count())?;
	out.extend_from_slice(value.bytes());
	Ok(())
}

fn read_array(cursor: &mut Cursor<'_>, limits: &WireLimits, depth: u32) -> Result<Array> {
	if depth >= limits.max_depth {
		return Err(RecordError::WireDepthExceeded { max_depth: limits.max_depth });
	}

	let count = cursor.read_u32()? as usize;
	if count > limits.max_values {
		return Err(RecordError::WireTooManyValues {
			what: "values",
			count,
			max: limits.max_values,
		});
	}

	let mut array = Array::new();
	for _ in 0..count {
		array.append(read_value(cursor, limits, depth)?);
	}
	Ok(array)
}

fn read_value(cursor: &mut Cursor<'_>, limits: &WireLimits, depth: u32) -> Result<Value> {
	let kind = ValueKind::from_wire_id(cursor.read_u8()?)?;
	let tag = match cursor.read_u8()? {
		0 => None,
		1 => {
			let raw = cursor.read_short_bytes()?;
			Some(String::from_utf8(raw.to_vec()).map_err(|err| RecordError::Encoding {
				charset: "utf-8",
				at: err.utf8_error().valid_up_to(),
			})?)
		}
		id => return Err(RecordError::UnknownId { what: "tag flag", id }),
	};

	let width = cursor.read_u32()? as usize;
	let count = cursor.read_u32()? as usize;
	if count > limits.max_elements {
		return Err(RecordError::WireTooManyValues {
			what: "elements",
			count,
			max: limits.max_elements,
		});
	}
	let len = width.checked_mul(count).ok_or(RecordError::UnexpectedEof {
		at: cursor.pos(),
		need: usize::MAX,
		rem: cursor.remaining(),
	})?;
	let data = cursor.read_exact(len)?;

	if kind == ValueKind::Array {
		for index in 0..count {
			let mut nested = Cursor::new(&data[index * width..(index + 1) * width]);
			let _ = read_array(&mut nested, limits, depth + 1)?;
			expect_end(&nested, "nested array")?;
		}
	}

	Value::from_parts(tag.as_deref(), kind, width, count, data.to_vec())
}

fn expect_end(cursor: &Cursor<'_>, what: &'static str) -> Result<()> {
	if cursor.remaining() > 0 {
		return Err(RecordError::WireTrailingBytes {
			what,
			leftover: cursor.remaining(),
		});
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::{STREAM_MAGIC, WireLimits, decode_array, decode_stream, encode_array, encode_stream};
	use crate::record::{Array, Fixp, Message, MessageType, RecordError, Value, ValueKind};

	fn mixed_array() -> Array {
		let mut nested = Array::new();
		nested.append(Value::tagged("inner", 1.5_f64).expect("value"));

		let mut counts = Value::tagged("counts", 1_u64).expect("value");
		counts.push(2_u64).expect("push");

		let mut array = Array::new();
		array.append(Value::tagged("str", "hello").expect("value"));
		array.append(counts);
		array.append(Value::tagged("fix", Fixp::from_f64(0.25).expect("fixp")).expect("value"));
		array.append(Value::tagged("raw", vec![0_u8, 255]).expect("value"));
		array.append(Value::tagged("nested", nested).expect("value"));
		let mut untagged = Value::new();
		untagged.set(0, false).expect("bool");
		array.append(untagged);
		array
	}

	#[test]
	fn array_preserves_order_tags_kinds_and_bytes() {
		let array = mixed_array();
		let bytes = encode_array(&array).expect("encodes");
		let decoded = decode_array(&bytes, &WireLimits::default()).expect("decodes");

		assert_eq!(decoded, array);
		let kinds: Vec<ValueKind> = decoded.values().iter().map(Value::kind).collect();
		assert_eq!(
			kinds,
			vec![ValueKind::Text, ValueKind::Unsigned, ValueKind::Fixed, ValueKind::Bytes, ValueKind::Array, ValueKind::Bool]
		);
	}

	#[test]
	fn stream_carries_envelope_metadata() {
		let mut message = Message::with_timestamp(1_700_000_000_000_000);
		message.set_type(MessageType::Put);
		message.set_topic("a/b").expect("topic");
		message.set_data(b"payload".to_vec());
		message.set_protocol("udp").expect("protocol");
		message.set_addr("::1", 5555).expect("addr");
		message.set_array(mixed_array());

		let plain = Message::with_timestamp(7);
		let bytes = encode_stream(&[message.clone(), plain.clone()]).expect("encodes");
		assert!(bytes.starts_with(&STREAM_MAGIC));

		let decoded = decode_stream(&bytes, &WireLimits::default()).expect("decodes");
		assert_eq!(decoded, vec![message, plain]);
	}

	#[test]
	fn truncated_stream_is_eof() {
		let bytes = encode_stream(&[Message::with_timestamp(3)]).expect("encodes");
		let err = decode_stream(&bytes[..bytes.len() - 1], &WireLimits::default()).expect_err("truncated");
		assert!(matches!(err, RecordError::UnexpectedEof { .. }));
	}

	#[test]
	fn trailing_bytes_are_rejected() {
		let mut bytes = encode_array(&Array::new()).expect("encodes");
		bytes.push(0);
		assert!(matches!(
			decode_array(&bytes, &WireLimits::default()),
			Err(RecordError::WireTrailingBytes { what: "array", leftover: 1 })
		));
	}

	#[test]
	fn value_with_inconsistent_layout_is_rejected() {
		let mut bytes = encode_array(&{
			let mut array = Array::new();
			array.append(Value::tagged("n", 1_i64).expect("value"));
			array
		})
		.expect("encodes");

		// value count(4) + kind(1) + tag flag(1) + tag len(2) + "n"(1), then width
		let width_at = 4 + 1 + 1 + 2 + 1;
		bytes[width_at..width_at + 4].copy_from_slice(&4_u32.to_be_bytes());
		bytes.truncate(width_at + 8 + 4);
		assert!(matches!(
			decode_array(&bytes, &WireLimits::default()),
			Err(RecordError::SizeMismatch { kind: "signed", .. })
		));
	}

	#[test]
	fn nesting_beyond_limit_is_rejected() {
		let mut array = Array::new();
		array.append(Value::tagged("leaf", 1_i64).expect("value"));
		for _ in 0..3 {
			let mut outer = Array::new();
			outer.append(Value::tagged("wrap", array).expect("value"));
			array = outer;
		}

		let bytes = encode_array(&array).expect("encodes");
		let limits = WireLimits {
			max_depth: 2,
			..WireLimits::default()
		};
		assert!(matches!(decode_array(&bytes, &limits), Err(RecordError::WireDepthExceeded { max_depth: 2 })));
		assert!(decode_array(&bytes, &WireLimits::default()).is_ok());
	}

	#[test]
	fn zero_width_element_count_is_bounded() {
		let mut bytes = Vec::new();
		bytes.extend_from_slice(&1_u32.to_be_bytes());
		bytes.push(ValueKind::Bytes.wire_id());
		bytes.push(0);
		bytes.extend_from_slice(&0_u32.to_be_bytes());
		bytes.extend_from_slice(&u32::MAX.to_be_bytes());

		let err = decode_array(&bytes, &WireLimits::default()).expect_err("count over limit");
		assert!(matches!(err, RecordError::WireTooManyValues { what: "elements", max, .. } if max == WireLimits::default().max_elements));

		let tight = WireLimits {
			max_elements: 2,
			..WireLimits::default()
		};
		bytes[10..14].copy_from_slice(&3_u32.to_be_bytes());
		assert!(matches!(decode_array(&bytes, &tight), Err(RecordError::WireTooManyValues { count: 3, max: 2, .. })));
	}

	#[test]
	fn zero_width_text_elements_round_trip() {
		let mut empty = Value::tagged("e", "").expect("value");
		empty.push("").expect("second empty element");
		let mut array = Array::new();
		array.append(empty.clone());

		let bytes = encode_array(&array).expect("encodes");
		let decoded = decode_array(&bytes, &WireLimits::default()).expect("decodes");
		let value = decoded.get("e").expect("value");
		assert_eq!(value, &empty);
		assert_eq!(value.element_count(), 2);
		assert_eq!(value.element_width(), 0);
		assert_eq!(value.byte_len(), 0);
	}

	#[test]
	fn wrong_magic_is_reported() {
		assert!(matches!(
			decode_stream(b"NOPE\x01\0\0\0\0", &WireLimits::default()),
			Err(RecordError::UnknownMagic { magic }) if magic == *b"NOPE"
		));
	}
}
