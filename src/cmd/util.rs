use std::fs;
use std::io::Read;
use std::path::Path;

use rrscript::record::wire::{WireLimits, decode_stream, encode_stream};
use rrscript::record::{Compression, Element, Message, RecordError, Result, Value, ValueKind, decode_bytes, encode_bytes};
use serde_json::{Value as JsonValue, json};

/// Print a serializable payload as pretty JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) -> Result<()> {
	let text = serde_json::to_string_pretty(payload).map_err(std::io::Error::other)?;
	println!("{text}");
	Ok(())
}

/// Read a stream file, or stdin for `-`, undoing any compression.
pub(crate) fn read_stream(path: &Path) -> Result<(Compression, Vec<Message>)> {
	let raw = if path == Path::new("-") {
		let mut buf = Vec::new();
		std::io::stdin().read_to_end(&mut buf)?;
		buf
	} else {
		fs::read(path)?
	};

	let (compression, bytes) = decode_bytes(raw)?;
	let messages = decode_stream(&bytes, &WireLimits::default())?;
	Ok((compression, messages))
}

/// Encode and write `messages`, returning the number of bytes written.
pub(crate) fn write_stream(path: &Path, messages: &[Message], compression: Compression) -> Result<usize> {
	let bytes = encode_bytes(encode_stream(messages)?, compression)?;
	fs::write(path, &bytes)?;
	Ok(bytes.len())
}

/// Compression mode for a `--zstd` flag.
pub(crate) fn compression_flag(zstd: bool) -> Compression {
	if zstd { Compression::Zstd } else { Compression::None }
}

/// Parse `tag:kind=value` or `kind=value` into a one-element value.
///
/// `bytes` values are hex; every other kind parses the text form.
pub(crate) fn parse_value_spec(spec: &str) -> Result<Value> {
	let invalid = || RecordError::InvalidValueSpec { spec: spec.to_owned() };

	let (head, raw) = spec.split_once('=').ok_or_else(invalid)?;
	let (tag, kind_label) = match head.split_once(':') {
		Some((tag, kind)) => (Some(tag), kind),
		None => (None, head),
	};
	let kind: ValueKind = kind_label.parse().map_err(|_| invalid())?;

	let element = match kind {
		ValueKind::Bytes => Element::Bytes(hex::decode(raw).map_err(|_| invalid())?),
		ValueKind::Array => return Err(invalid()),
		_ => Element::Text(raw.to_owned()),
	};

	let mut value = Value::with_kind(kind);
	if let Some(tag) = tag.filter(|tag| !tag.is_empty()) {
		value.set_tag(tag);
	}
	value.set(0, element)?;
	Ok(value)
}

/// JSON form of one message.
#[derive(serde::Serialize)]
pub(crate) struct MessageJson {
	msg_type: &'static str,
	class: &'static str,
	timestamp: u64,
	topic: String,
	data_hex: String,
	addr: Option<String>,
	protocol: Option<&'static str>,
	values: Vec<ValueJson>,
}

/// JSON form of one value.
#[derive(serde::Serialize)]
pub(crate) struct ValueJson {
	tag: Option<String>,
	kind: &'static str,
	width: usize,
	count: usize,
	elements: Vec<JsonValue>,
}

impl MessageJson {
	pub(crate) fn from_message(message: &Message) -> Result<Self> {
		let values = match message.array() {
			Some(array) => array.values().iter().map(ValueJson::from_value).collect::<Result<Vec<_>>>()?,
			None => Vec::new(),
		};

		Ok(Self {
			msg_type: message.msg_type().as_str(),
			class: message.class().as_str(),
			timestamp: message.timestamp(),
			topic: message.topic().to_owned(),
			data_hex: hex::encode(message.data()),
			addr: message.addr().map(|addr| addr.to_string()),
			protocol: message.protocol().map(|protocol| protocol.as_str()),
			values,
		})
	}
}

impl ValueJson {
	pub(crate) fn from_value(value: &Value) -> Result<Self> {
		let elements = value.elements()?.iter().map(element_json).collect::<Result<Vec<_>>>()?;
		Ok(Self {
			tag: value.tag().map(str::to_owned),
			kind: value.kind().as_str(),
			width: value.element_width(),
			count: value.element_count(),
			elements,
		})
	}
}

fn element_json(element: &Element) -> Result<JsonValue> {
	Ok(match element {
		Element::Bytes(bytes) => json!(hex::encode(bytes)),
		Element::Text(text) => json!(text),
		Element::Signed(v) => json!(v),
		Element::Unsigned(v) => json!(v),
		Element::Decimal(v) => json!(v),
		Element::Fixed(v) => json!(v.to_f64()),
		Element::Bool(v) => json!(v),
		Element::Array(array) => {
			let nested = array.values().iter().map(ValueJson::from_value).collect::<Result<Vec<_>>>()?;
			serde_json::to_value(nested).map_err(std::io::Error::other)?
		}
	})
}

/// One-line text rendering of a value's elements.
pub(crate) fn render_elements(value: &Value) -> Result<String> {
	let parts = value
		.elements()?
		.iter()
		.map(|element| match element {
			Element::Bytes(bytes) => format!("0x{}", hex::encode(bytes)),
			Element::Text(text) => format!("{text:?}"),
			Element::Signed(v) => v.to_string(),
			Element::Unsigned(v) => v.to_string(),
			Element::Decimal(v) => v.to_string(),
			Element::Fixed(v) => v.to_string(),
			Element::Bool(v) => v.to_string(),
			Element::Array(array) => format!("<array of {}>", array.len()),
		})
		.collect::<Vec<_>>();
	Ok(parts.join(", "))
}
