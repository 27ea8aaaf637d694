use std::time::Duration;

use tracing::{info, warn};

use crate::hook::{Config, Hooks};
use crate::record::{Array, Channel, Charset, Message, Result, Value};

/// Decode-and-forward script.
///
/// `process` decodes element 0 of the value tagged `decode_tag` from
/// `decode_charset`, stores the text back in place, and forwards the message.
/// Messages without that value pass through unchanged. `source` emits one
/// message carrying a single `source_tag` value holding `source_value`.
///
/// Settings: `custom_setting`, `decode_charset` (default `iso-8859-1`),
/// `decode_tag` (default `str`), `source_tag` (default `my_tag`),
/// `source_value` (default `my_value`), `source_interval_ms` (default 1000).
#[derive(Debug, Clone)]
pub struct ForwardScript {
	custom_setting: Option<String>,
	charset: Charset,
	decode_tag: String,
	source_tag: String,
	source_value: String,
	interval: Duration,
}

impl Default for ForwardScript {
	fn default() -> Self {
		Self {
			custom_setting: None,
			charset: Charset::Latin1,
			decode_tag: "str".to_owned(),
			source_tag: "my_tag".to_owned(),
			source_value: "my_value".to_owned(),
			interval: Duration::from_secs(1),
		}
	}
}

impl ForwardScript {
	/// Script with default settings.
	pub fn new() -> Self {
		Self::default()
	}

	/// `custom_setting` as read by `configure`.
	pub fn custom_setting(&self) -> Option<&str> {
		self.custom_setting.as_deref()
	}

	/// Charset used by `process`.
	pub fn charset(&self) -> Charset {
		self.charset
	}

	fn apply(&mut self, config: &Config) -> Result<()> {
		self.custom_setting = config.get("custom_setting").map(str::to_owned);
		if let Some(label) = config.get("decode_charset") {
			self.charset = label.parse()?;
		}
		if let Some(tag) = config.get("decode_tag") {
			self.decode_tag = tag.to_owned();
		}
		if let Some(tag) = config.get("source_tag") {
			self.source_tag = tag.to_owned();
		}
		if let Some(value) = config.get("source_value") {
			self.source_value = value.to_owned();
		}
		if let Some(ms) = config.get_unsigned("source_interval_ms")? {
			self.interval = Duration::from_millis(ms);
		}
		Ok(())
	}

	fn decode_in_place(&self, message: &mut Message) -> Result<()> {
		let Some(value) = message.array_mut().and_then(|array| array.get_mut(&self.decode_tag)) else {
			return Ok(());
		};

		let text = value.decode(0, self.charset)?;
		value.set(0, text)
	}

	fn sourced_array(&self) -> Result<Array> {
		let mut value = Value::new();
		value.set_tag(&self.source_tag);
		value.set(0, self.source_value.as_str())?;

		let mut array = Array::new();
		array.append(value);
		Ok(array)
	}
}

impl Hooks for ForwardScript {
	fn configure(&mut self, config: &Config) -> bool {
		match self.apply(config) {
			Ok(()) => {
				info!(
					instance = config.instance(),
					custom_setting = self.custom_setting.as_deref().unwrap_or(""),
					charset = self.charset.as_str(),
					"forward script configured"
				);
				true
			}
			Err(err) => {
				warn!(instance = config.instance(), %err, "forward script rejected configuration");
				false
			}
		}
	}

	fn process(&mut self, channel: &mut Channel, mut message: Message) -> bool {
		if let Err(err) = self.decode_in_place(&mut message) {
			warn!(tag = self.decode_tag.as_str(), %err, "decode failed");
			return false;
		}

		info!(topic = message.topic(), "forwarding message");
		channel.send(message);
		true
	}

	fn source(&mut self, channel: &mut Channel, mut message: Message) -> bool {
		match self.sourced_array() {
			Ok(array) => {
				message.set_array(array);
				info!(tag = self.source_tag.as_str(), "sourcing message");
				channel.send(message);
				true
			}
			Err(err) => {
				warn!(%err, "could not build sourced value");
				false
			}
		}
	}

	fn source_interval(&self) -> Option<Duration> {
		Some(self.interval)
	}
}
