use std::net::{IpAddr, SocketAddr};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::record::topic::validate_topic_name;
use crate::record::{Array, RecordError, Result};

/// Message type carried in the envelope header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MessageType {
	/// Plain message.
	#[default]
	Msg,
	/// Tagged message.
	Tag,
	/// Key-value store read.
	Get,
	/// Key-value store write.
	Put,
	/// Key-value store delete.
	Del,
}

impl MessageType {
	/// Every message type, in wire-id order.
	pub const ALL: [MessageType; 5] = [Self::Msg, Self::Tag, Self::Get, Self::Put, Self::Del];

	/// Render as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Msg => "msg",
			Self::Tag => "tag",
			Self::Get => "get",
			Self::Put => "put",
			Self::Del => "del",
		}
	}

	/// Stable one-byte identifier used by the frame codec.
	pub fn wire_id(self) -> u8 {
		match self {
			Self::Msg => 1,
			Self::Tag => 2,
			Self::Get => 3,
			Self::Put => 4,
			Self::Del => 5,
		}
	}

	/// Map a frame codec identifier back to a message type.
	pub fn from_wire_id(id: u8) -> Result<Self> {
		Self::ALL
			.into_iter()
			.find(|item| item.wire_id() == id)
			.ok_or(RecordError::UnknownId { what: "message type", id })
	}
}

/// Message class, derived from whether an array is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageClass {
	/// Raw data payload only.
	Data,
	/// Carries a non-empty array.
	Array,
}

impl MessageClass {
	/// Render as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Data => "data",
			Self::Array => "array",
		}
	}
}

/// Transport the message arrived on or should leave by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
	/// Datagram transport.
	Udp,
	/// Stream transport.
	Tcp,
}

impl Protocol {
	/// Render as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Udp => "udp",
			Self::Tcp => "tcp",
		}
	}
}

/// Envelope handed to hooks: optional array plus routing metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
	msg_type: MessageType,
	timestamp: u64,
	topic: String,
	data: Vec<u8>,
	addr: Option<SocketAddr>,
	protocol: Option<Protocol>,
	array: Option<Array>,
}

impl Default for Message {
	fn default() -> Self {
		Self::new()
	}
}

impl Message {
	/// Array-less message stamped with the current time.
	pub fn new() -> Self {
		Self::with_timestamp(now_micros())
	}

	/// Array-less message with an explicit timestamp in microseconds.
	pub fn with_timestamp(timestamp: u64) -> Self {
		Self {
			msg_type: MessageType::Msg,
			timestamp,
			topic: String::new(),
			data: Vec::new(),
			addr: None,
			protocol: None,
			array: None,
		}
	}

	/// Attached array, if any.
	pub fn array(&self) -> Option<&Array> {
		self.array.as_ref()
	}

	/// Mutable access to the attached array; edits are visible in the message.
	pub fn array_mut(&mut self) -> Option<&mut Array> {
		self.array.as_mut()
	}

	/// Attach `array`, dropping any previous one.
	pub fn set_array(&mut self, array: Array) {
		self.array = Some(array);
	}

	/// Detach and return the array.
	pub fn take_array(&mut self) -> Option<Array> {
		self.array.take()
	}

	/// `Array` when a non-empty array is attached, else `Data`.
	pub fn class(&self) -> MessageClass {
		match &self.array {
			Some(array) if !array.is_empty() => MessageClass::Array,
			_ => MessageClass::Data,
		}
	}

	/// Message type.
	pub fn msg_type(&self) -> MessageType {
		self.msg_type
	}

	/// Replace the message type.
	pub fn set_type(&mut self, msg_type: MessageType) {
		self.msg_type = msg_type;
	}

	/// Timestamp in microseconds since the Unix epoch.
	pub fn timestamp(&self) -> u64 {
		self.timestamp
	}

	/// Replace the timestamp.
	pub fn set_timestamp(&mut self, timestamp: u64) {
		self.timestamp = timestamp;
	}

	/// Topic; empty when unset.
	pub fn topic(&self) -> &str {
		&self.topic
	}

	/// Replace the topic after validating it. Empty clears it.
	pub fn set_topic(&mut self, topic: &str) -> Result<()> {
		validate_topic_name(topic)?;
		self.topic = topic.to_owned();
		Ok(())
	}

	/// Raw data payload.
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	/// Replace the raw data payload.
	pub fn set_data(&mut self, data: impl Into<Vec<u8>>) {
		self.data = data.into();
	}

	/// Empty the raw data payload.
	pub fn clear_data(&mut self) {
		self.data.clear();
	}

	/// Peer address, if set.
	pub fn addr(&self) -> Option<SocketAddr> {
		self.addr
	}

	/// Set the peer address from text; `:` selects IPv6, `.` selects IPv4.
	pub fn set_addr(&mut self, ip: &str, port: u16) -> Result<()> {
		let invalid = || RecordError::InvalidAddress { addr: ip.to_owned() };
		let parsed: IpAddr = if ip.contains(':') {
			IpAddr::V6(ip.parse().map_err(|_| invalid())?)
		} else if ip.contains('.') {
			IpAddr::V4(ip.parse().map_err(|_| invalid())?)
		} else {
			return Err(invalid());
		};
		self.addr = Some(SocketAddr::new(parsed, port));
		Ok(())
	}

	/// Set or clear the peer address directly.
	pub fn set_socket_addr(&mut self, addr: Option<SocketAddr>) {
		self.addr = addr;
	}

	/// Transport protocol, if set.
	pub fn protocol(&self) -> Option<Protocol> {
		self.protocol
	}

	/// Set the protocol from `udp`, `tcp`, or empty (clears it).
	pub fn set_protocol(&mut self, label: &str) -> Result<()> {
		self.protocol = match label {
			"" => None,
			"udp" => Some(Protocol::Udp),
			"tcp" => Some(Protocol::Tcp),
			_ => return Err(RecordError::InvalidProtocol { label: label.to_owned() }),
		};
		Ok(())
	}
}

fn now_micros() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|elapsed| u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX))
		.unwrap_or(0)
}
