use std::path::PathBuf;

use rrscript::record::{Array, Message, MessageType, Result};

use crate::cmd::util::{compression_flag, emit_json, parse_value_spec, write_stream};

#[derive(clap::Args)]
pub struct Args {
	/// Output stream file.
	#[arg(long, short)]
	pub out: PathBuf,
	/// Value as `tag:kind=value`; `bytes` values are hex. Repeatable.
	#[arg(long = "value")]
	pub values: Vec<String>,
	#[arg(long)]
	pub topic: Option<String>,
	#[arg(long = "type", default_value = "msg")]
	pub msg_type: String,
	#[arg(long)]
	pub timestamp: Option<u64>,
	/// Raw data payload as hex.
	#[arg(long)]
	pub data: Option<String>,
	/// Peer address as `ip:port` or `[ipv6]:port`.
	#[arg(long)]
	pub addr: Option<String>,
	#[arg(long)]
	pub protocol: Option<String>,
	/// Number of identical messages to write.
	#[arg(long, default_value_t = 1)]
	pub count: usize,
	#[arg(long)]
	pub zstd: bool,
	#[arg(long)]
	pub json: bool,
}

#[derive(serde::Serialize)]
struct BuildJson {
	path: String,
	compression: &'static str,
	messages: usize,
	values: usize,
	bytes: usize,
}

/// Write a stream of messages assembled from command-line values.
pub fn run(args: Args) -> Result<()> {
	let Args {
		out,
		values,
		topic,
		msg_type,
		timestamp,
		data,
		addr,
		protocol,
		count,
		zstd,
		json,
	} = args;

	let array = values.iter().map(|spec| parse_value_spec(spec)).collect::<Result<Array>>()?;

	let mut message = match timestamp {
		Some(timestamp) => Message::with_timestamp(timestamp),
		None => Message::new(),
	};
	message.set_type(parse_msg_type(&msg_type)?);
	if let Some(topic) = &topic {
		message.set_topic(topic)?;
	}
	if let Some(data) = &data {
		message.set_data(hex::decode(data).map_err(|_| invalid(data))?);
	}
	if let Some(addr) = &addr {
		let (ip, port) = split_addr(addr)?;
		message.set_addr(ip, port)?;
	}
	if let Some(protocol) = &protocol {
		message.set_protocol(protocol)?;
	}
	if !array.is_empty() {
		message.set_array(array);
	}

	let messages = vec![message; count];
	let compression = compression_flag(zstd);
	let bytes = write_stream(&out, &messages, compression)?;

	if json {
		return emit_json(&BuildJson {
			path: out.display().to_string(),
			compression: compression.as_str(),
			messages: messages.len(),
			values: values.len(),
			bytes,
		});
	}

	println!("wrote {} message(s), {} bytes ({}) to {}", messages.len(), bytes, compression.as_str(), out.display());
	Ok(())
}

fn parse_msg_type(label: &str) -> Result<MessageType> {
	MessageType::ALL.into_iter().find(|item| item.as_str() == label).ok_or_else(|| invalid(label))
}

fn split_addr(addr: &str) -> Result<(&str, u16)> {
	let (ip, port) = addr.rsplit_once(':').ok_or_else(|| invalid(addr))?;
	let ip = ip.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')).unwrap_or(ip);
	let port = port.parse().map_err(|_| invalid(addr))?;
	Ok((ip, port))
}

fn invalid(spec: &str) -> rrscript::record::RecordError {
	rrscript::record::RecordError::InvalidValueSpec { spec: spec.to_owned() }
}

#[cfg(test)]
mod tests {
	use super::split_addr;

	#[test]
	fn addr_splits_on_last_colon() {
		assert_eq!(split_addr("127.0.0.1:80").expect("v4"), ("127.0.0.1", 80));
		assert_eq!(split_addr("[::1]:2000").expect("v6"), ("::1", 2000));
		assert!(split_addr("127.0.0.1").is_err());
		assert!(split_addr("127.0.0.1:http").is_err());
	}
}
