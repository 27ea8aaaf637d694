use std::path::PathBuf;

use rrscript::record::Result;

use crate::cmd::util::{MessageJson, emit_json, read_stream, render_elements};

#[derive(clap::Args)]
pub struct Args {
	/// Stream file, or `-` for stdin.
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

#[derive(serde::Serialize)]
struct InspectJson {
	path: String,
	compression: &'static str,
	message_count: usize,
	messages: Vec<MessageJson>,
}

/// Print every message in a stream with its values.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let (compression, messages) = read_stream(&path)?;

	if json {
		let payload = InspectJson {
			path: path.display().to_string(),
			compression: compression.as_str(),
			message_count: messages.len(),
			messages: messages.iter().map(MessageJson::from_message).collect::<Result<Vec<_>>>()?,
		};
		return emit_json(&payload);
	}

	println!("path: {}", path.display());
	println!("compression: {}", compression.as_str());
	println!("messages: {}", messages.len());
	for (index, message) in messages.iter().enumerate() {
		println!(
			"message {index}: type={} class={} timestamp={} topic={:?} data_len={}",
			message.msg_type().as_str(),
			message.class().as_str(),
			message.timestamp(),
			message.topic(),
			message.data().len()
		);
		if let Some(addr) = message.addr() {
			let protocol = message.protocol().map_or("-", |protocol| protocol.as_str());
			println!("  peer: {addr} ({protocol})");
		}
		let Some(array) = message.array() else {
			continue;
		};
		for (position, (tag, value)) in array.iter().enumerate() {
			println!(
				"  [{position}] {} {} width={} count={}: {}",
				tag.unwrap_or("-"),
				value.kind(),
				value.element_width(),
				value.element_count(),
				render_elements(value)?
			);
		}
	}

	Ok(())
}

#[cfg(test)]
mod tests;
