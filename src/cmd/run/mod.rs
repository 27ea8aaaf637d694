use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use rrscript::hook::{Config, ForwardScript, HookHost, HostOptions, HostStats};
use rrscript::record::{Message, RecordError, Result};
use tracing::info;

use crate::cmd::util::{MessageJson, compression_flag, emit_json, read_stream, write_stream};

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum Mode {
	/// Feed every input message to `process`.
	Process,
	/// Call `source` `--count` times.
	Source,
}

impl Mode {
	fn as_str(self) -> &'static str {
		match self {
			Self::Process => "process",
			Self::Source => "source",
		}
	}
}

#[derive(clap::Args)]
pub struct Args {
	/// Input stream for process mode, or `-` for stdin.
	pub input: Option<PathBuf>,
	#[arg(long, value_enum, default_value = "process")]
	pub mode: Mode,
	/// Settings file with `[instance]` sections.
	#[arg(long)]
	pub config: Option<PathBuf>,
	#[arg(long, default_value = "forward")]
	pub instance: String,
	/// Extra `key=value` setting, applied after the file. Repeatable.
	#[arg(long = "set")]
	pub settings: Vec<String>,
	/// Source calls to make in source mode.
	#[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
	pub count: u64,
	/// Host delay between source calls when the script sets none.
	#[arg(long, default_value_t = 1000)]
	pub interval_ms: u64,
	/// MQTT-style filter; non-matching messages skip `process`.
	#[arg(long)]
	pub topic_filter: Option<String>,
	/// Write sent messages to this stream file.
	#[arg(long, short)]
	pub out: Option<PathBuf>,
	#[arg(long)]
	pub zstd: bool,
	#[arg(long)]
	pub json: bool,
}

#[derive(serde::Serialize)]
struct RunJson {
	instance: String,
	mode: &'static str,
	calls: usize,
	stats: HostStats,
	output: Option<String>,
	messages: Vec<MessageJson>,
}

/// Configure the forward script and drive it over a stream or as a source.
pub fn run(args: Args) -> Result<()> {
	let Args {
		input,
		mode,
		config,
		instance,
		settings,
		count,
		interval_ms,
		topic_filter,
		out,
		zstd,
		json,
	} = args;

	let config = load_config(config.as_ref(), &instance, &settings)?;
	let options = HostOptions {
		source_interval: Duration::from_millis(interval_ms),
		topic_filter,
		..HostOptions::default()
	};
	let mut host = HookHost::with_options(ForwardScript::new(), options);
	host.configure(&config)?;

	let mut sent: Vec<Message> = Vec::new();
	let calls = match mode {
		Mode::Process => {
			let input = input.ok_or(RecordError::InvalidValueSpec {
				spec: "process mode needs an input stream".to_owned(),
			})?;
			let (_, messages) = read_stream(&input)?;
			host.process_all(messages, |message| sent.push(message))?
		}
		Mode::Source => host.run_source(Some(usize::try_from(count).unwrap_or(usize::MAX)), |message| sent.push(message))?,
	};

	let stats = host.stats();
	info!(calls, sent = stats.sent, dropped = stats.dropped, "run finished");

	if let Some(path) = &out {
		write_stream(path, &sent, compression_flag(zstd))?;
	}

	if json {
		return emit_json(&RunJson {
			instance,
			mode: mode.as_str(),
			calls,
			stats,
			output: out.map(|path| path.display().to_string()),
			messages: sent.iter().map(MessageJson::from_message).collect::<Result<Vec<_>>>()?,
		});
	}

	println!("instance: {instance}");
	println!("mode: {}", mode.as_str());
	println!("calls: {calls}");
	println!("sent: {}", stats.sent);
	println!("dropped: {}", stats.dropped);
	println!("filtered: {}", stats.filtered);
	if let Some(path) = &out {
		println!("output: {}", path.display());
	}
	Ok(())
}

fn load_config(path: Option<&PathBuf>, instance: &str, settings: &[String]) -> Result<Config> {
	let mut config = match path {
		Some(path) => Config::parse_instance(&fs::read_to_string(path)?, instance)?,
		None => Config::new(instance),
	};

	for setting in settings {
		let (key, value) = setting.split_once('=').ok_or_else(|| RecordError::InvalidValueSpec { spec: setting.clone() })?;
		config.insert(key.trim(), value.trim());
	}
	Ok(config)
}
