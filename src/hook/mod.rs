use std::time::Duration;

use crate::record::{Channel, Message};

mod config;
mod host;
mod script;

/// Instance settings.
pub use config::Config;
/// Hook host, run state, and stop handling.
pub use host::{HookHost, HookState, HostOptions, HostStats, StopSignal};
/// Decode-and-forward hook set.
pub use script::ForwardScript;

/// The three entry points a script provides.
///
/// `configure` runs once before any message flows; returning `false` is fatal.
/// `process` and `source` own the message they are given: it reaches the host
/// only if passed to [`Channel::send`], otherwise it is dropped. Returning
/// `false` from either tears the instance down.
pub trait Hooks {
	/// Read settings for this instance.
	fn configure(&mut self, config: &Config) -> bool;

	/// Handle one inbound message.
	fn process(&mut self, channel: &mut Channel, message: Message) -> bool;

	/// Fill a fresh, array-less message.
	fn source(&mut self, channel: &mut Channel, message: Message) -> bool;

	/// Preferred delay between `source` calls; `None` uses the host default.
	fn source_interval(&self) -> Option<Duration> {
		None
	}
}
