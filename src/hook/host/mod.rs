use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::hook::{Config, Hooks};
use crate::record::{Channel, ChannelReceiver, DEFAULT_CHANNEL_CAPACITY, Message, RecordError, Result, channel, topic_matches};

const STOP_POLL: Duration = Duration::from_millis(20);

/// Where a hook instance is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookState {
	/// Not configured yet, or waiting for the next call.
	Idle,
	/// Inside `configure`.
	Configuring,
	/// Inside `source`.
	Sourcing,
	/// Inside `process`.
	Processing,
	/// Last call handed at least one message to the host.
	Sent,
	/// Last call sent nothing; the message was discarded.
	Dropped,
	/// Torn down; no hook is invoked again.
	Failed,
}

impl HookState {
	/// Render as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Idle => "idle",
			Self::Configuring => "configuring",
			Self::Sourcing => "sourcing",
			Self::Processing => "processing",
			Self::Sent => "sent",
			Self::Dropped => "dropped",
			Self::Failed => "failed",
		}
	}
}

/// Cloneable flag asking a running source loop to stop.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
	/// Fresh, unset signal.
	pub fn new() -> Self {
		Self::default()
	}

	/// Request a stop.
	pub fn stop(&self) {
		self.0.store(true, Ordering::Release);
	}

	/// Whether a stop was requested.
	pub fn is_stopped(&self) -> bool {
		self.0.load(Ordering::Acquire)
	}
}

/// Host knobs.
#[derive(Debug, Clone)]
pub struct HostOptions {
	/// Delay between `source` calls when the hook has no preference.
	pub source_interval: Duration,
	/// Only messages whose topic matches this filter reach `process`.
	pub topic_filter: Option<String>,
	/// Messages the host may leave undrained before sends fail.
	pub channel_capacity: usize,
}

impl Default for HostOptions {
	fn default() -> Self {
		Self {
			source_interval: Duration::from_secs(1),
			topic_filter: None,
			channel_capacity: DEFAULT_CHANNEL_CAPACITY,
		}
	}
}

/// Counters kept across calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct HostStats {
	/// `source` invocations.
	pub sourced: usize,
	/// `process` invocations.
	pub processed: usize,
	/// Inbound messages skipped by the topic filter.
	pub filtered: usize,
	/// Messages handed to the host.
	pub sent: usize,
	/// Calls that sent nothing.
	pub dropped: usize,
}

/// Drives one hook instance: configure once, then process or source.
pub struct HookHost<H: Hooks> {
	hooks: H,
	options: HostOptions,
	state: HookState,
	configured: bool,
	channel: Channel,
	receiver: ChannelReceiver,
	stats: HostStats,
	stop: StopSignal,
}

impl<H: Hooks> HookHost<H> {
	/// Host with default options.
	pub fn new(hooks: H) -> Self {
		Self::with_options(hooks, HostOptions::default())
	}

	/// Host with explicit options.
	pub fn with_options(hooks: H, options: HostOptions) -> Self {
		let (channel, receiver) = channel(options.channel_capacity.max(1));
		Self {
			hooks,
			options,
			state: HookState::Idle,
			configured: false,
			channel,
			receiver,
			stats: HostStats::default(),
			stop: StopSignal::new(),
		}
	}

	/// Current lifecycle state.
	pub fn state(&self) -> HookState {
		self.state
	}

	/// Counters so far.
	pub fn stats(&self) -> HostStats {
		self.stats
	}

	/// Handle for stopping [`HookHost::run_source`] from elsewhere.
	pub fn stop_signal(&self) -> StopSignal {
		self.stop.clone()
	}

	/// Hook set being driven.
	pub fn hooks(&self) -> &H {
		&self.hooks
	}

	/// Give back the hook set.
	pub fn into_hooks(self) -> H {
		self.hooks
	}

	/// Messages sent so far and not yet drained.
	pub fn drain(&self) -> Vec<Message> {
		self.receiver.drain()
	}

	/// Run `configure` once. A `false` return leaves the instance failed.
	pub fn configure(&mut self, config: &Config) -> Result<()> {
		if self.state == HookState::Failed {
			return Err(RecordError::HookFailed { hook: "configure" });
		}
		if self.configured {
			return Err(RecordError::AlreadyConfigured {
				instance: config.instance().to_owned(),
			});
		}

		self.state = HookState::Configuring;
		debug!(instance = config.instance(), "configuring");
		if !self.hooks.configure(config) {
			self.state = HookState::Failed;
			warn!(instance = config.instance(), "configuration rejected");
			return Err(RecordError::Configuration {
				instance: config.instance().to_owned(),
			});
		}

		for key in config.unused_keys() {
			warn!(instance = config.instance(), key, "setting was not used");
		}

		self.configured = true;
		self.state = HookState::Idle;
		Ok(())
	}

	/// Deliver one inbound message to `process`.
	///
	/// Returns [`HookState::Sent`] or [`HookState::Dropped`]. Messages outside
	/// the topic filter are dropped without invoking the hook.
	pub fn process_once(&mut self, message: Message) -> Result<HookState> {
		self.ensure_ready("process")?;

		if let Some(filter) = &self.options.topic_filter
			&& !topic_matches(filter, message.topic())
		{
			self.stats.filtered += 1;
			self.stats.dropped += 1;
			debug!(topic = message.topic(), filter = filter.as_str(), "message filtered");
			self.state = HookState::Dropped;
			return Ok(self.finish());
		}

		self.stats.processed += 1;
		self.state = HookState::Processing;
		let before = self.channel.sent();
		let ok = self.hooks.process(&mut self.channel, message);
		self.settle("process", ok, before)
	}

	/// Hand a fresh message to `source`.
	pub fn source_once(&mut self) -> Result<HookState> {
		self.ensure_ready("source")?;

		self.stats.sourced += 1;
		self.state = HookState::Sourcing;
		let before = self.channel.sent();
		let ok = self.hooks.source(&mut self.channel, Message::new());
		self.settle("source", ok, before)
	}

	/// Run `process` over `messages`, passing every sent message to `sink`.
	pub fn process_all<I, F>(&mut self, messages: I, mut sink: F) -> Result<usize>
	where
		I: IntoIterator<Item = Message>,
		F: FnMut(Message),
	{
		let mut calls = 0;
		for message in messages {
			self.process_once(message)?;
			calls += 1;
			self.receiver.drain().into_iter().for_each(&mut sink);
		}
		Ok(calls)
	}

	/// Call `source` repeatedly, pausing between calls, until `limit` calls
	/// have been made or the stop signal is raised.
	pub fn run_source<F>(&mut self, limit: Option<usize>, mut sink: F) -> Result<usize>
	where
		F: FnMut(Message),
	{
		let interval = self.hooks.source_interval().unwrap_or(self.options.source_interval);
		let interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
		info!(interval_ms, "source loop started");

		let mut calls = 0;
		while !self.stop.is_stopped() {
			self.source_once()?;
			calls += 1;
			self.receiver.drain().into_iter().for_each(&mut sink);

			if limit.is_some_and(|limit| calls >= limit) {
				break;
			}
			self.pause(interval);
		}

		info!(calls, "source loop finished");
		Ok(calls)
	}

	fn ensure_ready(&self, hook: &'static str) -> Result<()> {
		if self.state == HookState::Failed {
			return Err(RecordError::HookFailed { hook });
		}
		if !self.configured {
			return Err(RecordError::NotConfigured);
		}
		Ok(())
	}

	fn settle(&mut self, hook: &'static str, ok: bool, before: usize) -> Result<HookState> {
		let failure = self.channel.take_failure();
		if !ok || failure.is_some() {
			self.state = HookState::Failed;
			warn!(hook, ?failure, "hook failed, instance torn down");
			return Err(RecordError::HookFailed { hook });
		}

		let sent = self.channel.sent() - before;
		if sent > 0 {
			self.stats.sent += sent;
			self.state = HookState::Sent;
		} else {
			self.stats.dropped += 1;
			self.state = HookState::Dropped;
		}
		debug!(hook, sent, state = self.state.as_str(), "hook returned");
		Ok(self.finish())
	}

	fn finish(&mut self) -> HookState {
		let outcome = self.state;
		self.state = HookState::Idle;
		outcome
	}

	fn pause(&self, interval: Duration) {
		let deadline = Instant::now() + interval;
		while !self.stop.is_stopped() {
			let now = Instant::now();
			if now >= deadline {
				break;
			}
			thread::sleep((deadline - now).min(STOP_POLL));
		}
	}
}
