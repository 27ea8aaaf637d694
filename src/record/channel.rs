use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};

use tracing::{debug, warn};

use crate::record::Message;

/// Default number of messages the host may leave undrained.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Why a send did not reach the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendFailure {
	/// Host queue was full.
	Backpressure,
	/// Host side was dropped.
	Closed,
}

/// One-way sink that hands messages to the host.
///
/// `send` consumes the message, so the caller cannot touch it afterwards.
/// Failures are not returned to the caller; they are recorded here and the
/// host turns them into a failed hook outcome.
pub struct Channel {
	sender: SyncSender<Message>,
	sent: usize,
	failure: Option<SendFailure>,
}

/// Host end of a [`Channel`].
pub struct ChannelReceiver {
	receiver: Receiver<Message>,
}

/// Create a bounded channel pair.
pub fn channel(capacity: usize) -> (Channel, ChannelReceiver) {
	let (sender, receiver) = mpsc::sync_channel(capacity);
	(
		Channel {
			sender,
			sent: 0,
			failure: None,
		},
		ChannelReceiver { receiver },
	)
}

impl Channel {
	/// Transfer `message` to the host.
	pub fn send(&mut self, message: Message) {
		match self.sender.try_send(message) {
			Ok(()) => {
				self.sent += 1;
				debug!(sent = self.sent, "message handed to host");
			}
			Err(TrySendError::Full(_)) => {
				warn!("host queue full, message dropped");
				self.failure.get_or_insert(SendFailure::Backpressure);
			}
			Err(TrySendError::Disconnected(_)) => {
				warn!("host receiver closed, message dropped");
				self.failure.get_or_insert(SendFailure::Closed);
			}
		}
	}

	/// Messages delivered since creation.
	pub fn sent(&self) -> usize {
		self.sent
	}

	/// Clear and return the first failure recorded since the last call.
	pub fn take_failure(&mut self) -> Option<SendFailure> {
		self.failure.take()
	}
}

impl ChannelReceiver {
	/// Next queued message without blocking.
	pub fn try_recv(&self) -> Option<Message> {
		self.receiver.try_recv().ok()
	}

	/// Drain every queued message.
	pub fn drain(&self) -> Vec<Message> {
		self.receiver.try_iter().collect()
	}
}
