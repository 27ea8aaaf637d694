use crate::record::{RecordError, Result};

/// Longest topic the two-byte length prefix can carry.
pub const MAX_TOPIC_LEN: usize = u16::MAX as usize;

/// Validate a publish topic name (no wildcards, no NUL, at most 65535 bytes).
///
/// An empty string is accepted and means "no topic".
pub fn validate_topic_name(topic: &str) -> Result<()> {
	let reject = |reason| {
		Err(RecordError::InvalidTopic {
			topic: topic.to_owned(),
			reason,
		})
	};

	if topic.len() > MAX_TOPIC_LEN {
		return reject("longer than 65535 bytes");
	}
	if topic.contains('\0') {
		return reject("contains NUL");
	}
	if topic.contains(['+', '#']) {
		return reject("wildcards are not allowed in topic names");
	}
	Ok(())
}

/// Match a topic name against a filter with `+` and `#` wildcards.
pub fn topic_matches(filter: &str, topic: &str) -> bool {
	let mut filter_levels = filter.split('/');
	let mut topic_levels = topic.split('/');

	loop {
		match (filter_levels.next(), topic_levels.next()) {
			(Some("#"), _) => return filter_levels.next().is_none(),
			(Some("+"), Some(_)) => {}
			(Some(want), Some(got)) if want == got => {}
			(None, None) => return true,
			_ => return false,
		}
	}
}
