use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use crate::record::{RecordError, Result};

/// Read-only settings for one hook instance.
///
/// Every getter marks the key as consumed; keys nobody asked for are
/// reported by [`Config::unused_keys`] so the host can warn about typos.
#[derive(Debug, Clone, Default)]
pub struct Config {
	instance: String,
	entries: BTreeMap<String, String>,
	used: RefCell<BTreeSet<String>>,
}

impl Config {
	/// Empty configuration for `instance`.
	pub fn new(instance: &str) -> Self {
		Self {
			instance: instance.to_owned(),
			..Self::default()
		}
	}

	/// Builder-style setting insertion.
	pub fn with(mut self, key: &str, value: &str) -> Self {
		self.insert(key, value);
		self
	}

	/// Insert or replace a setting.
	pub fn insert(&mut self, key: &str, value: &str) {
		self.entries.insert(key.to_owned(), value.to_owned());
	}

	/// Parse `[instance]` sections of `key=value` lines.
	///
	/// Blank lines and lines starting with `#` are skipped. Settings outside a
	/// section, lines without `=`, empty keys and repeated keys are rejected.
	pub fn parse(text: &str) -> Result<Vec<Config>> {
		let mut out: Vec<Config> = Vec::new();

		for (index, raw) in text.lines().enumerate() {
			let line = raw.trim();
			let syntax = || RecordError::ConfigSyntax {
				line: index + 1,
				text: raw.to_owned(),
			};

			if line.is_empty() || line.starts_with('#') {
				continue;
			}

			if let Some(rest) = line.strip_prefix('[') {
				let name = rest.strip_suffix(']').map(str::trim).ok_or_else(syntax)?;
				if name.is_empty() {
					return Err(syntax());
				}
				out.push(Config::new(name));
				continue;
			}

			let current = out.last_mut().ok_or_else(syntax)?;
			let (key, value) = line.split_once('=').ok_or_else(syntax)?;
			let key = key.trim();
			if key.is_empty() || current.entries.contains_key(key) {
				return Err(syntax());
			}
			current.insert(key, value.trim());
		}

		Ok(out)
	}

	/// Pick the section called `instance` from parsed text.
	pub fn parse_instance(text: &str, instance: &str) -> Result<Config> {
		Self::parse(text)?
			.into_iter()
			.find(|config| config.instance == instance)
			.ok_or_else(|| RecordError::Configuration {
				instance: instance.to_owned(),
			})
	}

	/// Instance name.
	pub fn instance(&self) -> &str {
		&self.instance
	}

	/// Raw setting value; `None` when absent.
	pub fn get(&self, key: &str) -> Option<&str> {
		let value = self.entries.get(key)?;
		self.used.borrow_mut().insert(key.to_owned());
		Some(value)
	}

	/// Setting parsed as `yes`/`no` (also `true`/`false`, `1`/`0`).
	pub fn get_yesno(&self, key: &str) -> Result<Option<bool>> {
		let Some(raw) = self.get(key) else {
			return Ok(None);
		};

		match raw.to_ascii_lowercase().as_str() {
			"yes" | "true" | "1" => Ok(Some(true)),
			"no" | "false" | "0" => Ok(Some(false)),
			_ => Err(config_value(key, raw, "yes/no")),
		}
	}

	/// Setting parsed as an unsigned decimal integer.
	pub fn get_unsigned(&self, key: &str) -> Result<Option<u64>> {
		let Some(raw) = self.get(key) else {
			return Ok(None);
		};

		raw.parse::<u64>().map(Some).map_err(|_| config_value(key, raw, "unsigned integer"))
	}

	/// Settings present but never read through a getter.
	pub fn unused_keys(&self) -> Vec<&str> {
		let used = self.used.borrow();
		self.entries.keys().filter(|key| !used.contains(*key)).map(String::as_str).collect()
	}

	/// Number of settings.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// True when the instance has no settings.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

fn config_value(key: &str, value: &str, expected: &'static str) -> RecordError {
	RecordError::ConfigValue {
		key: key.to_owned(),
		value: value.to_owned(),
		expected,
	}
}
