//! View settings loaded from TOML.

use serde::{Deserialize, Serialize};

/// Settings shared by every view of a store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
	/// Include pattern compilation limits.
	pub pattern: PatternSettings,
}

impl Settings {
	/// Parses settings from a TOML document. Missing keys take their defaults.
	pub fn from_toml(text: &str) -> Result<Self, SettingsError> {
		Ok(toml::from_str(text)?)
	}
}

/// Bounds on include pattern cost.
///
/// Matching itself runs in time linear in the candidate length; these limits bound the
/// size of what gets compiled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatternSettings {
	/// Maximum compiled program size in bytes.
	pub size_limit: usize,
	/// Maximum lazy DFA cache size in bytes.
	pub dfa_size_limit: usize,
	/// Maximum pattern source length in characters.
	pub max_source_len: usize,
	/// Match item names ignoring case.
	pub case_insensitive: bool,
}

impl Default for PatternSettings {
	fn default() -> Self {
		Self {
			size_limit: 1 << 20,
			dfa_size_limit: 2 << 20,
			max_source_len: 1024,
			case_insensitive: false,
		}
	}
}

/// Settings parsing failure.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("invalid settings: {0}")]
	Parse(#[from] toml::de::Error),
}
