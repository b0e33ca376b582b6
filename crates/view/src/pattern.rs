//! Lazily compiled include patterns.
//!
//! # Role
//!
//! A [`PatternFilter`] decides which catalog names a view adds on top of its explicit
//! members. Compilation happens on first use and is cached until the source changes.
//!
//! # Invariants
//!
//! - The cached [`PatternState`] is absent or derived from the current source, never stale.
//! - A source that fails to compile is kept verbatim; it matches nothing until replaced.
//! - A pattern must match the whole name, not a substring of it.

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::settings::PatternSettings;

/// Why a pattern source was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum PatternError {
	/// The source is not a valid regular expression.
	#[error("{0}")]
	Syntax(String),
	/// The compiled program would exceed the configured size limit.
	#[error("pattern is too complex: compiled size exceeds {limit} bytes")]
	TooLarge { limit: usize },
	/// The source is longer than the configured maximum.
	#[error("pattern is {len} characters long; at most {limit} are allowed")]
	SourceTooLong { len: usize, limit: usize },
}

impl From<regex::Error> for PatternError {
	fn from(err: regex::Error) -> Self {
		match err {
			regex::Error::CompiledTooBig(limit) => PatternError::TooLarge { limit },
			other => PatternError::Syntax(other.to_string()),
		}
	}
}

/// Compiled form of the current pattern source.
#[derive(Debug, Clone)]
pub enum PatternState {
	/// No source is set; the filter contributes nothing.
	Disabled,
	/// The source compiled.
	Valid(Regex),
	/// The source failed to compile; the filter contributes nothing.
	Invalid(PatternError),
}

impl PatternState {
	/// Returns the compiled matcher, if the state is [`PatternState::Valid`].
	pub fn matcher(&self) -> Option<&Regex> {
		match self {
			PatternState::Valid(re) => Some(re),
			_ => None,
		}
	}

	pub fn is_valid(&self) -> bool {
		matches!(self, PatternState::Valid(_))
	}
}

/// Include pattern with a compile-on-demand cache.
#[derive(Debug, Clone)]
pub struct PatternFilter {
	source: Option<String>,
	/// `None` until the current source has been compiled.
	state: Option<PatternState>,
	settings: PatternSettings,
}

impl PatternFilter {
	/// Creates a disabled filter.
	pub fn new(settings: PatternSettings) -> Self {
		Self {
			source: None,
			state: None,
			settings,
		}
	}

	/// Creates a filter with an initial source. Nothing is compiled yet.
	pub fn with_source(settings: PatternSettings, source: Option<String>) -> Self {
		Self {
			source,
			state: None,
			settings,
		}
	}

	/// Returns the raw pattern source, including one that does not compile.
	pub fn source(&self) -> Option<&str> {
		self.source.as_deref()
	}

	pub fn settings(&self) -> &PatternSettings {
		&self.settings
	}

	/// Replaces the pattern source and drops the compiled cache.
	pub fn set_source(&mut self, source: Option<String>) {
		self.source = source;
		self.state = None;
	}

	/// Returns the compiled state, compiling the current source if needed.
	pub fn state(&mut self) -> &PatternState {
		let source = self.source.as_deref();
		let settings = &self.settings;
		self.state.get_or_insert_with(|| match source {
			None => PatternState::Disabled,
			Some(source) => match compile(source, settings) {
				Ok(re) => PatternState::Valid(re),
				Err(err) => {
					debug!(pattern = source, error = %err, "include pattern does not compile; matching nothing");
					PatternState::Invalid(err)
				}
			},
		})
	}

	/// Returns whether `candidate` is included by the pattern.
	///
	/// Always `false` when the filter is disabled or its source does not compile.
	pub fn matches(&mut self, candidate: &str) -> bool {
		self.state().matcher().is_some_and(|re| re.is_match(candidate))
	}

	/// Checks a candidate source under this filter's limits without touching its state.
	pub fn validate(&self, candidate: Option<&str>) -> Result<(), PatternError> {
		validate_pattern(candidate, &self.settings)
	}
}

/// Checks that `source` would compile under `settings`.
///
/// An absent or empty source is valid: it disables the filter.
pub fn validate_pattern(source: Option<&str>, settings: &PatternSettings) -> Result<(), PatternError> {
	match source {
		None | Some("") => Ok(()),
		Some(source) => compile(source, settings).map(drop),
	}
}

/// Compiles `source` as a whole-name matcher.
pub(crate) fn compile(source: &str, settings: &PatternSettings) -> Result<Regex, PatternError> {
	let len = source.chars().count();
	if len > settings.max_source_len {
		return Err(PatternError::SourceTooLong {
			len,
			limit: settings.max_source_len,
		});
	}

	// The bare source is checked first: `a)|(b` only balances once wrapped.
	builder(source, settings).build()?;
	Ok(builder(&format!("^(?:{source})$"), settings).build()?)
}

fn builder(pattern: &str, settings: &PatternSettings) -> RegexBuilder {
	let mut builder = RegexBuilder::new(pattern);
	builder
		.size_limit(settings.size_limit)
		.dfa_size_limit(settings.dfa_size_limit)
		.case_insensitive(settings.case_insensitive);
	builder
}

#[cfg(test)]
mod tests;
