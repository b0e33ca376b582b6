//! Naming rules shared by catalog items and views.
//!
//! Names appear in routing paths, so anything that would break a path segment or
//! a query string is rejected.

/// Characters that may not appear in a name.
pub const UNSAFE_CHARS: &str = "?*/\\%!@#$^&|<>[]:;";

/// Reason a proposed name was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
	/// The name is empty.
	#[error("no name is specified")]
	Empty,
	/// The name contains a control character.
	#[error("control code is not allowed in name '{printable}' (at position {position})")]
	ControlChar {
		/// The name with control characters escaped.
		printable: String,
		/// Character position of the first offending character.
		position: usize,
	},
	/// The name is `.` or `..`.
	#[error("'{0}' is not an allowed name")]
	Reserved(String),
	/// The name contains one of [`UNSAFE_CHARS`].
	#[error("'{ch}' is an unsafe character (at position {position})")]
	UnsafeChar {
		/// The offending character.
		ch: char,
		/// Character position of the offending character.
		position: usize,
	},
}

/// Checks that `name` is usable as an item or view name.
///
/// # Errors
///
/// Returns the first rule the name violates, scanning left to right.
pub fn check_good_name(name: &str) -> Result<(), NameError> {
	if name.is_empty() {
		return Err(NameError::Empty);
	}
	if name == "." || name == ".." {
		return Err(NameError::Reserved(name.to_string()));
	}

	for (position, ch) in name.chars().enumerate() {
		if ch.is_control() {
			return Err(NameError::ControlChar {
				printable: name.escape_debug().to_string(),
				position,
			});
		}
		if UNSAFE_CHARS.contains(ch) {
			return Err(NameError::UnsafeChar { ch, position });
		}
	}

	Ok(())
}
