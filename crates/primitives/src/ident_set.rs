//! Ordered identifier set with case-insensitive identity.
//!
//! # Invariants
//!
//! - Two identifiers that differ only by case are the same member.
//! - The first spelling inserted is the one kept; later inserts differing only by case are no-ops.
//! - Iteration is ascending under [`cmp_ignore_case`].

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Compares two identifiers ignoring case.
///
/// Characters are lowercased with full Unicode case mapping before comparison, so the
/// ordering is total and consistent with case-insensitive equality.
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
	a.chars()
		.flat_map(char::to_lowercase)
		.cmp(b.chars().flat_map(char::to_lowercase))
}

/// Identifier stored under case-insensitive ordering.
#[derive(Clone)]
struct Folded(String);

impl PartialEq for Folded {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for Folded {}

impl PartialOrd for Folded {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Folded {
	fn cmp(&self, other: &Self) -> Ordering {
		cmp_ignore_case(&self.0, &other.0)
	}
}

/// Ordered, case-insensitive, duplicate-free set of identifiers.
///
/// This is the durable membership record of a view. It performs no validation; callers
/// check identifiers against the catalog's naming rules before inserting.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct IdentifierSet {
	entries: BTreeSet<Folded>,
}

impl IdentifierSet {
	/// Creates an empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts an identifier, returning `false` if an equal (ignoring case) one was present.
	pub fn insert(&mut self, id: impl Into<String>) -> bool {
		self.entries.insert(Folded(id.into()))
	}

	/// Removes an identifier regardless of its stored spelling.
	pub fn remove(&mut self, id: &str) -> bool {
		self.entries.remove(&Folded(id.to_owned()))
	}

	/// Returns whether the set holds `id`, ignoring case.
	pub fn contains(&self, id: &str) -> bool {
		self.entries.contains(&Folded(id.to_owned()))
	}

	/// Returns the stored spelling of `id`, if present.
	pub fn get(&self, id: &str) -> Option<&str> {
		self.entries.get(&Folded(id.to_owned())).map(|f| f.0.as_str())
	}

	/// Removes every identifier.
	pub fn clear(&mut self) {
		self.entries.clear();
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates identifiers in case-insensitive ascending order.
	pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator + '_ {
		self.entries.iter().map(|f| f.0.as_str())
	}

	/// Returns an owned, ordered copy of the identifiers.
	pub fn to_vec(&self) -> Vec<String> {
		self.iter().map(str::to_owned).collect()
	}
}

impl fmt::Debug for IdentifierSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.iter()).finish()
	}
}

impl<S: Into<String>> FromIterator<S> for IdentifierSet {
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		let mut set = Self::new();
		set.extend(iter);
		set
	}
}

impl<S: Into<String>> Extend<S> for IdentifierSet {
	fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
		for id in iter {
			self.insert(id);
		}
	}
}

impl Serialize for IdentifierSet {
	fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
		serializer.collect_seq(self.iter())
	}
}

impl<'de> Deserialize<'de> for IdentifierSet {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		Vec::<String>::deserialize(deserializer).map(Self::from_iter)
	}
}

#[cfg(test)]
mod tests;
