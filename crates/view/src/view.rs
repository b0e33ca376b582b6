//! Membership views and their snapshot read path.
//!
//! # Role
//!
//! [`MembershipView`] owns the explicit member set and include pattern of one view, and
//! resolves them against the shared [`Catalog`] on read. Mutation lives in
//! [`crate::configure`].
//!
//! # Invariants
//!
//! - A snapshot never contains two items whose names are equal ignoring case.
//! - A snapshot only contains names the catalog currently resolves.
//! - Every explicit member the catalog resolves appears in the snapshot; pattern matches
//!   only add names not already present.
//! - Explicit members missing from the catalog stay stored until explicitly removed.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use tracing::debug;
use vista_primitives::IdentifierSet;

use crate::catalog::Catalog;
use crate::owner::ViewOwner;
use crate::pattern::{PatternFilter, PatternState};
use crate::settings::PatternSettings;

/// Counter for generating unique view IDs.
static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a view, stable across renames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

impl ViewId {
	/// Generates a new unique view ID.
	pub fn next() -> Self {
		Self(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed))
	}
}

impl fmt::Display for ViewId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Persisted form of a view. The compiled pattern is never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Explicit member names.
	#[serde(default)]
	pub members: IdentifierSet,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub include_pattern: Option<String>,
}

/// Mutable view state, guarded by the view lock.
pub(crate) struct ViewInner {
	pub(crate) name: String,
	pub(crate) description: Option<String>,
	pub(crate) members: IdentifierSet,
	pub(crate) pattern: PatternFilter,
}

/// A named, dynamically filtered subset of a catalog.
pub struct MembershipView<C: Catalog> {
	pub(crate) id: ViewId,
	pub(crate) catalog: Arc<C>,
	pub(crate) owner: Arc<dyn ViewOwner>,
	pub(crate) inner: Mutex<ViewInner>,
}

impl<C: Catalog> MembershipView<C> {
	/// Creates an empty view. The name is not validated here.
	pub fn new(
		catalog: Arc<C>,
		owner: Arc<dyn ViewOwner>,
		name: impl Into<String>,
		settings: PatternSettings,
	) -> Self {
		Self::from_state(
			catalog,
			owner,
			ViewState {
				name: name.into(),
				..ViewState::default()
			},
			settings,
		)
	}

	/// Restores a view from its persisted form.
	pub fn from_state(
		catalog: Arc<C>,
		owner: Arc<dyn ViewOwner>,
		state: ViewState,
		settings: PatternSettings,
	) -> Self {
		Self {
			id: ViewId::next(),
			catalog,
			owner,
			inner: Mutex::new(ViewInner {
				name: state.name,
				description: state.description,
				members: state.members,
				pattern: PatternFilter::with_source(settings, state.include_pattern),
			}),
		}
	}

	pub(crate) fn lock(&self) -> MutexGuard<'_, ViewInner> {
		self.inner.lock()
	}

	/// Returns the resolved, ordered, duplicate-free items this view presents.
	///
	/// The membership set and compiled pattern are copied under the view lock; catalog
	/// enumeration, matching and resolution run after it is released.
	pub fn snapshot(&self) -> Vec<C::Item> {
		let (explicit, matcher) = {
			let mut inner = self.lock();
			let matcher = inner.pattern.state().matcher().cloned();
			(inner.members.clone(), matcher)
		};

		// Only resolvable explicit members claim a slot, so an unresolvable case variant
		// cannot hide a pattern match.
		let mut names: IdentifierSet = explicit
			.iter()
			.filter(|name| self.catalog.get_item(name).is_some())
			.collect();
		let mut matched = 0;
		if let Some(re) = &matcher {
			for name in self.catalog.item_names().into_iter().filter(|name| re.is_match(name)) {
				matched += usize::from(names.insert(name));
			}
		}

		let items: Vec<C::Item> = names.iter().filter_map(|name| self.catalog.get_item(name)).collect();
		debug!(
			explicit = explicit.len(),
			matched,
			resolved = items.len(),
			"view snapshot"
		);
		items
	}

	/// Alias of [`MembershipView::snapshot`].
	pub fn list_members(&self) -> Vec<C::Item> {
		self.snapshot()
	}

	/// Looks up any catalog item by name, member or not.
	pub fn get_item(&self, name: &str) -> Option<C::Item> {
		self.catalog.get_item(name)
	}

	/// Returns whether `name` is an explicit member. Pattern inclusion is not considered.
	pub fn contains(&self, name: &str) -> bool {
		self.lock().members.contains(name)
	}

	pub fn id(&self) -> ViewId {
		self.id
	}

	pub fn name(&self) -> String {
		self.lock().name.clone()
	}

	pub fn display_name(&self) -> String {
		self.name()
	}

	pub fn description(&self) -> Option<String> {
		self.lock().description.clone()
	}

	/// Returns the raw include pattern, even one that does not compile.
	pub fn pattern_source(&self) -> Option<String> {
		self.lock().pattern.source().map(str::to_owned)
	}

	/// Returns the compiled pattern state, compiling it if needed.
	pub fn pattern_state(&self) -> PatternState {
		self.lock().pattern.state().clone()
	}

	/// Routing path of this view, relative to the application root.
	pub fn url(&self) -> String {
		format!("view/{}/", self.lock().name)
	}

	/// Returns the persisted form of this view.
	pub fn state(&self) -> ViewState {
		let inner = self.lock();
		ViewState {
			name: inner.name.clone(),
			description: inner.description.clone(),
			members: inner.members.clone(),
			include_pattern: inner.pattern.source().map(str::to_owned),
		}
	}

	pub fn catalog(&self) -> &Arc<C> {
		&self.catalog
	}
}

impl<C: Catalog> fmt::Debug for MembershipView<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let inner = self.lock();
		f.debug_struct("MembershipView")
			.field("id", &self.id)
			.field("name", &inner.name)
			.field("members", &inner.members)
			.field("include_pattern", &inner.pattern.source())
			.finish_non_exhaustive()
	}
}
