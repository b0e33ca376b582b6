//! Persistence hook implemented by whoever holds the views.

use parking_lot::MutexGuard;

use crate::view::ViewId;

/// Persistence failures reported by a [`ViewOwner`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SaveError {
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
	/// View state could not be encoded.
	#[error("failed to encode view state: {0}")]
	Encode(String),
	/// The owner does not hold this view.
	#[error("view {0} is not held by this owner")]
	UnknownView(ViewId),
	/// The owner was dropped while the view was still in use.
	#[error("view owner is no longer available")]
	Detached,
	/// Injected or backend-specific failure.
	#[error("{0}")]
	Other(String),
}

/// Another view already holds the requested name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("a view named '{0}' already exists")]
pub struct NameTaken(pub String);

/// Held while a view commits a new name. Dropping it lets the next claim proceed.
pub type NameClaim<'a> = Option<MutexGuard<'a, ()>>;

/// Owns a collection of views and persists them.
///
/// Views call [`ViewOwner::save`] synchronously after every committed mutation, never while
/// holding their own lock, so implementations may read view state while saving.
pub trait ViewOwner: Send + Sync {
	/// Persists the current state of all owned views.
	fn save(&self) -> Result<(), SaveError>;

	/// Removes the view with this identity and persists the result.
	fn delete_view(&self, view: ViewId) -> Result<(), SaveError>;

	/// Checks that no other view holds `name`.
	///
	/// The returned claim is held until the rename is committed, so two views cannot take
	/// the same name concurrently. The default accepts every name.
	fn claim_name(&self, _view: ViewId, _name: &str) -> Result<NameClaim<'_>, NameTaken> {
		Ok(None)
	}
}
