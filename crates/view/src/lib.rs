//! Named, mutable, dynamically filtered membership views over an item catalog.
//!
//! A [`MembershipView`] keeps an explicit set of member names plus an optional include
//! pattern. Reading it through [`MembershipView::snapshot`] yields the catalog items that are
//! either explicit members or match the pattern, in case-insensitive name order.
//!
//! # Collaborators
//!
//! - [`Catalog`] - the registry of items the view selects from (read-only here)
//! - [`ViewOwner`] - persists views and removes them on deletion
//! - [`Authorizer`] - gates every mutating operation
//!
//! # Concurrency
//!
//! Each view guards its state with one lock. Configuration changes commit in a single
//! critical section; snapshots copy the membership under the lock and do catalog work
//! outside it.

pub mod authz;
pub mod catalog;
pub mod configure;
pub mod memory;
pub mod owner;
pub mod pattern;
pub mod settings;
pub mod view;

pub use authz::{AllowAll, AuthorizationError, Authorizer, Grants, Permission};
pub use catalog::{Catalog, CatalogError, CatalogItem};
pub use configure::{Redirect, ViewConfiguration};
pub use owner::{NameClaim, NameTaken, SaveError, ViewOwner};
pub use pattern::{PatternError, PatternFilter, PatternState, validate_pattern};
pub use settings::{PatternSettings, Settings, SettingsError};
pub use view::{MembershipView, ViewId, ViewState};
pub use vista_primitives::{IdentifierSet, NameError};

/// A convenient type alias for `Result` with `E` = [`enum@crate::ViewError`].
pub type Result<T, E = ViewError> = std::result::Result<T, E>;

/// Errors returned by view operations.
///
/// Validation and authorization failures leave the view untouched. A [`ViewError::Save`]
/// is reported after the change was committed in memory.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ViewError {
	/// The caller lacks the permission the operation requires.
	#[error(transparent)]
	Unauthorized(#[from] AuthorizationError),
	/// The proposed view name breaks the catalog's naming rules.
	#[error("invalid view name: {0}")]
	InvalidName(#[from] NameError),
	/// Another view already holds the proposed name.
	#[error(transparent)]
	NameTaken(#[from] NameTaken),
	/// The proposed include pattern does not compile.
	#[error("invalid include pattern: {0}")]
	InvalidPattern(#[from] PatternError),
	/// The catalog refused to create an item.
	#[error(transparent)]
	Catalog(#[from] CatalogError),
	/// The owner failed to persist or remove the view.
	#[error("failed to persist view: {0}")]
	Save(#[from] SaveError),
}
