//! The external item registry views select from.

use std::sync::Arc;

use vista_primitives::{NameError, check_good_name};

/// An addressable catalog entry.
pub trait CatalogItem {
	/// The item's unique name.
	fn name(&self) -> &str;
}

impl<T: CatalogItem + ?Sized> CatalogItem for Arc<T> {
	fn name(&self) -> &str {
		(**self).name()
	}
}

/// Item creation failures.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CatalogError {
	/// The requested item name breaks the naming rules.
	#[error("invalid item name: {0}")]
	InvalidName(#[from] NameError),
	/// An item with this name already exists.
	#[error("an item named '{0}' already exists")]
	AlreadyExists(String),
	/// The catalog refused the request for another reason.
	#[error("{0}")]
	Rejected(String),
	/// Backing storage failed.
	#[error("catalog I/O error: {0}")]
	Io(#[from] std::io::Error),
}

/// Registry of uniquely named items, shared by every view.
///
/// Views only read from the catalog, except for [`Catalog::create_item`] which a view
/// forwards on behalf of its caller. Implementations must tolerate concurrent reads.
pub trait Catalog: Send + Sync {
	/// Resolved item handle returned to view readers.
	type Item: CatalogItem + Clone + Send + Sync;
	/// Payload describing an item to create.
	type Request;

	/// Returns the names of all items.
	fn item_names(&self) -> Vec<String>;

	/// Looks up an item by exact name.
	fn get_item(&self, name: &str) -> Option<Self::Item>;

	/// Creates a new item.
	///
	/// # Errors
	///
	/// Returns [`CatalogError`] when the catalog rejects the request.
	fn create_item(&self, request: Self::Request) -> Result<Self::Item, CatalogError>;

	/// Returns all items that still resolve, in enumeration order.
	fn items(&self) -> Vec<Self::Item> {
		self.item_names()
			.iter()
			.filter_map(|name| self.get_item(name))
			.collect()
	}

	/// Checks a proposed item or view name against the catalog-wide rules.
	fn check_name(&self, name: &str) -> Result<(), NameError> {
		check_good_name(name)
	}
}
