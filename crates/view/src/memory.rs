//! In-memory catalog and owner, for embedding and tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::{Mutex, RwLock};

use crate::catalog::{Catalog, CatalogError, CatalogItem};
use crate::owner::{NameClaim, NameTaken, SaveError, ViewOwner};
use crate::view::ViewId;

/// Item held by a [`MemoryCatalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryItem {
	pub name: String,
	pub description: Option<String>,
}

impl CatalogItem for MemoryItem {
	fn name(&self) -> &str {
		&self.name
	}
}

/// Creation request for a [`MemoryCatalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
	pub name: String,
	pub description: Option<String>,
}

impl NewItem {
	pub fn named(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			description: None,
		}
	}
}

/// Catalog backed by a sorted map. Lookups are case-sensitive.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
	items: RwLock<BTreeMap<String, Arc<MemoryItem>>>,
}

impl MemoryCatalog {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a catalog holding one undescribed item per name.
	pub fn with_names<I, S>(names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let catalog = Self::new();
		for name in names {
			catalog.insert(NewItem::named(name));
		}
		catalog
	}

	/// Inserts or replaces an item without validation.
	pub fn insert(&self, item: NewItem) -> Arc<MemoryItem> {
		let item = Arc::new(MemoryItem {
			name: item.name,
			description: item.description,
		});
		self.items.write().insert(item.name.clone(), item.clone());
		item
	}

	/// Removes an item. Views that list it as a member keep the name.
	pub fn remove(&self, name: &str) -> Option<Arc<MemoryItem>> {
		self.items.write().remove(name)
	}

	pub fn len(&self) -> usize {
		self.items.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.read().is_empty()
	}
}

impl Catalog for MemoryCatalog {
	type Item = Arc<MemoryItem>;
	type Request = NewItem;

	fn item_names(&self) -> Vec<String> {
		self.items.read().keys().cloned().collect()
	}

	fn get_item(&self, name: &str) -> Option<Self::Item> {
		self.items.read().get(name).cloned()
	}

	fn create_item(&self, request: NewItem) -> Result<Self::Item, CatalogError> {
		self.check_name(&request.name)?;
		let mut items = self.items.write();
		if items.contains_key(&request.name) {
			return Err(CatalogError::AlreadyExists(request.name));
		}
		let item = Arc::new(MemoryItem {
			name: request.name,
			description: request.description,
		});
		items.insert(item.name.clone(), item.clone());
		Ok(item)
	}

	fn items(&self) -> Vec<Self::Item> {
		self.items.read().values().cloned().collect()
	}
}

/// Owner that records calls instead of persisting.
#[derive(Debug, Default)]
pub struct MemoryOwner {
	saves: AtomicUsize,
	fail_saves: AtomicBool,
	deleted: Mutex<Vec<ViewId>>,
	taken: Mutex<BTreeSet<String>>,
}

impl MemoryOwner {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of successful [`ViewOwner::save`] calls.
	pub fn save_count(&self) -> usize {
		self.saves.load(Ordering::SeqCst)
	}

	/// Makes subsequent saves fail (or succeed again).
	pub fn set_fail_saves(&self, fail: bool) {
		self.fail_saves.store(fail, Ordering::SeqCst);
	}

	/// Views passed to [`ViewOwner::delete_view`], in call order.
	pub fn deleted(&self) -> Vec<ViewId> {
		self.deleted.lock().clone()
	}

	/// Marks `name` as held by some other view, so claims on it fail.
	pub fn occupy(&self, name: impl Into<String>) {
		self.taken.lock().insert(name.into());
	}
}

impl ViewOwner for MemoryOwner {
	fn save(&self) -> Result<(), SaveError> {
		if self.fail_saves.load(Ordering::SeqCst) {
			return Err(SaveError::Other("save disabled".to_string()));
		}
		self.saves.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}

	fn delete_view(&self, view: ViewId) -> Result<(), SaveError> {
		self.deleted.lock().push(view);
		self.save()
	}

	fn claim_name(&self, _view: ViewId, name: &str) -> Result<NameClaim<'_>, NameTaken> {
		if self.taken.lock().contains(name) {
			return Err(NameTaken(name.to_string()));
		}
		Ok(None)
	}
}
