//! View store persisted as a single TOML file.
//!
//! # Invariants
//!
//! - The file on disk is replaced atomically (write to a sibling temp file, then rename).
//! - Saves are serialized; concurrent views never interleave writes.
//! - A view's own lock is never held while the store reads it for saving.
//! - No two views share a name. Renames and creations are serialized by the owner's name
//!   lock; views are removed by [`ViewId`], never by name.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vista_view::{
	Catalog, MembershipView, NameClaim, NameError, NameTaken, SaveError, Settings, ViewId, ViewOwner,
	ViewState,
};

/// On-disk layout of a store file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreFile {
	pub settings: Settings,
	pub views: Vec<ViewState>,
}

/// Store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	#[error("failed to read {path}: {source}")]
	Read { path: PathBuf, source: io::Error },
	#[error("failed to parse {path}: {source}")]
	Parse { path: PathBuf, source: toml::de::Error },
	#[error("invalid view name: {0}")]
	InvalidName(#[from] NameError),
	#[error("a view named '{0}' already exists")]
	DuplicateView(String),
	#[error(transparent)]
	Save(#[from] SaveError),
}

/// Owns the views of one store file.
pub struct ViewStore<C: Catalog + 'static> {
	path: PathBuf,
	catalog: Arc<C>,
	settings: Settings,
	owner: Arc<StoreOwner<C>>,
	views: RwLock<Vec<Arc<MembershipView<C>>>>,
	save_lock: Mutex<()>,
}

/// [`ViewOwner`] handed to views; forwards to the store while it is alive.
struct StoreOwner<C: Catalog + 'static> {
	store: Weak<ViewStore<C>>,
	/// Held across every name check and the commit that follows it.
	names: Mutex<()>,
}

impl<C: Catalog + 'static> StoreOwner<C> {
	fn handle(self: &Arc<Self>) -> Arc<dyn ViewOwner> {
		self.clone()
	}
}

impl<C: Catalog + 'static> ViewOwner for StoreOwner<C> {
	fn save(&self) -> Result<(), SaveError> {
		self.store.upgrade().ok_or(SaveError::Detached)?.save()
	}

	fn delete_view(&self, view: ViewId) -> Result<(), SaveError> {
		self.store.upgrade().ok_or(SaveError::Detached)?.remove_view(view)
	}

	fn claim_name(&self, view: ViewId, name: &str) -> Result<NameClaim<'_>, NameTaken> {
		let claim = self.names.lock();
		if let Some(store) = self.store.upgrade()
			&& store.name_taken(Some(view), name)
		{
			return Err(NameTaken(name.to_string()));
		}
		Ok(Some(claim))
	}
}

impl<C: Catalog + 'static> ViewStore<C> {
	/// Opens the store at `path`. A missing file yields an empty store.
	pub fn open(path: impl Into<PathBuf>, catalog: Arc<C>) -> Result<Arc<Self>, StoreError> {
		let path = path.into();
		let file = match fs::read_to_string(&path) {
			Ok(text) => toml::from_str(&text).map_err(|source| StoreError::Parse {
				path: path.clone(),
				source,
			})?,
			Err(err) if err.kind() == io::ErrorKind::NotFound => StoreFile::default(),
			Err(source) => return Err(StoreError::Read { path, source }),
		};
		check_unique_names(&file)?;
		debug!(path = %path.display(), views = file.views.len(), "opened view store");
		Ok(Self::from_file(path, catalog, file))
	}

	/// Builds a store from already-parsed contents. Nothing is written until the first save.
	///
	/// Names are not checked for uniqueness here; [`ViewStore::open`] rejects duplicates.
	pub fn from_file(path: impl Into<PathBuf>, catalog: Arc<C>, file: StoreFile) -> Arc<Self> {
		let path = path.into();
		Arc::new_cyclic(|weak| {
			let owner = Arc::new(StoreOwner {
				store: weak.clone(),
				names: Mutex::new(()),
			});
			let views = file
				.views
				.into_iter()
				.map(|state| {
					Arc::new(MembershipView::from_state(
						catalog.clone(),
						owner.handle(),
						state,
						file.settings.pattern.clone(),
					))
				})
				.collect();
			Self {
				path,
				catalog,
				settings: file.settings,
				owner,
				views: RwLock::new(views),
				save_lock: Mutex::new(()),
			}
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	pub fn catalog(&self) -> &Arc<C> {
		&self.catalog
	}

	/// Returns all views in creation order.
	pub fn views(&self) -> Vec<Arc<MembershipView<C>>> {
		self.views.read().clone()
	}

	pub fn view_names(&self) -> Vec<String> {
		self.views.read().iter().map(|v| v.name()).collect()
	}

	/// Looks up a view by identity.
	pub fn get_by_id(&self, id: ViewId) -> Option<Arc<MembershipView<C>>> {
		self.views.read().iter().find(|v| v.id() == id).cloned()
	}

	/// Looks up a view by exact name.
	pub fn get(&self, name: &str) -> Option<Arc<MembershipView<C>>> {
		self.views.read().iter().find(|v| v.name() == name).cloned()
	}

	/// Creates an empty view and saves.
	///
	/// # Errors
	///
	/// [`StoreError::InvalidName`] or [`StoreError::DuplicateView`] leave the store unchanged.
	pub fn create_view(&self, name: &str) -> Result<Arc<MembershipView<C>>, StoreError> {
		self.catalog.check_name(name)?;
		let view = {
			let _claim = self.owner.names.lock();
			if self.name_taken(None, name) {
				return Err(StoreError::DuplicateView(name.to_string()));
			}
			let view = Arc::new(MembershipView::new(
				self.catalog.clone(),
				self.owner.handle(),
				name,
				self.settings.pattern.clone(),
			));
			self.views.write().push(view.clone());
			view
		};
		info!(view = name, "view created");
		self.save()?;
		Ok(view)
	}

	/// Returns the contents that [`ViewStore::save`] would write.
	pub fn to_file(&self) -> StoreFile {
		StoreFile {
			settings: self.settings.clone(),
			views: self.views.read().iter().map(|v| v.state()).collect(),
		}
	}

	/// Writes every view to the store file.
	pub fn save(&self) -> Result<(), SaveError> {
		let _guard = self.save_lock.lock();
		let file = self.to_file();
		let text = toml::to_string(&file).map_err(|e| SaveError::Encode(e.to_string()))?;

		if let Some(parent) = self.path.parent()
			&& !parent.as_os_str().is_empty()
		{
			fs::create_dir_all(parent)?;
		}
		let tmp = temp_path(&self.path);
		fs::write(&tmp, text)?;
		fs::rename(&tmp, &self.path)?;

		debug!(path = %self.path.display(), views = file.views.len(), "view store saved");
		Ok(())
	}

	/// Returns whether a view other than `except` is called `name`.
	fn name_taken(&self, except: Option<ViewId>, name: &str) -> bool {
		self.views
			.read()
			.iter()
			.any(|v| Some(v.id()) != except && v.name() == name)
	}

	fn remove_view(&self, id: ViewId) -> Result<(), SaveError> {
		{
			let mut views = self.views.write();
			let idx = views
				.iter()
				.position(|v| v.id() == id)
				.ok_or(SaveError::UnknownView(id))?;
			views.remove(idx);
		}
		self.save()
	}
}

fn check_unique_names(file: &StoreFile) -> Result<(), StoreError> {
	let mut seen = BTreeSet::new();
	match file.views.iter().find(|v| !seen.insert(v.name.as_str())) {
		Some(dup) => Err(StoreError::DuplicateView(dup.name.clone())),
		None => Ok(()),
	}
}

fn temp_path(path: &Path) -> PathBuf {
	let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
	name.push(".tmp");
	path.with_file_name(name)
}

#[cfg(test)]
mod tests;
