//! Catalog whose items are the subdirectories of a root directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;
use vista_view::{Catalog, CatalogError, CatalogItem};

/// A subdirectory exposed as a catalog item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirItem {
	pub name: String,
	pub path: PathBuf,
}

impl CatalogItem for DirItem {
	fn name(&self) -> &str {
		&self.name
	}
}

/// Directory-backed catalog. Creating an item creates a subdirectory.
#[derive(Debug, Clone)]
pub struct DirCatalog {
	root: PathBuf,
}

impl DirCatalog {
	/// Creates a catalog over `root`, creating the directory if needed.
	pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
		let root = root.into();
		fs::create_dir_all(&root)?;
		Ok(Self { root })
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	fn item(&self, name: &str) -> DirItem {
		DirItem {
			name: name.to_string(),
			path: self.root.join(name),
		}
	}
}

impl Catalog for DirCatalog {
	type Item = DirItem;
	/// Name of the directory to create.
	type Request = String;

	fn item_names(&self) -> Vec<String> {
		let entries = match fs::read_dir(&self.root) {
			Ok(entries) => entries,
			Err(err) => {
				warn!(root = %self.root.display(), error = %err, "cannot list catalog directory");
				return Vec::new();
			}
		};

		let mut names: Vec<String> = entries
			.filter_map(|entry| entry.ok())
			.filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
			.filter_map(|entry| entry.file_name().into_string().ok())
			.filter(|name| self.check_name(name).is_ok())
			.collect();
		names.sort();
		names
	}

	fn get_item(&self, name: &str) -> Option<DirItem> {
		if self.check_name(name).is_err() {
			return None;
		}
		let item = self.item(name);
		item.path.is_dir().then_some(item)
	}

	fn create_item(&self, name: String) -> Result<DirItem, CatalogError> {
		self.check_name(&name)?;
		let item = self.item(&name);
		match fs::create_dir(&item.path) {
			Ok(()) => Ok(item),
			Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Err(CatalogError::AlreadyExists(name)),
			Err(err) => Err(err.into()),
		}
	}
}
