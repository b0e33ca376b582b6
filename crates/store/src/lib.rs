//! Reference collaborators for views: a TOML-backed owner and a directory catalog.
//!
//! - [`ViewStore`] owns every view of a store file and persists them on each change
//! - [`DirCatalog`] exposes the subdirectories of a root directory as catalog items

pub mod dir_catalog;
pub mod store;

pub use dir_catalog::{DirCatalog, DirItem};
pub use store::{StoreError, StoreFile, ViewStore};
