//! Identifier primitives shared by views and catalogs.

/// Case-insensitive, duplicate-free, ordered identifier sets.
pub mod ident_set;
/// Naming rules for catalog items and views.
pub mod names;

pub use ident_set::{IdentifierSet, cmp_ignore_case};
pub use names::{NameError, UNSAFE_CHARS, check_good_name};
