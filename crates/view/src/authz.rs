//! Permission checks performed before every mutating view operation.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Operations a caller may be permitted to perform on a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
	/// Rename, describe, change membership or the include pattern.
	Configure,
	/// Create a catalog item through the view.
	Create,
	/// Delete the view itself.
	Delete,
}

impl fmt::Display for Permission {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Permission::Configure => "configure",
			Permission::Create => "create",
			Permission::Delete => "delete",
		})
	}
}

/// The caller lacks a required permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("missing {permission} permission")]
pub struct AuthorizationError {
	pub permission: Permission,
}

/// Decides whether the current caller holds a permission.
pub trait Authorizer {
	/// # Errors
	///
	/// Returns [`AuthorizationError`] when the permission is not held.
	fn check_permission(&self, permission: Permission) -> Result<(), AuthorizationError>;
}

/// Grants every permission.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Authorizer for AllowAll {
	fn check_permission(&self, _permission: Permission) -> Result<(), AuthorizationError> {
		Ok(())
	}
}

/// Grants an explicit set of permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grants(BTreeSet<Permission>);

impl Grants {
	/// Grants nothing.
	pub fn none() -> Self {
		Self::default()
	}

	pub fn new(permissions: impl IntoIterator<Item = Permission>) -> Self {
		Self(permissions.into_iter().collect())
	}

	pub fn holds(&self, permission: Permission) -> bool {
		self.0.contains(&permission)
	}
}

impl Authorizer for Grants {
	fn check_permission(&self, permission: Permission) -> Result<(), AuthorizationError> {
		if self.holds(permission) {
			Ok(())
		} else {
			Err(AuthorizationError { permission })
		}
	}
}
