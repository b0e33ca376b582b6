//! Configuration protocol: validated, all-or-nothing view mutation.
//!
//! # Role
//!
//! Every mutating operation follows the same sequence:
//!
//! 1. Check the caller's permission
//! 2. Validate inputs against fresh catalog state, without holding the view lock
//! 3. Commit under the view lock in one critical section
//! 4. Release the lock and ask the owner to save
//!
//! A failure in steps 1-2 returns before anything changes and before `save` is called.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use vista_primitives::IdentifierSet;

use crate::authz::{Authorizer, Permission};
use crate::catalog::{Catalog, CatalogItem};
use crate::pattern::validate_pattern;
use crate::view::MembershipView;
use crate::{Result, ViewError};

/// A full configuration submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfiguration {
	/// Proposed view name.
	pub name: String,
	/// New description; empty text clears it.
	pub description: Option<String>,
	/// Whether the include pattern is in use.
	pub pattern_enabled: bool,
	/// Include pattern source, consulted only when `pattern_enabled` is set.
	pub pattern_source: Option<String>,
	/// Names of catalog items to keep as explicit members. Everything else is dropped.
	pub selected_members: BTreeSet<String>,
}

/// Where the caller should go after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
	/// Name of the view after the submission.
	pub view_name: String,
}

impl Redirect {
	/// Path relative to the view's old location.
	pub fn relative_path(&self) -> String {
		format!("../{}", self.view_name)
	}
}

/// Maps absent and empty text to `None`.
fn nullify(text: Option<String>) -> Option<String> {
	text.filter(|t| !t.is_empty())
}

impl<C: Catalog> MembershipView<C> {
	/// Applies a full configuration submission atomically.
	///
	/// Name, description, explicit members and include pattern either all change or none
	/// do. Explicit membership is rebuilt from the catalog items named in
	/// `selected_members`; names the catalog does not hold are ignored.
	///
	/// # Errors
	///
	/// - [`ViewError::Unauthorized`] without [`Permission::Configure`]
	/// - [`ViewError::InvalidName`] if the name breaks the catalog's rules
	/// - [`ViewError::NameTaken`] if the owner holds another view with that name
	/// - [`ViewError::InvalidPattern`] if the pattern is enabled and does not compile
	/// - [`ViewError::Save`] if the owner failed to persist the committed change
	pub fn submit_configuration(&self, auth: &dyn Authorizer, config: ViewConfiguration) -> Result<Redirect> {
		auth.check_permission(Permission::Configure)?;

		let ViewConfiguration {
			name,
			description,
			pattern_enabled,
			pattern_source,
			selected_members,
		} = config;

		self.catalog.check_name(&name)?;
		let pattern = if pattern_enabled { nullify(pattern_source) } else { None };
		self.validate_pattern(pattern.as_deref())?;
		let members = self.select_members(|item| selected_members.contains(item.name()));

		let claim = self.owner.claim_name(self.id, &name)?;
		let old_name = {
			let mut inner = self.lock();
			inner.members = members;
			inner.description = nullify(description);
			inner.pattern.set_source(pattern);
			std::mem::replace(&mut inner.name, name.clone())
		};
		drop(claim);
		info!(view = %name, previous = %old_name, "view configuration submitted");

		self.persist()?;
		Ok(Redirect { view_name: name })
	}

	/// Renames the view.
	///
	/// # Errors
	///
	/// [`ViewError::InvalidName`] or [`ViewError::NameTaken`] leave the current name in place.
	pub fn rename(&self, auth: &dyn Authorizer, new_name: &str) -> Result<()> {
		auth.check_permission(Permission::Configure)?;
		self.catalog.check_name(new_name)?;

		let claim = self.owner.claim_name(self.id, new_name)?;
		let old_name = std::mem::replace(&mut self.lock().name, new_name.to_string());
		drop(claim);
		info!(view = new_name, previous = %old_name, "view renamed");
		self.persist()
	}

	/// Replaces the description. The text is stored as given; `Some("")` is kept.
	pub fn update_description(&self, auth: &dyn Authorizer, description: Option<String>) -> Result<()> {
		auth.check_permission(Permission::Configure)?;
		self.lock().description = description;
		self.persist()
	}

	/// Rebuilds explicit membership from every catalog item `selected` accepts.
	///
	/// This is a full replace: selecting nothing clears membership.
	pub fn replace_members(
		&self,
		auth: &dyn Authorizer,
		selected: impl FnMut(&C::Item) -> bool,
	) -> Result<()> {
		auth.check_permission(Permission::Configure)?;
		let members = self.select_members(selected);
		let count = members.len();
		self.lock().members = members;
		info!(view = %self.name(), members = count, "explicit membership replaced");
		self.persist()
	}

	/// Enables the include pattern with `source`, or clears it when `enabled` is false.
	///
	/// An empty source disables the pattern.
	///
	/// # Errors
	///
	/// [`ViewError::InvalidPattern`] if enabling a source that does not compile.
	pub fn set_pattern(&self, auth: &dyn Authorizer, enabled: bool, source: Option<String>) -> Result<()> {
		auth.check_permission(Permission::Configure)?;
		let source = if enabled { nullify(source) } else { None };
		self.validate_pattern(source.as_deref())?;
		self.lock().pattern.set_source(source);
		self.persist()
	}

	/// Creates an item in the catalog and adds it as an explicit member.
	///
	/// # Errors
	///
	/// [`ViewError::Catalog`] is returned unchanged from the catalog; membership is untouched.
	pub fn create_member(&self, auth: &dyn Authorizer, request: C::Request) -> Result<C::Item> {
		auth.check_permission(Permission::Create)?;
		let item = self.catalog.create_item(request)?;
		self.lock().members.insert(item.name());
		info!(view = %self.name(), item = item.name(), "member created");
		self.persist()?;
		Ok(item)
	}

	/// Asks the owner to remove this view. The owner identifies it by [`ViewId`](crate::ViewId), so a
	/// concurrent rename cannot redirect the removal.
	pub fn delete_view(&self, auth: &dyn Authorizer) -> Result<()> {
		auth.check_permission(Permission::Delete)?;
		self.owner.delete_view(self.id)?;
		info!(view = %self.name(), id = %self.id, "view deleted");
		Ok(())
	}

	/// Checks a candidate include pattern under this view's limits. Never mutates.
	///
	/// # Errors
	///
	/// [`ViewError::InvalidPattern`] carrying the compiler's message.
	pub fn validate_pattern(&self, candidate: Option<&str>) -> Result<()> {
		let settings = self.lock().pattern.settings().clone();
		Ok(validate_pattern(candidate, &settings)?)
	}

	fn select_members(&self, mut selected: impl FnMut(&C::Item) -> bool) -> IdentifierSet {
		self.catalog
			.items()
			.into_iter()
			.filter(|item| selected(item))
			.map(|item| item.name().to_owned())
			.collect()
	}

	fn persist(&self) -> Result<()> {
		self.owner.save().map_err(|err| {
			warn!(view = %self.name(), error = %err, "failed to save view");
			ViewError::Save(err)
		})
	}
}
