//! Subcommand dispatch.

use std::collections::BTreeSet;
use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use clap::Subcommand;
use vista_store::{DirCatalog, ViewStore};
use vista_view::{AllowAll, CatalogItem, MembershipView, ViewConfiguration, validate_pattern};

type Store = ViewStore<DirCatalog>;

#[derive(Subcommand, Debug)]
pub enum Command {
	/// List views
	Views,
	/// Print the items a view presents
	Show { view: String },
	/// Check an include pattern without changing anything
	CheckPattern { pattern: String },
	/// Create an empty view
	NewView { name: String },
	/// Resubmit a view's whole configuration
	///
	/// Unspecified name, description and pattern are kept. Explicit members are rebuilt from
	/// the catalog, so members whose items no longer exist are dropped.
	Configure {
		view: String,
		/// New view name
		#[arg(long)]
		name: Option<String>,
		/// New description (empty clears it)
		#[arg(long)]
		description: Option<String>,
		/// Include pattern matched against whole item names
		#[arg(long, conflicts_with = "no_pattern")]
		pattern: Option<String>,
		/// Remove the include pattern
		#[arg(long)]
		no_pattern: bool,
		/// Explicit members; replaces the current set when given, otherwise the current
		/// members that still exist are kept
		#[arg(long = "member", value_name = "ITEM")]
		members: Vec<String>,
		/// Remove every explicit member
		#[arg(long, conflicts_with = "members")]
		clear_members: bool,
	},
	/// Set or clear a view's description verbatim
	Describe { view: String, text: Option<String> },
	/// Create an item and add it to a view
	NewItem { view: String, name: String },
	/// Delete a view
	DeleteView { view: String },
}

fn find(store: &Store, name: &str) -> anyhow::Result<Arc<MembershipView<DirCatalog>>> {
	store.get(name).with_context(|| format!("no view named '{name}'"))
}

/// Runs one command against `store`, writing user-facing output to `out`.
pub fn execute(store: &Store, command: Command, out: &mut impl Write) -> anyhow::Result<()> {
	match command {
		Command::Views => {
			for view in store.views() {
				match view.description() {
					Some(desc) => writeln!(out, "{}\t{desc}", view.name())?,
					None => writeln!(out, "{}", view.name())?,
				}
			}
		}
		Command::Show { view } => {
			for item in find(store, &view)?.snapshot() {
				writeln!(out, "{}", item.name())?;
			}
		}
		Command::CheckPattern { pattern } => {
			validate_pattern(Some(&pattern), &store.settings().pattern)?;
			writeln!(out, "ok")?;
		}
		Command::NewView { name } => {
			let view = store.create_view(&name)?;
			writeln!(out, "{}", view.url())?;
		}
		Command::Configure {
			view,
			name,
			description,
			pattern,
			no_pattern,
			members,
			clear_members,
		} => {
			let target = find(store, &view)?;
			let current = target.state();
			let (pattern_enabled, pattern_source) = match (pattern, no_pattern) {
				(Some(p), _) => (true, Some(p)),
				(None, true) => (false, None),
				(None, false) => (current.include_pattern.is_some(), current.include_pattern),
			};
			let selected_members: BTreeSet<String> = if clear_members {
				BTreeSet::new()
			} else if members.is_empty() {
				current.members.iter().map(str::to_owned).collect()
			} else {
				members.into_iter().collect()
			};

			let redirect = target.submit_configuration(
				&AllowAll,
				ViewConfiguration {
					name: name.unwrap_or(current.name),
					description: description.or(current.description),
					pattern_enabled,
					pattern_source,
					selected_members,
				},
			)?;
			writeln!(out, "{}", redirect.view_name)?;
		}
		Command::Describe { view, text } => {
			find(store, &view)?.update_description(&AllowAll, text)?;
		}
		Command::NewItem { view, name } => {
			let item = find(store, &view)?.create_member(&AllowAll, name)?;
			writeln!(out, "{}", item.path.display())?;
		}
		Command::DeleteView { view } => {
			find(store, &view)?.delete_view(&AllowAll)?;
		}
	}
	Ok(())
}
