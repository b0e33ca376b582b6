//! Vista command line front end.
//!
//! Manages the views stored in a TOML file over a directory catalog, where every
//! subdirectory of the items directory is a catalog item.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use vista_store::{DirCatalog, ViewStore};

mod commands;

use commands::Command;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "vista")]
#[command(about = "Named, pattern-filtered views over a directory of items")]
struct Args {
	/// View store file
	#[arg(short, long, value_name = "PATH", default_value = "views.toml")]
	store: PathBuf,

	/// Directory whose subdirectories are the catalog items
	#[arg(short, long, value_name = "DIR", default_value = "items")]
	items: PathBuf,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,

	#[command(subcommand)]
	command: Command,
}

fn main() -> anyhow::Result<()> {
	let args = Args::parse();
	setup_tracing(args.verbose);

	let catalog = Arc::new(DirCatalog::open(&args.items)?);
	let store = ViewStore::open(&args.store, catalog)?;
	info!(store = %args.store.display(), items = %args.items.display(), "store opened");

	commands::execute(&store, args.command, &mut io::stdout().lock())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env("VISTA_LOG")
		.or_else(|_| EnvFilter::try_from_default_env())
		.unwrap_or_else(|_| {
			if verbose {
				EnvFilter::new("vista=debug,vista_view=debug,vista_store=debug")
			} else {
				EnvFilter::new("warn")
			}
		});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(io::stderr)
		.init();
}
