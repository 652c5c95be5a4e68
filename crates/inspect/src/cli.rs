use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(about = "Inspect strata schemas and the linked service catalog")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// List every type with its base
	Types {
		/// Schema definition file (TOML)
		schema: PathBuf,
	},
	/// Print a type's lineage, most-derived first
	Lineage {
		/// Schema definition file (TOML)
		schema: PathBuf,
		/// Type name.
		ty: String,
	},
	/// Print a type's effective slots and attributes
	Slots {
		/// Schema definition file (TOML)
		schema: PathBuf,
		/// Type name.
		ty: String,
	},
	/// Check whether a type derives from another
	IsA {
		/// Schema definition file (TOML)
		schema: PathBuf,
		/// Type name.
		ty: String,
		/// Candidate ancestor.
		ancestor: String,
	},
	/// List the service components linked into this binary
	Catalog,
}
