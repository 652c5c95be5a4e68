//! Implementation of the `strata` inspector.
//!
//! Commands write to a caller-supplied sink so they can be driven from tests.

pub mod cli;

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use strata_catalog::ServiceCatalog;
use strata_schema::{AttrValue, Schema, SchemaBuilder, SchemaDef};
// Force linking of strata-adapters so its catalog submissions are collected.
#[allow(unused_imports, reason = "ensures strata-adapters inventory submissions are linked")]
use strata_adapters as _;

pub use cli::{Cli, Command};

/// Reads and builds the schema at `path`.
pub fn load_schema(path: &Path) -> anyhow::Result<Schema> {
	let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
	let def = SchemaDef::from_toml_str(&text).with_context(|| format!("parsing {}", path.display()))?;
	let schema = SchemaBuilder::from_def(def)
		.build()
		.with_context(|| format!("building schema from {}", path.display()))?;
	tracing::debug!(path = %path.display(), types = schema.len(), "schema loaded");
	Ok(schema)
}

pub fn run(command: &Command, out: &mut impl Write) -> anyhow::Result<()> {
	match command {
		Command::Types { schema } => {
			let schema = load_schema(schema)?;
			for ty in schema.iter() {
				match ty.base().and_then(|base| schema.name_of(base)) {
					Some(base) => writeln!(out, "{} : {base}", ty.name())?,
					None => writeln!(out, "{}", ty.name())?,
				}
			}
		}
		Command::Lineage { schema, ty } => {
			let schema = load_schema(schema)?;
			let key = schema.expect(ty)?;
			for ancestor in schema.lineage(key).into_iter().flat_map(|lineage| lineage.iter()) {
				writeln!(out, "{}", schema.name_of(ancestor).unwrap_or("?"))?;
			}
		}
		Command::Slots { schema, ty } => {
			let schema = load_schema(schema)?;
			let key = schema.expect(ty)?;
			let descriptor = schema.get(key).context("type vanished from its schema")?;
			for slot in descriptor.slots() {
				writeln!(
					out,
					"slot {} ({}) accepts {}",
					slot.name(),
					slot.kind(),
					schema.name_of(slot.accepts()).unwrap_or("?")
				)?;
			}
			for attribute in descriptor.attributes() {
				let default = match attribute.default() {
					AttrValue::Str(text) => format!("{text:?}"),
					other => other.to_string(),
				};
				writeln!(out, "attribute {}: {} = {default}", attribute.name(), attribute.default().kind())?;
			}
		}
		Command::IsA { schema, ty, ancestor } => {
			let schema = load_schema(schema)?;
			let ty = schema.expect(ty)?;
			let ancestor = schema.expect(ancestor)?;
			writeln!(out, "{}", schema.is_a(ty, ancestor))?;
		}
		Command::Catalog => {
			for component in ServiceCatalog::collected().build() {
				writeln!(out, "{component}")?;
			}
		}
	}
	Ok(())
}
