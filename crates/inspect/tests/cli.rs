use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use pretty_assertions::assert_eq;
use strata_inspect::{Cli, Command, load_schema, run};
use tempfile::NamedTempFile;

const SCHEMA: &str = r#"
[[type]]
name = "settingsType"

[[type.attribute]]
name = "name"
default = ""

[[type]]
name = "AmbientSettingsType"
base = "settingsType"

[[type.attribute]]
name = "intensity"
default = 1.5

[[type]]
name = "envSettingsType"

[[type.slot]]
name = "ambient"
kind = "single"
accepts = "AmbientSettingsType"

[[type.slot]]
name = "objects"
kind = "list"
"#;

fn schema_file(text: &str) -> NamedTempFile {
	let mut file = NamedTempFile::new().unwrap();
	file.write_all(text.as_bytes()).unwrap();
	file
}

fn output(args: &[&str]) -> anyhow::Result<String> {
	let cli = Cli::try_parse_from(std::iter::once("strata").chain(args.iter().copied()))?;
	let mut out = Vec::new();
	run(&cli.command, &mut out)?;
	Ok(String::from_utf8(out)?)
}

#[test]
fn types_lists_bases() {
	let file = schema_file(SCHEMA);
	let path = file.path().to_str().unwrap();

	assert_eq!(
		output(&["types", path]).unwrap(),
		"object\nsettingsType : object\nAmbientSettingsType : settingsType\nenvSettingsType : object\n"
	);
}

#[test]
fn lineage_is_most_derived_first() {
	let file = schema_file(SCHEMA);
	let path = file.path().to_str().unwrap();

	assert_eq!(
		output(&["lineage", path, "AmbientSettingsType"]).unwrap(),
		"AmbientSettingsType\nsettingsType\nobject\n"
	);
}

#[test]
fn slots_include_inherited_attributes() {
	let file = schema_file(SCHEMA);
	let path = file.path().to_str().unwrap();

	assert_eq!(
		output(&["slots", path, "AmbientSettingsType"]).unwrap(),
		"attribute name: string = \"\"\nattribute intensity: float = 1.5\n"
	);
	assert_eq!(
		output(&["slots", path, "envSettingsType"]).unwrap(),
		"slot ambient (single) accepts AmbientSettingsType\nslot objects (list) accepts object\n"
	);
}

#[test]
fn is_a_prints_a_boolean() {
	let file = schema_file(SCHEMA);
	let path = file.path().to_str().unwrap();

	assert_eq!(output(&["is-a", path, "AmbientSettingsType", "settingsType"]).unwrap(), "true\n");
	assert_eq!(output(&["-v", "is-a", path, "settingsType", "AmbientSettingsType"]).unwrap(), "false\n");
}

#[test]
fn unknown_types_are_errors() {
	let file = schema_file(SCHEMA);
	let path = file.path().to_str().unwrap();

	let err = output(&["lineage", path, "terrain"]).unwrap_err();
	assert_eq!(err.to_string(), "unknown type `terrain`");
}

#[test]
fn broken_schemas_name_the_file() {
	let file = schema_file("[[type]]\nname = \"loop\"\nbase = \"loop\"\n");
	let err = load_schema(file.path()).unwrap_err();

	assert!(err.to_string().contains(&file.path().display().to_string()));
	assert!(format!("{err:#}").contains("lineage cycle"));
}

#[test]
fn missing_files_are_reported() {
	let dir = tempfile::tempdir().unwrap();
	let missing: PathBuf = dir.path().join("absent.toml");

	let err = run(&Command::Types { schema: missing }, &mut Vec::new()).unwrap_err();
	assert!(err.to_string().starts_with("reading "));
}

#[test]
fn catalog_lists_stock_capabilities() {
	let listing = output(&["catalog"]).unwrap();
	let lines: Vec<_> = listing.lines().collect();

	assert_eq!(lines.len(), 2);
	assert!(lines[0].ends_with("Hierarchy"));
	assert!(lines[1].ends_with("Listing"));
}
