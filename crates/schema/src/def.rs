//! Serializable schema definitions.
//!
//! These are the unresolved, name-based form of a schema: what a loader
//! produces before [`crate::SchemaBuilder::build`] assigns keys and checks
//! lineages.
//!
//! ```toml
//! [[type]]
//! name = "envSettingsType"
//!
//! [[type.slot]]
//! name = "objects"
//! kind = "list"
//! accepts = "envObjectType"
//!
//! [[type.attribute]]
//! name = "name"
//! default = ""
//! ```

use serde::{Deserialize, Serialize};

use crate::descriptor::SlotKind;
use crate::error::SchemaError;
use crate::value::AttrValue;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDef {
	#[serde(default, rename = "type")]
	pub types: Vec<TypeDef>,
}

impl SchemaDef {
	pub fn from_toml_str(input: &str) -> Result<Self, SchemaError> {
		toml::from_str(input).map_err(|e| SchemaError::Parse(e.to_string()))
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
	pub name: String,
	/// Direct base type; the root type when absent.
	#[serde(default)]
	pub base: Option<String>,
	#[serde(default, rename = "slot")]
	pub slots: Vec<SlotDef>,
	#[serde(default, rename = "attribute")]
	pub attributes: Vec<AttributeDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotDef {
	pub name: String,
	pub kind: SlotKind,
	/// Type children must derive from; any type when absent.
	#[serde(default)]
	pub accepts: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDef {
	pub name: String,
	pub default: AttrValue,
}

impl TypeDef {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			base: None,
			slots: Vec::new(),
			attributes: Vec::new(),
		}
	}

	pub fn base(&mut self, base: impl Into<String>) -> &mut Self {
		self.base = Some(base.into());
		self
	}

	pub fn slot(&mut self, name: impl Into<String>, kind: SlotKind) -> &mut Self {
		self.slots.push(SlotDef {
			name: name.into(),
			kind,
			accepts: None,
		});
		self
	}

	pub fn slot_accepting(
		&mut self,
		name: impl Into<String>,
		kind: SlotKind,
		accepts: impl Into<String>,
	) -> &mut Self {
		self.slots.push(SlotDef {
			name: name.into(),
			kind,
			accepts: Some(accepts.into()),
		});
		self
	}

	pub fn attribute(&mut self, name: impl Into<String>, default: impl Into<AttrValue>) -> &mut Self {
		self.attributes.push(AttributeDef {
			name: name.into(),
			default: default.into(),
		});
		self
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn parses_types_slots_and_attributes() {
		let def = SchemaDef::from_toml_str(
			r#"
			[[type]]
			name = "envSettingsType"

			[[type.slot]]
			name = "ambient"
			kind = "single"
			accepts = "ambientSettingsType"

			[[type.slot]]
			name = "objects"
			kind = "list"

			[[type.attribute]]
			name = "name"
			default = "untitled"

			[[type]]
			name = "ambientSettingsType"
			base = "envMiscType"

			[[type.attribute]]
			name = "exposure"
			default = 1.5
			"#,
		)
		.expect("valid schema");

		let mut expected = TypeDef::new("envSettingsType");
		expected
			.slot_accepting("ambient", SlotKind::Single, "ambientSettingsType")
			.slot("objects", SlotKind::List)
			.attribute("name", "untitled");
		let mut ambient = TypeDef::new("ambientSettingsType");
		ambient.base("envMiscType").attribute("exposure", 1.5);

		assert_eq!(def.types, vec![expected, ambient]);
	}

	#[test]
	fn rejects_unknown_slot_kind() {
		let err = SchemaDef::from_toml_str(
			r#"
			[[type]]
			name = "t"
			[[type.slot]]
			name = "s"
			kind = "many"
			"#,
		)
		.unwrap_err();
		assert!(matches!(err, SchemaError::Parse(_)));
	}

	#[test]
	fn empty_document_has_no_types() {
		assert_eq!(SchemaDef::from_toml_str("").unwrap(), SchemaDef::default());
	}
}
