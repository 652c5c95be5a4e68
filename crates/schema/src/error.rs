/// Malformed or inconsistent schema. Fatal at load time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
	#[error("type `{ty}` declares unknown base `{base}`")]
	UnknownBase { ty: String, base: String },

	#[error("lineage cycle: {}", path.join(" -> "))]
	Cycle { path: Vec<String> },

	#[error("type `{0}` is declared more than once")]
	DuplicateType(String),

	#[error("unknown type `{0}`")]
	UnknownType(String),

	#[error("slot `{slot}` of `{ty}` accepts unknown type `{accepts}`")]
	UnknownSlotType { ty: String, slot: String, accepts: String },

	#[error("malformed schema definition: {0}")]
	Parse(String),
}
