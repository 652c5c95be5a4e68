use strata_schema::{AttrKind, SchemaError, SlotKind};

use crate::document::NodeId;

/// Structural misuse of the document API.
///
/// Containment adapters turn these into plain rejections; they only surface
/// to callers editing the tree directly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
	#[error("node {0} does not exist")]
	StaleNode(NodeId),

	#[error("type `{ty}` has no slot `{slot}`")]
	UnknownSlot { ty: String, slot: String },

	#[error("slot `{slot}` is a {actual} slot, not {expected}")]
	SlotKindMismatch {
		slot: String,
		expected: SlotKind,
		actual: SlotKind,
	},

	#[error("slot `{slot}` accepts `{expected}`, got `{actual}`")]
	SlotTypeMismatch {
		slot: String,
		expected: String,
		actual: String,
	},

	#[error("type `{ty}` has no attribute `{attribute}`")]
	UnknownAttribute { ty: String, attribute: String },

	#[error("attribute `{attribute}` holds {expected} values, got {actual}")]
	AttributeKind {
		attribute: String,
		expected: AttrKind,
		actual: AttrKind,
	},

	#[error("attaching {child} under {parent} would make it its own ancestor")]
	WouldCycle { parent: NodeId, child: NodeId },

	#[error(transparent)]
	Schema(#[from] SchemaError),
}
