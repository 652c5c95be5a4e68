use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::value::AttrValue;

/// Name of the universal root type every lineage ends at.
pub const ROOT_TYPE_NAME: &str = "object";

/// Dense identity of a type within one [`crate::Schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(u32);

impl TypeKey {
	/// The universal root type.
	pub const ROOT: TypeKey = TypeKey(0);

	pub(crate) const fn from_index(index: usize) -> Self {
		Self(index as u32)
	}

	pub const fn index(self) -> usize {
		self.0 as usize
	}
}

impl fmt::Display for TypeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Whether a child slot holds one node or an ordered list of nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
	Single,
	List,
}

impl fmt::Display for SlotKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Single => write!(f, "single"),
			Self::List => write!(f, "list"),
		}
	}
}

/// A named attachment point for children.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotDecl {
	pub(crate) name: Arc<str>,
	pub(crate) kind: SlotKind,
	pub(crate) accepts: TypeKey,
}

impl SlotDecl {
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Shared handle to the slot name, for callers that keep it around.
	pub fn name_arc(&self) -> &Arc<str> {
		&self.name
	}

	pub fn kind(&self) -> SlotKind {
		self.kind
	}

	/// Type every child placed in this slot must derive from.
	pub fn accepts(&self) -> TypeKey {
		self.accepts
	}
}

/// A declared attribute with its default value.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDecl {
	pub(crate) name: Arc<str>,
	pub(crate) default: AttrValue,
}

impl AttributeDecl {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn default(&self) -> &AttrValue {
		&self.default
	}
}

/// Ordered chain of a type and its ancestors, most-derived first.
///
/// Cheap to clone; every lineage is computed once at schema build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lineage(Arc<[TypeKey]>);

impl Lineage {
	pub(crate) fn new(keys: Arc<[TypeKey]>) -> Self {
		debug_assert!(keys.last() == Some(&TypeKey::ROOT));
		Self(keys)
	}

	pub fn iter(&self) -> impl DoubleEndedIterator<Item = TypeKey> + ExactSizeIterator + '_ {
		self.0.iter().copied()
	}

	pub fn as_slice(&self) -> &[TypeKey] {
		&self.0
	}

	/// Number of entries, the type itself included.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn contains(&self, key: TypeKey) -> bool {
		self.0.contains(&key)
	}

	/// Returns the first entry, walking most-derived first, accepted by `pred`.
	pub fn find_map<T>(&self, pred: impl FnMut(TypeKey) -> Option<T>) -> Option<T> {
		self.iter().find_map(pred)
	}
}

/// Immutable description of a node type.
///
/// Slots and attributes are flattened: a descriptor lists the declarations it
/// inherits from its ancestors as well as its own.
#[derive(Debug)]
pub struct TypeDescriptor {
	pub(crate) key: TypeKey,
	pub(crate) name: Arc<str>,
	pub(crate) base: Option<TypeKey>,
	pub(crate) lineage: Lineage,
	pub(crate) slots: Vec<SlotDecl>,
	pub(crate) attributes: Vec<AttributeDecl>,
}

impl TypeDescriptor {
	pub fn key(&self) -> TypeKey {
		self.key
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Direct base type; `None` only for the root type.
	pub fn base(&self) -> Option<TypeKey> {
		self.base
	}

	pub fn lineage(&self) -> &Lineage {
		&self.lineage
	}

	/// Whether `ancestor` appears in this type's lineage (a type is its own ancestor).
	pub fn is_a(&self, ancestor: TypeKey) -> bool {
		self.lineage.contains(ancestor)
	}

	pub fn slots(&self) -> &[SlotDecl] {
		&self.slots
	}

	pub fn slot(&self, name: &str) -> Option<&SlotDecl> {
		self.slots.iter().find(|slot| &*slot.name == name)
	}

	pub fn attributes(&self) -> &[AttributeDecl] {
		&self.attributes
	}

	pub fn attribute(&self, name: &str) -> Option<&AttributeDecl> {
		self.attributes.iter().find(|attr| &*attr.name == name)
	}
}
