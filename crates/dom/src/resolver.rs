//! Lineage-walking capability resolution and the per-node adapter cache.

use std::cell::RefCell;

use rustc_hash::FxHashMap as HashMap;
use strata_schema::{Schema, TypeDescriptor, TypeKey};

use crate::document::NodeId;
use crate::extension::{AdapterFactory, AdapterSource, Binding, CapabilityKey, ErasedAdapter};

/// Walks a type's lineage through an [`AdapterSource`].
///
/// Stateless; caching is the document's job.
#[derive(Clone, Copy)]
pub struct AdapterResolver<'a> {
	schema: &'a Schema,
	source: &'a dyn AdapterSource,
}

impl<'a> AdapterResolver<'a> {
	pub fn new(schema: &'a Schema, source: &'a dyn AdapterSource) -> Self {
		Self { schema, source }
	}

	/// Finds the factory of the most-derived lineage entry that registers
	/// `capability`, together with that entry.
	pub fn find_factory(&self, ty: &TypeDescriptor, capability: CapabilityKey) -> Option<(TypeKey, &'a AdapterFactory)> {
		ty.lineage()
			.find_map(|ancestor| self.source.factory(ancestor, capability).map(|factory| (ancestor, factory)))
	}

	/// Produces a fresh adapter for `node`, or `None` when no lineage entry
	/// registers `capability`.
	pub fn instantiate(&self, node: NodeId, ty: &TypeDescriptor, capability: CapabilityKey) -> Option<ErasedAdapter> {
		let (owner, factory) = self.find_factory(ty, capability)?;
		tracing::trace!(
			%node,
			ty = ty.name(),
			owner = self.schema.name_of(owner).unwrap_or("?"),
			%capability,
			"instantiating adapter"
		);
		Some(factory.instantiate(Binding {
			node,
			ty,
			schema: self.schema,
		}))
	}
}

/// Resolution results per (node, capability), absence included.
#[derive(Default)]
pub(crate) struct AdapterCache {
	entries: RefCell<HashMap<(NodeId, CapabilityKey), Option<ErasedAdapter>>>,
}

impl AdapterCache {
	/// `None` on a miss; `Some(None)` for a cached absence.
	pub(crate) fn get(&self, node: NodeId, capability: CapabilityKey) -> Option<Option<ErasedAdapter>> {
		self.entries.borrow().get(&(node, capability)).cloned()
	}

	/// Stores `resolved` unless another entry won the race through a
	/// reentrant resolution, and returns the entry that is now cached.
	pub(crate) fn insert(
		&self,
		node: NodeId,
		capability: CapabilityKey,
		resolved: Option<ErasedAdapter>,
	) -> Option<ErasedAdapter> {
		self.entries
			.borrow_mut()
			.entry((node, capability))
			.or_insert(resolved)
			.clone()
	}

	pub(crate) fn invalidate(&self, node: NodeId) -> usize {
		let mut entries = self.entries.borrow_mut();
		let before = entries.len();
		entries.retain(|(cached, _), _| *cached != node);
		before - entries.len()
	}

	pub(crate) fn len(&self) -> usize {
		self.entries.borrow().len()
	}
}
