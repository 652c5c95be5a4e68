use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap as HashMap;
use slab::Slab;
use strata_schema::{AttrValue, Lineage, Schema, SlotKind, TypeDescriptor, TypeKey};

use crate::error::DomError;
use crate::extension::{AdapterSource, Capability, CapabilityKey, ErasedAdapter, NoExtensions};
use crate::resolver::{AdapterCache, AdapterResolver};

/// Handle to a node within one [`Document`].
///
/// Carries a generation so that the id of a removed node never refers to a
/// node created later in the same slab slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
	index: u32,
	generation: u32,
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "n{}v{}", self.index, self.generation)
	}
}

#[derive(Debug)]
enum SlotContent {
	Single(Option<NodeId>),
	List(Vec<NodeId>),
}

impl SlotContent {
	fn empty(kind: SlotKind) -> Self {
		match kind {
			SlotKind::Single => Self::Single(None),
			SlotKind::List => Self::List(Vec::new()),
		}
	}

	fn as_slice(&self) -> &[NodeId] {
		match self {
			Self::Single(child) => child.as_slice(),
			Self::List(children) => children,
		}
	}

	fn remove(&mut self, child: NodeId) {
		match self {
			Self::Single(slot) => {
				if *slot == Some(child) {
					*slot = None;
				}
			}
			Self::List(children) => children.retain(|c| *c != child),
		}
	}
}

#[derive(Debug, Clone, Copy)]
struct ParentLink {
	node: NodeId,
	/// Index into the parent type's slot declarations.
	slot: usize,
}

#[derive(Debug)]
struct NodeData {
	generation: u32,
	ty: Arc<TypeDescriptor>,
	/// Explicitly assigned values only; reads fall back to declared defaults.
	attrs: HashMap<Arc<str>, AttrValue>,
	/// Parallel to `ty.slots()`.
	slots: Vec<SlotContent>,
	parent: Option<ParentLink>,
}

/// A tree of typed nodes plus the adapters resolved for them.
///
/// Nodes are created detached. Attaching a node that already has a parent
/// moves it. Removing a node removes its whole subtree and drops every
/// adapter cached for it.
pub struct Document {
	schema: Arc<Schema>,
	source: Arc<dyn AdapterSource>,
	nodes: Slab<NodeData>,
	next_generation: u32,
	adapters: AdapterCache,
}

impl Document {
	pub fn new(schema: Arc<Schema>, source: Arc<dyn AdapterSource>) -> Self {
		Self {
			schema,
			source,
			nodes: Slab::new(),
			next_generation: 0,
			adapters: AdapterCache::default(),
		}
	}

	/// A document whose nodes resolve no capabilities.
	pub fn without_extensions(schema: Arc<Schema>) -> Self {
		Self::new(schema, Arc::new(NoExtensions))
	}

	pub fn schema(&self) -> &Arc<Schema> {
		&self.schema
	}

	pub fn source(&self) -> &Arc<dyn AdapterSource> {
		&self.source
	}

	/// Number of live nodes, attached or not.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn contains(&self, node: NodeId) -> bool {
		self.data(node).is_some()
	}

	fn data(&self, node: NodeId) -> Option<&NodeData> {
		self.nodes
			.get(node.index as usize)
			.filter(|data| data.generation == node.generation)
	}

	fn data_mut(&mut self, node: NodeId) -> Option<&mut NodeData> {
		self.nodes
			.get_mut(node.index as usize)
			.filter(|data| data.generation == node.generation)
	}

	fn live(&self, node: NodeId) -> Result<&NodeData, DomError> {
		self.data(node).ok_or(DomError::StaleNode(node))
	}

	/// Creates a detached node of type `ty`.
	pub fn create(&mut self, ty: TypeKey) -> Result<NodeId, DomError> {
		let ty = self
			.schema
			.get(ty)
			.cloned()
			.ok_or_else(|| strata_schema::SchemaError::UnknownType(ty.to_string()))?;

		let generation = self.next_generation;
		self.next_generation = self.next_generation.wrapping_add(1);

		let slots = ty.slots().iter().map(|slot| SlotContent::empty(slot.kind())).collect();
		let index = self.nodes.insert(NodeData {
			generation,
			ty,
			attrs: HashMap::default(),
			slots,
			parent: None,
		});

		Ok(NodeId {
			index: index as u32,
			generation,
		})
	}

	/// Creates a detached node of the type called `name`.
	pub fn create_named(&mut self, name: &str) -> Result<NodeId, DomError> {
		let ty = self.schema.expect(name)?;
		self.create(ty)
	}

	pub fn node_type(&self, node: NodeId) -> Option<&Arc<TypeDescriptor>> {
		self.data(node).map(|data| &data.ty)
	}

	pub fn lineage(&self, node: NodeId) -> Option<&Lineage> {
		self.data(node).map(|data| data.ty.lineage())
	}

	/// Whether the node's type is `ancestor` or derives from it.
	pub fn is_a(&self, node: NodeId, ancestor: TypeKey) -> bool {
		self.data(node).is_some_and(|data| data.ty.is_a(ancestor))
	}

	/// Current value of an attribute: the assigned one, else the declared
	/// default. `None` for stale nodes and undeclared attributes.
	pub fn attribute(&self, node: NodeId, name: &str) -> Option<&AttrValue> {
		let data = self.data(node)?;
		data.attrs
			.get(name)
			.or_else(|| data.ty.attribute(name).map(|decl| decl.default()))
	}

	/// Assigns an attribute, returning the previously assigned value.
	pub fn set_attribute(
		&mut self,
		node: NodeId,
		name: &str,
		value: impl Into<AttrValue>,
	) -> Result<Option<AttrValue>, DomError> {
		let value = value.into();
		let data = self.data_mut(node).ok_or(DomError::StaleNode(node))?;
		let decl = data.ty.attribute(name).ok_or_else(|| DomError::UnknownAttribute {
			ty: data.ty.name().to_string(),
			attribute: name.to_string(),
		})?;

		let expected = decl.default().kind();
		if value.kind() != expected {
			return Err(DomError::AttributeKind {
				attribute: name.to_string(),
				expected,
				actual: value.kind(),
			});
		}

		let key: Arc<str> = Arc::from(decl.name());
		Ok(data.attrs.insert(key, value))
	}

	pub fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.data(node)?.parent.map(|link| link.node)
	}

	/// Name of the parent slot holding `node`.
	pub fn parent_slot(&self, node: NodeId) -> Option<&str> {
		let link = self.data(node)?.parent?;
		let parent = self.data(link.node)?;
		parent.ty.slots().get(link.slot).map(|slot| slot.name())
	}

	/// Occupant of a single-valued slot.
	pub fn child(&self, node: NodeId, slot: &str) -> Option<NodeId> {
		match self.slot_content(node, slot)? {
			SlotContent::Single(child) => *child,
			SlotContent::List(_) => None,
		}
	}

	/// Contents of a slot in order. Empty for stale nodes and unknown slots.
	pub fn children(&self, node: NodeId, slot: &str) -> &[NodeId] {
		self.slot_content(node, slot).map(SlotContent::as_slice).unwrap_or_default()
	}

	/// Every child of `node`, slot by slot in declaration order.
	pub fn child_nodes(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
		self.data(node)
			.into_iter()
			.flat_map(|data| data.slots.iter().flat_map(|content| content.as_slice().iter().copied()))
	}

	/// Proper ancestors of `node`, nearest first.
	pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
		std::iter::successors(self.parent(node), |&current| self.parent(current))
	}

	/// Whether `ancestor` is `node` itself or one of its ancestors.
	pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
		ancestor == node || self.ancestors(node).any(|a| a == ancestor)
	}

	/// `node` and all its descendants, preorder.
	pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
		let mut out = Vec::new();
		if !self.contains(node) {
			return out;
		}
		let mut stack = vec![node];
		while let Some(current) = stack.pop() {
			out.push(current);
			let children: Vec<NodeId> = self.child_nodes(current).collect();
			stack.extend(children.into_iter().rev());
		}
		out
	}

	/// Nodes without a parent.
	pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
		self.nodes.iter().filter(|(_, data)| data.parent.is_none()).map(|(index, data)| NodeId {
			index: index as u32,
			generation: data.generation,
		})
	}

	fn slot_content(&self, node: NodeId, slot: &str) -> Option<&SlotContent> {
		let data = self.data(node)?;
		let index = data.ty.slots().iter().position(|decl| decl.name() == slot)?;
		data.slots.get(index)
	}

	fn slot_index(&self, node: NodeId, slot: &str) -> Result<usize, DomError> {
		let data = self.live(node)?;
		data.ty
			.slots()
			.iter()
			.position(|decl| decl.name() == slot)
			.ok_or_else(|| DomError::UnknownSlot {
				ty: data.ty.name().to_string(),
				slot: slot.to_string(),
			})
	}

	/// Checks, without mutating, that `child` may be placed into `slot` of
	/// `parent`, and returns the slot's kind.
	pub fn check_attach(&self, parent: NodeId, slot: &str, child: NodeId) -> Result<SlotKind, DomError> {
		let parent_data = self.live(parent)?;
		let child_data = self.live(child)?;
		let index = self.slot_index(parent, slot)?;
		let decl = &parent_data.ty.slots()[index];

		if !child_data.ty.is_a(decl.accepts()) {
			return Err(DomError::SlotTypeMismatch {
				slot: slot.to_string(),
				expected: self.schema.name_of(decl.accepts()).unwrap_or("?").to_string(),
				actual: child_data.ty.name().to_string(),
			});
		}

		if self.is_ancestor_or_self(child, parent) {
			return Err(DomError::WouldCycle { parent, child });
		}

		Ok(decl.kind())
	}

	fn expect_kind(&self, parent: NodeId, slot: &str, child: NodeId, expected: SlotKind) -> Result<usize, DomError> {
		let actual = self.check_attach(parent, slot, child)?;
		if actual != expected {
			return Err(DomError::SlotKindMismatch {
				slot: slot.to_string(),
				expected,
				actual,
			});
		}
		self.slot_index(parent, slot)
	}

	/// Places `child` into a single-valued slot, returning the displaced
	/// occupant. The displaced node is detached, not removed.
	pub fn set_child(&mut self, parent: NodeId, slot: &str, child: NodeId) -> Result<Option<NodeId>, DomError> {
		let index = self.expect_kind(parent, slot, child, SlotKind::Single)?;
		self.detach(child)?;

		let displaced = match self.data_mut(parent).map(|data| &mut data.slots[index]) {
			Some(SlotContent::Single(occupant)) => occupant.replace(child),
			_ => None,
		};
		if let Some(old) = displaced
			&& let Some(data) = self.data_mut(old)
		{
			data.parent = None;
		}
		self.link(child, parent, index);

		Ok(displaced)
	}

	/// Empties a single-valued slot, returning the detached occupant.
	pub fn clear_child(&mut self, parent: NodeId, slot: &str) -> Result<Option<NodeId>, DomError> {
		let index = self.slot_index(parent, slot)?;
		let occupant = match self.data(parent).map(|data| &data.slots[index]) {
			Some(SlotContent::Single(occupant)) => *occupant,
			_ => {
				return Err(DomError::SlotKindMismatch {
					slot: slot.to_string(),
					expected: SlotKind::Single,
					actual: SlotKind::List,
				});
			}
		};
		if let Some(child) = occupant {
			self.detach(child)?;
		}
		Ok(occupant)
	}

	/// Appends `child` to a list-valued slot.
	pub fn push_child(&mut self, parent: NodeId, slot: &str, child: NodeId) -> Result<(), DomError> {
		let index = self.expect_kind(parent, slot, child, SlotKind::List)?;
		self.detach(child)?;

		if let Some(SlotContent::List(children)) = self.data_mut(parent).map(|data| &mut data.slots[index]) {
			children.push(child);
		}
		self.link(child, parent, index);

		Ok(())
	}

	fn link(&mut self, child: NodeId, parent: NodeId, slot: usize) {
		if let Some(data) = self.data_mut(child) {
			data.parent = Some(ParentLink { node: parent, slot });
		}
	}

	/// Unlinks `node` from its parent. Returns whether it had one.
	pub fn detach(&mut self, node: NodeId) -> Result<bool, DomError> {
		let Some(link) = self.live(node)?.parent else {
			return Ok(false);
		};
		if let Some(parent) = self.data_mut(link.node) {
			parent.slots[link.slot].remove(node);
		}
		if let Some(data) = self.data_mut(node) {
			data.parent = None;
		}
		Ok(true)
	}

	/// Removes `node` and its subtree, dropping their cached adapters.
	/// Returns how many nodes were removed.
	pub fn remove(&mut self, node: NodeId) -> Result<usize, DomError> {
		self.detach(node)?;
		let doomed = self.descendants(node);
		for &id in &doomed {
			self.adapters.invalidate(id);
			self.nodes.remove(id.index as usize);
		}
		tracing::trace!(%node, removed = doomed.len(), "removed subtree");
		Ok(doomed.len())
	}

	/// Resolves capability `C` for `node`.
	///
	/// Walks the node type's lineage most-derived first and binds the adapter
	/// of the first registered factory. The outcome, absence included, is
	/// cached for the node's lifetime: repeated calls return the same `Arc`.
	pub fn resolve<C: Capability>(&self, node: NodeId) -> Option<Arc<C::Adapter>> {
		self.resolve_erased(node, CapabilityKey::of::<C>())?.downcast::<C>()
	}

	/// Whether capability `C` resolves for `node`.
	pub fn has_capability<C: Capability>(&self, node: NodeId) -> bool {
		self.resolve_erased(node, CapabilityKey::of::<C>()).is_some()
	}

	pub fn resolve_erased(&self, node: NodeId, capability: CapabilityKey) -> Option<ErasedAdapter> {
		let data = self.data(node)?;
		if let Some(cached) = self.adapters.get(node, capability) {
			return cached;
		}

		let resolved = AdapterResolver::new(&self.schema, &*self.source).instantiate(node, &data.ty, capability);
		if resolved.is_none() {
			tracing::trace!(%node, ty = data.ty.name(), %capability, "capability not provided");
		}
		self.adapters.insert(node, capability, resolved)
	}

	/// Drops every adapter cached for `node`; the next resolution invokes the
	/// factories again. Returns the number of dropped entries.
	pub fn invalidate_adapters(&self, node: NodeId) -> usize {
		self.adapters.invalidate(node)
	}

	/// Number of cached (node, capability) resolutions.
	pub fn cached_adapters(&self) -> usize {
		self.adapters.len()
	}
}

impl fmt::Debug for Document {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Document")
			.field("nodes", &self.nodes.len())
			.field("cached_adapters", &self.adapters.len())
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests;
