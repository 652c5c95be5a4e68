//! Capability identities and type-erased adapter factories.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use strata_schema::{Schema, TypeDescriptor, TypeKey};

use crate::document::NodeId;

/// A named behavior contract that node types may or may not implement.
///
/// Capabilities are marker types; the behavior itself is the (usually
/// unsized) `Adapter` type, e.g. a trait object.
///
/// ```ignore
/// pub struct Hierarchy;
///
/// impl Capability for Hierarchy {
/// 	type Adapter = dyn Hierarchical;
/// 	const NAME: &'static str = "hierarchical";
/// }
/// ```
pub trait Capability: 'static {
	type Adapter: ?Sized + Send + Sync + 'static;

	/// Stable name used in diagnostics.
	const NAME: &'static str;
}

/// Runtime identity of a [`Capability`].
///
/// Equality and hashing use the marker type only; the name is carried for
/// diagnostics.
#[derive(Clone, Copy)]
pub struct CapabilityKey {
	id: TypeId,
	name: &'static str,
}

impl CapabilityKey {
	pub fn of<C: Capability>() -> Self {
		Self {
			id: TypeId::of::<C>(),
			name: C::NAME,
		}
	}

	pub fn name(&self) -> &'static str {
		self.name
	}
}

impl PartialEq for CapabilityKey {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for CapabilityKey {}

impl Hash for CapabilityKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl fmt::Debug for CapabilityKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "CapabilityKey({})", self.name)
	}
}

impl fmt::Display for CapabilityKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

/// What a factory learns about the node it binds an adapter to.
#[derive(Clone, Copy)]
pub struct Binding<'a> {
	pub node: NodeId,
	pub ty: &'a TypeDescriptor,
	pub schema: &'a Schema,
}

/// An adapter with its capability type erased.
#[derive(Clone)]
pub struct ErasedAdapter {
	capability: CapabilityKey,
	inner: Arc<dyn Any + Send + Sync>,
}

impl ErasedAdapter {
	pub fn new<C: Capability>(adapter: Arc<C::Adapter>) -> Self {
		Self {
			capability: CapabilityKey::of::<C>(),
			inner: Arc::new(adapter),
		}
	}

	pub fn capability(&self) -> CapabilityKey {
		self.capability
	}

	/// Recovers the typed adapter. The returned `Arc` shares the allocation
	/// held here, so identity is preserved across calls.
	pub fn downcast<C: Capability>(&self) -> Option<Arc<C::Adapter>> {
		self.inner.downcast_ref::<Arc<C::Adapter>>().cloned()
	}
}

impl fmt::Debug for ErasedAdapter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ErasedAdapter")
			.field("capability", &self.capability)
			.finish_non_exhaustive()
	}
}

type MakeFn = dyn Fn(Binding<'_>) -> ErasedAdapter + Send + Sync;

/// Produces adapters of one capability for nodes of a registered type.
#[derive(Clone)]
pub struct AdapterFactory {
	capability: CapabilityKey,
	make: Arc<MakeFn>,
}

impl AdapterFactory {
	pub fn new<C, F>(make: F) -> Self
	where
		C: Capability,
		F: Fn(Binding<'_>) -> Arc<C::Adapter> + Send + Sync + 'static,
	{
		Self {
			capability: CapabilityKey::of::<C>(),
			make: Arc::new(move |binding: Binding<'_>| ErasedAdapter::new::<C>(make(binding))),
		}
	}

	pub fn capability(&self) -> CapabilityKey {
		self.capability
	}

	pub fn instantiate(&self, binding: Binding<'_>) -> ErasedAdapter {
		(self.make)(binding)
	}
}

impl fmt::Debug for AdapterFactory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AdapterFactory")
			.field("capability", &self.capability)
			.finish_non_exhaustive()
	}
}

/// Table of factories keyed by exact (type, capability).
///
/// Implementations do not walk lineages; [`crate::AdapterResolver`] does.
pub trait AdapterSource: Send + Sync {
	fn factory(&self, ty: TypeKey, capability: CapabilityKey) -> Option<&AdapterFactory>;
}

/// An [`AdapterSource`] with no registrations.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExtensions;

impl AdapterSource for NoExtensions {
	fn factory(&self, _ty: TypeKey, _capability: CapabilityKey) -> Option<&AdapterFactory> {
		None
	}
}
