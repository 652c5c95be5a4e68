use std::sync::Arc;

use rustc_hash::FxHashMap as HashMap;
use strata_dom::{AdapterFactory, AdapterResolver, AdapterSource, Capability, CapabilityKey, Document};
use strata_schema::{Schema, TypeKey};

use crate::collision::Collision;

/// Frozen (type, capability) → factory table.
///
/// Immutable once built; share it behind an `Arc` and hand it to every
/// [`Document`] as the adapter source.
pub struct ExtensionRegistry {
	schema: Arc<Schema>,
	factories: HashMap<(TypeKey, CapabilityKey), AdapterFactory>,
	collisions: Box<[Collision]>,
}

impl ExtensionRegistry {
	pub(crate) fn new(
		schema: Arc<Schema>,
		factories: HashMap<(TypeKey, CapabilityKey), AdapterFactory>,
		collisions: Vec<Collision>,
	) -> Self {
		Self {
			schema,
			factories,
			collisions: collisions.into_boxed_slice(),
		}
	}

	pub fn schema(&self) -> &Arc<Schema> {
		&self.schema
	}

	pub fn len(&self) -> usize {
		self.factories.len()
	}

	pub fn is_empty(&self) -> bool {
		self.factories.is_empty()
	}

	/// Duplicate registrations seen while building, in registration order.
	pub fn collisions(&self) -> &[Collision] {
		&self.collisions
	}

	/// Capabilities registered directly on `ty` (not inherited), by name.
	pub fn capabilities_of(&self, ty: TypeKey) -> Vec<CapabilityKey> {
		let mut caps: Vec<CapabilityKey> = self
			.factories
			.keys()
			.filter(|(owner, _)| *owner == ty)
			.map(|(_, capability)| *capability)
			.collect();
		caps.sort_by_key(|capability| capability.name());
		caps
	}

	/// Whether nodes of `ty` resolve `C`, directly or through an ancestor.
	pub fn provides<C: Capability>(&self, ty: TypeKey) -> bool {
		self.schema
			.get(ty)
			.is_some_and(|descriptor| self.resolver().find_factory(descriptor, CapabilityKey::of::<C>()).is_some())
	}

	pub fn resolver(&self) -> AdapterResolver<'_> {
		AdapterResolver::new(&self.schema, self)
	}

	/// Empty document over this registry's schema, resolving through it.
	pub fn document(self: &Arc<Self>) -> Document {
		Document::new(self.schema.clone(), self.clone())
	}
}

impl AdapterSource for ExtensionRegistry {
	fn factory(&self, ty: TypeKey, capability: CapabilityKey) -> Option<&AdapterFactory> {
		self.factories.get(&(ty, capability))
	}
}

impl std::fmt::Debug for ExtensionRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ExtensionRegistry")
			.field("factories", &self.factories.len())
			.field("collisions", &self.collisions.len())
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use strata_dom::Binding;
	use strata_schema::SchemaBuilder;

	use super::*;
	use crate::builder::ExtensionRegistryBuilder;

	struct Alpha;

	impl Capability for Alpha {
		type Adapter = u32;
		const NAME: &'static str = "alpha";
	}

	struct Beta;

	impl Capability for Beta {
		type Adapter = u32;
		const NAME: &'static str = "beta";
	}

	fn registry() -> ExtensionRegistry {
		let mut schema = SchemaBuilder::new();
		schema.define("base");
		schema.define("leaf").base("base");
		let mut builder = ExtensionRegistryBuilder::new(Arc::new(schema.build().unwrap()));
		builder.define::<Beta, _>("base", |_: Binding<'_>| Arc::new(2)).unwrap();
		builder.define::<Alpha, _>("base", |_: Binding<'_>| Arc::new(1)).unwrap();
		builder.freeze()
	}

	#[test]
	fn lists_direct_capabilities_by_name() {
		let registry = registry();
		let base = registry.schema().by_name("base").unwrap();
		let leaf = registry.schema().by_name("leaf").unwrap();

		let names: Vec<_> = registry.capabilities_of(base).iter().map(CapabilityKey::name).collect();
		assert_eq!(names, vec!["alpha", "beta"]);
		assert!(registry.capabilities_of(leaf).is_empty());
		assert_eq!(registry.len(), 2);
	}

	#[test]
	fn provides_follows_lineage() {
		let registry = registry();
		let leaf = registry.schema().by_name("leaf").unwrap();

		assert!(registry.provides::<Alpha>(leaf));
		assert!(!registry.provides::<Alpha>(TypeKey::ROOT));
	}

	#[test]
	fn frozen_registry_is_shareable() {
		fn assert_send_sync<T: Send + Sync>() {}
		assert_send_sync::<ExtensionRegistry>();
	}
}
