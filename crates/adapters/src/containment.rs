//! Routing candidates into slots.

use std::marker::PhantomData;
use std::sync::Arc;

use rustc_hash::FxHashMap as HashMap;
use strata_dom::{Binding, Capability, Document, NodeId};
use strata_registry::ExtensionRegistryBuilder;
use strata_schema::{SlotKind, TypeKey};

use crate::hierarchy::{Hierarchical, Hierarchy};

/// Predicate over candidate nodes that also picks the receiving slot.
///
/// `None` rejects the candidate. Structural checks (slot exists, accepted
/// type, cycles) happen afterwards in [`ContainmentPolicy::plan`].
pub trait Admission: Send + Sync + 'static {
	fn route<'a>(&'a self, doc: &Document, candidate: NodeId) -> Option<&'a str>;
}

/// Admits candidates by lineage: the first entry of the candidate's lineage
/// present in the table decides the slot.
#[derive(Debug, Clone, Default)]
pub struct LineageAdmission {
	routes: HashMap<TypeKey, Arc<str>>,
}

impl LineageAdmission {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sends candidates deriving from `ty` to `slot`.
	pub fn admit(mut self, ty: TypeKey, slot: &str) -> Self {
		self.routes.insert(ty, Arc::from(slot));
		self
	}

	pub fn len(&self) -> usize {
		self.routes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}
}

impl Admission for LineageAdmission {
	fn route<'a>(&'a self, doc: &Document, candidate: NodeId) -> Option<&'a str> {
		doc.lineage(candidate)?
			.find_map(|ty| self.routes.get(&ty))
			.map(|slot| &**slot)
	}
}

/// Admits exactly the candidates on which capability `C` resolves, whatever
/// their lineage.
pub struct CapabilityAdmission<C> {
	slot: Arc<str>,
	_capability: PhantomData<fn() -> C>,
}

impl<C: Capability> CapabilityAdmission<C> {
	pub fn new(slot: &str) -> Self {
		Self {
			slot: Arc::from(slot),
			_capability: PhantomData,
		}
	}
}

impl<C: Capability> Admission for CapabilityAdmission<C> {
	fn route<'a>(&'a self, doc: &Document, candidate: NodeId) -> Option<&'a str> {
		doc.has_capability::<C>(candidate).then_some(&*self.slot)
	}
}

impl<C: Capability> std::fmt::Debug for CapabilityAdmission<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CapabilityAdmission")
			.field("capability", &C::NAME)
			.field("slot", &self.slot)
			.finish()
	}
}

/// Where an admitted candidate goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement<'a> {
	pub slot: &'a str,
	pub kind: SlotKind,
}

/// [`Hierarchical`] adapter driven by an [`Admission`].
pub struct ContainmentPolicy {
	parent: NodeId,
	admission: Arc<dyn Admission>,
}

impl ContainmentPolicy {
	pub fn new(parent: NodeId, admission: Arc<dyn Admission>) -> Self {
		Self { parent, admission }
	}

	/// Installs a policy built around `admission` as the [`Hierarchy`]
	/// adapter of `ty` and its descendants.
	pub fn register(
		builder: &mut ExtensionRegistryBuilder,
		ty: TypeKey,
		admission: impl Admission,
	) -> &mut ExtensionRegistryBuilder {
		let admission: Arc<dyn Admission> = Arc::new(admission);
		builder.register::<Hierarchy, _>(ty, move |binding: Binding<'_>| -> Arc<dyn Hierarchical> {
			Arc::new(ContainmentPolicy::new(binding.node, admission.clone()))
		})
	}

	pub fn parent(&self) -> NodeId {
		self.parent
	}

	/// Shared decision behind [`Hierarchical::can_add_child`] and
	/// [`Hierarchical::add_child`].
	pub fn plan(&self, doc: &Document, candidate: NodeId) -> Option<Placement<'_>> {
		let Some(slot) = self.admission.route(doc, candidate) else {
			tracing::trace!(parent = %self.parent, %candidate, "candidate not admitted");
			return None;
		};

		match doc.check_attach(self.parent, slot, candidate) {
			Ok(kind) => Some(Placement { slot, kind }),
			Err(error) => {
				tracing::trace!(parent = %self.parent, %candidate, slot, %error, "candidate admitted but does not fit");
				None
			}
		}
	}
}

impl Hierarchical for ContainmentPolicy {
	fn can_add_child(&self, doc: &Document, candidate: NodeId) -> bool {
		self.plan(doc, candidate).is_some()
	}

	fn add_child(&self, doc: &mut Document, candidate: NodeId) -> bool {
		let Some(Placement { slot, kind }) = self.plan(doc, candidate) else {
			return false;
		};

		let placed = match kind {
			SlotKind::Single => doc.set_child(self.parent, slot, candidate).map(|displaced| {
				if let Some(displaced) = displaced {
					tracing::trace!(parent = %self.parent, slot, %displaced, "replaced slot occupant");
				}
			}),
			SlotKind::List => doc.push_child(self.parent, slot, candidate),
		};
		placed.is_ok()
	}
}

impl std::fmt::Debug for ContainmentPolicy {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ContainmentPolicy")
			.field("parent", &self.parent)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use rstest::rstest;
	use strata_registry::ExtensionRegistry;
	use strata_schema::{Schema, SchemaBuilder};

	use super::*;

	fn schema() -> Arc<Schema> {
		let mut builder = SchemaBuilder::new();
		builder.define("shape");
		builder.define("circle").base("shape");
		builder.define("disc").base("circle");
		builder.define("text");
		builder
			.define("canvas")
			.slot("shapes", SlotKind::List)
			.slot("circles", SlotKind::List)
			.slot("caption", SlotKind::Single);
		Arc::new(builder.build().unwrap())
	}

	fn canvas_registry() -> Arc<ExtensionRegistry> {
		let schema = schema();
		let key = |name| schema.by_name(name).unwrap();
		let admission = LineageAdmission::new()
			.admit(key("shape"), "shapes")
			.admit(key("circle"), "circles")
			.admit(key("text"), "caption");

		let mut builder = ExtensionRegistryBuilder::new(schema.clone());
		ContainmentPolicy::register(&mut builder, key("canvas"), admission);
		Arc::new(builder.freeze())
	}

	#[rstest]
	#[case::exact("shape", Some("shapes"))]
	#[case::closer_entry("circle", Some("circles"))]
	#[case::inherited("disc", Some("circles"))]
	#[case::single("text", Some("caption"))]
	#[case::not_listed("canvas", None)]
	fn lineage_routing(#[case] candidate: &str, #[case] slot: Option<&str>) {
		let registry = canvas_registry();
		let mut doc = registry.document();
		let canvas = doc.create_named("canvas").unwrap();
		let node = doc.create_named(candidate).unwrap();

		assert_eq!(crate::can_add_child(&doc, canvas, node), slot.is_some());
		assert_eq!(crate::add_child(&mut doc, canvas, node), slot.is_some());
		assert_eq!(doc.parent_slot(node), slot);
	}

	#[test]
	fn resolved_policy_fills_single_slot() {
		let registry = canvas_registry();
		let mut doc = registry.document();
		let canvas = doc.create_named("canvas").unwrap();
		let text = doc.create_named("text").unwrap();

		let policy = doc.resolve::<Hierarchy>(canvas).unwrap();
		assert!(policy.can_add_child(&doc, text));
		assert!(policy.add_child(&mut doc, text));
		assert_eq!(doc.child(canvas, "caption"), Some(text));
	}

	#[test]
	fn container_cannot_contain_itself() {
		let registry = canvas_registry();
		let mut doc = registry.document();
		let canvas = doc.create_named("canvas").unwrap();

		assert!(!crate::can_add_child(&doc, canvas, canvas));
		assert!(!crate::add_child(&mut doc, canvas, canvas));
	}

	#[test]
	fn plan_names_slot_and_kind() {
		let registry = canvas_registry();
		let mut doc = registry.document();
		let canvas = doc.create_named("canvas").unwrap();
		let disc = doc.create_named("disc").unwrap();
		let admission = LineageAdmission::new().admit(registry.schema().by_name("circle").unwrap(), "circles");
		let policy = ContainmentPolicy::new(canvas, Arc::new(admission));

		assert_eq!(
			policy.plan(&doc, disc),
			Some(Placement {
				slot: "circles",
				kind: SlotKind::List,
			})
		);
	}

	#[test]
	fn nodes_without_policy_accept_nothing() {
		let registry = canvas_registry();
		let mut doc = registry.document();
		let shape = doc.create_named("shape").unwrap();
		let disc = doc.create_named("disc").unwrap();

		assert!(!crate::add_child(&mut doc, shape, disc));
		assert_eq!(doc.parent(disc), None);
	}
}
