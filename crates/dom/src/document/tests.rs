use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use strata_schema::{AttrKind, SchemaBuilder};

use super::*;
use crate::extension::{AdapterFactory, Binding};

trait Greet: Send + Sync {
	fn greeting(&self) -> String;
}

struct Greeting;

impl Capability for Greeting {
	type Adapter = dyn Greet;
	const NAME: &'static str = "greeting";
}

struct Fixed(&'static str);

impl Greet for Fixed {
	fn greeting(&self) -> String {
		self.0.to_string()
	}
}

/// Exact-match table that counts factory invocations.
#[derive(Default)]
struct Table {
	factories: HashMap<(TypeKey, CapabilityKey), AdapterFactory>,
	made: Arc<AtomicUsize>,
}

impl Table {
	fn greet(&mut self, ty: TypeKey, text: &'static str) {
		let made = self.made.clone();
		let factory = AdapterFactory::new::<Greeting, _>(move |_: Binding<'_>| {
			made.fetch_add(1, Ordering::SeqCst);
			Arc::new(Fixed(text)) as Arc<dyn Greet>
		});
		self.factories.insert((ty, CapabilityKey::of::<Greeting>()), factory);
	}
}

impl AdapterSource for Table {
	fn factory(&self, ty: TypeKey, capability: CapabilityKey) -> Option<&AdapterFactory> {
		self.factories.get(&(ty, capability))
	}
}

#[fixture]
fn schema() -> Arc<Schema> {
	let mut builder = SchemaBuilder::new();
	builder.define("item").attribute("name", "").attribute("weight", 1i64);
	builder.define("special_item").base("item");
	builder.define("folder").slot_accepting("items", SlotKind::List, "item");
	builder
		.define("holder")
		.slot("main", SlotKind::Single)
		.slot_accepting("entries", SlotKind::List, "object");
	Arc::new(builder.build().unwrap())
}

fn key(schema: &Schema, name: &str) -> TypeKey {
	schema.by_name(name).unwrap()
}

#[rstest]
fn created_nodes_are_detached(schema: Arc<Schema>) {
	let mut doc = Document::without_extensions(schema);
	let node = doc.create_named("item").unwrap();

	assert!(doc.contains(node));
	assert_eq!(doc.parent(node), None);
	assert_eq!(doc.roots().collect::<Vec<_>>(), vec![node]);
	assert_eq!(doc.node_type(node).unwrap().name(), "item");
}

#[rstest]
fn unknown_type_name_is_rejected(schema: Arc<Schema>) {
	let mut doc = Document::without_extensions(schema);
	assert!(matches!(
		doc.create_named("nope"),
		Err(DomError::Schema(strata_schema::SchemaError::UnknownType(name))) if name == "nope"
	));
}

#[rstest]
fn attributes_fall_back_to_defaults(schema: Arc<Schema>) {
	let mut doc = Document::without_extensions(schema);
	let node = doc.create_named("special_item").unwrap();

	assert_eq!(doc.attribute(node, "name"), Some(&AttrValue::from("")));
	assert_eq!(doc.set_attribute(node, "name", "Forest").unwrap(), None);
	assert_eq!(doc.attribute(node, "name").and_then(AttrValue::as_str), Some("Forest"));
	assert_eq!(doc.attribute(node, "missing"), None);
}

#[rstest]
fn attribute_kind_is_enforced(schema: Arc<Schema>) {
	let mut doc = Document::without_extensions(schema);
	let node = doc.create_named("item").unwrap();

	let err = doc.set_attribute(node, "weight", "heavy").unwrap_err();
	assert_eq!(
		err,
		DomError::AttributeKind {
			attribute: "weight".into(),
			expected: AttrKind::Int,
			actual: AttrKind::Str,
		}
	);
	assert!(matches!(
		doc.set_attribute(node, "colour", true),
		Err(DomError::UnknownAttribute { .. })
	));
}

#[rstest]
fn list_slots_append_in_order(schema: Arc<Schema>) {
	let mut doc = Document::without_extensions(schema);
	let folder = doc.create_named("folder").unwrap();
	let a = doc.create_named("item").unwrap();
	let b = doc.create_named("special_item").unwrap();

	doc.push_child(folder, "items", a).unwrap();
	doc.push_child(folder, "items", b).unwrap();

	assert_eq!(doc.children(folder, "items"), &[a, b]);
	assert_eq!(doc.parent(b), Some(folder));
	assert_eq!(doc.parent_slot(b), Some("items"));
	assert_eq!(doc.descendants(folder), vec![folder, a, b]);
}

#[rstest]
fn slot_type_is_enforced(schema: Arc<Schema>) {
	let mut doc = Document::without_extensions(schema);
	let folder = doc.create_named("folder").unwrap();
	let other = doc.create_named("holder").unwrap();

	let err = doc.push_child(folder, "items", other).unwrap_err();
	assert_eq!(
		err,
		DomError::SlotTypeMismatch {
			slot: "items".into(),
			expected: "item".into(),
			actual: "holder".into(),
		}
	);
	assert!(doc.children(folder, "items").is_empty());
	assert_eq!(doc.parent(other), None);
}

#[rstest]
#[case::unknown_slot("nowhere")]
#[case::wrong_kind("entries")]
fn set_child_rejects_bad_slots(schema: Arc<Schema>, #[case] slot: &str) {
	let mut doc = Document::without_extensions(schema);
	let holder = doc.create_named("holder").unwrap();
	let item = doc.create_named("item").unwrap();

	assert!(doc.set_child(holder, slot, item).is_err());
	assert_eq!(doc.parent(item), None);
}

#[rstest]
fn single_slot_replacement_detaches_previous(schema: Arc<Schema>) {
	let mut doc = Document::without_extensions(schema);
	let holder = doc.create_named("holder").unwrap();
	let first = doc.create_named("item").unwrap();
	let second = doc.create_named("item").unwrap();

	assert_eq!(doc.set_child(holder, "main", first).unwrap(), None);
	assert_eq!(doc.set_child(holder, "main", second).unwrap(), Some(first));

	assert_eq!(doc.child(holder, "main"), Some(second));
	assert_eq!(doc.parent(first), None);
	assert!(doc.contains(first));
	assert_eq!(doc.clear_child(holder, "main").unwrap(), Some(second));
	assert_eq!(doc.child(holder, "main"), None);
}

#[rstest]
fn attaching_moves_between_parents(schema: Arc<Schema>) {
	let mut doc = Document::without_extensions(schema);
	let left = doc.create_named("folder").unwrap();
	let right = doc.create_named("folder").unwrap();
	let item = doc.create_named("item").unwrap();

	doc.push_child(left, "items", item).unwrap();
	doc.push_child(right, "items", item).unwrap();

	assert!(doc.children(left, "items").is_empty());
	assert_eq!(doc.children(right, "items"), &[item]);
}

#[rstest]
fn cycles_are_rejected(schema: Arc<Schema>) {
	let mut doc = Document::without_extensions(schema);
	let outer = doc.create_named("holder").unwrap();
	let inner = doc.create_named("holder").unwrap();
	doc.push_child(outer, "entries", inner).unwrap();

	assert_eq!(
		doc.push_child(inner, "entries", outer),
		Err(DomError::WouldCycle {
			parent: inner,
			child: outer,
		})
	);
	assert_eq!(
		doc.set_child(inner, "main", inner),
		Err(DomError::WouldCycle {
			parent: inner,
			child: inner,
		})
	);
	assert_eq!(doc.parent(outer), None);
}

#[rstest]
fn removal_takes_the_subtree_and_stales_ids(schema: Arc<Schema>) {
	let mut doc = Document::without_extensions(schema);
	let outer = doc.create_named("holder").unwrap();
	let inner = doc.create_named("holder").unwrap();
	let leaf = doc.create_named("item").unwrap();
	doc.push_child(outer, "entries", inner).unwrap();
	doc.set_child(inner, "main", leaf).unwrap();

	assert_eq!(doc.remove(inner).unwrap(), 2);
	assert!(!doc.contains(leaf));
	assert!(doc.children(outer, "entries").is_empty());

	let reused = doc.create_named("item").unwrap();
	assert_ne!(reused, inner);
	assert_ne!(reused, leaf);
	assert_eq!(doc.remove(leaf), Err(DomError::StaleNode(leaf)));
	assert_eq!(doc.attribute(leaf, "name"), None);
}

#[rstest]
fn resolution_is_cached_per_node(schema: Arc<Schema>) {
	let mut table = Table::default();
	table.greet(key(&schema, "item"), "item");
	let made = table.made.clone();
	let mut doc = Document::new(schema, Arc::new(table));

	let node = doc.create_named("item").unwrap();
	let first = doc.resolve::<Greeting>(node).unwrap();
	let second = doc.resolve::<Greeting>(node).unwrap();

	assert!(Arc::ptr_eq(&first, &second));
	assert_eq!(made.load(Ordering::SeqCst), 1);

	let other = doc.create_named("item").unwrap();
	let third = doc.resolve::<Greeting>(other).unwrap();
	assert!(!Arc::ptr_eq(&first, &third));
	assert_eq!(made.load(Ordering::SeqCst), 2);
}

#[rstest]
fn most_derived_registration_wins(schema: Arc<Schema>) {
	let mut table = Table::default();
	table.greet(key(&schema, "item"), "generic");
	table.greet(key(&schema, "special_item"), "special");
	let mut doc = Document::new(schema, Arc::new(table));

	let plain = doc.create_named("item").unwrap();
	let special = doc.create_named("special_item").unwrap();

	assert_eq!(doc.resolve::<Greeting>(plain).unwrap().greeting(), "generic");
	assert_eq!(doc.resolve::<Greeting>(special).unwrap().greeting(), "special");
}

#[rstest]
fn inherited_registration_applies_to_subtypes(schema: Arc<Schema>) {
	let mut table = Table::default();
	table.greet(TypeKey::ROOT, "anything");
	let mut doc = Document::new(schema, Arc::new(table));

	let folder = doc.create_named("folder").unwrap();
	assert_eq!(doc.resolve::<Greeting>(folder).unwrap().greeting(), "anything");
}

#[rstest]
fn absence_is_cached(schema: Arc<Schema>) {
	let mut table = Table::default();
	table.greet(key(&schema, "special_item"), "special");
	let mut doc = Document::new(schema, Arc::new(table));

	let plain = doc.create_named("item").unwrap();
	assert!(!doc.has_capability::<Greeting>(plain));
	assert!(doc.resolve::<Greeting>(plain).is_none());
	assert_eq!(doc.cached_adapters(), 1);
}

#[rstest]
fn invalidation_forces_a_fresh_adapter(schema: Arc<Schema>) {
	let mut table = Table::default();
	table.greet(key(&schema, "item"), "item");
	let made = table.made.clone();
	let mut doc = Document::new(schema, Arc::new(table));

	let node = doc.create_named("item").unwrap();
	let before = doc.resolve::<Greeting>(node).unwrap();
	assert_eq!(doc.invalidate_adapters(node), 1);
	let after = doc.resolve::<Greeting>(node).unwrap();

	assert!(!Arc::ptr_eq(&before, &after));
	assert_eq!(made.load(Ordering::SeqCst), 2);
}

#[rstest]
fn removal_drops_cached_adapters(schema: Arc<Schema>) {
	let mut table = Table::default();
	table.greet(TypeKey::ROOT, "any");
	let mut doc = Document::new(schema, Arc::new(table));

	let folder = doc.create_named("folder").unwrap();
	let item = doc.create_named("item").unwrap();
	doc.push_child(folder, "items", item).unwrap();
	doc.resolve::<Greeting>(folder).unwrap();
	doc.resolve::<Greeting>(item).unwrap();
	assert_eq!(doc.cached_adapters(), 2);

	doc.remove(folder).unwrap();
	assert_eq!(doc.cached_adapters(), 0);
	assert!(doc.resolve::<Greeting>(item).is_none());
}

#[test]
fn document_is_send() {
	fn assert_send<T: Send>() {}
	assert_send::<Document>();
}
