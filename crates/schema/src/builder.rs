use std::sync::Arc;

use rustc_hash::FxHashMap as HashMap;

use crate::def::{SchemaDef, TypeDef};
use crate::descriptor::{AttributeDecl, Lineage, ROOT_TYPE_NAME, SlotDecl, TypeDescriptor, TypeKey};
use crate::error::SchemaError;

/// Collects type definitions and builds an immutable [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
	defs: Vec<TypeDef>,
}

impl SchemaBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_def(def: SchemaDef) -> Self {
		Self { defs: def.types }
	}

	/// Starts a new type definition. Without a call to [`TypeDef::base`] the
	/// type derives directly from the root type.
	pub fn define(&mut self, name: impl Into<String>) -> &mut TypeDef {
		self.defs.push(TypeDef::new(name));
		let last = self.defs.len() - 1;
		&mut self.defs[last]
	}

	pub fn len(&self) -> usize {
		self.defs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.defs.is_empty()
	}

	/// Assigns keys, resolves bases, computes lineages, and flattens inherited
	/// declarations.
	pub fn build(self) -> Result<Schema, SchemaError> {
		let mut names: Vec<Arc<str>> = Vec::with_capacity(self.defs.len() + 1);
		let mut by_name: HashMap<Arc<str>, TypeKey> =
			HashMap::with_capacity_and_hasher(self.defs.len() + 1, Default::default());

		let root: Arc<str> = Arc::from(ROOT_TYPE_NAME);
		names.push(root.clone());
		by_name.insert(root, TypeKey::ROOT);

		for def in &self.defs {
			let name: Arc<str> = Arc::from(def.name.as_str());
			if by_name.contains_key(&name) {
				return Err(SchemaError::DuplicateType(def.name.clone()));
			}
			by_name.insert(name.clone(), TypeKey::from_index(names.len()));
			names.push(name);
		}

		// Index 0 is the root; `defs[i]` owns index `i + 1`.
		let mut bases: Vec<Option<TypeKey>> = Vec::with_capacity(names.len());
		bases.push(None);
		for def in &self.defs {
			let base = match def.base.as_deref() {
				None => TypeKey::ROOT,
				Some(base) => *by_name.get(base).ok_or_else(|| SchemaError::UnknownBase {
					ty: def.name.clone(),
					base: base.to_string(),
				})?,
			};
			bases.push(Some(base));
		}

		let lineages = compute_lineages(&bases, &names)?;

		let mut types = Vec::with_capacity(names.len());
		for (index, lineage) in lineages.iter().enumerate() {
			let mut slots: Vec<SlotDecl> = Vec::new();
			let mut attributes: Vec<AttributeDecl> = Vec::new();

			// Root first so that derived declarations override inherited ones.
			for ancestor in lineage.iter().rev() {
				let Some(def) = ancestor.index().checked_sub(1).map(|i| &self.defs[i]) else {
					continue;
				};
				for slot in &def.slots {
					let accepts = match slot.accepts.as_deref() {
						None => TypeKey::ROOT,
						Some(accepts) => *by_name.get(accepts).ok_or_else(|| SchemaError::UnknownSlotType {
							ty: def.name.clone(),
							slot: slot.name.clone(),
							accepts: accepts.to_string(),
						})?,
					};
					let decl = SlotDecl {
						name: Arc::from(slot.name.as_str()),
						kind: slot.kind,
						accepts,
					};
					match slots.iter_mut().find(|s| s.name == decl.name) {
						Some(existing) => *existing = decl,
						None => slots.push(decl),
					}
				}
				for attr in &def.attributes {
					let decl = AttributeDecl {
						name: Arc::from(attr.name.as_str()),
						default: attr.default.clone(),
					};
					match attributes.iter_mut().find(|a| a.name == decl.name) {
						Some(existing) => *existing = decl,
						None => attributes.push(decl),
					}
				}
			}

			types.push(Arc::new(TypeDescriptor {
				key: TypeKey::from_index(index),
				name: names[index].clone(),
				base: bases[index],
				lineage: lineage.clone(),
				slots,
				attributes,
			}));
		}

		Ok(Schema { types, by_name })
	}
}

/// Computes every lineage once, reusing the already computed lineage of the
/// base. Each type is visited a constant number of times.
fn compute_lineages(bases: &[Option<TypeKey>], names: &[Arc<str>]) -> Result<Vec<Lineage>, SchemaError> {
	let mut done: Vec<Option<Lineage>> = vec![None; bases.len()];
	done[TypeKey::ROOT.index()] = Some(Lineage::new(Arc::from([TypeKey::ROOT])));

	let mut on_path = vec![false; bases.len()];
	let mut path: Vec<usize> = Vec::new();

	for start in 0..bases.len() {
		path.clear();
		let mut cur = start;
		while done[cur].is_none() {
			if on_path[cur] {
				let from = path.iter().position(|&p| p == cur).unwrap_or(0);
				let mut cycle: Vec<String> = path[from..].iter().map(|&i| names[i].to_string()).collect();
				cycle.push(names[cur].to_string());
				return Err(SchemaError::Cycle { path: cycle });
			}
			on_path[cur] = true;
			path.push(cur);
			cur = bases[cur].unwrap_or(TypeKey::ROOT).index();
		}

		for &index in path.iter().rev() {
			on_path[index] = false;
			let parent = bases[index].unwrap_or(TypeKey::ROOT).index();
			let inherited = done[parent].as_ref().map(Lineage::as_slice).unwrap_or_default();
			let mut keys = Vec::with_capacity(inherited.len() + 1);
			keys.push(TypeKey::from_index(index));
			keys.extend_from_slice(inherited);
			done[index] = Some(Lineage::new(Arc::from(keys)));
		}
	}

	Ok(done.into_iter().flatten().collect())
}

/// Immutable set of type descriptors.
#[derive(Debug)]
pub struct Schema {
	types: Vec<Arc<TypeDescriptor>>,
	by_name: HashMap<Arc<str>, TypeKey>,
}

impl Schema {
	pub fn get(&self, key: TypeKey) -> Option<&Arc<TypeDescriptor>> {
		self.types.get(key.index())
	}

	pub fn by_name(&self, name: &str) -> Option<TypeKey> {
		self.by_name.get(name).copied()
	}

	/// Looks up a type by name, treating absence as a schema error.
	pub fn expect(&self, name: &str) -> Result<TypeKey, SchemaError> {
		self.by_name(name).ok_or_else(|| SchemaError::UnknownType(name.to_string()))
	}

	pub fn descriptor(&self, name: &str) -> Option<&Arc<TypeDescriptor>> {
		self.by_name(name).and_then(|key| self.get(key))
	}

	pub fn name_of(&self, key: TypeKey) -> Option<&str> {
		self.get(key).map(|ty| ty.name())
	}

	pub fn lineage(&self, key: TypeKey) -> Option<&Lineage> {
		self.get(key).map(|ty| ty.lineage())
	}

	/// Whether `ty` is `ancestor` or derives from it.
	pub fn is_a(&self, ty: TypeKey, ancestor: TypeKey) -> bool {
		self.get(ty).is_some_and(|ty| ty.is_a(ancestor))
	}

	/// Effective (possibly inherited) slot `name` of `ty`.
	pub fn slot(&self, ty: TypeKey, name: &str) -> Option<&SlotDecl> {
		self.get(ty)?.slot(name)
	}

	/// Effective (possibly inherited) attribute `name` of `ty`.
	pub fn attribute(&self, ty: TypeKey, name: &str) -> Option<&AttributeDecl> {
		self.get(ty)?.attribute(name)
	}

	pub fn root(&self) -> &Arc<TypeDescriptor> {
		&self.types[TypeKey::ROOT.index()]
	}

	pub fn iter(&self) -> impl Iterator<Item = &Arc<TypeDescriptor>> {
		self.types.iter()
	}

	/// Number of types, the root type included.
	pub fn len(&self) -> usize {
		self.types.len()
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}
}
