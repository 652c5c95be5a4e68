use rustc_hash::FxHashSet as HashSet;

use crate::id::ComponentId;

/// A component submitted at link time.
pub struct ComponentDef {
	/// Lower ordinals come first in [`ServiceCatalog::collected`].
	pub ordinal: i32,
	pub id: fn() -> ComponentId,
}

inventory::collect!(ComponentDef);

/// Ordered list of component types.
#[derive(Debug, Clone, Default)]
pub struct ServiceCatalog {
	entries: Vec<ComponentId>,
}

impl ServiceCatalog {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with<T: ?Sized + 'static>(self) -> Self {
		self.with_id(ComponentId::of::<T>())
	}

	pub fn with_id(mut self, id: ComponentId) -> Self {
		self.push(id);
		self
	}

	pub fn push(&mut self, id: ComponentId) {
		self.entries.push(id);
	}

	/// Every linked [`ComponentDef`], ordered by ordinal, then name.
	pub fn collected() -> Self {
		let mut defs: Vec<(i32, ComponentId)> = inventory::iter::<ComponentDef>
			.into_iter()
			.map(|def| (def.ordinal, (def.id)()))
			.collect();
		defs.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.name().cmp(b.1.name())));
		tracing::trace!(components = defs.len(), "collected service components");

		Self {
			entries: defs.into_iter().map(|(_, id)| id).collect(),
		}
	}

	/// Entries as listed, including duplicates.
	pub fn entries(&self) -> &[ComponentId] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn contains<T: ?Sized + 'static>(&self) -> bool {
		self.entries.iter().any(ComponentId::is::<T>)
	}

	/// The components in order, keeping the first occurrence of each.
	pub fn build(&self) -> Vec<ComponentId> {
		let mut seen = HashSet::default();
		self.entries.iter().copied().filter(|id| seen.insert(*id)).collect()
	}
}

impl FromIterator<ComponentId> for ServiceCatalog {
	fn from_iter<I: IntoIterator<Item = ComponentId>>(iter: I) -> Self {
		Self {
			entries: iter.into_iter().collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	struct Renderer;
	struct Physics;
	struct Audio;

	#[test]
	fn build_keeps_order_and_drops_duplicates() {
		let catalog = crate::catalog![Renderer, Physics, Renderer, Audio, Physics];
		assert_eq!(catalog.len(), 5);

		let built = catalog.build();
		assert_eq!(
			built,
			vec![
				ComponentId::of::<Renderer>(),
				ComponentId::of::<Physics>(),
				ComponentId::of::<Audio>(),
			]
		);
	}

	#[test]
	fn empty_catalog_builds_nothing() {
		assert!(crate::catalog![].build().is_empty());
	}

	#[test]
	fn identity_ignores_names() {
		let id = ComponentId::of::<Renderer>();
		assert!(id.is::<Renderer>());
		assert!(!id.is::<Physics>());
		assert_eq!(id.short_name(), "Renderer");
		assert!(ServiceCatalog::new().with::<Audio>().contains::<Audio>());
	}

	#[test]
	fn short_name_strips_generic_arguments() {
		assert_eq!(ComponentId::of::<Vec<Renderer>>().short_name(), "Vec");
	}
}
