use std::sync::Arc;

use rustc_hash::FxHashMap as HashMap;
use strata_dom::{AdapterFactory, Binding, Capability, CapabilityKey};
use strata_schema::{Schema, TypeKey};

use crate::collision::{Collision, Party, Resolution};
use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::index::ExtensionRegistry;
use crate::meta::RegistrySource;

struct Entry {
	factory: AdapterFactory,
	party: Party,
}

/// Init-phase view of the extension registry.
///
/// Registration is an upsert keyed by exact (type, capability); duplicates
/// are settled by [`RegistryConfig::duplicate_policy`] and recorded. Call
/// [`freeze`](Self::freeze) once every extension is in.
pub struct ExtensionRegistryBuilder {
	schema: Arc<Schema>,
	config: RegistryConfig,
	entries: HashMap<(TypeKey, CapabilityKey), Entry>,
	collisions: Vec<Collision>,
	source: RegistrySource,
	next_ordinal: u32,
}

impl ExtensionRegistryBuilder {
	pub fn new(schema: Arc<Schema>) -> Self {
		Self::with_config(schema, RegistryConfig::default())
	}

	pub fn with_config(schema: Arc<Schema>, config: RegistryConfig) -> Self {
		Self {
			schema,
			config,
			entries: HashMap::default(),
			collisions: Vec::new(),
			source: RegistrySource::Runtime,
			next_ordinal: 0,
		}
	}

	pub fn schema(&self) -> &Arc<Schema> {
		&self.schema
	}

	pub fn config(&self) -> &RegistryConfig {
		&self.config
	}

	/// Number of distinct (type, capability) registrations so far.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn collisions(&self) -> &[Collision] {
		&self.collisions
	}

	/// Attributes subsequent registrations to `source`, returning the
	/// previous one.
	pub fn set_source(&mut self, source: RegistrySource) -> RegistrySource {
		std::mem::replace(&mut self.source, source)
	}

	/// Registers the factory producing `C` adapters for nodes of `ty` and of
	/// every type deriving from it that has no closer registration.
	pub fn register<C, F>(&mut self, ty: TypeKey, make: F) -> &mut Self
	where
		C: Capability,
		F: Fn(Binding<'_>) -> Arc<C::Adapter> + Send + Sync + 'static,
	{
		self.register_factory(ty, AdapterFactory::new::<C, F>(make))
	}

	/// Like [`register`](Self::register), addressing the type by name.
	pub fn define<C, F>(&mut self, type_name: &str, make: F) -> Result<&mut Self, RegistryError>
	where
		C: Capability,
		F: Fn(Binding<'_>) -> Arc<C::Adapter> + Send + Sync + 'static,
	{
		let ty = self.schema.expect(type_name)?;
		Ok(self.register::<C, F>(ty, make))
	}

	/// Registers an already erased factory under its own capability.
	pub fn register_factory(&mut self, ty: TypeKey, factory: AdapterFactory) -> &mut Self {
		let capability = factory.capability();
		let incoming = Party {
			source: self.source,
			ordinal: self.next_ordinal,
		};
		self.next_ordinal += 1;

		let Some(existing) = self.entries.get_mut(&(ty, capability)) else {
			self.entries.insert((ty, capability), Entry { factory, party: incoming });
			return self;
		};

		let resolution = self.config.duplicate_policy.settle();
		let collision = Collision {
			ty,
			type_name: self.schema.name_of(ty).unwrap_or("?").to_string(),
			capability,
			existing: existing.party,
			incoming,
			resolution,
		};

		if self.config.log_duplicates {
			tracing::debug!(
				ty = %collision.type_name,
				%capability,
				existing = %collision.existing.source,
				incoming = %collision.incoming.source,
				?resolution,
				"duplicate extension registration"
			);
		}

		if resolution == Resolution::ReplacedExisting {
			*existing = Entry { factory, party: incoming };
		}
		self.collisions.push(collision);
		self
	}

	/// Ends the init phase.
	pub fn freeze(self) -> ExtensionRegistry {
		let factories = self
			.entries
			.into_iter()
			.map(|(key, entry)| (key, entry.factory))
			.collect();
		ExtensionRegistry::new(self.schema, factories, self.collisions)
	}
}

impl std::fmt::Debug for ExtensionRegistryBuilder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ExtensionRegistryBuilder")
			.field("entries", &self.entries.len())
			.field("collisions", &self.collisions.len())
			.field("source", &self.source)
			.finish_non_exhaustive()
	}
}
