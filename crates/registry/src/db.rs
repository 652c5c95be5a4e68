//! Process-wide registry installation.

use std::sync::{Arc, OnceLock};

use strata_schema::Schema;

use crate::builder::ExtensionRegistryBuilder;
use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::index::ExtensionRegistry;
use crate::plugin::run_plugins;

static REGISTRY: OnceLock<Arc<ExtensionRegistry>> = OnceLock::new();

/// Publishes `registry` for the rest of the process. Only the first call
/// succeeds.
pub fn install(registry: ExtensionRegistry) -> Result<Arc<ExtensionRegistry>, RegistryError> {
	let registry = Arc::new(registry);
	REGISTRY
		.set(registry.clone())
		.map_err(|_| RegistryError::AlreadyInstalled)?;
	tracing::debug!(factories = registry.len(), collisions = registry.collisions().len(), "extension registry installed");
	Ok(registry)
}

pub fn installed() -> Option<&'static Arc<ExtensionRegistry>> {
	REGISTRY.get()
}

/// Builds a registry from every linked [`ExtensionPlugin`](crate::ExtensionPlugin),
/// freezes it, and installs it.
pub fn init_from_plugins(schema: Arc<Schema>, config: RegistryConfig) -> Result<Arc<ExtensionRegistry>, RegistryError> {
	if REGISTRY.get().is_some() {
		return Err(RegistryError::AlreadyInstalled);
	}

	let mut builder = ExtensionRegistryBuilder::with_config(schema, config);
	let ran = run_plugins(&mut builder)?;
	tracing::debug!(plugins = ran, "extension plugins applied");
	install(builder.freeze())
}
