use crate::builder::ExtensionRegistryBuilder;
use crate::error::RegistryError;
use crate::meta::RegistrySource;

pub type RegisterFn = fn(&mut ExtensionRegistryBuilder) -> Result<(), RegistryError>;

/// A bundle of registrations contributed at link time.
///
/// Submit with [`extension_plugin!`](crate::extension_plugin) or
/// `inventory::submit!`; [`run_plugins`] applies every submission linked into
/// the binary.
#[derive(Debug)]
pub struct ExtensionPlugin {
	pub name: &'static str,
	/// Lower ordinals run first, so later plugins override earlier ones under
	/// the default duplicate policy.
	pub ordinal: i32,
	pub source: RegistrySource,
	pub register: RegisterFn,
}

inventory::collect!(ExtensionPlugin);

impl ExtensionPlugin {
	pub const fn new(name: &'static str, ordinal: i32, source: RegistrySource, register: RegisterFn) -> Self {
		Self {
			name,
			ordinal,
			source,
			register,
		}
	}
}

/// Every linked plugin in run order: ordinal, then source rank, then name.
pub fn collected() -> Vec<&'static ExtensionPlugin> {
	let mut plugins: Vec<&'static ExtensionPlugin> = inventory::iter::<ExtensionPlugin>.into_iter().collect();
	plugins.sort_by(|a, b| {
		a.ordinal
			.cmp(&b.ordinal)
			.then_with(|| a.source.rank().cmp(&b.source.rank()))
			.then_with(|| a.name.cmp(b.name))
	});
	plugins
}

/// Runs every collected plugin against `builder`, returning how many ran.
///
/// Registrations are attributed to each plugin's source. The first failing
/// plugin aborts the run.
pub fn run_plugins(builder: &mut ExtensionRegistryBuilder) -> Result<usize, RegistryError> {
	let plugins = collected();
	for plugin in &plugins {
		run_plugin(builder, plugin)?;
	}
	Ok(plugins.len())
}

pub fn run_plugin(builder: &mut ExtensionRegistryBuilder, plugin: &ExtensionPlugin) -> Result<(), RegistryError> {
	let previous = builder.set_source(plugin.source);
	let result = (plugin.register)(builder);
	builder.set_source(previous);

	match result {
		Ok(()) => {
			tracing::trace!(plugin = plugin.name, source = %plugin.source, "extension plugin registered");
			Ok(())
		}
		Err(RegistryError::Plugin { plugin: name, reason }) => {
			tracing::warn!(plugin = name, %reason, "extension plugin failed");
			Err(RegistryError::Plugin { plugin: name, reason })
		}
		Err(e) => {
			tracing::warn!(plugin = plugin.name, error = %e, "extension plugin failed");
			Err(RegistryError::Plugin {
				plugin: plugin.name,
				reason: e.to_string(),
			})
		}
	}
}

/// Submits an [`ExtensionPlugin`] attributed to the calling crate.
///
/// ```ignore
/// strata_registry::extension_plugin!("skins", ordinal: 10, register: register_skins);
/// ```
#[macro_export]
macro_rules! extension_plugin {
	($name:expr, ordinal: $ordinal:expr, register: $register:path $(,)?) => {
		$crate::inventory::submit! {
			$crate::ExtensionPlugin::new(
				$name,
				$ordinal,
				$crate::RegistrySource::Crate(env!("CARGO_PKG_NAME")),
				$register,
			)
		}
	};
}
