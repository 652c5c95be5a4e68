//! Extension registry: which capability adapters each schema type gets.
//!
//! Registration happens once, during initialization, through an
//! [`ExtensionRegistryBuilder`]. Plugins linked into the binary contribute
//! through [`inventory`] ([`ExtensionPlugin`], [`run_plugins`]). Freezing the
//! builder yields an immutable [`ExtensionRegistry`] that documents resolve
//! capabilities through; it can be published process-wide with [`install`].
//!
//! Registering the same (type, capability) twice is an upsert. The default
//! [`DuplicatePolicy::LastWins`] lets later registrations override earlier
//! ones; every duplicate is kept as a [`Collision`] for diagnostics.

mod builder;
mod collision;
mod config;
mod db;
mod error;
mod index;
mod meta;
mod plugin;

#[doc(hidden)]
pub use inventory;

pub use builder::ExtensionRegistryBuilder;
pub use collision::{Collision, DuplicatePolicy, Party, Resolution};
pub use config::RegistryConfig;
pub use db::{init_from_plugins, install, installed};
pub use error::RegistryError;
pub use index::ExtensionRegistry;
pub use meta::RegistrySource;
pub use plugin::{ExtensionPlugin, RegisterFn, collected, run_plugin, run_plugins};
