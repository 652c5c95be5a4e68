//! Service composition catalog.
//!
//! A [`ServiceCatalog`] is the ordered list of components a host wires into a
//! running application. It only names them; constructing and connecting the
//! components is the host's job.

mod catalog;
mod id;

#[doc(hidden)]
pub use inventory;

pub use catalog::{ComponentDef, ServiceCatalog};
pub use id::ComponentId;

/// Builds a [`ServiceCatalog`] from a list of component types.
///
/// ```ignore
/// let components = catalog![Renderer, Physics].build();
/// ```
#[macro_export]
macro_rules! catalog {
	($($component:ty),* $(,)?) => {
		$crate::ServiceCatalog::new()$(.with::<$component>())*
	};
}

/// Submits a component to [`ServiceCatalog::collected`].
#[macro_export]
macro_rules! submit_component {
	($component:ty, ordinal: $ordinal:expr $(,)?) => {
		$crate::inventory::submit! {
			$crate::ComponentDef {
				ordinal: $ordinal,
				id: $crate::ComponentId::of::<$component>,
			}
		}
	};
}
