//! Stock capabilities for strata documents.
//!
//! - [`Hierarchy`]: whether and where a node accepts children, implemented by
//!   [`ContainmentPolicy`] over an [`Admission`] ([`LineageAdmission`] for
//!   lineage allow-lists, [`CapabilityAdmission`] for homogeneous containers).
//! - [`Listing`]: icon and label for list views, implemented by
//!   [`LabelAdapter`].
//!
//! The two are independent; a type may register either, both, or neither.

mod containment;
mod hierarchy;
mod listable;

pub use containment::{Admission, CapabilityAdmission, ContainmentPolicy, LineageAdmission, Placement};
pub use hierarchy::{Hierarchical, Hierarchy, add_child, can_add_child};
pub use listable::{ItemInfo, LabelAdapter, LabelSpec, Listable, Listing, describe_for_display};

strata_catalog::submit_component!(Hierarchy, ordinal: 0);
strata_catalog::submit_component!(Listing, ordinal: 10);
