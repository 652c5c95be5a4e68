//! Type descriptors and lineages.
//!
//! A [`Schema`] is an immutable set of [`TypeDescriptor`]s produced by a
//! [`SchemaBuilder`]. Every type derives (directly or transitively) from the
//! universal root type [`ROOT_TYPE_NAME`], and carries a precomputed
//! [`Lineage`]: its chain of ancestor types, most-derived first.
//!
//! # Mental Model
//!
//! 1. **Definition:** types are declared by name, either programmatically
//!    through [`SchemaBuilder::define`] or from a TOML document via
//!    [`SchemaDef::from_toml_str`].
//! 2. **Build:** [`SchemaBuilder::build`] assigns dense [`TypeKey`]s, resolves
//!    base names, rejects cycles, and flattens inherited slots and attributes.
//! 3. **Query:** the resulting [`Schema`] answers lineage and `is_a` queries in
//!    O(depth) without further allocation.
//!
//! # Invariants
//!
//! - Every lineage is acyclic, starts at its own type, and ends at
//!   [`TypeKey::ROOT`].
//!   - Enforced in: `builder::compute_lineages`.
//!   - Tested by: `builder::tests::lineage_is_acyclic_for_random_forests`.

mod builder;
mod def;
mod descriptor;
mod error;
mod value;

pub use builder::{Schema, SchemaBuilder};
pub use def::{AttributeDef, SchemaDef, SlotDef, TypeDef};
pub use descriptor::{AttributeDecl, Lineage, ROOT_TYPE_NAME, SlotDecl, SlotKind, TypeDescriptor, TypeKey};
pub use error::SchemaError;
pub use value::{AttrKind, AttrValue};
