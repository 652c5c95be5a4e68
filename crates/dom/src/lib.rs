//! Typed node trees.
//!
//! A [`Document`] owns a tree (or forest) of nodes, each an instance of a
//! [`strata_schema::TypeDescriptor`]. Ownership flows parent → child through
//! named slots; the parent link stored on every node is a plain id used for
//! lookup only.
//!
//! Behavior is not attached to node types statically. Instead, a
//! [`Capability`] is resolved per node through an [`AdapterSource`] (usually a
//! frozen extension registry): the node's lineage is walked most-derived first
//! and the first registered factory produces the adapter. Results are cached
//! per (node, capability) for the node's lifetime, so an adapter seen twice is
//! the same instance.
//!
//! # Invariants
//!
//! - A node is reachable from at most one parent slot.
//!   - Enforced in: [`Document::set_child`] and [`Document::push_child`],
//!     which detach the child before linking it.
//! - No node is its own ancestor.
//!   - Enforced in: [`Document::check_attach`] (`DomError::WouldCycle`).
//! - Stale ids never alias newer nodes.
//!   - Enforced in: [`NodeId`] generations.

mod document;
mod error;
mod extension;
mod resolver;

pub use document::{Document, NodeId};
pub use error::DomError;
pub use extension::{AdapterFactory, AdapterSource, Binding, Capability, CapabilityKey, ErasedAdapter, NoExtensions};
pub use resolver::AdapterResolver;
