use strata_dom::{Capability, Document, NodeId};

/// Decides which children a node accepts and places them.
///
/// Both operations answer `false` instead of erroring: rejection is an
/// ordinary outcome, and a rejected `add_child` leaves the tree untouched.
pub trait Hierarchical: Send + Sync {
	fn can_add_child(&self, doc: &Document, candidate: NodeId) -> bool;

	fn add_child(&self, doc: &mut Document, candidate: NodeId) -> bool;
}

/// Capability marker for [`Hierarchical`].
pub struct Hierarchy;

impl Capability for Hierarchy {
	type Adapter = dyn Hierarchical;
	const NAME: &'static str = "hierarchical";
}

/// Whether `parent` would accept `candidate`. Nodes without the capability
/// accept nothing.
pub fn can_add_child(doc: &Document, parent: NodeId, candidate: NodeId) -> bool {
	doc.resolve::<Hierarchy>(parent)
		.is_some_and(|hierarchy| hierarchy.can_add_child(doc, candidate))
}

/// Offers `candidate` to `parent`, returning whether it was placed.
pub fn add_child(doc: &mut Document, parent: NodeId, candidate: NodeId) -> bool {
	match doc.resolve::<Hierarchy>(parent) {
		Some(hierarchy) => hierarchy.add_child(doc, candidate),
		None => false,
	}
}
