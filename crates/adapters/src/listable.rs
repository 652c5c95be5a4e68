use std::sync::Arc;

use strata_dom::{Binding, Capability, Document, NodeId};
use strata_registry::ExtensionRegistryBuilder;
use strata_schema::TypeKey;

/// What a list or outline row shows for a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInfo {
	/// Icon class name; interpreting it is up to the front end.
	pub icon: String,
	pub label: String,
}

pub trait Listable: Send + Sync {
	fn item_info(&self, doc: &Document) -> ItemInfo;
}

/// Capability marker for [`Listable`].
pub struct Listing;

impl Capability for Listing {
	type Adapter = dyn Listable;
	const NAME: &'static str = "listable";
}

/// Display info for `node`, if its type is listable.
pub fn describe_for_display(doc: &Document, node: NodeId) -> Option<ItemInfo> {
	doc.resolve::<Listing>(node).map(|listable| listable.item_info(doc))
}

/// Labels a node with a fixed prefix followed by one of its attributes.
#[derive(Debug, Clone)]
pub struct LabelAdapter {
	node: NodeId,
	icon: Arc<str>,
	prefix: Arc<str>,
	attribute: Option<Arc<str>>,
}

impl LabelAdapter {
	pub fn new(node: NodeId, icon: impl Into<Arc<str>>, prefix: impl Into<Arc<str>>) -> Self {
		Self {
			node,
			icon: icon.into(),
			prefix: prefix.into(),
			attribute: None,
		}
	}

	pub fn with_attribute(mut self, attribute: impl Into<Arc<str>>) -> Self {
		self.attribute = Some(attribute.into());
		self
	}

	/// Starts a registration; see [`LabelSpec::register`].
	pub fn spec(prefix: &str) -> LabelSpec {
		LabelSpec {
			prefix: Arc::from(prefix),
			attribute: None,
			icon: None,
		}
	}
}

impl Listable for LabelAdapter {
	fn item_info(&self, doc: &Document) -> ItemInfo {
		let label = match self.attribute.as_deref().and_then(|name| doc.attribute(self.node, name)) {
			Some(value) => format!("{}{value}", self.prefix),
			None => self.prefix.to_string(),
		};

		ItemInfo {
			icon: self.icon.to_string(),
			label,
		}
	}
}

/// Registration parameters shared by every [`LabelAdapter`] of a type.
#[derive(Debug, Clone)]
pub struct LabelSpec {
	prefix: Arc<str>,
	attribute: Option<Arc<str>>,
	icon: Option<Arc<str>>,
}

impl LabelSpec {
	/// Appends the value of `attribute` after the prefix.
	pub fn attribute(mut self, attribute: &str) -> Self {
		self.attribute = Some(Arc::from(attribute));
		self
	}

	/// Fixed icon class. Without one, the icon is the node's type name.
	pub fn icon(mut self, icon: &str) -> Self {
		self.icon = Some(Arc::from(icon));
		self
	}

	/// Installs the label as the [`Listing`] adapter of `ty` and its
	/// descendants.
	pub fn register(self, builder: &mut ExtensionRegistryBuilder, ty: TypeKey) -> &mut ExtensionRegistryBuilder {
		builder.register::<Listing, _>(ty, move |binding: Binding<'_>| -> Arc<dyn Listable> {
			let icon = self.icon.clone().unwrap_or_else(|| Arc::from(binding.ty.name()));
			let mut adapter = LabelAdapter::new(binding.node, icon, self.prefix.clone());
			if let Some(attribute) = &self.attribute {
				adapter = adapter.with_attribute(attribute.clone());
			}
			Arc::new(adapter)
		})
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use strata_dom::NoExtensions;
	use strata_schema::SchemaBuilder;

	use super::*;

	fn doc() -> Document {
		let mut schema = SchemaBuilder::new();
		schema.define("layer").attribute("name", "").attribute("depth", 0i64);
		Document::new(Arc::new(schema.build().unwrap()), Arc::new(NoExtensions))
	}

	#[test]
	fn prefix_only_without_attribute() {
		let mut doc = doc();
		let node = doc.create_named("layer").unwrap();
		let adapter = LabelAdapter::new(node, "layer", "Layer");

		assert_eq!(
			adapter.item_info(&doc),
			ItemInfo {
				icon: "layer".into(),
				label: "Layer".into(),
			}
		);
	}

	#[test]
	fn non_text_attributes_are_formatted() {
		let mut doc = doc();
		let node = doc.create_named("layer").unwrap();
		doc.set_attribute(node, "depth", 3i64).unwrap();
		let adapter = LabelAdapter::new(node, "layer", "Depth ").with_attribute("depth");

		assert_eq!(adapter.item_info(&doc).label, "Depth 3");
	}

	#[test]
	fn unlisted_nodes_have_no_description() {
		let mut doc = doc();
		let node = doc.create_named("layer").unwrap();
		assert_eq!(describe_for_display(&doc, node), None);
	}
}
