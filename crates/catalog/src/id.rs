use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a component type.
///
/// Compared by [`TypeId`]; the name is [`std::any::type_name`] and only used
/// for display and ordering.
#[derive(Clone, Copy)]
pub struct ComponentId {
	name: &'static str,
	type_id: TypeId,
}

impl ComponentId {
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self {
			name: std::any::type_name::<T>(),
			type_id: TypeId::of::<T>(),
		}
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Name without its module path.
	pub fn short_name(&self) -> &'static str {
		let base = self.name.split('<').next().unwrap_or(self.name);
		base.rsplit("::").next().unwrap_or(base)
	}

	pub fn type_id(&self) -> TypeId {
		self.type_id
	}

	pub fn is<T: ?Sized + 'static>(&self) -> bool {
		self.type_id == TypeId::of::<T>()
	}
}

impl PartialEq for ComponentId {
	fn eq(&self, other: &Self) -> bool {
		self.type_id == other.type_id
	}
}

impl Eq for ComponentId {}

impl Hash for ComponentId {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.type_id.hash(state);
	}
}

impl fmt::Debug for ComponentId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ComponentId({})", self.name)
	}
}

impl fmt::Display for ComponentId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}
