use std::fmt;

/// Where an extension registration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegistrySource {
	/// Shipped with the host application.
	Builtin,
	/// Contributed by a library crate through an extension plugin.
	Crate(&'static str),
	/// Registered directly by host code while building.
	Runtime,
}

impl RegistrySource {
	/// Precedence rank of the source (higher runs later).
	pub const fn rank(self) -> u8 {
		match self {
			Self::Builtin => 0,
			Self::Crate(_) => 1,
			Self::Runtime => 2,
		}
	}
}

impl fmt::Display for RegistrySource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Builtin => write!(f, "builtin"),
			Self::Crate(name) => write!(f, "crate:{name}"),
			Self::Runtime => write!(f, "runtime"),
		}
	}
}
