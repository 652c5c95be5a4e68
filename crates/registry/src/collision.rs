//! Duplicate registrations and how they are settled.

use serde::{Deserialize, Serialize};
use strata_dom::CapabilityKey;
use strata_schema::TypeKey;

use crate::meta::RegistrySource;

/// What happens when a (type, capability) pair is registered twice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
	/// Keep the first factory seen for a pair.
	FirstWins,
	/// Overwrite with the last factory seen.
	#[default]
	LastWins,
}

impl DuplicatePolicy {
	pub(crate) fn settle(self) -> Resolution {
		match self {
			Self::FirstWins => Resolution::KeptExisting,
			Self::LastWins => Resolution::ReplacedExisting,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
	/// Existing factory kept; incoming dropped.
	KeptExisting,
	/// Existing factory replaced by incoming.
	ReplacedExisting,
}

/// One side of a collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Party {
	pub source: RegistrySource,
	/// Registration order within the builder.
	pub ordinal: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
	pub ty: TypeKey,
	pub type_name: String,
	pub capability: CapabilityKey,
	pub existing: Party,
	pub incoming: Party,
	pub resolution: Resolution,
}

impl Collision {
	/// The registration that ended up in the table.
	pub fn winner(&self) -> Party {
		match self.resolution {
			Resolution::KeptExisting => self.existing,
			Resolution::ReplacedExisting => self.incoming,
		}
	}
}
