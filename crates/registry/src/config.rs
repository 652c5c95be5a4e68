use serde::{Deserialize, Serialize};

use crate::collision::DuplicatePolicy;
use crate::error::RegistryError;

/// Registry build settings, usually read from TOML:
///
/// ```toml
/// duplicate_policy = "first_wins"
/// log_duplicates = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
	pub duplicate_policy: DuplicatePolicy,
	/// Emit a `debug` event per collision.
	pub log_duplicates: bool,
}

impl Default for RegistryConfig {
	fn default() -> Self {
		Self {
			duplicate_policy: DuplicatePolicy::LastWins,
			log_duplicates: true,
		}
	}
}

impl RegistryConfig {
	pub fn from_toml_str(input: &str) -> Result<Self, RegistryError> {
		toml::from_str(input).map_err(|e| RegistryError::Config(e.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn empty_document_is_default() {
		assert_eq!(RegistryConfig::from_toml_str("").unwrap(), RegistryConfig::default());
	}

	#[test]
	fn parses_policy() {
		let config = RegistryConfig::from_toml_str("duplicate_policy = \"first_wins\"\nlog_duplicates = false\n").unwrap();
		assert_eq!(config.duplicate_policy, DuplicatePolicy::FirstWins);
		assert!(!config.log_duplicates);
	}

	#[test]
	fn rejects_unknown_keys() {
		assert!(matches!(
			RegistryConfig::from_toml_str("policy = \"last_wins\""),
			Err(RegistryError::Config(_))
		));
	}
}
