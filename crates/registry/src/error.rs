use strata_schema::SchemaError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	#[error(transparent)]
	Schema(#[from] SchemaError),

	#[error("extension plugin `{plugin}` failed: {reason}")]
	Plugin { plugin: &'static str, reason: String },

	#[error("an extension registry is already installed")]
	AlreadyInstalled,

	#[error("invalid registry config: {0}")]
	Config(String),
}
