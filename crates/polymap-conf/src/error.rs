use polymap_discriminator::DiscriminatorError;
use polymap_fetch::FetchError;
use thiserror::Error;

/// Errors raised while loading mapping metadata or bootstrapping the registry
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("Environment error: {0}")]
	Env(String),

	#[error("Invalid mapping: {0}")]
	Invalid(String),

	#[error("Discriminator of entity '{entity}': {source}")]
	Discriminator {
		entity: String,
		#[source]
		source: DiscriminatorError,
	},

	#[error("Registry error: {0}")]
	Fetch(#[from] FetchError),
}

pub type ConfResult<T> = Result<T, ConfError>;
