//! Builder for constructing a ready-to-use engine from configuration.
//!
//! Storage backends are created through factory functions keyed by the
//! implementation names used in the `[storage.implementations]` table, so
//! callers can plug in their own backends next to the bundled ones.

use crate::Permit2;
use permit2_config::Config;
use permit2_storage::{StorageError, StorageFactory, StorageInterface};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during engine construction.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Missing required component: {0}")]
	MissingComponent(String),
}

/// Factory functions available to the builder, keyed by implementation name.
pub struct Permit2Factories<SF> {
	pub storage_factories: HashMap<String, SF>,
}

impl Default for Permit2Factories<StorageFactory> {
	/// Factories for every storage backend bundled with `permit2-storage`.
	fn default() -> Self {
		let storage_factories = permit2_storage::get_all_implementations()
			.into_iter()
			.map(|(name, factory)| (name.to_string(), factory))
			.collect();
		Self { storage_factories }
	}
}

/// An engine together with the state backend it operates on.
pub struct Permit2Engine {
	permit2: Permit2,
	storage: Box<dyn StorageInterface>,
}

impl Permit2Engine {
	pub fn permit2(&self) -> &Permit2 {
		&self.permit2
	}

	pub fn storage(&self) -> &dyn StorageInterface {
		self.storage.as_ref()
	}

	pub fn storage_mut(&mut self) -> &mut dyn StorageInterface {
		self.storage.as_mut()
	}

	pub fn into_parts(self) -> (Permit2, Box<dyn StorageInterface>) {
		(self.permit2, self.storage)
	}
}

/// Builder for constructing a [`Permit2Engine`] with a pluggable backend.
pub struct Permit2Builder {
	config: Config,
}

impl Permit2Builder {
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Builds the engine over the primary storage implementation.
	///
	/// Other configured implementations are not instantiated.
	pub fn build<SF>(self, factories: Permit2Factories<SF>) -> Result<Permit2Engine, BuilderError>
	where
		SF: Fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>,
	{
		self.config
			.validate()
			.map_err(|e| BuilderError::Config(e.to_string()))?;

		let primary = &self.config.storage.primary;
		let factory = factories.storage_factories.get(primary).ok_or_else(|| {
			BuilderError::MissingComponent(format!(
				"No factory registered for primary storage '{}'",
				primary
			))
		})?;
		let config = self.config.storage.implementations.get(primary).ok_or_else(|| {
			BuilderError::Config(format!(
				"Primary storage '{}' has no implementation table",
				primary
			))
		})?;

		let storage = factory(config).map_err(|e| {
			tracing::error!(
				component = "storage",
				implementation = %primary,
				error = %e,
				"Failed to create storage implementation"
			);
			BuilderError::Config(format!(
				"Failed to create storage implementation '{}': {}",
				primary, e
			))
		})?;
		tracing::info!(component = "storage", implementation = %primary, enabled = true, "Loaded");

		let domain = &self.config.permit2;
		let permit2 = Permit2::new(domain.chain_id, domain.verifying_contract);
		tracing::info!(
			chain_id = domain.chain_id,
			verifying_contract = %domain.verifying_contract,
			"Permit2 engine ready"
		);

		Ok(Permit2Engine { permit2, storage })
	}
}
