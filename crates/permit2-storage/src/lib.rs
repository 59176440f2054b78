//! Storage module for the Permit2 authorization engine.
//!
//! The engine's authoritative state is two maps of 256-bit words: packed
//! allowances and unordered nonce bitmap words. This crate defines the
//! backend trait that owns those words, the [`StateJournal`] overlay that
//! stages the writes of one call, and the `memory` and `file` backends.

use permit2_types::{ImplementationRegistry, StorageSlot, U256};
use std::collections::BTreeMap;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod file;
	pub mod memory;
}

mod journal;

pub use journal::StateJournal;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
	/// Error that occurs during serialization/deserialization.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Set of slot writes produced by one call, applied together.
pub type WriteSet = BTreeMap<StorageSlot, U256>;

/// Trait defining the interface for state backends.
///
/// A backend owns the allowance and nonce bitmap words. Slots that were
/// never written read as zero. Writes arrive as one [`WriteSet`] per call
/// and must be applied entirely or not at all.
pub trait StorageInterface: Send + Sync {
	/// Reads the word stored at `slot`, or zero if it was never written.
	fn load(&self, slot: &StorageSlot) -> Result<U256, StorageError>;

	/// Applies every write in `writes`. Writing zero clears the slot.
	fn commit(&mut self, writes: WriteSet) -> Result<(), StorageError>;
}

/// Type alias for storage factory functions.
///
/// This is the function signature that all storage implementations must provide
/// to create instances of their storage interface.
pub type StorageFactory = fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>;

/// Registry trait for storage implementations.
pub trait StorageRegistry: ImplementationRegistry<Factory = StorageFactory> {}

/// Get all registered storage implementations.
///
/// Returns a vector of (name, factory) tuples for all available storage implementations.
pub fn get_all_implementations() -> Vec<(&'static str, StorageFactory)> {
	use implementations::{file, memory};

	vec![
		(file::Registry::NAME, file::Registry::factory()),
		(memory::Registry::NAME, memory::Registry::factory()),
	]
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_all_implementations_registered() {
		let names: Vec<_> = get_all_implementations()
			.into_iter()
			.map(|(name, _)| name)
			.collect();
		assert_eq!(names, vec!["file", "memory"]);
	}
}
