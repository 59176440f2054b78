//! In-memory storage backend implementation.
//!
//! State lives in a HashMap and is lost when the backend is dropped. Useful
//! for tests and for embedding the engine in a host that persists state
//! elsewhere.

use crate::{StorageError, StorageInterface, WriteSet};
use permit2_types::{ConfigSchema, Schema, StorageSlot, ValidationError, U256};
use std::collections::HashMap;

/// In-memory storage implementation.
///
/// Only non-zero words are kept, so an untouched slot and a zeroed slot are
/// indistinguishable.
#[derive(Debug, Default)]
pub struct MemoryStorage {
	slots: HashMap<StorageSlot, U256>,
}

impl MemoryStorage {
	/// Creates a new MemoryStorage instance.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of non-zero slots held.
	pub fn len(&self) -> usize {
		self.slots.len()
	}

	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}
}

impl StorageInterface for MemoryStorage {
	fn load(&self, slot: &StorageSlot) -> Result<U256, StorageError> {
		Ok(self.slots.get(slot).copied().unwrap_or(U256::ZERO))
	}

	fn commit(&mut self, writes: WriteSet) -> Result<(), StorageError> {
		for (slot, value) in writes {
			if value.is_zero() {
				self.slots.remove(&slot);
			} else {
				self.slots.insert(slot, value);
			}
		}
		Ok(())
	}
}

/// Configuration schema for MemoryStorage.
pub struct MemoryStorageSchema;

impl ConfigSchema for MemoryStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		// Memory storage has no configuration
		Schema::new(vec![], vec![]).validate(config)
	}
}

/// Factory function to create a memory storage backend from configuration.
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	MemoryStorageSchema
		.validate(config)
		.map_err(|e| StorageError::Configuration(e.to_string()))?;
	Ok(Box::new(MemoryStorage::new()))
}

/// Registry for the memory storage implementation.
pub struct Registry;

impl permit2_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = crate::StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl crate::StorageRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;
	use permit2_types::Address;

	#[test]
	fn test_basic_operations() {
		let mut storage = MemoryStorage::new();
		let slot = StorageSlot::allowance(
			Address::repeat_byte(1),
			Address::repeat_byte(2),
			Address::repeat_byte(3),
		);

		// Unwritten slots read as zero
		assert_eq!(storage.load(&slot).unwrap(), U256::ZERO);

		let mut writes = WriteSet::new();
		writes.insert(slot, U256::from(42u64));
		storage.commit(writes).unwrap();
		assert_eq!(storage.load(&slot).unwrap(), U256::from(42u64));
		assert_eq!(storage.len(), 1);

		// Writing zero clears the entry
		let mut writes = WriteSet::new();
		writes.insert(slot, U256::ZERO);
		storage.commit(writes).unwrap();
		assert_eq!(storage.load(&slot).unwrap(), U256::ZERO);
		assert!(storage.is_empty());
	}

	#[test]
	fn test_schema_accepts_empty_table() {
		let config = toml::Value::Table(toml::map::Map::new());
		assert!(MemoryStorageSchema.validate(&config).is_ok());
		assert!(create_storage(&config).is_ok());
	}

	#[test]
	fn test_factory_rejects_non_table() {
		let result = create_storage(&toml::Value::Integer(1));
		assert!(matches!(result, Err(StorageError::Configuration(_))));
	}
}
