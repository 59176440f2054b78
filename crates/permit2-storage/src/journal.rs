//! Write overlay for a single call.

use crate::{StorageError, StorageInterface, WriteSet};
use permit2_types::{StorageSlot, U256};

/// Stages the writes of one logical call on top of a backend.
///
/// Reads see staged values first and fall through to the backend. Nothing
/// reaches the backend until the caller hands [`StateJournal::into_writes`]
/// to [`StorageInterface::commit`], so a call that fails halfway leaves the
/// backend untouched.
pub struct StateJournal<'a> {
	backend: &'a dyn StorageInterface,
	pending: WriteSet,
}

impl<'a> StateJournal<'a> {
	pub fn new(backend: &'a dyn StorageInterface) -> Self {
		Self {
			backend,
			pending: WriteSet::new(),
		}
	}

	/// Reads a slot, preferring a value staged earlier in this call.
	pub fn load(&self, slot: &StorageSlot) -> Result<U256, StorageError> {
		match self.pending.get(slot) {
			Some(value) => Ok(*value),
			None => self.backend.load(slot),
		}
	}

	/// Stages a write.
	pub fn store(&mut self, slot: StorageSlot, value: U256) {
		self.pending.insert(slot, value);
	}

	/// Consumes the journal, releasing the backend borrow.
	pub fn into_writes(self) -> WriteSet {
		self.pending
	}
}
