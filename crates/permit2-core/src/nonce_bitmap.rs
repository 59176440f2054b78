//! Unordered nonces: one bit per nonce in per-owner 256-bit words.
//!
//! Nonce `n` lives in word `n >> 8` at bit `n & 0xff`. A set bit means the
//! nonce is spent. Bits are only ever set, never cleared.

use crate::Permit2Error;
use permit2_storage::StateJournal;
use permit2_types::{Address, StorageSlot, U256};

/// Splits a nonce into its word position and single-bit mask.
pub fn bitmap_positions(nonce: U256) -> (U256, U256) {
	let word = nonce >> 8;
	let bit = (nonce.as_limbs()[0] & 0xff) as usize;
	(word, U256::from(1u8) << bit)
}

/// Marks `nonce` spent, failing with [`Permit2Error::InvalidNonce`] if it
/// already was.
pub fn use_unordered_nonce(
	journal: &mut StateJournal<'_>,
	owner: Address,
	nonce: U256,
) -> Result<(), Permit2Error> {
	let (word, mask) = bitmap_positions(nonce);
	let slot = StorageSlot::nonce_bitmap(owner, word);
	let bitmap = journal.load(&slot)?;

	if !(bitmap & mask).is_zero() {
		return Err(Permit2Error::InvalidNonce);
	}
	journal.store(slot, bitmap | mask);
	Ok(())
}

/// ORs `mask` into word `word` of `owner`'s bitmap and returns the result.
pub fn invalidate_unordered_nonces(
	journal: &mut StateJournal<'_>,
	owner: Address,
	word: U256,
	mask: U256,
) -> Result<U256, Permit2Error> {
	let slot = StorageSlot::nonce_bitmap(owner, word);
	let bitmap = journal.load(&slot)? | mask;
	journal.store(slot, bitmap);
	Ok(bitmap)
}

#[cfg(test)]
mod tests {
	use super::*;
	use permit2_storage::{implementations::memory::MemoryStorage, StorageInterface};

	const OWNER: Address = Address::repeat_byte(0x0a);

	/// Uses `nonce` in its own call and commits the result.
	fn use_nonce(storage: &mut MemoryStorage, nonce: U256) -> Result<(), Permit2Error> {
		let mut journal = StateJournal::new(&*storage);
		use_unordered_nonce(&mut journal, OWNER, nonce)?;
		let writes = journal.into_writes();
		storage.commit(writes)?;
		Ok(())
	}

	#[test]
	fn test_positions() {
		assert_eq!(
			bitmap_positions(U256::from(255u64)),
			(U256::ZERO, U256::from(1u8) << 255)
		);
		assert_eq!(
			bitmap_positions(U256::from(256u64)),
			(U256::from(1u8), U256::from(1u8))
		);
		assert_eq!(
			bitmap_positions(U256::MAX),
			(U256::MAX >> 8, U256::from(1u8) << 255)
		);
	}

	#[test]
	fn test_reuse_always_fails() {
		let high = U256::from(1u8) << 240;
		let nonces = [
			U256::ZERO,
			U256::from(1u64),
			U256::from(255u64),
			U256::from(256u64),
			high,
			high + U256::from(1u8),
			U256::MAX,
		];

		let mut storage = MemoryStorage::new();
		for nonce in nonces {
			use_nonce(&mut storage, nonce).unwrap();
			assert!(matches!(
				use_nonce(&mut storage, nonce),
				Err(Permit2Error::InvalidNonce)
			));
		}
	}

	#[test]
	fn test_neighbours_are_independent() {
		let mut storage = MemoryStorage::new();
		use_nonce(&mut storage, U256::from(255u64)).unwrap();
		use_nonce(&mut storage, U256::from(256u64)).unwrap();
		use_nonce(&mut storage, U256::from(254u64)).unwrap();
	}

	#[test]
	fn test_invalidate_full_word() {
		let mut storage = MemoryStorage::new();
		use_nonce(&mut storage, U256::from(3u64)).unwrap();

		let mut journal = StateJournal::new(&storage);
		let bitmap =
			invalidate_unordered_nonces(&mut journal, OWNER, U256::ZERO, U256::MAX).unwrap();
		assert_eq!(bitmap, U256::MAX);
		let writes = journal.into_writes();
		storage.commit(writes).unwrap();

		for nonce in [0u64, 100, 255] {
			assert!(use_nonce(&mut storage, U256::from(nonce)).is_err());
		}
		// The next word is untouched
		use_nonce(&mut storage, U256::from(256u64)).unwrap();
	}

	#[test]
	fn test_invalidate_returns_union() {
		let mut storage = MemoryStorage::new();
		use_nonce(&mut storage, U256::from(0u64)).unwrap();

		let mut journal = StateJournal::new(&storage);
		let bitmap = invalidate_unordered_nonces(&mut journal, OWNER, U256::ZERO, U256::from(0b110u64))
			.unwrap();
		assert_eq!(bitmap, U256::from(0b111u64));

		// Re-invalidating set bits is not an error
		let again = invalidate_unordered_nonces(&mut journal, OWNER, U256::ZERO, U256::from(0b10u64))
			.unwrap();
		assert_eq!(again, U256::from(0b111u64));
	}
}
