//! Packed allowance words.
//!
//! Layout of the 256-bit word, least significant bit first:
//!
//! | bits      | field      | width |
//! |-----------|------------|-------|
//! | 0..160    | amount     | 160   |
//! | 160..208  | expiration | 48    |
//! | 208..256  | nonce      | 48    |

use crate::Permit2Error;
use permit2_storage::StateJournal;
use permit2_types::{Address, PackedAllowance, StorageSlot, U160, U256, U48};

const EXPIRATION_SHIFT: usize = 160;
const NONCE_SHIFT: usize = 208;

const AMOUNT_MASK: U256 = U256::from_limbs([u64::MAX, u64::MAX, u32::MAX as u64, 0]);
const U48_MASK: U256 = U256::from_limbs([(1u64 << 48) - 1, 0, 0, 0]);

/// Packs an allowance into its storage word.
pub fn pack(allowance: &PackedAllowance) -> U256 {
	U256::from(allowance.amount)
		| (U256::from(allowance.expiration) << EXPIRATION_SHIFT)
		| (U256::from(allowance.nonce) << NONCE_SHIFT)
}

/// Unpacks a storage word. Inverse of [`pack`].
pub fn unpack(word: U256) -> PackedAllowance {
	PackedAllowance {
		amount: U160::saturating_from(word & AMOUNT_MASK),
		expiration: U48::saturating_from((word >> EXPIRATION_SHIFT) & U48_MASK),
		nonce: U48::saturating_from((word >> NONCE_SHIFT) & U48_MASK),
	}
}

/// Reads the allowance of `spender` over `owner`'s `token`.
pub fn load(
	journal: &StateJournal<'_>,
	owner: Address,
	token: Address,
	spender: Address,
) -> Result<PackedAllowance, Permit2Error> {
	let word = journal.load(&StorageSlot::allowance(owner, token, spender))?;
	Ok(unpack(word))
}

/// Stages a write of the allowance of `spender` over `owner`'s `token`.
pub fn store(
	journal: &mut StateJournal<'_>,
	owner: Address,
	token: Address,
	spender: Address,
	allowance: &PackedAllowance,
) {
	journal.store(StorageSlot::allowance(owner, token, spender), pack(allowance));
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_field_positions() {
		let allowance = PackedAllowance {
			amount: U160::from(1u8),
			expiration: U48::from(1u8),
			nonce: U48::from(1u8),
		};
		let word = pack(&allowance);
		assert!(word.bit(0));
		assert!(word.bit(160));
		assert!(word.bit(208));
		assert_eq!(word.count_ones(), 3);
	}

	#[test]
	fn test_unpack_inverts_pack_at_boundaries() {
		let cases = [
			PackedAllowance::default(),
			PackedAllowance {
				amount: U160::MAX,
				expiration: U48::MAX,
				nonce: U48::MAX,
			},
			PackedAllowance {
				amount: U160::MAX,
				expiration: U48::ZERO,
				nonce: U48::from(1u8),
			},
			PackedAllowance {
				amount: U160::from(10u64).pow(U160::from(18u64)),
				expiration: U48::from(1_800_000_000u64),
				nonce: U48::MAX,
			},
		];
		for allowance in cases {
			assert_eq!(unpack(pack(&allowance)), allowance);
		}
		assert_eq!(pack(&cases[1]), U256::MAX);
	}

	#[test]
	fn test_fields_do_not_bleed() {
		let word = pack(&PackedAllowance {
			amount: U160::MAX,
			expiration: U48::ZERO,
			nonce: U48::ZERO,
		});
		let unpacked = unpack(word);
		assert_eq!(unpacked.expiration, U48::ZERO);
		assert_eq!(unpacked.nonce, U48::ZERO);
	}
}
