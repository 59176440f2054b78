//! Storage slot keys for the authoritative state maps.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Address of one 256-bit storage word.
///
/// The engine owns two maps: packed allowances keyed by
/// (owner, token, spender) and unordered nonce bitmap words keyed by
/// (owner, word position). Slots that were never written read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageSlot {
	/// Packed allowance word for an (owner, token, spender) triple.
	Allowance {
		owner: Address,
		token: Address,
		spender: Address,
	},
	/// One 256-bit word of an owner's unordered nonce bitmap.
	NonceBitmap { owner: Address, word: U256 },
}

impl StorageSlot {
	pub fn allowance(owner: Address, token: Address, spender: Address) -> Self {
		StorageSlot::Allowance {
			owner,
			token,
			spender,
		}
	}

	pub fn nonce_bitmap(owner: Address, word: U256) -> Self {
		StorageSlot::NonceBitmap { owner, word }
	}
}
