//! Event types emitted by state transitions.
//!
//! Every state-changing operation returns the events it produced so callers
//! can index or forward them. Field sets follow the on-chain event
//! signatures of the Permit2 contract.

use alloy_primitives::{aliases::U48, Address, U160, U256};
use serde::{Deserialize, Serialize};

/// Main event type encompassing all Permit2 events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Permit2Event {
	/// An owner set an allowance directly.
	Approval {
		owner: Address,
		token: Address,
		spender: Address,
		amount: U160,
		expiration: U48,
	},
	/// A signed permit set an allowance. `nonce` is the nonce the signature
	/// consumed.
	Permit {
		owner: Address,
		token: Address,
		spender: Address,
		amount: U160,
		expiration: U48,
		nonce: U48,
	},
	/// An owner zeroed the allowance of a token/spender pair.
	Lockdown {
		owner: Address,
		token: Address,
		spender: Address,
	},
	/// An owner advanced the ordered nonce of a token/spender pair.
	NonceInvalidation {
		owner: Address,
		token: Address,
		spender: Address,
		new_nonce: U48,
		old_nonce: U48,
	},
	/// An owner invalidated unordered nonces in one bitmap word.
	UnorderedNonceInvalidation {
		owner: Address,
		word: U256,
		mask: U256,
		/// The resulting word, the union of prior bits and `mask`.
		bitmap: U256,
	},
}
