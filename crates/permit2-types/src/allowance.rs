//! Types for the allowance-transfer scheme.
//!
//! An allowance is a persistent permission keyed by (owner, token, spender).
//! Owners grant it either directly with `approve` or off-chain by signing a
//! [`PermitSingle`] / [`PermitBatch`] that anyone may later submit.

use alloy_primitives::{aliases::U48, Address, U160, U256};
use serde::{Deserialize, Serialize};

/// The signed unit of a single-token allowance grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitDetails {
	/// ERC-20 token address.
	pub token: Address,
	/// Maximum amount the spender may move. `U160::MAX` means unlimited.
	pub amount: U160,
	/// Timestamp at which the allowance becomes invalid; zero resolves to
	/// the execution timestamp at write time.
	pub expiration: U48,
	/// Must equal the stored nonce for (owner, token, spender).
	pub nonce: U48,
}

/// Permit message for a single token allowance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitSingle {
	pub details: PermitDetails,
	/// Address permissioned on the allowed token.
	pub spender: Address,
	/// Deadline on the permit signature.
	pub sig_deadline: U256,
}

/// Permit message for several token allowances under one signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitBatch {
	pub details: Vec<PermitDetails>,
	pub spender: Address,
	pub sig_deadline: U256,
}

/// The stored allowance for one (owner, token, spender) triple.
///
/// Persisted as a single 256-bit word; see the allowance store in
/// `permit2-core` for the bit layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedAllowance {
	/// Amount allowed. `U160::MAX` is the unlimited sentinel.
	pub amount: U160,
	/// Permission expiry timestamp.
	pub expiration: U48,
	/// Incrementing value consumed by each signed permit.
	pub nonce: U48,
}

impl PackedAllowance {
	/// Returns true when the amount is the unlimited sentinel.
	pub fn is_unlimited(&self) -> bool {
		self.amount == U160::MAX
	}
}

/// A token and spender pair, used by lockdown to revoke approvals in bulk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSpenderPair {
	pub token: Address,
	pub spender: Address,
}

/// A single spend instruction executed against an existing allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceTransferDetails {
	/// Owner of the tokens.
	pub from: Address,
	/// Recipient of the tokens.
	pub to: Address,
	pub amount: U160,
	pub token: Address,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_permit_single_serde_uses_camel_case() {
		let permit = PermitSingle {
			details: PermitDetails {
				token: Address::repeat_byte(0x11),
				amount: U160::from(1000u64),
				expiration: U48::from(0u64),
				nonce: U48::from(0u64),
			},
			spender: Address::repeat_byte(0x22),
			sig_deadline: U256::from(1u64),
		};

		let json = serde_json::to_value(&permit).unwrap();
		assert!(json.get("sigDeadline").is_some());

		let parsed: PermitSingle = serde_json::from_value(json).unwrap();
		assert_eq!(parsed, permit);
	}

	#[test]
	fn test_unlimited_sentinel() {
		let mut allowance = PackedAllowance::default();
		assert!(!allowance.is_unlimited());
		allowance.amount = U160::MAX;
		assert!(allowance.is_unlimited());
	}
}
