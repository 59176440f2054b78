//! Types for the signature-transfer scheme.
//!
//! Signature transfers carry no persistent allowance: a signed permit
//! authorizes exactly one transfer call and is consumed through the owner's
//! unordered nonce bitmap.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// The token and maximum amount a signature-transfer permit covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPermissions {
	pub token: Address,
	pub amount: U256,
}

/// Signed, single-use authorization to transfer one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitTransferFrom {
	pub permitted: TokenPermissions,
	/// Caller-chosen nonce from the owner's unordered nonce space.
	pub nonce: U256,
	pub deadline: U256,
}

/// Signed, single-use authorization to transfer several tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitBatchTransferFrom {
	pub permitted: Vec<TokenPermissions>,
	pub nonce: U256,
	pub deadline: U256,
}

/// Recipient and amount chosen by the spender at execution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureTransferDetails {
	pub to: Address,
	/// Must not exceed the corresponding permitted amount.
	pub requested_amount: U256,
}

/// Caller-supplied witness bound into a signature-transfer digest.
///
/// The core never interprets the witness; it only hashes `witness` into the
/// permit under the type hash derived from `witness_type_string`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness {
	/// Hash of the caller-defined witness struct.
	pub witness: B256,
	/// Remainder of the EIP-712 type string following the permit stub, e.g.
	/// `"MockWitness witness)MockWitness(...)TokenPermissions(address token,uint256 amount)"`.
	pub witness_type_string: String,
}

impl Witness {
	pub fn new(witness: B256, witness_type_string: impl Into<String>) -> Self {
		Self {
			witness,
			witness_type_string: witness_type_string.into(),
		}
	}
}
