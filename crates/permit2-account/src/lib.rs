//! Client-side signing for Permit2 messages.
//!
//! Token owners sign the typed-data digest of a permit off-chain and hand
//! the encoded signature to the spender. This crate signs raw 32-byte
//! digests and encodes the result in either of the two accepted wire forms.

use alloy_primitives::Signature;
use permit2_types::{Address, Bytes, B256};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod local;
}

pub use implementations::local::LocalAccount;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// Error that occurs when signing operations fail.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	/// Error that occurs when a cryptographic key is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
}

/// Wire encoding of a secp256k1 signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureEncoding {
	/// 65 bytes: `r ‖ s ‖ v` with `v` in {27, 28}.
	Standard,
	/// 64 bytes: `r ‖ vs` per EIP-2098, the parity folded into the top bit of `s`.
	Compact,
}

/// A recoverable secp256k1 signature over a digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestSignature(Signature);

impl DigestSignature {
	pub fn new(signature: Signature) -> Self {
		Self(signature)
	}

	pub fn signature(&self) -> &Signature {
		&self.0
	}

	/// Returns the Ethereum `v` value, 27 or 28.
	pub fn v(&self) -> u8 {
		27 + self.0.v() as u8
	}

	/// Encodes as 65-byte `r ‖ s ‖ v`.
	pub fn to_bytes(&self) -> Bytes {
		Bytes::copy_from_slice(&self.0.as_bytes())
	}

	/// Encodes as 64-byte EIP-2098 `r ‖ vs`.
	pub fn to_compact_bytes(&self) -> Bytes {
		Bytes::copy_from_slice(&self.0.as_erc2098())
	}

	pub fn encode(&self, encoding: SignatureEncoding) -> Bytes {
		match encoding {
			SignatureEncoding::Standard => self.to_bytes(),
			SignatureEncoding::Compact => self.to_compact_bytes(),
		}
	}
}

/// Trait defining the interface for signing accounts.
pub trait AccountInterface: Send + Sync {
	/// Returns the address the account signs for.
	fn address(&self) -> Address;

	/// Signs a 32-byte digest without any further hashing or prefixing.
	fn sign_digest(&self, digest: &B256) -> Result<DigestSignature, AccountError>;
}
