//! Errors returned by Permit2 operations.

use permit2_ledger::TransferError;
use permit2_storage::StorageError;
use permit2_types::{U160, U256, U48};
use thiserror::Error;

/// Errors that can occur while executing a Permit2 operation.
///
/// Every error aborts the whole call; no state is written.
#[derive(Debug, Error)]
pub enum Permit2Error {
	/// Signature is neither 64 nor 65 bytes.
	#[error("Invalid signature length: {length} bytes")]
	InvalidSignatureLength { length: usize },
	/// Recovered signer is zero or differs from the claimed signer.
	#[error("Invalid signer")]
	InvalidSigner,
	/// The signed deadline has passed.
	#[error("Signature expired at {deadline}")]
	SignatureExpired { deadline: U256 },
	/// Ordered nonce mismatch, exhausted nonce space or spent bitmap nonce.
	#[error("Invalid nonce")]
	InvalidNonce,
	/// A nonce invalidation jumps more than 65535 nonces.
	#[error("Excessive nonce invalidation")]
	ExcessiveInvalidation,
	/// The allowance expired at `deadline`.
	#[error("Allowance expired at {deadline}")]
	AllowanceExpired { deadline: U48 },
	/// The spend exceeds the remaining allowance `amount`.
	#[error("Insufficient allowance: {amount} remaining")]
	InsufficientAllowance { amount: U160 },
	/// A signature transfer requested more than the signed `max_amount`.
	#[error("Invalid amount: at most {max_amount} permitted")]
	InvalidAmount { max_amount: U256 },
	/// Batch arguments differ in length.
	#[error("Length mismatch")]
	LengthMismatch,
	/// The token transfer collaborator failed.
	#[error("Transfer failed: {0}")]
	Transfer(#[from] TransferError),
	/// The state backend failed.
	#[error("Storage error: {0}")]
	Storage(#[from] StorageError),
}

/// Coarse classification of [`Permit2Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	SignatureMalformed,
	SignatureInvalid,
	PermitExpired,
	NonceStaleOrReused,
	NonceInvalidationExcessive,
	/// Spend above the allowance, expired allowance, or a signature
	/// transfer above the signed amount.
	AllowanceInsufficientOrExpired,
	BatchLengthMismatch,
	/// The token transfer collaborator or the state backend failed.
	Collaborator,
}

impl Permit2Error {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Permit2Error::InvalidSignatureLength { .. } => ErrorKind::SignatureMalformed,
			Permit2Error::InvalidSigner => ErrorKind::SignatureInvalid,
			Permit2Error::SignatureExpired { .. } => ErrorKind::PermitExpired,
			Permit2Error::InvalidNonce => ErrorKind::NonceStaleOrReused,
			Permit2Error::ExcessiveInvalidation => ErrorKind::NonceInvalidationExcessive,
			Permit2Error::AllowanceExpired { .. }
			| Permit2Error::InsufficientAllowance { .. }
			| Permit2Error::InvalidAmount { .. } => ErrorKind::AllowanceInsufficientOrExpired,
			Permit2Error::LengthMismatch => ErrorKind::BatchLengthMismatch,
			Permit2Error::Transfer(_) | Permit2Error::Storage(_) => ErrorKind::Collaborator,
		}
	}
}
