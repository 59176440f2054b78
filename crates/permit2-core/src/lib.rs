//! Core engine for Permit2 token-transfer authorization.
//!
//! [`Permit2`] verifies signed permits, tracks allowances and nonces, and
//! asks a [`TokenTransfer`] collaborator to move value once a transfer is
//! authorized. State lives in a [`StorageInterface`] passed into every
//! operation; all writes of one call are staged in a
//! [`permit2_storage::StateJournal`] and committed together only when the
//! call succeeds.
//!
//! Two independent replay-protection schemes are exposed:
//! - Allowance transfers use an ordered nonce per (owner, token, spender).
//! - Signature transfers use an unordered per-owner nonce bitmap.

pub mod allowance;
pub mod allowance_transfer;
pub mod builder;
pub mod domain;
pub mod error;
pub mod nonce_bitmap;
pub mod permit_hash;
pub mod signature;
pub mod signature_transfer;

#[cfg(test)]
mod testing;

pub use builder::{BuilderError, Permit2Builder, Permit2Engine, Permit2Factories};
pub use domain::DomainSeparator;
pub use error::{ErrorKind, Permit2Error};

use permit2_ledger::{TokenMovement, TokenTransfer};
use permit2_storage::{StateJournal, StorageInterface, WriteSet};
use permit2_types::{Address, ExecutionContext, PackedAllowance, StorageSlot, B256, U256, U48};

/// The Permit2 authorization engine bound to one deployed instance.
#[derive(Debug, Clone)]
pub struct Permit2 {
	domain: DomainSeparator,
}

impl Permit2 {
	/// Creates an engine for `verifying_contract` on `chain_id`.
	pub fn new(chain_id: u64, verifying_contract: Address) -> Self {
		Self {
			domain: DomainSeparator::new(chain_id, verifying_contract),
		}
	}

	pub fn domain(&self) -> &DomainSeparator {
		&self.domain
	}

	/// Returns the EIP-712 domain separator for `chain_id`.
	pub fn domain_separator(&self, chain_id: u64) -> B256 {
		self.domain.separator(chain_id)
	}

	/// Returns the digest an owner signs for `struct_hash` on `chain_id`.
	pub fn hash_typed_data(&self, chain_id: u64, struct_hash: &B256) -> B256 {
		self.domain.hash_typed_data(chain_id, struct_hash)
	}

	/// Reads the allowance of `spender` over `owner`'s `token`.
	pub fn allowance(
		&self,
		storage: &dyn StorageInterface,
		owner: Address,
		token: Address,
		spender: Address,
	) -> Result<PackedAllowance, Permit2Error> {
		allowance::load(&StateJournal::new(storage), owner, token, spender)
	}

	/// Reads word `word` of `owner`'s unordered nonce bitmap.
	pub fn nonce_bitmap(
		&self,
		storage: &dyn StorageInterface,
		owner: Address,
		word: U256,
	) -> Result<U256, Permit2Error> {
		Ok(storage.load(&StorageSlot::nonce_bitmap(owner, word))?)
	}

	/// Verifies that `signature` over `struct_hash` was made by `owner` for
	/// this domain on the context's chain.
	fn verify_signed(
		&self,
		ctx: &ExecutionContext,
		struct_hash: &B256,
		signature: &[u8],
		owner: Address,
	) -> Result<(), Permit2Error> {
		let digest = self.domain.hash_typed_data(ctx.chain_id, struct_hash);
		signature::verify(signature, &digest, owner)
	}
}

/// Moves value through `ledger`, then commits the staged writes.
///
/// The ledger runs first so a failed transfer leaves storage untouched. If
/// the commit then fails, the movements are reverted so neither side keeps
/// a partial effect.
fn settle(
	writes: WriteSet,
	storage: &mut dyn StorageInterface,
	ledger: &mut dyn TokenTransfer,
	movements: &[TokenMovement],
) -> Result<(), Permit2Error> {
	ledger.move_batch(movements)?;
	if let Err(e) = storage.commit(writes) {
		if let Err(revert) = ledger.revert_batch(movements) {
			tracing::error!(
				error = %revert,
				transfers = movements.len(),
				"Failed to revert token movements after storage failure"
			);
		}
		return Err(e.into());
	}
	Ok(())
}

/// Resolves a signed or approved expiration: zero means "now".
fn resolve_expiration(expiration: U48, ctx: &ExecutionContext) -> U48 {
	if expiration.is_zero() {
		U48::saturating_from(ctx.timestamp)
	} else {
		expiration
	}
}
