//! Signature transfers: one-shot permits redeemed in the same call.
//!
//! Nothing persists except the spent bit in the owner's nonce bitmap. The
//! spender is the caller and is bound into the signed digest, so a permit
//! can only be redeemed by the spender it was signed for.

use crate::{nonce_bitmap, permit_hash, settle, Permit2, Permit2Error};
use permit2_ledger::{TokenMovement, TokenTransfer};
use permit2_storage::{StateJournal, StorageInterface};
use permit2_types::{
	short_address, Address, ExecutionContext, Permit2Event, PermitBatchTransferFrom,
	PermitTransferFrom, SignatureTransferDetails, TokenPermissions, Witness, B256, U256,
};
use tracing::{debug, instrument};

/// A signature transfer after hashing, ready to check and settle.
struct SignedTransfer<'a> {
	owner: Address,
	nonce: U256,
	deadline: U256,
	permitted: &'a [TokenPermissions],
	requests: &'a [SignatureTransferDetails],
	struct_hash: B256,
	signature: &'a [u8],
	/// Batch entries requesting zero skip the ledger.
	skip_zero_amounts: bool,
}

impl Permit2 {
	/// Redeems a signed single-token transfer.
	#[allow(clippy::too_many_arguments)]
	#[instrument(skip_all, err(level = "warn"), fields(owner = %short_address(&owner), token = %short_address(&permit.permitted.token), spender = %short_address(&ctx.caller), nonce = %permit.nonce))]
	pub fn permit_transfer_from(
		&self,
		ctx: &ExecutionContext,
		storage: &mut dyn StorageInterface,
		ledger: &mut dyn TokenTransfer,
		permit: &PermitTransferFrom,
		transfer_details: &SignatureTransferDetails,
		owner: Address,
		signature: &[u8],
	) -> Result<(), Permit2Error> {
		let struct_hash = permit_hash::hash_permit_transfer_from(permit, ctx.caller);
		self.execute_signed_transfer(
			ctx,
			storage,
			ledger,
			SignedTransfer {
				owner,
				nonce: permit.nonce,
				deadline: permit.deadline,
				permitted: std::slice::from_ref(&permit.permitted),
				requests: std::slice::from_ref(transfer_details),
				struct_hash,
				signature,
				skip_zero_amounts: false,
			},
		)
	}

	/// Redeems a signed single-token transfer that also binds a witness.
	#[allow(clippy::too_many_arguments)]
	#[instrument(skip_all, err(level = "warn"), fields(owner = %short_address(&owner), token = %short_address(&permit.permitted.token), spender = %short_address(&ctx.caller), nonce = %permit.nonce))]
	pub fn permit_witness_transfer_from(
		&self,
		ctx: &ExecutionContext,
		storage: &mut dyn StorageInterface,
		ledger: &mut dyn TokenTransfer,
		permit: &PermitTransferFrom,
		transfer_details: &SignatureTransferDetails,
		owner: Address,
		witness: &Witness,
		signature: &[u8],
	) -> Result<(), Permit2Error> {
		let struct_hash =
			permit_hash::hash_permit_witness_transfer_from(permit, ctx.caller, witness);
		self.execute_signed_transfer(
			ctx,
			storage,
			ledger,
			SignedTransfer {
				owner,
				nonce: permit.nonce,
				deadline: permit.deadline,
				permitted: std::slice::from_ref(&permit.permitted),
				requests: std::slice::from_ref(transfer_details),
				struct_hash,
				signature,
				skip_zero_amounts: false,
			},
		)
	}

	/// Redeems a signed multi-token transfer. Entry `i` of
	/// `transfer_details` spends from entry `i` of `permit.permitted`.
	#[allow(clippy::too_many_arguments)]
	#[instrument(skip_all, err(level = "warn"), fields(owner = %short_address(&owner), spender = %short_address(&ctx.caller), nonce = %permit.nonce, tokens = permit.permitted.len()))]
	pub fn permit_batch_transfer_from(
		&self,
		ctx: &ExecutionContext,
		storage: &mut dyn StorageInterface,
		ledger: &mut dyn TokenTransfer,
		permit: &PermitBatchTransferFrom,
		transfer_details: &[SignatureTransferDetails],
		owner: Address,
		signature: &[u8],
	) -> Result<(), Permit2Error> {
		let struct_hash = permit_hash::hash_permit_batch_transfer_from(permit, ctx.caller);
		self.execute_signed_transfer(
			ctx,
			storage,
			ledger,
			SignedTransfer {
				owner,
				nonce: permit.nonce,
				deadline: permit.deadline,
				permitted: &permit.permitted,
				requests: transfer_details,
				struct_hash,
				signature,
				skip_zero_amounts: true,
			},
		)
	}

	/// Redeems a signed multi-token transfer that also binds a witness.
	#[allow(clippy::too_many_arguments)]
	#[instrument(skip_all, err(level = "warn"), fields(owner = %short_address(&owner), spender = %short_address(&ctx.caller), nonce = %permit.nonce, tokens = permit.permitted.len()))]
	pub fn permit_batch_witness_transfer_from(
		&self,
		ctx: &ExecutionContext,
		storage: &mut dyn StorageInterface,
		ledger: &mut dyn TokenTransfer,
		permit: &PermitBatchTransferFrom,
		transfer_details: &[SignatureTransferDetails],
		owner: Address,
		witness: &Witness,
		signature: &[u8],
	) -> Result<(), Permit2Error> {
		let struct_hash =
			permit_hash::hash_permit_batch_witness_transfer_from(permit, ctx.caller, witness);
		self.execute_signed_transfer(
			ctx,
			storage,
			ledger,
			SignedTransfer {
				owner,
				nonce: permit.nonce,
				deadline: permit.deadline,
				permitted: &permit.permitted,
				requests: transfer_details,
				struct_hash,
				signature,
				skip_zero_amounts: true,
			},
		)
	}

	/// Marks every nonce set in `mask` within word `word` of the caller's
	/// bitmap as spent.
	#[instrument(skip_all, err(level = "warn"), fields(owner = %short_address(&ctx.caller), word = %word))]
	pub fn invalidate_unordered_nonces(
		&self,
		ctx: &ExecutionContext,
		storage: &mut dyn StorageInterface,
		word: U256,
		mask: U256,
	) -> Result<Permit2Event, Permit2Error> {
		let owner = ctx.caller;
		let mut journal = StateJournal::new(&*storage);
		let bitmap = nonce_bitmap::invalidate_unordered_nonces(&mut journal, owner, word, mask)?;
		let writes = journal.into_writes();
		storage.commit(writes)?;

		debug!(%mask, "Unordered nonces invalidated");
		Ok(Permit2Event::UnorderedNonceInvalidation {
			owner,
			word,
			mask,
			bitmap,
		})
	}

	fn execute_signed_transfer(
		&self,
		ctx: &ExecutionContext,
		storage: &mut dyn StorageInterface,
		ledger: &mut dyn TokenTransfer,
		transfer: SignedTransfer<'_>,
	) -> Result<(), Permit2Error> {
		if ctx.is_past(transfer.deadline) {
			return Err(Permit2Error::SignatureExpired {
				deadline: transfer.deadline,
			});
		}
		if transfer.permitted.len() != transfer.requests.len() {
			return Err(Permit2Error::LengthMismatch);
		}
		for (permitted, request) in transfer.permitted.iter().zip(transfer.requests) {
			if request.requested_amount > permitted.amount {
				return Err(Permit2Error::InvalidAmount {
					max_amount: permitted.amount,
				});
			}
		}

		// One nonce per message, however many entries it carries
		let mut journal = StateJournal::new(&*storage);
		nonce_bitmap::use_unordered_nonce(&mut journal, transfer.owner, transfer.nonce)?;
		self.verify_signed(ctx, &transfer.struct_hash, transfer.signature, transfer.owner)?;

		let movements: Vec<_> = transfer
			.permitted
			.iter()
			.zip(transfer.requests)
			.filter(|(_, request)| !(transfer.skip_zero_amounts && request.requested_amount.is_zero()))
			.map(|(permitted, request)| {
				TokenMovement::new(
					permitted.token,
					transfer.owner,
					request.to,
					request.requested_amount,
				)
			})
			.collect();

		let writes = journal.into_writes();
		settle(writes, storage, ledger, &movements)?;

		debug!(transfers = movements.len(), "Signature transfer settled");
		Ok(())
	}
}
