//! Allowance transfers: persistent, ordered-nonce allowances.
//!
//! An owner grants a spender an allowance either directly with
//! [`Permit2::approve`] or by signing a permit. The spender then draws on it
//! with [`Permit2::transfer_from`] until it is spent, expires, or is revoked.

use crate::{allowance, resolve_expiration, settle, Permit2, Permit2Error};
use permit2_ledger::{TokenMovement, TokenTransfer};
use permit2_storage::{StateJournal, StorageInterface};
use permit2_types::{
	short_address, Address, AllowanceTransferDetails, ExecutionContext, Permit2Event, PermitBatch,
	PermitDetails, PermitSingle, TokenSpenderPair, U160, U256, U48,
};
use tracing::{debug, instrument};

/// Largest nonce jump a single invalidation may make.
pub const MAX_NONCE_INVALIDATION: u64 = u16::MAX as u64;

impl Permit2 {
	/// Sets the caller's allowance for `spender` over `token`.
	///
	/// The nonce is left untouched. An expiration of zero resolves to the
	/// context timestamp.
	#[instrument(skip_all, err(level = "warn"), fields(owner = %short_address(&ctx.caller), token = %short_address(&token), spender = %short_address(&spender)))]
	pub fn approve(
		&self,
		ctx: &ExecutionContext,
		storage: &mut dyn StorageInterface,
		token: Address,
		spender: Address,
		amount: U160,
		expiration: U48,
	) -> Result<Permit2Event, Permit2Error> {
		let owner = ctx.caller;
		let mut journal = StateJournal::new(&*storage);

		let mut allowed = allowance::load(&journal, owner, token, spender)?;
		allowed.amount = amount;
		allowed.expiration = resolve_expiration(expiration, ctx);
		allowance::store(&mut journal, owner, token, spender, &allowed);

		let writes = journal.into_writes();
		storage.commit(writes)?;

		debug!(%amount, %expiration, "Approved");
		Ok(Permit2Event::Approval {
			owner,
			token,
			spender,
			amount,
			expiration,
		})
	}

	/// Applies a signed single-token permit.
	#[instrument(skip_all, err(level = "warn"), fields(owner = %short_address(&owner), token = %short_address(&permit.details.token), spender = %short_address(&permit.spender)))]
	pub fn permit(
		&self,
		ctx: &ExecutionContext,
		storage: &mut dyn StorageInterface,
		owner: Address,
		permit: &PermitSingle,
		signature: &[u8],
	) -> Result<Permit2Event, Permit2Error> {
		if ctx.is_past(permit.sig_deadline) {
			return Err(Permit2Error::SignatureExpired {
				deadline: permit.sig_deadline,
			});
		}
		let struct_hash = crate::permit_hash::hash_permit_single(permit);
		self.verify_signed(ctx, &struct_hash, signature, owner)?;

		let mut journal = StateJournal::new(&*storage);
		let event = update_approval(&mut journal, ctx, owner, permit.spender, &permit.details)?;
		let writes = journal.into_writes();
		storage.commit(writes)?;

		debug!(nonce = %permit.details.nonce, "Permit applied");
		Ok(event)
	}

	/// Applies a signed multi-token permit.
	///
	/// Each token's nonce is checked independently, but one failure rejects
	/// the whole batch.
	#[instrument(skip_all, err(level = "warn"), fields(owner = %short_address(&owner), spender = %short_address(&permit.spender), tokens = permit.details.len()))]
	pub fn permit_batch(
		&self,
		ctx: &ExecutionContext,
		storage: &mut dyn StorageInterface,
		owner: Address,
		permit: &PermitBatch,
		signature: &[u8],
	) -> Result<Vec<Permit2Event>, Permit2Error> {
		if ctx.is_past(permit.sig_deadline) {
			return Err(Permit2Error::SignatureExpired {
				deadline: permit.sig_deadline,
			});
		}
		let struct_hash = crate::permit_hash::hash_permit_batch(permit);
		self.verify_signed(ctx, &struct_hash, signature, owner)?;

		let mut journal = StateJournal::new(&*storage);
		let events = permit
			.details
			.iter()
			.map(|details| update_approval(&mut journal, ctx, owner, permit.spender, details))
			.collect::<Result<Vec<_>, _>>()?;
		let writes = journal.into_writes();
		storage.commit(writes)?;

		debug!("Batch permit applied");
		Ok(events)
	}

	/// Transfers `amount` of `token` from `from` to `to` on the caller's
	/// allowance.
	#[allow(clippy::too_many_arguments)]
	#[instrument(skip_all, err(level = "warn"), fields(from = %short_address(&from), token = %short_address(&token), spender = %short_address(&ctx.caller)))]
	pub fn transfer_from(
		&self,
		ctx: &ExecutionContext,
		storage: &mut dyn StorageInterface,
		ledger: &mut dyn TokenTransfer,
		from: Address,
		to: Address,
		amount: U160,
		token: Address,
	) -> Result<(), Permit2Error> {
		let details = AllowanceTransferDetails {
			from,
			to,
			amount,
			token,
		};
		self.execute_transfers(ctx, storage, ledger, std::slice::from_ref(&details))?;

		debug!(%amount, "Transferred");
		Ok(())
	}

	/// Executes several transfers on the caller's allowances, in order.
	///
	/// Entries drawing on the same allowance see each other's spends. Any
	/// failing entry rejects the whole batch.
	#[instrument(skip_all, err(level = "warn"), fields(spender = %short_address(&ctx.caller), transfers = transfers.len()))]
	pub fn transfer_from_batch(
		&self,
		ctx: &ExecutionContext,
		storage: &mut dyn StorageInterface,
		ledger: &mut dyn TokenTransfer,
		transfers: &[AllowanceTransferDetails],
	) -> Result<(), Permit2Error> {
		self.execute_transfers(ctx, storage, ledger, transfers)?;

		debug!("Batch transferred");
		Ok(())
	}

	/// Zeroes the caller's allowance amount for each pair, keeping nonce and
	/// expiration.
	#[instrument(skip_all, err(level = "warn"), fields(owner = %short_address(&ctx.caller), pairs = approvals.len()))]
	pub fn lockdown(
		&self,
		ctx: &ExecutionContext,
		storage: &mut dyn StorageInterface,
		approvals: &[TokenSpenderPair],
	) -> Result<Vec<Permit2Event>, Permit2Error> {
		let owner = ctx.caller;
		let mut journal = StateJournal::new(&*storage);
		let mut events = Vec::with_capacity(approvals.len());

		for pair in approvals {
			let mut allowed = allowance::load(&journal, owner, pair.token, pair.spender)?;
			allowed.amount = U160::ZERO;
			allowance::store(&mut journal, owner, pair.token, pair.spender, &allowed);
			events.push(Permit2Event::Lockdown {
				owner,
				token: pair.token,
				spender: pair.spender,
			});
		}

		let writes = journal.into_writes();
		storage.commit(writes)?;

		debug!("Locked down");
		Ok(events)
	}

	/// Advances the caller's ordered nonce for `spender` over `token`,
	/// invalidating every permit signed for a nonce below `new_nonce`.
	#[instrument(skip_all, err(level = "warn"), fields(owner = %short_address(&ctx.caller), token = %short_address(&token), spender = %short_address(&spender), new_nonce = %new_nonce))]
	pub fn invalidate_nonces(
		&self,
		ctx: &ExecutionContext,
		storage: &mut dyn StorageInterface,
		token: Address,
		spender: Address,
		new_nonce: U48,
	) -> Result<Permit2Event, Permit2Error> {
		let owner = ctx.caller;
		let mut journal = StateJournal::new(&*storage);
		let mut allowed = allowance::load(&journal, owner, token, spender)?;
		let old_nonce = allowed.nonce;

		if new_nonce <= old_nonce {
			return Err(Permit2Error::InvalidNonce);
		}
		if new_nonce - old_nonce > U48::from(MAX_NONCE_INVALIDATION) {
			return Err(Permit2Error::ExcessiveInvalidation);
		}

		allowed.nonce = new_nonce;
		allowance::store(&mut journal, owner, token, spender, &allowed);
		let writes = journal.into_writes();
		storage.commit(writes)?;

		debug!(%old_nonce, "Nonces invalidated");
		Ok(Permit2Event::NonceInvalidation {
			owner,
			token,
			spender,
			new_nonce,
			old_nonce,
		})
	}

	fn execute_transfers(
		&self,
		ctx: &ExecutionContext,
		storage: &mut dyn StorageInterface,
		ledger: &mut dyn TokenTransfer,
		transfers: &[AllowanceTransferDetails],
	) -> Result<(), Permit2Error> {
		let spender = ctx.caller;
		let mut journal = StateJournal::new(&*storage);
		let mut movements = Vec::with_capacity(transfers.len());

		for transfer in transfers {
			spend_allowance(&mut journal, ctx, transfer.from, transfer.token, spender, transfer.amount)?;
			movements.push(TokenMovement::new(
				transfer.token,
				transfer.from,
				transfer.to,
				U256::from(transfer.amount),
			));
		}

		let writes = journal.into_writes();
		settle(writes, storage, ledger, &movements)
	}
}

/// Checks a permit detail against the stored nonce and stages the new
/// allowance.
fn update_approval(
	journal: &mut StateJournal<'_>,
	ctx: &ExecutionContext,
	owner: Address,
	spender: Address,
	details: &PermitDetails,
) -> Result<Permit2Event, Permit2Error> {
	let mut allowed = allowance::load(journal, owner, details.token, spender)?;
	if details.nonce != allowed.nonce {
		return Err(Permit2Error::InvalidNonce);
	}

	// An exhausted nonce space cannot advance, so nothing more can be permitted
	allowed.nonce = allowed
		.nonce
		.checked_add(U48::from(1u8))
		.ok_or(Permit2Error::InvalidNonce)?;
	allowed.amount = details.amount;
	allowed.expiration = resolve_expiration(details.expiration, ctx);
	allowance::store(journal, owner, details.token, spender, &allowed);

	Ok(Permit2Event::Permit {
		owner,
		token: details.token,
		spender,
		amount: details.amount,
		expiration: details.expiration,
		nonce: details.nonce,
	})
}

/// Checks expiry and remaining amount, then stages the decremented allowance.
fn spend_allowance(
	journal: &mut StateJournal<'_>,
	ctx: &ExecutionContext,
	from: Address,
	token: Address,
	spender: Address,
	amount: U160,
) -> Result<(), Permit2Error> {
	let mut allowed = allowance::load(journal, from, token, spender)?;

	if ctx.is_past(U256::from(allowed.expiration)) {
		return Err(Permit2Error::AllowanceExpired {
			deadline: allowed.expiration,
		});
	}

	if !allowed.is_unlimited() {
		allowed.amount = allowed
			.amount
			.checked_sub(amount)
			.ok_or(Permit2Error::InsufficientAllowance {
				amount: allowed.amount,
			})?;
		allowance::store(journal, from, token, spender, &allowed);
	}
	Ok(())
}
