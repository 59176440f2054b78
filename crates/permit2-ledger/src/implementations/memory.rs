//! In-memory ERC-20-style ledger.

use crate::{TokenMovement, TokenTransfer, TransferError};
use permit2_types::{short_address, Address, U256};
use std::collections::{HashMap, HashSet};

/// Balances per (token, holder) held in memory.
///
/// Batches are all-or-nothing: balances are snapshotted before the first
/// movement and restored if any movement fails.
#[derive(Debug, Default, Clone)]
pub struct MemoryLedger {
	balances: HashMap<(Address, Address), U256>,
	blocked: HashSet<Address>,
}

impl MemoryLedger {
	pub fn new() -> Self {
		Self::default()
	}

	/// Credits `amount` of `token` to `holder`.
	pub fn mint(&mut self, token: Address, holder: Address, amount: U256) -> Result<(), TransferError> {
		let balance = self.balances.entry((token, holder)).or_default();
		*balance = balance
			.checked_add(amount)
			.ok_or(TransferError::Overflow { token, holder })?;
		Ok(())
	}

	pub fn balance_of(&self, token: Address, holder: Address) -> U256 {
		self.balances
			.get(&(token, holder))
			.copied()
			.unwrap_or(U256::ZERO)
	}

	/// Rejects every transfer from or to `account` until unblocked.
	pub fn block(&mut self, account: Address) {
		self.blocked.insert(account);
	}

	pub fn unblock(&mut self, account: Address) {
		self.blocked.remove(&account);
	}
}

impl TokenTransfer for MemoryLedger {
	fn move_tokens(
		&mut self,
		token: Address,
		from: Address,
		to: Address,
		amount: U256,
	) -> Result<(), TransferError> {
		if let Some(account) = [from, to].into_iter().find(|a| self.blocked.contains(a)) {
			return Err(TransferError::Blocked(account));
		}

		let available = self.balance_of(token, from);
		let remaining = available
			.checked_sub(amount)
			.ok_or(TransferError::InsufficientBalance {
				token,
				holder: from,
				available,
				required: amount,
			})?;
		self.balances.insert((token, from), remaining);

		let credited = self
			.balance_of(token, to)
			.checked_add(amount)
			.ok_or(TransferError::Overflow { token, holder: to })?;
		self.balances.insert((token, to), credited);

		tracing::trace!(
			token = %short_address(&token),
			from = %short_address(&from),
			to = %short_address(&to),
			%amount,
			"Moved tokens"
		);
		Ok(())
	}

	fn move_batch(&mut self, movements: &[TokenMovement]) -> Result<(), TransferError> {
		let snapshot = self.balances.clone();
		for movement in movements {
			if let Err(e) =
				self.move_tokens(movement.token, movement.from, movement.to, movement.amount)
			{
				self.balances = snapshot;
				return Err(e);
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const TOKEN: Address = Address::repeat_byte(0xaa);
	const ALICE: Address = Address::repeat_byte(0x01);
	const BOB: Address = Address::repeat_byte(0x02);

	fn funded() -> MemoryLedger {
		let mut ledger = MemoryLedger::new();
		ledger.mint(TOKEN, ALICE, U256::from(100u64)).unwrap();
		ledger
	}

	#[test]
	fn test_move_tokens() {
		let mut ledger = funded();
		ledger
			.move_tokens(TOKEN, ALICE, BOB, U256::from(40u64))
			.unwrap();
		assert_eq!(ledger.balance_of(TOKEN, ALICE), U256::from(60u64));
		assert_eq!(ledger.balance_of(TOKEN, BOB), U256::from(40u64));
	}

	#[test]
	fn test_insufficient_balance() {
		let mut ledger = funded();
		let err = ledger
			.move_tokens(TOKEN, ALICE, BOB, U256::from(101u64))
			.unwrap_err();
		assert!(matches!(err, TransferError::InsufficientBalance { .. }));
		assert_eq!(ledger.balance_of(TOKEN, ALICE), U256::from(100u64));
	}

	#[test]
	fn test_blocked_account() {
		let mut ledger = funded();
		ledger.block(BOB);
		let err = ledger
			.move_tokens(TOKEN, ALICE, BOB, U256::from(1u64))
			.unwrap_err();
		assert!(matches!(err, TransferError::Blocked(a) if a == BOB));

		ledger.unblock(BOB);
		assert!(ledger.move_tokens(TOKEN, ALICE, BOB, U256::from(1u64)).is_ok());
	}

	#[test]
	fn test_failed_batch_restores_balances() {
		let mut ledger = funded();
		let movements = [
			TokenMovement::new(TOKEN, ALICE, BOB, U256::from(60u64)),
			TokenMovement::new(TOKEN, ALICE, BOB, U256::from(60u64)),
		];
		assert!(ledger.move_batch(&movements).is_err());
		assert_eq!(ledger.balance_of(TOKEN, ALICE), U256::from(100u64));
		assert_eq!(ledger.balance_of(TOKEN, BOB), U256::ZERO);
	}

	#[test]
	fn test_revert_batch_restores_balances() {
		let mut ledger = funded();
		let carol = Address::repeat_byte(0x03);
		let movements = [
			TokenMovement::new(TOKEN, ALICE, BOB, U256::from(30u64)),
			TokenMovement::new(TOKEN, BOB, carol, U256::from(30u64)),
		];
		ledger.move_batch(&movements).unwrap();
		assert_eq!(ledger.balance_of(TOKEN, carol), U256::from(30u64));

		ledger.revert_batch(&movements).unwrap();
		assert_eq!(ledger.balance_of(TOKEN, ALICE), U256::from(100u64));
		assert_eq!(ledger.balance_of(TOKEN, BOB), U256::ZERO);
		assert_eq!(ledger.balance_of(TOKEN, carol), U256::ZERO);
	}
}
