//! Token transfer module for the Permit2 authorization engine.
//!
//! The engine decides whether a transfer may happen and how much allowance
//! remains; moving value is delegated to a [`TokenTransfer`] collaborator.
//! A failing collaborator aborts the whole call that invoked it.

use permit2_types::{Address, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod memory;
}

pub use implementations::memory::MemoryLedger;

/// Errors that can occur while moving tokens.
#[derive(Debug, Error)]
pub enum TransferError {
	/// The sender does not hold enough of the token.
	#[error("Insufficient balance of {token} for {holder}: have {available}, need {required}")]
	InsufficientBalance {
		token: Address,
		holder: Address,
		available: U256,
		required: U256,
	},
	/// Transfers from or to the account are blocked.
	#[error("Transfer blocked for {0}")]
	Blocked(Address),
	/// The recipient balance would overflow.
	#[error("Balance overflow of {token} for {holder}")]
	Overflow { token: Address, holder: Address },
	/// Error reported by an external ledger.
	#[error("Ledger error: {0}")]
	Ledger(String),
}

/// A single value movement requested by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMovement {
	pub token: Address,
	pub from: Address,
	pub to: Address,
	pub amount: U256,
}

impl TokenMovement {
	pub fn new(token: Address, from: Address, to: Address, amount: impl Into<U256>) -> Self {
		Self {
			token,
			from,
			to,
			amount: amount.into(),
		}
	}
}

/// Trait defining the value-transfer primitive consumed by the engine.
pub trait TokenTransfer: Send + Sync {
	/// Moves `amount` of `token` from `from` to `to`.
	fn move_tokens(
		&mut self,
		token: Address,
		from: Address,
		to: Address,
		amount: U256,
	) -> Result<(), TransferError>;

	/// Executes movements in order, stopping at the first failure.
	///
	/// Implementations that can roll back should override this so a failing
	/// entry leaves no earlier movement applied.
	fn move_batch(&mut self, movements: &[TokenMovement]) -> Result<(), TransferError> {
		for movement in movements {
			self.move_tokens(movement.token, movement.from, movement.to, movement.amount)?;
		}
		Ok(())
	}

	/// Undoes a batch that [`TokenTransfer::move_batch`] just applied.
	///
	/// Called when the state commit that follows a successful batch fails.
	/// The default moves every amount back, last movement first.
	fn revert_batch(&mut self, movements: &[TokenMovement]) -> Result<(), TransferError> {
		for movement in movements.iter().rev() {
			self.move_tokens(movement.token, movement.to, movement.from, movement.amount)?;
		}
		Ok(())
	}
}
