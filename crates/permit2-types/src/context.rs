//! Execution context for state-changing calls.

use crate::utils::current_timestamp;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// The environment one logical call executes in.
///
/// Stands in for the message sender, the block timestamp and the live chain
/// identifier. Deadlines and expirations are compared against `timestamp`;
/// the domain separator is recomputed when `chain_id` differs from the one
/// cached at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionContext {
	/// Account invoking the operation.
	pub caller: Address,
	/// Execution timestamp in seconds.
	pub timestamp: u64,
	/// Live chain identifier.
	pub chain_id: u64,
}

impl ExecutionContext {
	pub fn new(caller: Address, timestamp: u64, chain_id: u64) -> Self {
		Self {
			caller,
			timestamp,
			chain_id,
		}
	}

	/// A context stamped with the local wall-clock time.
	pub fn now(caller: Address, chain_id: u64) -> Self {
		Self::new(caller, current_timestamp(), chain_id)
	}

	/// Returns true if `deadline` lies strictly before the execution timestamp.
	pub fn is_past(&self, deadline: U256) -> bool {
		U256::from(self.timestamp) > deadline
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_deadline_is_inclusive() {
		let ctx = ExecutionContext::new(Address::ZERO, 100, 1);
		assert!(!ctx.is_past(U256::from(100u64)));
		assert!(!ctx.is_past(U256::from(101u64)));
		assert!(ctx.is_past(U256::from(99u64)));
	}

	#[test]
	fn test_now_uses_wall_clock() {
		let ctx = ExecutionContext::now(Address::repeat_byte(1), 10);
		assert_eq!(ctx.chain_id, 10);
		assert!(ctx.timestamp > 1_600_000_000);
	}
}
