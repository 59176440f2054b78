//! EIP-712 domain separator with chain-fork detection.

use permit2_types::{domain_hash, typed_data_digest, Address, B256, PERMIT2_NAME};

/// Domain separator bound to one deployed instance.
///
/// The separator for the chain id seen at construction is cached. A call on
/// any other chain id gets a separator computed from that live id, so
/// signatures made for one side of a fork are rejected on the other.
#[derive(Debug, Clone)]
pub struct DomainSeparator {
	verifying_contract: Address,
	cached_chain_id: u64,
	cached_separator: B256,
}

impl DomainSeparator {
	pub fn new(chain_id: u64, verifying_contract: Address) -> Self {
		Self {
			verifying_contract,
			cached_chain_id: chain_id,
			cached_separator: domain_hash(PERMIT2_NAME, chain_id, verifying_contract),
		}
	}

	/// Returns the separator for `chain_id`.
	pub fn separator(&self, chain_id: u64) -> B256 {
		if chain_id == self.cached_chain_id {
			self.cached_separator
		} else {
			domain_hash(PERMIT2_NAME, chain_id, self.verifying_contract)
		}
	}

	/// Returns the digest a signer signs for `struct_hash` on `chain_id`.
	pub fn hash_typed_data(&self, chain_id: u64, struct_hash: &B256) -> B256 {
		typed_data_digest(&self.separator(chain_id), struct_hash)
	}

	pub fn verifying_contract(&self) -> Address {
		self.verifying_contract
	}

	pub fn cached_chain_id(&self) -> u64 {
		self.cached_chain_id
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::keccak256;

	#[test]
	fn test_cached_separator_matches_fresh_computation() {
		let contract = Address::repeat_byte(0x22);
		let domain = DomainSeparator::new(1, contract);
		assert_eq!(domain.verifying_contract(), contract);
		assert_eq!(domain.cached_chain_id(), 1);
		assert_eq!(
			domain.separator(1),
			domain_hash(PERMIT2_NAME, 1, contract)
		);
	}

	#[test]
	fn test_separator_follows_live_chain_id() {
		let domain = DomainSeparator::new(1, Address::repeat_byte(0x22));
		let forked = domain.separator(1337);
		assert_ne!(forked, domain.separator(1));
		assert_eq!(
			forked,
			DomainSeparator::new(1337, Address::repeat_byte(0x22)).separator(1337)
		);
	}

	#[test]
	fn test_typed_data_digest_binds_chain() {
		let domain = DomainSeparator::new(1, Address::repeat_byte(0x22));
		let struct_hash = keccak256(b"struct");
		assert_ne!(
			domain.hash_typed_data(1, &struct_hash),
			domain.hash_typed_data(2, &struct_hash)
		);
	}
}
