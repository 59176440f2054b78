//! Shared fixtures for engine tests.

use crate::Permit2;
use permit2_account::{AccountInterface, LocalAccount, SignatureEncoding};
use permit2_ledger::MemoryLedger;
use permit2_storage::implementations::memory::MemoryStorage;
use permit2_storage::{StorageError, StorageInterface, WriteSet};
use permit2_types::{
	Address, Bytes, ExecutionContext, PermitDetails, PermitSingle, StorageSlot, B256, U160, U256,
	U48,
};

pub(crate) const CHAIN_ID: u64 = 1;
pub(crate) const NOW: u64 = 1_700_000_000;
pub(crate) const VERIFYING_CONTRACT: Address = Address::repeat_byte(0x22);
pub(crate) const SPENDER: Address = Address::repeat_byte(0x50);
pub(crate) const RECIPIENT: Address = Address::repeat_byte(0x60);
pub(crate) const TOKEN0: Address = Address::repeat_byte(0xa0);
pub(crate) const TOKEN1: Address = Address::repeat_byte(0xa1);

/// 1e18, one whole token at 18 decimals.
pub(crate) const ONE_TOKEN: u128 = 1_000_000_000_000_000_000;

pub(crate) struct Fixture {
	pub permit2: Permit2,
	pub storage: MemoryStorage,
	pub ledger: MemoryLedger,
	pub owner: LocalAccount,
}

impl Fixture {
	/// An engine with empty state and an owner holding 1000 of each token.
	pub fn new() -> Self {
		let owner = LocalAccount::random();
		let mut ledger = MemoryLedger::new();
		for token in [TOKEN0, TOKEN1] {
			ledger
				.mint(token, owner.address(), U256::from(1000 * ONE_TOKEN))
				.unwrap();
		}

		Self {
			permit2: Permit2::new(CHAIN_ID, VERIFYING_CONTRACT),
			storage: MemoryStorage::new(),
			ledger,
			owner,
		}
	}

	pub fn owner(&self) -> Address {
		self.owner.address()
	}

	pub fn ctx(&self, caller: Address) -> ExecutionContext {
		ExecutionContext::new(caller, NOW, CHAIN_ID)
	}

	pub fn sign(&self, struct_hash: B256) -> Bytes {
		self.sign_with(struct_hash, SignatureEncoding::Standard)
	}

	pub fn sign_compact(&self, struct_hash: B256) -> Bytes {
		self.sign_with(struct_hash, SignatureEncoding::Compact)
	}

	fn sign_with(&self, struct_hash: B256, encoding: SignatureEncoding) -> Bytes {
		let digest = self.permit2.hash_typed_data(CHAIN_ID, &struct_hash);
		self.owner.sign_digest(&digest).unwrap().encode(encoding)
	}

	pub fn balance(&self, token: Address, holder: Address) -> U256 {
		self.ledger.balance_of(token, holder)
	}
}

/// Reads through to a memory backend and refuses every commit.
pub(crate) struct FailingCommit<'a>(pub &'a MemoryStorage);

impl StorageInterface for FailingCommit<'_> {
	fn load(&self, slot: &StorageSlot) -> Result<U256, StorageError> {
		self.0.load(slot)
	}

	fn commit(&mut self, _writes: WriteSet) -> Result<(), StorageError> {
		Err(StorageError::Backend("disk full".to_string()))
	}
}

pub(crate) fn permit_details(token: Address, nonce: u64) -> PermitDetails {
	PermitDetails {
		token,
		amount: U160::from(ONE_TOKEN),
		expiration: U48::from(NOW + 1000),
		nonce: U48::from(nonce),
	}
}

pub(crate) fn permit_single(token: Address, nonce: u64) -> PermitSingle {
	PermitSingle {
		details: permit_details(token, nonce),
		spender: SPENDER,
		sig_deadline: U256::from(NOW + 100),
	}
}
