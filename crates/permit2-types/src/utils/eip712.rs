//! Typed-data hashing for Permit2 messages.
//!
//! Every member of a Permit2 struct is static (an address, an integer of at
//! most 256 bits, or the hash of a nested struct or array), so a struct
//! encodes as its type hash followed by one 32-byte word per member.

use alloy_primitives::{aliases::U48, keccak256, Address, B256, U160, U256};

pub const EIP712_DOMAIN_TYPE: &str =
	"EIP712Domain(string name,uint256 chainId,address verifyingContract)";

/// Domain name signed into every Permit2 message. The domain has no version.
pub const PERMIT2_NAME: &str = "Permit2";

/// Builds the hash of one struct, member by member.
///
/// ```ignore
/// let hash = StructEncoder::new("TokenPermissions(address token,uint256 amount)")
/// 	.address(token)
/// 	.uint256(amount)
/// 	.hash();
/// ```
#[derive(Debug, Clone)]
pub struct StructEncoder {
	encoded: Vec<u8>,
}

impl StructEncoder {
	/// Starts a struct of the given canonical type string.
	pub fn new(type_string: &str) -> Self {
		Self::with_type_hash(keccak256(type_string))
	}

	/// Starts a struct whose type hash was derived elsewhere (witness types).
	pub fn with_type_hash(type_hash: B256) -> Self {
		let mut encoded = Vec::with_capacity(32 * 7);
		encoded.extend_from_slice(type_hash.as_slice());
		Self { encoded }
	}

	/// Appends a raw word: a nested struct hash, an array hash or a witness.
	pub fn word(mut self, word: B256) -> Self {
		self.encoded.extend_from_slice(word.as_slice());
		self
	}

	pub fn address(self, address: Address) -> Self {
		self.word(address.into_word())
	}

	pub fn uint256(self, value: U256) -> Self {
		self.word(B256::from(value.to_be_bytes::<32>()))
	}

	pub fn uint160(self, value: U160) -> Self {
		self.uint256(U256::from(value))
	}

	pub fn uint48(self, value: U48) -> Self {
		self.uint256(U256::from(value))
	}

	pub fn hash(self) -> B256 {
		keccak256(&self.encoded)
	}
}

/// Hash of the Permit2 domain for `name` on `chain_id`.
pub fn domain_hash(name: &str, chain_id: u64, verifying_contract: Address) -> B256 {
	StructEncoder::new(EIP712_DOMAIN_TYPE)
		.word(keccak256(name))
		.uint256(U256::from(chain_id))
		.address(verifying_contract)
		.hash()
}

/// The digest that gets signed: `keccak256(0x19 ‖ 0x01 ‖ domain ‖ struct)`.
pub fn typed_data_digest(domain_hash: &B256, struct_hash: &B256) -> B256 {
	keccak256([&[0x19, 0x01][..], domain_hash.as_slice(), struct_hash.as_slice()].concat())
}
