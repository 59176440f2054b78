//! EIP-712 struct hashes for the six signed message shapes.
//!
//! Signature-transfer messages bind the spender, which is not part of the
//! caller-supplied struct: the executing caller is hashed in its place, so
//! only the intended spender can redeem the signature.

use alloy_primitives::keccak256;
use permit2_types::{
	Address, PermitBatch, PermitBatchTransferFrom, PermitDetails, PermitSingle,
	PermitTransferFrom, StructEncoder, TokenPermissions, Witness, B256,
};

pub const PERMIT_DETAILS_TYPE: &str =
	"PermitDetails(address token,uint160 amount,uint48 expiration,uint48 nonce)";

pub const PERMIT_SINGLE_TYPE: &str = "PermitSingle(PermitDetails details,address spender,uint256 sigDeadline)PermitDetails(address token,uint160 amount,uint48 expiration,uint48 nonce)";

pub const PERMIT_BATCH_TYPE: &str = "PermitBatch(PermitDetails[] details,address spender,uint256 sigDeadline)PermitDetails(address token,uint160 amount,uint48 expiration,uint48 nonce)";

pub const TOKEN_PERMISSIONS_TYPE: &str = "TokenPermissions(address token,uint256 amount)";

pub const PERMIT_TRANSFER_FROM_TYPE: &str = "PermitTransferFrom(TokenPermissions permitted,address spender,uint256 nonce,uint256 deadline)TokenPermissions(address token,uint256 amount)";

pub const PERMIT_BATCH_TRANSFER_FROM_TYPE: &str = "PermitBatchTransferFrom(TokenPermissions[] permitted,address spender,uint256 nonce,uint256 deadline)TokenPermissions(address token,uint256 amount)";

/// Prefix completed by the caller's witness type string.
pub const PERMIT_WITNESS_TRANSFER_FROM_TYPE_STUB: &str =
	"PermitWitnessTransferFrom(TokenPermissions permitted,address spender,uint256 nonce,uint256 deadline,";

/// Prefix completed by the caller's witness type string.
pub const PERMIT_BATCH_WITNESS_TRANSFER_FROM_TYPE_STUB: &str =
	"PermitBatchWitnessTransferFrom(TokenPermissions[] permitted,address spender,uint256 nonce,uint256 deadline,";

/// Type hash of a witness message: `keccak256(stub || witness_type_string)`.
///
/// Deriving the type hash from the supplied string is what binds the
/// witness schema: a digest only matches a signature made over the same
/// full type string.
pub fn witness_type_hash(stub: &str, witness_type_string: &str) -> B256 {
	let mut full = String::with_capacity(stub.len() + witness_type_string.len());
	full.push_str(stub);
	full.push_str(witness_type_string);
	keccak256(full.as_bytes())
}

pub fn hash_permit_details(details: &PermitDetails) -> B256 {
	StructEncoder::new(PERMIT_DETAILS_TYPE)
		.address(details.token)
		.uint160(details.amount)
		.uint48(details.expiration)
		.uint48(details.nonce)
		.hash()
}

pub fn hash_permit_single(permit: &PermitSingle) -> B256 {
	StructEncoder::new(PERMIT_SINGLE_TYPE)
		.word(hash_permit_details(&permit.details))
		.address(permit.spender)
		.uint256(permit.sig_deadline)
		.hash()
}

pub fn hash_permit_batch(permit: &PermitBatch) -> B256 {
	StructEncoder::new(PERMIT_BATCH_TYPE)
		.word(hash_array(permit.details.iter().map(hash_permit_details)))
		.address(permit.spender)
		.uint256(permit.sig_deadline)
		.hash()
}

pub fn hash_token_permissions(permitted: &TokenPermissions) -> B256 {
	StructEncoder::new(TOKEN_PERMISSIONS_TYPE)
		.address(permitted.token)
		.uint256(permitted.amount)
		.hash()
}

pub fn hash_permit_transfer_from(permit: &PermitTransferFrom, spender: Address) -> B256 {
	encode_transfer_from(
		keccak256(PERMIT_TRANSFER_FROM_TYPE.as_bytes()),
		hash_token_permissions(&permit.permitted),
		spender,
		permit,
		None,
	)
}

pub fn hash_permit_batch_transfer_from(permit: &PermitBatchTransferFrom, spender: Address) -> B256 {
	encode_batch_transfer_from(
		keccak256(PERMIT_BATCH_TRANSFER_FROM_TYPE.as_bytes()),
		spender,
		permit,
		None,
	)
}

pub fn hash_permit_witness_transfer_from(
	permit: &PermitTransferFrom,
	spender: Address,
	witness: &Witness,
) -> B256 {
	encode_transfer_from(
		witness_type_hash(
			PERMIT_WITNESS_TRANSFER_FROM_TYPE_STUB,
			&witness.witness_type_string,
		),
		hash_token_permissions(&permit.permitted),
		spender,
		permit,
		Some(witness.witness),
	)
}

pub fn hash_permit_batch_witness_transfer_from(
	permit: &PermitBatchTransferFrom,
	spender: Address,
	witness: &Witness,
) -> B256 {
	encode_batch_transfer_from(
		witness_type_hash(
			PERMIT_BATCH_WITNESS_TRANSFER_FROM_TYPE_STUB,
			&witness.witness_type_string,
		),
		spender,
		permit,
		Some(witness.witness),
	)
}

// Array members hash to keccak256 of their concatenated struct hashes
fn hash_array(hashes: impl Iterator<Item = B256>) -> B256 {
	let mut concatenated = Vec::new();
	for hash in hashes {
		concatenated.extend_from_slice(hash.as_slice());
	}
	keccak256(concatenated)
}

fn encode_transfer_from(
	type_hash: B256,
	permitted_hash: B256,
	spender: Address,
	permit: &PermitTransferFrom,
	witness: Option<B256>,
) -> B256 {
	finish_transfer_from(
		StructEncoder::with_type_hash(type_hash)
			.word(permitted_hash)
			.address(spender)
			.uint256(permit.nonce)
			.uint256(permit.deadline),
		witness,
	)
}

fn encode_batch_transfer_from(
	type_hash: B256,
	spender: Address,
	permit: &PermitBatchTransferFrom,
	witness: Option<B256>,
) -> B256 {
	finish_transfer_from(
		StructEncoder::with_type_hash(type_hash)
			.word(hash_array(permit.permitted.iter().map(hash_token_permissions)))
			.address(spender)
			.uint256(permit.nonce)
			.uint256(permit.deadline),
		witness,
	)
}

// The witness, when present, is the last member
fn finish_transfer_from(encoder: StructEncoder, witness: Option<B256>) -> B256 {
	match witness {
		Some(witness) => encoder.word(witness).hash(),
		None => encoder.hash(),
	}
}
