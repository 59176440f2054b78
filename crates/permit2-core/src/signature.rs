//! Signer recovery for 65-byte and 64-byte (EIP-2098) signatures.

use crate::Permit2Error;
use alloy_primitives::Signature;
use permit2_types::{Address, B256};

/// Checks that `signature` over `digest` was made by `claimed_signer`.
///
/// Accepts `r ‖ s ‖ v` with `v` in {27, 28}, or the compact `r ‖ vs` form
/// where the top bit of `vs` is `v - 27`. Any other length is malformed.
/// A signature that does not recover, recovers to the zero address, or
/// recovers to another address is rejected as [`Permit2Error::InvalidSigner`].
pub fn verify(signature: &[u8], digest: &B256, claimed_signer: Address) -> Result<(), Permit2Error> {
	let signature = match signature.len() {
		65 => {
			// ecrecover only takes 27 and 28
			let y_parity = match signature[64] {
				27 => false,
				28 => true,
				_ => return Err(Permit2Error::InvalidSigner),
			};
			Signature::from_bytes_and_parity(&signature[..64], y_parity)
		},
		64 => Signature::from_erc2098(signature),
		length => return Err(Permit2Error::InvalidSignatureLength { length }),
	};

	let signer = signature
		.recover_address_from_prehash(digest)
		.map_err(|_| Permit2Error::InvalidSigner)?;

	if signer.is_zero() || signer != claimed_signer {
		return Err(Permit2Error::InvalidSigner);
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::keccak256;
	use permit2_account::{AccountInterface, LocalAccount, SignatureEncoding};

	fn signed(encoding: SignatureEncoding) -> (LocalAccount, B256, Vec<u8>) {
		let account = LocalAccount::random();
		let digest = keccak256(b"digest");
		let bytes = account
			.sign_digest(&digest)
			.unwrap()
			.encode(encoding)
			.to_vec();
		(account, digest, bytes)
	}

	#[test]
	fn test_standard_signature() {
		let (account, digest, signature) = signed(SignatureEncoding::Standard);
		assert!(verify(&signature, &digest, account.address()).is_ok());
	}

	#[test]
	fn test_compact_signature() {
		let (account, digest, signature) = signed(SignatureEncoding::Compact);
		assert_eq!(signature.len(), 64);
		assert!(verify(&signature, &digest, account.address()).is_ok());
	}

	#[test]
	fn test_wrong_signer() {
		let (_, digest, signature) = signed(SignatureEncoding::Standard);
		let result = verify(&signature, &digest, Address::repeat_byte(1));
		assert!(matches!(result, Err(Permit2Error::InvalidSigner)));
	}

	#[test]
	fn test_wrong_digest() {
		let (account, _, signature) = signed(SignatureEncoding::Compact);
		let result = verify(&signature, &keccak256(b"other"), account.address());
		assert!(matches!(result, Err(Permit2Error::InvalidSigner)));
	}

	#[test]
	fn test_bad_lengths() {
		let (account, digest, mut signature) = signed(SignatureEncoding::Compact);
		signature.push(0);
		// 65 bytes with a trailing zero is read as v = 0
		assert!(matches!(
			verify(&signature, &digest, account.address()),
			Err(Permit2Error::InvalidSigner)
		));

		signature.push(0);
		assert!(matches!(
			verify(&signature, &digest, account.address()),
			Err(Permit2Error::InvalidSignatureLength { length: 66 })
		));
		assert!(matches!(
			verify(&[], &digest, account.address()),
			Err(Permit2Error::InvalidSignatureLength { length: 0 })
		));
	}

	#[test]
	fn test_raw_parity_byte_rejected() {
		// v = 0/1 recovers under alloy but not under ecrecover
		let (account, digest, mut signature) = signed(SignatureEncoding::Standard);
		signature[64] -= 27;
		assert!(matches!(
			verify(&signature, &digest, account.address()),
			Err(Permit2Error::InvalidSigner)
		));
	}

	#[test]
	fn test_invalid_v() {
		let (account, digest, mut signature) = signed(SignatureEncoding::Standard);
		signature[64] = 29;
		assert!(matches!(
			verify(&signature, &digest, account.address()),
			Err(Permit2Error::InvalidSigner)
		));
	}
}
