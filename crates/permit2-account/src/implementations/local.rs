//! Local private-key account.

use crate::{AccountError, AccountInterface, DigestSignature};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use permit2_types::{Address, B256};

/// Account backed by an in-process secp256k1 key.
#[derive(Debug, Clone)]
pub struct LocalAccount {
	signer: PrivateKeySigner,
}

impl LocalAccount {
	pub fn new(signer: PrivateKeySigner) -> Self {
		Self { signer }
	}

	/// Parses a hex private key, with or without `0x` prefix.
	pub fn from_private_key(key: &str) -> Result<Self, AccountError> {
		let signer = key
			.parse::<PrivateKeySigner>()
			.map_err(|e| AccountError::InvalidKey(e.to_string()))?;
		Ok(Self::new(signer))
	}

	/// Creates an account with a freshly generated key.
	pub fn random() -> Self {
		Self::new(PrivateKeySigner::random())
	}
}

impl AccountInterface for LocalAccount {
	fn address(&self) -> Address {
		self.signer.address()
	}

	fn sign_digest(&self, digest: &B256) -> Result<DigestSignature, AccountError> {
		let signature = self
			.signer
			.sign_hash_sync(digest)
			.map_err(|e| AccountError::SigningFailed(e.to_string()))?;

		Ok(DigestSignature::new(signature))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::SignatureEncoding;
	use alloy_primitives::{keccak256, Signature};

	// Well-known test key (anvil account #0)
	const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	#[test]
	fn test_from_private_key() {
		let account = LocalAccount::from_private_key(TEST_KEY).unwrap();
		assert_eq!(
			account.address(),
			"0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
				.parse::<Address>()
				.unwrap()
		);
		assert!(matches!(
			LocalAccount::from_private_key("0x1234"),
			Err(AccountError::InvalidKey(_))
		));
	}

	#[test]
	fn test_standard_encoding_recovers() {
		let account = LocalAccount::random();
		let digest = keccak256(b"permit");
		let signature = account.sign_digest(&digest).unwrap();

		let bytes = signature.encode(SignatureEncoding::Standard);
		assert_eq!(bytes.len(), 65);
		assert_eq!(bytes[64], signature.v());
		assert!(bytes[64] == 27 || bytes[64] == 28);

		let recovered = signature
			.signature()
			.recover_address_from_prehash(&digest)
			.unwrap();
		assert_eq!(recovered, account.address());
	}

	#[test]
	fn test_compact_encoding_folds_parity() {
		let account = LocalAccount::random();
		let signature = account.sign_digest(&keccak256(b"compact")).unwrap();

		let bytes = signature.encode(SignatureEncoding::Compact);
		assert_eq!(bytes.len(), 64);

		assert_eq!(Signature::from_erc2098(&bytes), *signature.signature());
		assert_eq!(bytes[32] >> 7, signature.v() - 27);
		assert_eq!(&bytes[..32], &signature.signature().r().to_be_bytes::<32>()[..]);
	}
}
