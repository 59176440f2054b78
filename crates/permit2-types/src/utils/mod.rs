//! Utility functions for EIP-712 encoding, timestamps and display formatting.

pub mod eip712;
pub mod formatting;
pub mod helpers;

pub use eip712::{domain_hash, typed_data_digest, StructEncoder, EIP712_DOMAIN_TYPE, PERMIT2_NAME};
pub use formatting::short_address;
pub use helpers::current_timestamp;
