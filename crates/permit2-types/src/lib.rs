//! Common types for the Permit2 authorization engine.
//!
//! This crate defines the message shapes signed by token owners, the packed
//! allowance state, the events emitted by state transitions and the small
//! utilities (EIP-712 encoding, configuration schemas) shared by every other
//! crate in the workspace.

/// Allowance-transfer message and state types.
pub mod allowance;
/// Execution context supplied with every state-changing call.
pub mod context;
/// Events emitted by allowance and nonce state transitions.
pub mod events;
/// Registry trait for self-registering implementations.
pub mod registry;
/// Signature-transfer message types.
pub mod signature_transfer;
/// Storage slot keys for the authoritative state maps.
pub mod storage;
/// Utility functions for EIP-712 encoding and formatting.
pub mod utils;
/// Configuration validation types for ensuring type-safe configurations.
pub mod validation;

// Re-export all types for convenient access
pub use allowance::*;
pub use context::*;
pub use events::*;
pub use registry::*;
pub use signature_transfer::*;
pub use storage::*;
pub use utils::{
	current_timestamp, domain_hash, short_address, typed_data_digest, StructEncoder, PERMIT2_NAME,
};
pub use validation::*;

pub use alloy_primitives::aliases::U48;
pub use alloy_primitives::{Address, Bytes, B256, U160, U256};
