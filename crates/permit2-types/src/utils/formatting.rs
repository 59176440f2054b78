//! String formatting utilities for log output.

use alloy_primitives::{hex, Address};

/// Shortens an address for display: `0x1234ab..cdef`.
pub fn short_address(address: &Address) -> String {
	let full = format!("0x{}", hex::encode(address.as_slice()));
	format!("{}..{}", &full[..8], &full[full.len() - 4..])
}
