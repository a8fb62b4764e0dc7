//! Address well-formedness and EIP-55 checksum casing.
//!
//! Two regimes matter here: loosely valid (`0x` + 40 hex chars, any casing)
//! and strictly valid (loose, and the casing is either all-lowercase or the
//! exact checksum rendering).

use alloy_primitives::Address;

use crate::chain::NATIVE_TOKEN_SENTINEL;

/// Loose parse: `0x` + 40 hex chars, casing ignored.
pub fn parse_address(raw: &str) -> Option<Address> {
    let hex_part = raw.strip_prefix("0x")?;
    if hex_part.len() != 40 || !hex_part.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    raw.parse().ok()
}

/// Canonical checksum rendering of an address.
pub fn checksum(address: Address) -> String {
    address.to_checksum(None)
}

/// Strict parse: loosely valid, and mixed casing only when it matches the
/// checksum exactly.
pub fn parse_strict_address(raw: &str) -> Option<Address> {
    let address = parse_address(raw)?;
    let hex_part = &raw[2..];
    if hex_part.chars().all(|ch| !ch.is_ascii_uppercase()) || checksum(address) == raw {
        Some(address)
    } else {
        None
    }
}

pub fn is_strict_address(raw: &str) -> bool {
    parse_strict_address(raw).is_some()
}

/// The native gas token is declared with the zero address; it has no
/// contract to read.
pub fn is_native_sentinel(raw: &str) -> bool {
    parse_address(raw).is_some_and(|address| address == NATIVE_TOKEN_SENTINEL)
}
