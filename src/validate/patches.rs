//! Token addresses allowed to diverge from their on-chain name/symbol.
//! Curated by hand; do not extend without maintainer sign-off. Decimals are
//! never patchable.

use alloy_primitives::{address, Address};

pub const ALLOWED_NAME_AND_SYMBOL_PATCHES: &[Address] = &[
    address!("0x6969696969696969696969696969696969696969"),
    //
    // mainnet
    //
    // USDT
    address!("0x779Ded0c9e1022225f8E0630b35a9b54bE713736"),
    // WBTC
    address!("0x0555E30da8f98308EdB960aa94C0Db47230d2B9c"),
    // iBERA
    address!("0x9b6761bf2397Bb5a6624a856cC84A3A14Dcd3fe5"),
    // iBGT
    address!("0xac03CABA51e17c86c921E1f6CBFBdC91F8BB2E6b"),
    //
    // bepolia
    //
    // incentive test tokens
    address!("0xf0063bac3Bd6a88049dDE2422365aaFd87D49054"),
    address!("0x1DB94dA7E7Af8529878053559552CFA8797f447B"),
    address!("0xF93CD4C23398A827B70A5994C21C5e8023394dad"),
    address!("0xFDD764D4Afd1F378B1bA1E56f477C4C4585B15D8"),
];

/// Address-equal membership test, so casing differences in the registry do
/// not defeat the patch.
pub fn is_allowed_divergence(address: Address) -> bool {
    ALLOWED_NAME_AND_SYMBOL_PATCHES.contains(&address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::addr::parse_address;

    #[test]
    fn membership_ignores_registry_casing() {
        let lower = "0x779ded0c9e1022225f8e0630b35a9b54be713736";
        let address = parse_address(lower).expect("address should parse");
        assert!(is_allowed_divergence(address));
    }

    #[test]
    fn unknown_address_is_not_patched() {
        let address = parse_address("0x0000000000000000000000000000000000000001")
            .expect("address should parse");
        assert!(!is_allowed_divergence(address));
    }
}
