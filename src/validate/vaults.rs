//! On-chain vault checks: the declared vault address must be the one the
//! reward vault factory resolves for the declared staking token.

use alloy_primitives::Address;
use futures_util::future::join_all;

use crate::chain::reward_vault_factory;
use crate::registry::{RegistryFile, Vault, VaultsFile};
use crate::rpc::ChainClient;
use crate::validate::addr::{checksum, is_native_sentinel, parse_address, parse_strict_address};
use crate::validate::findings::Finding;
use crate::validate::ValidationOptions;

pub async fn check_vaults_file(
    file: &RegistryFile<VaultsFile>,
    client: &dyn ChainClient,
    options: &ValidationOptions,
) -> Vec<Finding> {
    let checks = file
        .content
        .vaults
        .iter()
        .enumerate()
        .map(|(idx, vault)| check_vault(file, idx, vault, client, options));
    join_all(checks).await.into_iter().flatten().collect()
}

async fn check_vault(
    file: &RegistryFile<VaultsFile>,
    idx: usize,
    vault: &Vault,
    client: &dyn ChainClient,
    options: &ValidationOptions,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    if is_native_sentinel(&vault.vault_address) {
        return findings;
    }

    let Some(staking_token) = parse_strict_address(&vault.staking_token_address) else {
        findings.push(Finding::error(
            &file.path,
            format!("/vaults/{idx}/stakingTokenAddress"),
            format!("{} staking token is not a valid address", vault.name),
        ));
        return findings;
    };

    if options.case_sensitive_addresses {
        let formatted = checksum(staking_token);
        if formatted != vault.staking_token_address {
            findings.push(Finding::new(
                options.staking_token_casing,
                &file.path,
                format!("/vaults/{idx}/stakingTokenAddress"),
                format!(
                    "{} staking token is wrongly formatted. Should be {formatted}",
                    vault.name
                ),
            ));
            return findings;
        }
    }

    let Some(declared_vault) = parse_address(&vault.vault_address) else {
        findings.push(Finding::error(
            &file.path,
            format!("/vaults/{idx}/vaultAddress"),
            format!("{} vault address is not a valid address", vault.name),
        ));
        return findings;
    };

    let factory = reward_vault_factory(file.chain);
    let on_chain = match client.vault_for_staking_token(factory, staking_token).await {
        Ok(address) => address,
        Err(err) => {
            findings.push(Finding::error(
                &file.path,
                format!("/vaults/{idx}/vaultAddress"),
                format!(
                    "unable to read vault for {} on {}: {err}",
                    vault.name, file.chain
                ),
            ));
            return findings;
        }
    };

    if on_chain == Address::ZERO {
        findings.push(Finding::error(
            &file.path,
            format!("/vaults/{idx}/vaultAddress"),
            format!("{} staking token has no vault deployed on chain.", vault.name),
        ));
        return findings;
    }

    if on_chain != declared_vault {
        findings.push(Finding::error(
            &file.path,
            format!("/vaults/{idx}/vaultAddress"),
            format!(
                "{} vault address does not match on-chain address for the staking token. Should be {}",
                vault.name,
                checksum(on_chain)
            ),
        ));
        return findings;
    }

    if options.case_sensitive_addresses {
        let formatted = checksum(on_chain);
        if formatted != vault.vault_address {
            findings.push(Finding::error(
                &file.path,
                format!("/vaults/{idx}/vaultAddress"),
                format!(
                    "{} vault address is wrongly formatted. Should be {formatted}",
                    vault.name
                ),
            ));
        }
    }

    findings
}
