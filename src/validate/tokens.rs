//! On-chain token checks: declared name/symbol/decimals against the ERC-20
//! contract, behind the address well-formedness and checksum gates.

use futures_util::future::join_all;

use crate::registry::{RegistryFile, Token, TokensFile};
use crate::rpc::ChainClient;
use crate::validate::addr::{checksum, is_native_sentinel, parse_address};
use crate::validate::findings::Finding;
use crate::validate::patches::is_allowed_divergence;
use crate::validate::ValidationOptions;

/// All token checks within a file run concurrently; each record isolates its
/// own failures as findings.
pub async fn check_tokens_file(
    file: &RegistryFile<TokensFile>,
    client: &dyn ChainClient,
    options: &ValidationOptions,
) -> Vec<Finding> {
    let checks = file
        .content
        .tokens
        .iter()
        .enumerate()
        .map(|(idx, token)| check_token(file, idx, token, client, options));
    join_all(checks).await.into_iter().flatten().collect()
}

async fn check_token(
    file: &RegistryFile<TokensFile>,
    idx: usize,
    token: &Token,
    client: &dyn ChainClient,
    options: &ValidationOptions,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    if is_native_sentinel(&token.address) {
        return findings;
    }

    let Some(address) = parse_address(&token.address) else {
        findings.push(Finding::error(
            &file.path,
            format!("/tokens/{idx}/address"),
            format!("{} address is not a valid address", token.name),
        ));
        return findings;
    };

    // A malformed casing is a formatting defect; comparing metadata against
    // a wrongly-written address would be meaningless.
    let formatted = checksum(address);
    if options.case_sensitive_addresses && formatted != token.address {
        findings.push(Finding::error(
            &file.path,
            format!("/tokens/{idx}/address"),
            format!(
                "{} address is wrongly formatted. Should be {formatted}",
                token.name
            ),
        ));
        return findings;
    }

    let (name, symbol, decimals) = tokio::join!(
        client.erc20_name(address),
        client.erc20_symbol(address),
        client.erc20_decimals(address),
    );
    let patched = is_allowed_divergence(address);

    match name {
        Ok(on_chain) => {
            if on_chain != token.name && !patched {
                findings.push(Finding::error(
                    &file.path,
                    format!("/tokens/{idx}/name"),
                    format!(
                        "Token {} has different name on {}. Should be {on_chain}",
                        token.name, file.chain
                    ),
                ));
            }
        }
        Err(err) => findings.push(Finding::error(
            &file.path,
            format!("/tokens/{idx}/name"),
            format!(
                "unable to read name for {} on {}: {err}",
                token.name, file.chain
            ),
        )),
    }

    match symbol {
        Ok(on_chain) => {
            if on_chain != token.symbol && !patched {
                findings.push(Finding::error(
                    &file.path,
                    format!("/tokens/{idx}/symbol"),
                    format!(
                        "Token {} has different symbol on {}. Should be {on_chain}",
                        token.name, file.chain
                    ),
                ));
            }
        }
        Err(err) => findings.push(Finding::error(
            &file.path,
            format!("/tokens/{idx}/symbol"),
            format!(
                "unable to read symbol for {} on {}: {err}",
                token.name, file.chain
            ),
        )),
    }

    // Decimals feed value math downstream; no divergence is ever patchable.
    match decimals {
        Ok(on_chain) => {
            if on_chain != token.decimals {
                findings.push(Finding::error(
                    &file.path,
                    format!("/tokens/{idx}/decimals"),
                    format!(
                        "Token {} has different decimals on {}. Should be {on_chain}",
                        token.name, file.chain
                    ),
                ));
            }
        }
        Err(err) => findings.push(Finding::error(
            &file.path,
            format!("/tokens/{idx}/decimals"),
            format!(
                "unable to read decimals for {} on {}: {err}",
                token.name, file.chain
            ),
        )),
    }

    findings
}
