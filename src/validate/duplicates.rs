//! Intra-file duplicate and structural consistency rules. Pure and
//! synchronous; nothing here touches the chain.

use std::collections::HashMap;

use crate::registry::{RegistryFile, TokensFile, ValidatorsFile, VaultsFile};
use crate::validate::findings::Finding;

/// First-seen occurrence of an identifying value, for duplicate attribution.
struct Seen<'a> {
    name: &'a str,
    index: usize,
}

/// Tokens: no two entries may share a case-insensitive address or symbol.
/// Each duplicate is attributed to the second-seen occurrence.
pub fn check_token_duplicates(file: &RegistryFile<TokensFile>) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut addresses: HashMap<String, Seen<'_>> = HashMap::new();
    let mut symbols: HashMap<String, Seen<'_>> = HashMap::new();

    for (idx, token) in file.content.tokens.iter().enumerate() {
        let address_key = token.address.to_lowercase();
        if let Some(existing) = addresses.get(&address_key) {
            findings.push(Finding::error(
                &file.path,
                format!("/tokens/{idx}/address"),
                format!(
                    "Duplicate token address found. {} shares the same address as {} (index {})",
                    token.symbol, existing.name, existing.index
                ),
            ));
        } else {
            addresses.insert(
                address_key,
                Seen {
                    name: &token.symbol,
                    index: idx,
                },
            );
        }

        let symbol_key = token.symbol.to_lowercase();
        if let Some(existing) = symbols.get(&symbol_key) {
            findings.push(Finding::error(
                &file.path,
                format!("/tokens/{idx}/symbol"),
                format!(
                    "Duplicate token symbol found. {} shares the same symbol as {} (index {})",
                    token.name, existing.name, existing.index
                ),
            ));
        } else {
            symbols.insert(
                symbol_key,
                Seen {
                    name: &token.name,
                    index: idx,
                },
            );
        }
    }

    findings
}

/// Vaults file: duplicate vault/staking-token addresses, duplicate protocol
/// names/urls, the platform-tag rule, protocol references, and category
/// resolution.
pub fn check_vault_duplicates(file: &RegistryFile<VaultsFile>) -> Vec<Finding> {
    let mut findings = Vec::new();

    check_vault_address_duplicates(file, &mut findings);
    check_protocol_duplicates(file, &mut findings);
    check_vault_references(file, &mut findings);
    check_platform_tags(file, &mut findings);

    findings
}

fn check_vault_address_duplicates(file: &RegistryFile<VaultsFile>, findings: &mut Vec<Finding>) {
    let mut vault_addresses: HashMap<String, Seen<'_>> = HashMap::new();
    let mut staking_addresses: HashMap<String, Seen<'_>> = HashMap::new();

    for (idx, vault) in file.content.vaults.iter().enumerate() {
        let vault_key = vault.vault_address.to_lowercase();
        if let Some(existing) = vault_addresses.get(&vault_key) {
            findings.push(Finding::error(
                &file.path,
                format!("/vaults/{idx}/vaultAddress"),
                format!(
                    "Duplicate vault address found. {} shares the same vault address as {} (index {})",
                    vault.name, existing.name, existing.index
                ),
            ));
        } else {
            vault_addresses.insert(
                vault_key,
                Seen {
                    name: &vault.name,
                    index: idx,
                },
            );
        }

        let staking_key = vault.staking_token_address.to_lowercase();
        if let Some(existing) = staking_addresses.get(&staking_key) {
            findings.push(Finding::error(
                &file.path,
                format!("/vaults/{idx}/stakingTokenAddress"),
                format!(
                    "Duplicate staking token address found. {} shares the same staking token as {} (index {})",
                    vault.name, existing.name, existing.index
                ),
            ));
        } else {
            staking_addresses.insert(
                staking_key,
                Seen {
                    name: &vault.name,
                    index: idx,
                },
            );
        }
    }
}

fn check_protocol_duplicates(file: &RegistryFile<VaultsFile>, findings: &mut Vec<Finding>) {
    let mut names: HashMap<String, Seen<'_>> = HashMap::new();
    let mut urls: HashMap<String, Seen<'_>> = HashMap::new();

    for (idx, protocol) in file.content.protocols.iter().enumerate() {
        let name_key = protocol.name.to_lowercase();
        if let Some(existing) = names.get(&name_key) {
            findings.push(Finding::error(
                &file.path,
                format!("/protocols/{idx}/name"),
                format!(
                    "Duplicate protocol name found. '{}' already appears at index {}",
                    existing.name, existing.index
                ),
            ));
        } else {
            names.insert(
                name_key,
                Seen {
                    name: &protocol.name,
                    index: idx,
                },
            );
        }

        let url_key = protocol.url.to_lowercase();
        if let Some(existing) = urls.get(&url_key) {
            findings.push(Finding::error(
                &file.path,
                format!("/protocols/{idx}/url"),
                format!(
                    "Duplicate protocol url found. {} shares the same url as {} (index {})",
                    protocol.name, existing.name, existing.index
                ),
            ));
        } else {
            urls.insert(
                url_key,
                Seen {
                    name: &protocol.name,
                    index: idx,
                },
            );
        }
    }
}

/// Every vault must reference a declared protocol, and every category string
/// must resolve against the file's category list.
fn check_vault_references(file: &RegistryFile<VaultsFile>, findings: &mut Vec<Finding>) {
    let protocols = &file.content.protocols;
    let categories = &file.content.categories;

    for (idx, vault) in file.content.vaults.iter().enumerate() {
        if !vault.protocol.is_empty() && !protocols.iter().any(|p| p.name == vault.protocol) {
            findings.push(Finding::error(
                &file.path,
                format!("/vaults/{idx}/protocol"),
                format!(
                    "{} is not a valid protocol. Please add it to the list at the top of this file if it's a new protocol.",
                    vault.protocol
                ),
            ));
        }

        for entry in vault.categories.iter().flatten() {
            let mut parts = entry.split('/');
            let category = parts.next().unwrap_or_default();
            let subcategory = parts.next();

            if parts.next().is_some() {
                findings.push(Finding::error(
                    &file.path,
                    format!("/vaults/{idx}/categories"),
                    format!(
                        "{entry} is not a valid category. Categories should be in the format \"category/subcategory\""
                    ),
                ));
            }

            let definition = categories.iter().find(|c| c.slug == category);

            if definition.is_none() {
                let known = categories
                    .iter()
                    .map(|c| c.slug.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                findings.push(Finding::error(
                    &file.path,
                    format!("/vaults/{idx}/categories"),
                    format!("{category} is not a valid category. Should be one of {known}"),
                ));
            }

            if let Some(subcategory) = subcategory {
                let resolved = definition
                    .and_then(|c| c.subcategories.as_ref())
                    .is_some_and(|subs| subs.iter().any(|s| s.slug == subcategory));
                if !resolved {
                    let known = definition
                        .and_then(|c| c.subcategories.as_ref())
                        .map(|subs| {
                            subs.iter()
                                .map(|s| s.slug.as_str())
                                .collect::<Vec<_>>()
                                .join(", ")
                        })
                        .unwrap_or_default();
                    findings.push(Finding::error(
                        &file.path,
                        format!("/vaults/{idx}/categories"),
                        format!(
                            "{subcategory} is not a valid subcategory of {category}. Should be one of: {known}"
                        ),
                    ));
                }
            }
        }
    }
}

/// A protocol carries the `platform` tag if and only if at least one vault
/// references it by name.
fn check_platform_tags(file: &RegistryFile<VaultsFile>, findings: &mut Vec<Finding>) {
    for (idx, protocol) in file.content.protocols.iter().enumerate() {
        let is_platform = protocol
            .tags
            .as_ref()
            .is_some_and(|tags| tags.iter().any(|tag| tag == "platform"));
        let has_vault = file
            .content
            .vaults
            .iter()
            .any(|vault| vault.protocol == protocol.name);

        if is_platform && !has_vault {
            findings.push(Finding::error(
                &file.path,
                format!("/protocols/{idx}/tags"),
                format!(
                    "{} protocol has no active vaults, but is marked as platform in the tags.",
                    protocol.name
                ),
            ));
        } else if !is_platform && has_vault {
            // Point at /tags when the key exists, /name when the whole key
            // is missing.
            let field = if protocol.tags.is_some() { "tags" } else { "name" };
            findings.push(Finding::error(
                &file.path,
                format!("/protocols/{idx}/{field}"),
                format!(
                    "{} protocol has active vaults, but is not marked as platform in the tags.",
                    protocol.name
                ),
            ));
        }
    }
}

/// Validators: duplicate ids, and ids must be 96-hex-char pubkeys.
pub fn check_validator_records(file: &RegistryFile<ValidatorsFile>) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut ids: HashMap<String, Seen<'_>> = HashMap::new();

    for (idx, validator) in file.content.validators.iter().enumerate() {
        let hex_part = validator.id.strip_prefix("0x").unwrap_or(&validator.id);
        if hex_part.len() != 96 || !hex_part.chars().all(|ch| ch.is_ascii_hexdigit()) {
            findings.push(Finding::error(
                &file.path,
                format!("/validators/{idx}/id"),
                format!(
                    "{} id is not a valid validator pubkey (expected 96 hex chars)",
                    validator.name
                ),
            ));
        }

        let id_key = validator.id.to_lowercase();
        if let Some(existing) = ids.get(&id_key) {
            findings.push(Finding::error(
                &file.path,
                format!("/validators/{idx}/id"),
                format!(
                    "Duplicate validator id found. {} shares the same id as {} (index {})",
                    validator.name, existing.name, existing.index
                ),
            ));
        } else {
            ids.insert(
                id_key,
                Seen {
                    name: &validator.name,
                    index: idx,
                },
            );
        }
    }

    findings
}
