//! Validation orchestration: load the registry, run the duplicate and
//! structural rules, cross-check records against the chain, and gather
//! everything into one report.

use std::collections::HashMap;
use std::path::PathBuf;

use futures_util::future::join_all;

use crate::chain::{ChainName, CASE_SENSITIVE_ADDRESSES};
use crate::registry::{self, LoadError};
use crate::rpc::ChainClients;

pub mod addr;
pub mod duplicates;
pub mod findings;
pub mod patches;
pub mod tokens;
pub mod vaults;

pub use findings::{Finding, Report, Severity};
pub use tokens::check_tokens_file;
pub use vaults::check_vaults_file;

#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Repository root holding the src/ metadata tree.
    pub root: PathBuf,
    /// Enforce canonical checksum casing on declared addresses.
    pub case_sensitive_addresses: bool,
    /// Severity of a staking-token casing mismatch. Historically drifted
    /// between error and warning; kept configurable, warning by default.
    pub staking_token_casing: Severity,
}

impl ValidationOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ValidationOptions {
            root: root.into(),
            case_sensitive_addresses: CASE_SENSITIVE_ADDRESSES,
            staking_token_casing: Severity::Warning,
        }
    }
}

/// Report plus the raw text of every loaded file, so the reporter can pin
/// findings to a line/column without re-reading the tree.
#[derive(Debug, Default)]
pub struct ValidationOutcome {
    pub report: Report,
    pub sources: HashMap<PathBuf, String>,
}

/// Full validation pass over one registry tree. Load failures halt; every
/// other problem lands in the report. All files and all records within them
/// are checked concurrently.
pub async fn run_validation(
    options: &ValidationOptions,
    clients: &ChainClients,
) -> Result<ValidationOutcome, LoadError> {
    let token_files = registry::load_tokens(&options.root)?;
    let vault_files = registry::load_vaults(&options.root)?;
    let validator_files = registry::load_validators(&options.root)?;

    let mut sources = HashMap::new();
    for file in &token_files {
        sources.insert(file.path.clone(), file.raw_content.clone());
    }
    for file in &vault_files {
        sources.insert(file.path.clone(), file.raw_content.clone());
    }
    for file in &validator_files {
        sources.insert(file.path.clone(), file.raw_content.clone());
    }

    let mut report = Report::default();
    for file in &token_files {
        report.extend(duplicates::check_token_duplicates(file));
    }
    for file in &vault_files {
        report.extend(duplicates::check_vault_duplicates(file));
    }
    for file in &validator_files {
        report.extend(duplicates::check_validator_records(file));
    }

    let token_checks = token_files.iter().map(|file| async {
        match clients.get(file.chain) {
            Some(client) => check_tokens_file(file, client, options).await,
            None => vec![missing_client_finding(file.path.clone(), file.chain)],
        }
    });
    let vault_checks = vault_files.iter().map(|file| async {
        match clients.get(file.chain) {
            Some(client) => check_vaults_file(file, client, options).await,
            None => vec![missing_client_finding(file.path.clone(), file.chain)],
        }
    });

    let (token_results, vault_results) =
        tokio::join!(join_all(token_checks), join_all(vault_checks));
    for result in token_results {
        report.extend(result);
    }
    for result in vault_results {
        report.extend(result);
    }

    Ok(ValidationOutcome { report, sources })
}

fn missing_client_finding(path: PathBuf, chain: ChainName) -> Finding {
    Finding::error(path, "", format!("no RPC client configured for chain {chain}"))
}
