//! Load per-chain registry files from the src/ metadata tree. The raw text is
//! kept on every loaded file so findings can be pinned to a line/column later.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::chain::ChainName;
use crate::registry::types::{TokensFile, ValidatorsFile, VaultsFile};

/// Halting configuration errors. A broken repository is not a data-quality
/// finding; the run stops here.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("'{}' is not a recognized chain file (expected <chain>.json)", .0.display())]
    UnknownChain(PathBuf),
    #[error("unable to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON in '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One loaded registry document.
#[derive(Debug, Clone)]
pub struct RegistryFile<T> {
    pub chain: ChainName,
    pub content: T,
    pub raw_content: String,
    pub path: PathBuf,
}

/// Parse every `.json` file directly inside `<root>/src/<folder>/`. The file
/// stem must name a recognized chain.
pub fn load_metadata_folder<T: DeserializeOwned>(
    root: &Path,
    folder: &str,
) -> Result<Vec<RegistryFile<T>>, LoadError> {
    let folder_path = root.join("src").join(folder);
    let entries = fs::read_dir(&folder_path).map_err(|source| LoadError::Io {
        path: folder_path.clone(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();
        let Some(chain) = ChainName::parse(stem) else {
            return Err(LoadError::UnknownChain(path));
        };

        let raw_content = fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        let content = serde_json::from_str(&raw_content).map_err(|source| LoadError::Parse {
            path: path.clone(),
            source,
        })?;

        files.push(RegistryFile {
            chain,
            content,
            raw_content,
            path,
        });
    }

    Ok(files)
}

pub fn load_tokens(root: &Path) -> Result<Vec<RegistryFile<TokensFile>>, LoadError> {
    load_metadata_folder(root, "tokens")
}

pub fn load_vaults(root: &Path) -> Result<Vec<RegistryFile<VaultsFile>>, LoadError> {
    load_metadata_folder(root, "vaults")
}

pub fn load_validators(root: &Path) -> Result<Vec<RegistryFile<ValidatorsFile>>, LoadError> {
    load_metadata_folder(root, "validators")
}
