use std::fs;
use std::path::{Path, PathBuf};

use crate::annotate;
use crate::chain::VALID_CHAIN_NAMES;
use crate::rpc;
use crate::validate::{run_validation, ValidationOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Validate,
    CheckJson,
    Chains,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("validate") => Some(Command::Validate),
        Some("check-json") => Some(Command::CheckJson),
        Some("chains") => Some(Command::Chains),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Validate) => handle_validate(args),
        Some(Command::CheckJson) => handle_check_json(args),
        Some(Command::Chains) => handle_chains(),
        None => {
            eprintln!("usage: chainmeta <validate|check-json|chains> [root]");
            2
        }
    }
}

fn root_arg(args: &[String]) -> PathBuf {
    args.get(2).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."))
}

fn handle_validate(args: &[String]) -> i32 {
    let options = ValidationOptions::new(root_arg(args));

    let clients = match rpc::clients_from_env() {
        Ok(clients) => clients,
        Err(err) => {
            eprintln!("unable to build RPC clients: {err}");
            return 1;
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("unable to start async runtime: {err}");
            return 1;
        }
    };

    match runtime.block_on(run_validation(&options, &clients)) {
        Ok(outcome) => annotate::print_report(&outcome),
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

/// Parse sweep over every metadata folder under <root>/src, excluding the
/// binary assets folder. Catches broken JSON before the full validation run.
fn handle_check_json(args: &[String]) -> i32 {
    let root = root_arg(args);
    let src = root.join("src");

    let folders = match metadata_folders(&src) {
        Ok(folders) => folders,
        Err(err) => {
            eprintln!("unable to read '{}': {err}", src.display());
            return 1;
        }
    };

    let mut ok = 0;
    let mut failed = 0;
    for folder in folders {
        let entries = match fs::read_dir(&folder) {
            Ok(entries) => entries,
            Err(err) => {
                eprintln!("unable to read '{}': {err}", folder.display());
                failed += 1;
                continue;
            }
        };
        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            if !path.is_file() || !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            match fs::read_to_string(&path) {
                Ok(raw) => match serde_json::from_str::<serde_json::Value>(&raw) {
                    Ok(_) => ok += 1,
                    Err(err) => {
                        eprintln!("invalid JSON: {} - {err}", path.display());
                        failed += 1;
                    }
                },
                Err(err) => {
                    eprintln!("read failed: {} - {err}", path.display());
                    failed += 1;
                }
            }
        }
    }

    println!("Checked {} metadata files, {ok} ok, {failed} errors", ok + failed);
    if failed > 0 {
        1
    } else {
        0
    }
}

fn metadata_folders(src: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut folders: Vec<PathBuf> = fs::read_dir(src)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir() && path.file_name().is_some_and(|name| name != "assets"))
        .collect();
    folders.sort();
    Ok(folders)
}

fn handle_chains() -> i32 {
    for chain in VALID_CHAIN_NAMES {
        println!("{chain}");
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_known_commands() {
        assert_eq!(parse_command(&args(&["chainmeta", "validate"])), Some(Command::Validate));
        assert_eq!(parse_command(&args(&["chainmeta", "check-json"])), Some(Command::CheckJson));
        assert_eq!(parse_command(&args(&["chainmeta", "chains"])), Some(Command::Chains));
    }

    #[test]
    fn rejects_unknown_commands() {
        assert_eq!(parse_command(&args(&["chainmeta"])), None);
        assert_eq!(parse_command(&args(&["chainmeta", "serve"])), None);
    }

    #[test]
    fn root_defaults_to_current_directory() {
        assert_eq!(root_arg(&args(&["chainmeta", "validate"])), PathBuf::from("."));
        assert_eq!(
            root_arg(&args(&["chainmeta", "validate", "/tmp/registry"])),
            PathBuf::from("/tmp/registry")
        );
    }
}
