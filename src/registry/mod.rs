pub mod loader;
pub mod types;

pub use loader::{
    load_metadata_folder, load_tokens, load_validators, load_vaults, LoadError, RegistryFile,
};
pub use types::{
    Category, Protocol, Subcategory, Token, TokensFile, Validator, ValidatorsFile, Vault,
    VaultsFile,
};
