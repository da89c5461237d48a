use alloy_primitives::{Address, U256};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwapperError {
    #[error("Initializable: contract is already initialized")]
    AlreadyInitialized,
    #[error("Initializable: contract is not initialized")]
    NotInitialized,
    #[error("Ownable: caller is not the owner")]
    NotOwner,
    #[error("Ownable: new owner is the zero address")]
    ZeroAddress,
    #[error("Swapper: arrays of different size")]
    ArityMismatch,
    #[error("Not enought tokens on contract balance")]
    InsufficientReserve,
    #[error("ERC20: transfer amount exceeds balance")]
    InsufficientBalance,
    #[error("Insufficient native balance: have {have}, need {need}")]
    InsufficientNativeBalance { have: U256, need: U256 },
    #[error("ERC1967: new implementation is not a contract: {0}")]
    InvalidImplementation(Address),
    #[error("No contract deployed at {0}")]
    NoContract(Address),
    #[error("Unknown asset: {0}")]
    UnknownAsset(Address),
    #[error("Function `{0}` is not payable")]
    NotPayable(&'static str),
    #[error("Function `{0}` is not supported")]
    UnsupportedCall(&'static str),
    #[error("Call depth exceeded")]
    CallDepthExceeded,
    #[error("Arithmetic overflow")]
    Overflow,
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDbError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, SwapperError>;
