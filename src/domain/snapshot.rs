use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Native balance and deployment nonce of an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub address: Address,
    pub native: U256,
    pub nonce: u64,
}

/// Deployed code identifier and raw storage of a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRecord {
    pub address: Address,
    pub code_id: String,
    pub slots: Vec<(U256, U256)>,
}

/// Complete state of a token ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    pub balances: Vec<(Address, U256)>,
}

/// Serializable image of the whole host, ordered by address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSnapshot {
    pub accounts: Vec<AccountRecord>,
    pub contracts: Vec<ContractRecord>,
    pub tokens: Vec<TokenRecord>,
}

/// Addresses produced by the bootstrap deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub deployer: Address,
    pub token: Address,
    pub implementation: Address,
    pub proxy: Address,
}

/// What a `StateStore` persists between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub deployment: Deployment,
    pub host: HostSnapshot,
}
