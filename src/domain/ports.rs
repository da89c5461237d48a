use super::snapshot::{Checkpoint, TokenRecord};
use crate::error::Result;
use alloy_primitives::{Address, U256};
use async_trait::async_trait;

/// A fungible-token ledger with standard balance and transfer semantics.
pub trait TokenLedger: Send + Sync {
    fn symbol(&self) -> &str;
    fn decimals(&self) -> u8;
    fn balance_of(&self, holder: Address) -> U256;
    /// Moves `amount` from `from` to `to`, failing with `InsufficientBalance`.
    fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<()>;
    fn record(&self, address: Address) -> TokenRecord;
    fn clone_box(&self) -> TokenLedgerBox;
}

pub type TokenLedgerBox = Box<dyn TokenLedger>;

impl Clone for TokenLedgerBox {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[async_trait]
pub trait StateStore: Send + Sync {
    async fn save(&self, checkpoint: Checkpoint) -> Result<()>;
    async fn load(&self) -> Result<Option<Checkpoint>>;
}

pub type StateStoreBox = Box<dyn StateStore>;
