use crate::application::host::ContractRef;
use crate::domain::ports::TokenLedgerBox;
use crate::domain::snapshot::TokenRecord;
use std::collections::HashMap;

/// Builds a token ledger back from its persisted record.
pub type TokenLoader = fn(TokenRecord) -> TokenLedgerBox;

/// Maps code identifiers to the logic that implements them.
///
/// Storage outlives a process, code does not: restoring a host needs a way back from
/// the `code_id` recorded next to each contract's slots to a live implementation.
pub struct CodeRegistry {
    contracts: HashMap<String, ContractRef>,
    token_loader: TokenLoader,
}

impl CodeRegistry {
    pub fn new(token_loader: TokenLoader) -> Self {
        Self {
            contracts: HashMap::new(),
            token_loader,
        }
    }

    /// Registers `code` under its own identifier, replacing any previous binding.
    pub fn register(&mut self, code: ContractRef) {
        self.contracts.insert(code.code_id().to_string(), code);
    }

    pub fn resolve(&self, code_id: &str) -> Option<ContractRef> {
        self.contracts.get(code_id).cloned()
    }

    pub fn load_token(&self, record: TokenRecord) -> TokenLedgerBox {
        (self.token_loader)(record)
    }
}
