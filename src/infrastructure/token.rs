use crate::domain::ports::{TokenLedger, TokenLedgerBox};
use crate::domain::snapshot::TokenRecord;
use crate::error::{Result, SwapperError};
use alloy_primitives::{Address, U256};
use std::collections::BTreeMap;

/// An in-memory ERC-20 style ledger.
///
/// Only balances are tracked; allowances and minting after construction are outside
/// what the exchange needs from a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Erc20Ledger {
    symbol: String,
    decimals: u8,
    balances: BTreeMap<Address, U256>,
}

impl Erc20Ledger {
    pub fn new(symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            decimals,
            balances: BTreeMap::new(),
        }
    }

    /// Creates a ledger whose whole `supply` (in base units) belongs to `holder`.
    pub fn with_supply(
        symbol: impl Into<String>,
        decimals: u8,
        holder: Address,
        supply: U256,
    ) -> Self {
        let mut ledger = Self::new(symbol, decimals);
        if !supply.is_zero() {
            ledger.balances.insert(holder, supply);
        }
        ledger
    }

    pub fn from_record(record: TokenRecord) -> Self {
        Self {
            symbol: record.symbol,
            decimals: record.decimals,
            balances: record
                .balances
                .into_iter()
                .filter(|(_, balance)| !balance.is_zero())
                .collect(),
        }
    }

    pub fn boxed_from_record(record: TokenRecord) -> TokenLedgerBox {
        Box::new(Self::from_record(record))
    }
}

impl TokenLedger for Erc20Ledger {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn balance_of(&self, holder: Address) -> U256 {
        self.balances.get(&holder).copied().unwrap_or(U256::ZERO)
    }

    fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<()> {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(SwapperError::InsufficientBalance);
        }
        if from == to || amount.is_zero() {
            return Ok(());
        }

        let to_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(SwapperError::Overflow)?;

        let remaining = from_balance - amount;
        if remaining.is_zero() {
            self.balances.remove(&from);
        } else {
            self.balances.insert(from, remaining);
        }
        self.balances.insert(to, to_balance);
        Ok(())
    }

    fn record(&self, address: Address) -> TokenRecord {
        TokenRecord {
            address,
            symbol: self.symbol.clone(),
            decimals: self.decimals,
            balances: self
                .balances
                .iter()
                .map(|(holder, balance)| (*holder, *balance))
                .collect(),
        }
    }

    fn clone_box(&self) -> TokenLedgerBox {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Address {
        Address::repeat_byte(0xa1)
    }

    fn bob() -> Address {
        Address::repeat_byte(0xb0)
    }

    #[test]
    fn test_transfer_moves_balance() {
        let mut ledger = Erc20Ledger::with_supply("DEXE", 18, alice(), U256::from(100u64));

        ledger.transfer(alice(), bob(), U256::from(40u64)).unwrap();

        assert_eq!(ledger.balance_of(alice()), U256::from(60u64));
        assert_eq!(ledger.balance_of(bob()), U256::from(40u64));
    }

    #[test]
    fn test_transfer_exceeding_balance_is_rejected() {
        let mut ledger = Erc20Ledger::with_supply("DEXE", 18, alice(), U256::from(100u64));

        let result = ledger.transfer(alice(), bob(), U256::from(101u64));

        assert!(matches!(result, Err(SwapperError::InsufficientBalance)));
        assert_eq!(ledger.balance_of(alice()), U256::from(100u64));
        assert_eq!(ledger.balance_of(bob()), U256::ZERO);
    }

    #[test]
    fn test_self_transfer_keeps_balance() {
        let mut ledger = Erc20Ledger::with_supply("DEXE", 18, alice(), U256::from(100u64));
        ledger.transfer(alice(), alice(), U256::from(100u64)).unwrap();
        assert_eq!(ledger.balance_of(alice()), U256::from(100u64));
    }

    #[test]
    fn test_record_restores_ledger() {
        let token = Address::repeat_byte(0x70);
        let mut ledger = Erc20Ledger::with_supply("LOW", 6, alice(), U256::from(10u64));
        ledger.transfer(alice(), bob(), U256::from(3u64)).unwrap();

        let record = ledger.record(token);
        assert_eq!(record.address, token);
        assert_eq!(record.balances.len(), 2);

        assert_eq!(Erc20Ledger::from_record(record), ledger);
    }
}
