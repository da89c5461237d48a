use crate::application::session::AccountBalance;
use crate::domain::units::{NATIVE_DECIMALS, format_units};
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct BalanceRow {
    account: String,
    native: String,
    token: String,
}

/// Writes account balances as CSV (`account,native,token`) in whole units.
pub struct BalanceWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> BalanceWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_balances(&mut self, balances: &[AccountBalance], token_decimals: u8) -> Result<()> {
        for balance in balances {
            self.writer.serialize(BalanceRow {
                account: balance.account.to_string(),
                native: format_units(balance.native, NATIVE_DECIMALS),
                token: format_units(balance.token, token_decimals),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256};

    #[test]
    fn test_write_balances() {
        let balances = [AccountBalance {
            account: Address::repeat_byte(0x22),
            native: U256::from(1_500_000_000_000_000_000u64),
            token: U256::from(2_000_000_000u64),
        }];

        let mut buffer = Vec::new();
        BalanceWriter::new(&mut buffer)
            .write_balances(&balances, 6)
            .unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(
            output,
            "account,native,token\n0x2222222222222222222222222222222222222222,1.5,2000\n"
        );
    }

    #[test]
    fn test_write_no_balances_is_empty() {
        let mut buffer = Vec::new();
        BalanceWriter::new(&mut buffer).write_balances(&[], 18).unwrap();
        assert!(buffer.is_empty());
    }
}
