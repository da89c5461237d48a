use crate::application::host::Host;
use crate::application::registry::CodeRegistry;
use crate::domain::call::{Output, Step};
use crate::domain::snapshot::{Checkpoint, Deployment};
use crate::error::Result;
use alloy_primitives::{Address, U256};
use std::collections::BTreeSet;

/// Native and target-token holdings of one address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountBalance {
    pub account: Address,
    pub native: U256,
    pub token: U256,
}

/// Drives a deployment with scenario steps.
///
/// Every call goes to the proxy; a failing step is reverted by the host and reported
/// to the caller, leaving the session usable for the next one.
pub struct SwapSession {
    host: Host,
    deployment: Deployment,
}

impl SwapSession {
    pub fn new(host: Host, deployment: Deployment) -> Self {
        Self { host, deployment }
    }

    pub fn from_checkpoint(checkpoint: Checkpoint, registry: &CodeRegistry) -> Result<Self> {
        let host = Host::restore(checkpoint.host, registry)?;
        Ok(Self::new(host, checkpoint.deployment))
    }

    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    pub fn process_step(&mut self, step: Step) -> Result<Output> {
        match step {
            Step::Fund { account, amount } => {
                self.host.mint_native(account, amount)?;
                Ok(Output::Unit)
            }
            Step::Call {
                caller,
                value,
                call,
            } => self.host.call(caller, self.deployment.proxy, value, &call),
        }
    }

    /// Balances of every address that holds or has held native currency or the
    /// deployment token, ordered by address.
    pub fn balances(&self) -> Result<Vec<AccountBalance>> {
        let snapshot = self.host.snapshot();
        let token = self.deployment.token;

        let mut accounts: BTreeSet<Address> = snapshot
            .accounts
            .iter()
            .map(|account| account.address)
            .collect();
        if let Some(record) = snapshot.tokens.iter().find(|record| record.address == token) {
            accounts.extend(record.balances.iter().map(|(holder, _)| *holder));
        }
        accounts.insert(self.deployment.proxy);

        accounts
            .into_iter()
            .map(|account| {
                Ok(AccountBalance {
                    account,
                    native: self.host.native_balance(account),
                    token: self.host.token_balance(token, account)?,
                })
            })
            .collect()
    }

    pub fn token_decimals(&self) -> Result<u8> {
        self.host.token_decimals(self.deployment.token)
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            deployment: self.deployment,
            host: self.host.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::deployment::{DeploymentConfig, bootstrap};
    use crate::application::engine::ExchangeEngine;
    use crate::application::proxy::UpgradeableProxy;
    use crate::domain::call::Call;
    use crate::error::SwapperError;
    use crate::infrastructure::token::Erc20Ledger;
    use std::sync::Arc;

    fn alice() -> Address {
        Address::repeat_byte(0xa1)
    }

    fn session() -> SwapSession {
        let config = DeploymentConfig {
            reserve: U256::from(10_000u64),
            default_rate: U256::from(1u64),
            ..Default::default()
        };
        let mut host = Host::new();
        let ledger = Erc20Ledger::with_supply("LOW", 0, config.deployer, U256::from(20_000u64));
        let deployment = bootstrap(&mut host, &config, Box::new(ledger)).unwrap();
        SwapSession::new(host, deployment)
    }

    fn one_native() -> U256 {
        U256::from(1_000_000_000_000_000_000u64)
    }

    #[test]
    fn test_process_steps_through_proxy() {
        let mut session = session();

        session
            .process_step(Step::Fund {
                account: alice(),
                amount: one_native(),
            })
            .unwrap();
        let out = session
            .process_step(Step::Call {
                caller: alice(),
                value: one_native(),
                call: Call::Receive,
            })
            .unwrap();

        assert_eq!(out, Output::Uint(U256::from(1u64)));
        let balances = session.balances().unwrap();
        let alice_row = balances.iter().find(|row| row.account == alice()).unwrap();
        assert_eq!(alice_row.native, U256::ZERO);
        assert_eq!(alice_row.token, U256::from(1u64));

        let proxy_row = balances
            .iter()
            .find(|row| row.account == session.deployment().proxy)
            .unwrap();
        assert_eq!(proxy_row.native, one_native());
        assert_eq!(proxy_row.token, U256::from(9_999u64));
    }

    #[test]
    fn test_failed_step_leaves_session_usable() {
        let mut session = session();

        let result = session.process_step(Step::Call {
            caller: alice(),
            value: U256::ZERO,
            call: Call::SetRate {
                rate: U256::from(7u64),
            },
        });
        assert!(matches!(result, Err(SwapperError::NotOwner)));

        let rate = session
            .process_step(Step::Call {
                caller: alice(),
                value: U256::ZERO,
                call: Call::Rate,
            })
            .unwrap();
        assert_eq!(rate, Output::Uint(U256::from(1u64)));
    }

    #[test]
    fn test_checkpoint_restores_session() {
        let mut session = session();
        session
            .process_step(Step::Fund {
                account: alice(),
                amount: one_native(),
            })
            .unwrap();

        let mut registry = CodeRegistry::new(Erc20Ledger::boxed_from_record);
        registry.register(Arc::new(ExchangeEngine::new(U256::from(1u64))));
        registry.register(Arc::new(UpgradeableProxy));

        let checkpoint = session.checkpoint();
        let restored = SwapSession::from_checkpoint(checkpoint, &registry).unwrap();

        assert_eq!(restored.deployment(), session.deployment());
        assert_eq!(restored.balances().unwrap(), session.balances().unwrap());
        assert_eq!(restored.token_decimals().unwrap(), 0);
    }
}
