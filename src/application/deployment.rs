use crate::application::engine::{DEFAULT_RATE, ExchangeEngine};
use crate::application::host::Host;
use crate::application::proxy::UpgradeableProxy;
use crate::domain::call::Call;
use crate::domain::ports::TokenLedgerBox;
use crate::domain::snapshot::Deployment;
use crate::error::Result;
use alloy_primitives::{Address, U256};
use std::sync::Arc;
use tracing::info;

/// Settings for a fresh deployment. Amounts are in token base units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentConfig {
    pub deployer: Address,
    pub reserve: U256,
    pub default_rate: U256,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            deployer: Address::repeat_byte(0x11),
            reserve: U256::ZERO,
            default_rate: U256::from(DEFAULT_RATE),
        }
    }
}

/// Deploys `token`, an engine implementation and a proxy initialized against the
/// token, then moves `config.reserve` tokens from the deployer into the proxy.
///
/// The token ledger is expected to credit its supply to the deployer.
pub fn bootstrap(host: &mut Host, config: &DeploymentConfig, token: TokenLedgerBox) -> Result<Deployment> {
    let deployer = config.deployer;
    let token = host.deploy_token(deployer, token);
    let implementation = host.deploy(deployer, Arc::new(ExchangeEngine::new(config.default_rate)));
    let proxy = UpgradeableProxy::deploy(
        host,
        deployer,
        implementation,
        Some(Call::Initialize { target_asset: token }),
    )?;

    if !config.reserve.is_zero() {
        host.token_transfer(token, deployer, proxy, config.reserve)?;
    }

    info!(%token, %implementation, %proxy, reserve = %config.reserve, "Deployment ready");
    Ok(Deployment {
        deployer,
        token,
        implementation,
        proxy,
    })
}
