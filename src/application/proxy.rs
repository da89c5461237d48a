use crate::application::guard;
use crate::application::host::{Contract, Host};
use crate::domain::call::{Call, Frame, Output};
use crate::domain::state::{ProxyState, proxy_slots};
use crate::error::{Result, SwapperError};
use alloy_primitives::Address;
use std::sync::Arc;
use tracing::info;

pub const PROXY_CODE_ID: &str = "upgradeable-proxy";

/// Forwards every non-administrative call to its current implementation.
///
/// The implementation runs against the proxy's storage, so swapping it with
/// `upgradeTo` changes behaviour while every field the logic wrote stays in place.
/// The implementation address and the deployer live in reserved slots that the
/// delegated logic never touches.
///
/// There is a single owner. Once the logic reports one (after `initialize`), that owner
/// governs upgrades too and `owner`/`transferOwnership` reach the logic. Until then the
/// deployer recorded at deployment administers the proxy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpgradeableProxy;

impl UpgradeableProxy {
    /// Deploys a proxy owned by `deployer` in front of `implementation`.
    ///
    /// When `init` is given it is delegated to the implementation as part of the same
    /// atomic deployment; if it fails, no proxy is left behind.
    pub fn deploy(
        host: &mut Host,
        deployer: Address,
        implementation: Address,
        init: Option<Call>,
    ) -> Result<Address> {
        Self::ensure_contract(host, implementation)?;

        let proxy = host.deploy_with(deployer, Arc::new(UpgradeableProxy), |host, frame| {
            ProxyState {
                implementation,
                owner: deployer,
            }
            .store(host.storage_mut(frame.this));

            if let Some(call) = &init {
                host.delegate(implementation, frame, call)?;
            }
            Ok(())
        })?;

        info!(%proxy, %implementation, owner = %deployer, "Proxy deployed");
        Ok(proxy)
    }

    fn ensure_contract(host: &Host, implementation: Address) -> Result<()> {
        if implementation == Address::ZERO || !host.has_code(implementation) {
            return Err(SwapperError::InvalidImplementation(implementation));
        }
        Ok(())
    }

    pub fn implementation(host: &Host, proxy: Address) -> Address {
        host.storage(proxy).load_address(proxy_slots::IMPLEMENTATION)
    }

    /// The deployer-held admin slot, in charge only while the logic has no owner.
    pub fn fallback_admin(host: &Host, proxy: Address) -> Address {
        host.storage(proxy).load_address(proxy_slots::OWNER)
    }

    fn logic_owner(host: &mut Host, frame: &Frame) -> Result<Address> {
        let implementation = Self::implementation(host, frame.this);
        let output = host.delegate(implementation, frame, &Call::Owner)?;
        Ok(output.as_address().unwrap_or(Address::ZERO))
    }

    /// The account allowed to administer the proxy behind `frame.this`.
    pub fn admin(host: &mut Host, frame: &Frame) -> Result<Address> {
        let owner = Self::logic_owner(host, frame)?;
        if owner == Address::ZERO {
            Ok(Self::fallback_admin(host, frame.this))
        } else {
            Ok(owner)
        }
    }

    fn upgrade_to(host: &mut Host, frame: &Frame, implementation: Address) -> Result<()> {
        if Self::admin(host, frame)? != frame.caller {
            return Err(SwapperError::NotOwner);
        }
        Self::ensure_contract(host, implementation)?;

        let previous = Self::implementation(host, frame.this);
        host.storage_mut(frame.this)
            .store_address(proxy_slots::IMPLEMENTATION, implementation);
        info!(proxy = %frame.this, %previous, %implementation, "Proxy upgraded");
        Ok(())
    }

    fn transfer_ownership(host: &mut Host, frame: &Frame, new_owner: Address) -> Result<()> {
        if Self::logic_owner(host, frame)? != Address::ZERO {
            let implementation = Self::implementation(host, frame.this);
            host.delegate(implementation, frame, &Call::TransferOwnership { new_owner })?;
            return Ok(());
        }

        let previous = guard::transfer_ownership(
            host.storage_mut(frame.this),
            proxy_slots::OWNER,
            frame.caller,
            new_owner,
        )?;
        info!(proxy = %frame.this, %previous, %new_owner, "Proxy admin transferred");
        Ok(())
    }
}

impl Contract for UpgradeableProxy {
    fn code_id(&self) -> &str {
        PROXY_CODE_ID
    }

    fn execute(&self, host: &mut Host, frame: &Frame, call: &Call) -> Result<Output> {
        match call {
            Call::UpgradeTo { implementation } => {
                Self::upgrade_to(host, frame, *implementation)?;
                Ok(Output::Unit)
            }
            Call::GetImplementation => Ok(Output::Address(Self::implementation(host, frame.this))),
            Call::Owner => Self::admin(host, frame).map(Output::Address),
            Call::TransferOwnership { new_owner } => {
                Self::transfer_ownership(host, frame, *new_owner)?;
                Ok(Output::Unit)
            }
            _ => {
                let implementation = Self::implementation(host, frame.this);
                host.delegate(implementation, frame, call)
            }
        }
    }
}
