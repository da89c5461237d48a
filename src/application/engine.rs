use crate::application::guard;
use crate::application::host::{Contract, Host};
use crate::domain::call::{Call, Frame, Output};
use crate::domain::state::{EngineState, engine_slots};
use crate::domain::units::exchange_amount;
use crate::error::{Result, SwapperError};
use alloy_primitives::{Address, U256};
use tracing::{debug, info};

pub const ENGINE_CODE_ID: &str = "exchange-engine";

/// Whole target tokens released per whole native unit after `initialize`.
pub const DEFAULT_RATE: u64 = 2000;

/// Exchanges native-currency payments for a configurable token at a fixed rate.
///
/// The engine holds no state of its own. Every operation reads and writes the
/// [`EngineState`] slots of `frame.this`, which is the engine itself when called
/// directly and the proxy when reached through delegation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeEngine {
    default_rate: U256,
}

impl Default for ExchangeEngine {
    fn default() -> Self {
        Self::new(U256::from(DEFAULT_RATE))
    }
}

impl ExchangeEngine {
    /// Creates an engine whose `initialize` sets `default_rate`.
    pub fn new(default_rate: U256) -> Self {
        Self { default_rate }
    }

    fn active_state(host: &Host, this: Address) -> Result<EngineState> {
        let storage = host.storage(this);
        guard::require_initialized(storage)?;
        Ok(EngineState::load(storage))
    }

    fn owner_state(host: &Host, frame: &Frame) -> Result<EngineState> {
        let state = Self::active_state(host, frame.this)?;
        guard::only_owner(host.storage(frame.this), engine_slots::OWNER, frame.caller)?;
        Ok(state)
    }

    pub fn initialize(&self, host: &mut Host, frame: &Frame, target_asset: Address) -> Result<()> {
        let storage = host.storage_mut(frame.this);
        guard::initializer(storage)?;

        let state = EngineState {
            target_asset,
            rate: self.default_rate,
            owner: frame.caller,
            initialized: true,
        };
        state.store(storage);

        info!(contract = %frame.this, owner = %frame.caller, %target_asset, rate = %self.default_rate, "Engine initialized");
        Ok(())
    }

    /// Releases target tokens for the native value carried by `frame`.
    ///
    /// The host has already credited the payment to `frame.this`; if the reserve cannot
    /// cover the exchange the error reverts that credit as well.
    pub fn receive_payment(&self, host: &mut Host, frame: &Frame) -> Result<U256> {
        let state = Self::active_state(host, frame.this)?;
        let decimals = host.token_decimals(state.target_asset)?;
        let tokens_out = exchange_amount(state.rate, decimals, frame.value)?;

        let reserve = host.token_balance(state.target_asset, frame.this)?;
        if tokens_out > reserve {
            return Err(SwapperError::InsufficientReserve);
        }

        debug!(payer = %frame.caller, paid = %frame.value, %tokens_out, "Exchanging payment");
        host.token_transfer(state.target_asset, frame.this, frame.caller, tokens_out)?;
        Ok(tokens_out)
    }

    pub fn set_rate(&self, host: &mut Host, frame: &Frame, rate: U256) -> Result<()> {
        Self::owner_state(host, frame)?;
        host.storage_mut(frame.this).store(engine_slots::RATE, rate);
        info!(contract = %frame.this, %rate, "Rate updated");
        Ok(())
    }

    /// Points the engine at another asset; balances held in the old one stay put.
    pub fn set_target_asset(&self, host: &mut Host, frame: &Frame, asset: Address) -> Result<()> {
        Self::owner_state(host, frame)?;
        host.storage_mut(frame.this)
            .store_address(engine_slots::TARGET_ASSET, asset);
        info!(contract = %frame.this, %asset, "Target asset updated");
        Ok(())
    }

    /// Sends the whole native balance to the owner.
    ///
    /// The balance is read right before the transfer, and the transfer is the last
    /// thing this operation does: the owner's receiver may re-enter.
    pub fn withdraw_native(&self, host: &mut Host, frame: &Frame) -> Result<U256> {
        let state = Self::owner_state(host, frame)?;
        let balance = host.native_balance(frame.this);
        info!(contract = %frame.this, owner = %state.owner, %balance, "Withdrawing native balance");
        host.transfer_native(frame.this, state.owner, balance)?;
        Ok(balance)
    }

    /// Transfers `amounts[i]` of `assets[i]` to the owner for every index.
    ///
    /// Any failing transfer fails the call, and the host reverts the whole batch.
    pub fn withdraw_assets(
        &self,
        host: &mut Host,
        frame: &Frame,
        assets: &[Address],
        amounts: &[U256],
    ) -> Result<()> {
        let state = Self::owner_state(host, frame)?;
        if assets.len() != amounts.len() {
            return Err(SwapperError::ArityMismatch);
        }

        for (asset, amount) in assets.iter().zip(amounts) {
            host.token_transfer(*asset, frame.this, state.owner, *amount)?;
            info!(contract = %frame.this, %asset, %amount, "Asset withdrawn");
        }
        Ok(())
    }

    pub fn owner(&self, host: &Host, frame: &Frame) -> Address {
        host.storage(frame.this).load_address(engine_slots::OWNER)
    }

    pub fn transfer_ownership(&self, host: &mut Host, frame: &Frame, new_owner: Address) -> Result<()> {
        Self::active_state(host, frame.this)?;
        let previous = guard::transfer_ownership(
            host.storage_mut(frame.this),
            engine_slots::OWNER,
            frame.caller,
            new_owner,
        )?;
        info!(contract = %frame.this, %previous, %new_owner, "Engine ownership transferred");
        Ok(())
    }
}

impl Contract for ExchangeEngine {
    fn code_id(&self) -> &str {
        ENGINE_CODE_ID
    }

    fn execute(&self, host: &mut Host, frame: &Frame, call: &Call) -> Result<Output> {
        match call {
            Call::Initialize { target_asset } => {
                self.initialize(host, frame, *target_asset)?;
                Ok(Output::Unit)
            }
            Call::Receive => self.receive_payment(host, frame).map(Output::Uint),
            Call::SetRate { rate } => {
                self.set_rate(host, frame, *rate)?;
                Ok(Output::Unit)
            }
            Call::SetTargetAsset { asset } => {
                self.set_target_asset(host, frame, *asset)?;
                Ok(Output::Unit)
            }
            Call::WithdrawNative => self.withdraw_native(host, frame).map(Output::Uint),
            Call::WithdrawAssets { assets, amounts } => {
                self.withdraw_assets(host, frame, assets, amounts)?;
                Ok(Output::Unit)
            }
            Call::Owner => Ok(Output::Address(self.owner(host, frame))),
            Call::TransferOwnership { new_owner } => {
                self.transfer_ownership(host, frame, *new_owner)?;
                Ok(Output::Unit)
            }
            Call::Rate => Ok(Output::Uint(EngineState::load(host.storage(frame.this)).rate)),
            Call::TargetAsset => Ok(Output::Address(
                EngineState::load(host.storage(frame.this)).target_asset,
            )),
            Call::UpgradeTo { .. } | Call::GetImplementation => {
                Err(SwapperError::UnsupportedCall(call.name()))
            }
        }
    }
}
