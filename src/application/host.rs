use crate::application::registry::CodeRegistry;
use crate::domain::call::{Call, Frame, Output};
use crate::domain::ports::{TokenLedger, TokenLedgerBox};
use crate::domain::snapshot::{AccountRecord, ContractRecord, HostSnapshot};
use crate::domain::state::Storage;
use crate::error::{Result, SwapperError};
use alloy_primitives::{Address, U256};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info};

/// Maximum nesting of calls, delegations and receiver hooks.
pub const MAX_CALL_DEPTH: usize = 64;

static EMPTY_STORAGE: Storage = Storage::new();

/// Logic deployed at an address.
///
/// Implementations are stateless: everything they persist goes through the storage of
/// `frame.this`, which lets the same logic run behind any number of proxies.
pub trait Contract: Send + Sync {
    /// Stable identifier used to re-bind restored storage to its logic.
    fn code_id(&self) -> &str;

    fn execute(&self, host: &mut Host, frame: &Frame, call: &Call) -> Result<Output>;
}

pub type ContractRef = Arc<dyn Contract>;

/// Code controlled by an externally owned account, run when it receives native currency.
///
/// It may call back into any contract.
pub trait NativeReceiver: Send + Sync {
    fn on_receive(&self, host: &mut Host, from: Address, amount: U256) -> Result<()>;
}

#[derive(Clone, Default)]
struct WorldState {
    native: HashMap<Address, U256>,
    nonces: HashMap<Address, u64>,
    code: HashMap<Address, ContractRef>,
    storage: HashMap<Address, Storage>,
    tokens: HashMap<Address, TokenLedgerBox>,
}

/// The ledger environment contracts execute in.
///
/// Calls run one at a time. Every top-level or nested `call` checkpoints the world and
/// restores it when the call fails, so a failed call never leaves partial effects.
#[derive(Default)]
pub struct Host {
    state: WorldState,
    receivers: HashMap<Address, Arc<dyn NativeReceiver>>,
    depth: usize,
}

impl Host {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits native currency out of thin air.
    pub fn mint_native(&mut self, account: Address, amount: U256) -> Result<()> {
        let balance = self.native_balance(account);
        let updated = balance.checked_add(amount).ok_or(SwapperError::Overflow)?;
        self.state.native.insert(account, updated);
        Ok(())
    }

    pub fn native_balance(&self, account: Address) -> U256 {
        self.state
            .native
            .get(&account)
            .copied()
            .unwrap_or(U256::ZERO)
    }

    pub fn nonce(&self, account: Address) -> u64 {
        self.state.nonces.get(&account).copied().unwrap_or(0)
    }

    fn next_address(&mut self, deployer: Address) -> Address {
        let nonce = self.nonce(deployer);
        self.state.nonces.insert(deployer, nonce + 1);
        deployer.create(nonce)
    }

    /// Deploys `code` with empty storage and returns its address.
    pub fn deploy(&mut self, deployer: Address, code: ContractRef) -> Address {
        let address = self.next_address(deployer);
        info!(%address, %deployer, code = code.code_id(), "Contract deployed");
        self.state.code.insert(address, code);
        address
    }

    /// Deploys `code` and runs `constructor` against the new address as one atomic step.
    pub fn deploy_with<F>(&mut self, deployer: Address, code: ContractRef, constructor: F) -> Result<Address>
    where
        F: FnOnce(&mut Host, &Frame) -> Result<()>,
    {
        let checkpoint = self.state.clone();
        let address = self.deploy(deployer, code);
        let frame = Frame {
            this: address,
            caller: deployer,
            value: U256::ZERO,
        };

        self.depth += 1;
        let result = constructor(self, &frame);
        self.depth -= 1;

        match result {
            Ok(()) => Ok(address),
            Err(err) => {
                self.state = checkpoint;
                Err(err)
            }
        }
    }

    pub fn deploy_token(&mut self, deployer: Address, ledger: TokenLedgerBox) -> Address {
        let address = self.next_address(deployer);
        info!(%address, symbol = ledger.symbol(), decimals = ledger.decimals(), "Token deployed");
        self.state.tokens.insert(address, ledger);
        address
    }

    pub fn has_code(&self, address: Address) -> bool {
        self.state.code.contains_key(&address)
    }

    pub fn code_id(&self, address: Address) -> Option<&str> {
        self.state.code.get(&address).map(|code| code.code_id())
    }

    fn code_at(&self, address: Address) -> Result<ContractRef> {
        self.state
            .code
            .get(&address)
            .cloned()
            .ok_or(SwapperError::NoContract(address))
    }

    pub fn storage(&self, address: Address) -> &Storage {
        self.state.storage.get(&address).unwrap_or(&EMPTY_STORAGE)
    }

    pub fn storage_mut(&mut self, address: Address) -> &mut Storage {
        self.state.storage.entry(address).or_default()
    }

    /// Sends `call` from `caller` to the contract at `to`, paying `value`.
    pub fn call(&mut self, caller: Address, to: Address, value: U256, call: &Call) -> Result<Output> {
        if self.depth >= MAX_CALL_DEPTH {
            return Err(SwapperError::CallDepthExceeded);
        }

        let checkpoint = self.state.clone();
        self.depth += 1;
        let result = self.execute_call(caller, to, value, call);
        self.depth -= 1;

        if let Err(err) = &result {
            debug!(%caller, %to, call = call.name(), error = %err, "Call reverted");
            self.state = checkpoint;
        }
        result
    }

    fn execute_call(&mut self, caller: Address, to: Address, value: U256, call: &Call) -> Result<Output> {
        let code = self.code_at(to)?;
        if !value.is_zero() {
            if !call.is_payable() {
                return Err(SwapperError::NotPayable(call.name()));
            }
            self.move_native(caller, to, value)?;
        }

        let frame = Frame {
            this: to,
            caller,
            value,
        };
        code.execute(self, &frame, call)
    }

    /// Runs the code deployed at `implementation` inside the current frame.
    ///
    /// Storage reads and writes hit `frame.this`, and the caller and value are those of
    /// the delegating call. Failures propagate to the enclosing call, which reverts.
    pub fn delegate(&mut self, implementation: Address, frame: &Frame, call: &Call) -> Result<Output> {
        if self.depth >= MAX_CALL_DEPTH {
            return Err(SwapperError::CallDepthExceeded);
        }

        let code = self.code_at(implementation)?;
        debug!(proxy = %frame.this, %implementation, call = call.name(), "Delegating call");

        self.depth += 1;
        let result = code.execute(self, frame, call);
        self.depth -= 1;
        result
    }

    pub fn register_receiver(&mut self, account: Address, receiver: Arc<dyn NativeReceiver>) {
        self.receivers.insert(account, receiver);
    }

    fn move_native(&mut self, from: Address, to: Address, amount: U256) -> Result<()> {
        let have = self.native_balance(from);
        if have < amount {
            return Err(SwapperError::InsufficientNativeBalance { have, need: amount });
        }
        if from == to {
            return Ok(());
        }

        let credited = self
            .native_balance(to)
            .checked_add(amount)
            .ok_or(SwapperError::Overflow)?;
        self.state.native.insert(from, have - amount);
        self.state.native.insert(to, credited);
        Ok(())
    }

    /// Sends native currency, then runs the recipient's receiver hook if it has one.
    ///
    /// The hook runs after the balances moved, so callers must finish their own state
    /// changes before sending.
    pub fn transfer_native(&mut self, from: Address, to: Address, amount: U256) -> Result<()> {
        self.move_native(from, to, amount)?;

        let Some(receiver) = self.receivers.get(&to).cloned() else {
            return Ok(());
        };
        if self.depth >= MAX_CALL_DEPTH {
            return Err(SwapperError::CallDepthExceeded);
        }

        self.depth += 1;
        let result = receiver.on_receive(self, from, amount);
        self.depth -= 1;
        result
    }

    fn token(&self, asset: Address) -> Result<&dyn TokenLedger> {
        self.state
            .tokens
            .get(&asset)
            .map(|ledger| &**ledger)
            .ok_or(SwapperError::UnknownAsset(asset))
    }

    pub fn token_decimals(&self, asset: Address) -> Result<u8> {
        Ok(self.token(asset)?.decimals())
    }

    pub fn token_balance(&self, asset: Address, holder: Address) -> Result<U256> {
        Ok(self.token(asset)?.balance_of(holder))
    }

    pub fn token_transfer(&mut self, asset: Address, from: Address, to: Address, amount: U256) -> Result<()> {
        let ledger = self
            .state
            .tokens
            .get_mut(&asset)
            .ok_or(SwapperError::UnknownAsset(asset))?;
        ledger.transfer(from, to, amount)
    }

    pub fn snapshot(&self) -> HostSnapshot {
        let addresses: BTreeSet<Address> = self
            .state
            .native
            .keys()
            .chain(self.state.nonces.keys())
            .copied()
            .collect();
        let accounts = addresses
            .into_iter()
            .map(|address| AccountRecord {
                address,
                native: self.native_balance(address),
                nonce: self.nonce(address),
            })
            .collect();

        let mut contracts: Vec<ContractRecord> = self
            .state
            .code
            .iter()
            .map(|(address, code)| ContractRecord {
                address: *address,
                code_id: code.code_id().to_string(),
                slots: self.storage(*address).entries().collect(),
            })
            .collect();
        contracts.sort_by_key(|record| record.address);

        let mut tokens: Vec<_> = self
            .state
            .tokens
            .iter()
            .map(|(address, ledger)| ledger.record(*address))
            .collect();
        tokens.sort_by_key(|record| record.address);

        HostSnapshot {
            accounts,
            contracts,
            tokens,
        }
    }

    /// Rebuilds a host from a snapshot, binding each contract to the registered logic.
    pub fn restore(snapshot: HostSnapshot, registry: &CodeRegistry) -> Result<Self> {
        let mut host = Host::new();

        for account in snapshot.accounts {
            if !account.native.is_zero() {
                host.state.native.insert(account.address, account.native);
            }
            if account.nonce > 0 {
                host.state.nonces.insert(account.address, account.nonce);
            }
        }

        for contract in snapshot.contracts {
            let code = registry.resolve(&contract.code_id).ok_or_else(|| {
                SwapperError::ValidationError(format!("Unknown code id: {}", contract.code_id))
            })?;
            host.state.code.insert(contract.address, code);
            host.state
                .storage
                .insert(contract.address, contract.slots.into_iter().collect());
        }

        for token in snapshot.tokens {
            let address = token.address;
            host.state.tokens.insert(address, registry.load_token(token));
        }

        Ok(host)
    }
}
