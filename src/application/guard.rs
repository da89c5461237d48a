//! Access-control and initialization checks shared by the engine and the proxy.

use crate::domain::state::{Storage, engine_slots};
use crate::error::{Result, SwapperError};
use alloy_primitives::{Address, U256};

/// Fails with `NotOwner` unless `caller` is the address stored at `owner_slot`.
pub fn only_owner(storage: &Storage, owner_slot: U256, caller: Address) -> Result<()> {
    if storage.load_address(owner_slot) == caller {
        Ok(())
    } else {
        Err(SwapperError::NotOwner)
    }
}

/// Replaces the owner stored at `owner_slot` and returns the previous one.
pub fn transfer_ownership(
    storage: &mut Storage,
    owner_slot: U256,
    caller: Address,
    new_owner: Address,
) -> Result<Address> {
    only_owner(storage, owner_slot, caller)?;
    if new_owner == Address::ZERO {
        return Err(SwapperError::ZeroAddress);
    }

    let previous = storage.load_address(owner_slot);
    storage.store_address(owner_slot, new_owner);
    Ok(previous)
}

/// Flips the initialized flag, failing if it is already set.
pub fn initializer(storage: &mut Storage) -> Result<()> {
    if storage.load_bool(engine_slots::INITIALIZED) {
        return Err(SwapperError::AlreadyInitialized);
    }
    storage.store_bool(engine_slots::INITIALIZED, true);
    Ok(())
}

pub fn require_initialized(storage: &Storage) -> Result<()> {
    if storage.load_bool(engine_slots::INITIALIZED) {
        Ok(())
    } else {
        Err(SwapperError::NotInitialized)
    }
}
