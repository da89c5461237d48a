use alloy_primitives::{Address, U256, uint};
use std::collections::BTreeMap;

/// Slot layout of the exchange engine. Delegated logic writes these slots into the
/// storage of whatever contract delegates to it.
pub mod engine_slots {
    use super::*;

    pub const INITIALIZED: U256 = uint!(0_U256);
    pub const OWNER: U256 = uint!(1_U256);
    pub const TARGET_ASSET: U256 = uint!(2_U256);
    pub const RATE: U256 = uint!(3_U256);
}

/// Reserved proxy slots (EIP-1967). They are hashes, so they never collide with the
/// sequential slots of the delegated logic.
pub mod proxy_slots {
    use super::*;

    /// `keccak256("eip1967.proxy.implementation") - 1`
    pub const IMPLEMENTATION: U256 =
        uint!(0x360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc_U256);
    /// `keccak256("eip1967.proxy.admin") - 1`
    pub const OWNER: U256 =
        uint!(0xb53127684a568b3173ae13b9f8a6016e243e63b6e8ee1178d6a717850b5d6103_U256);
}

/// Word-addressed persistent storage of a single contract.
///
/// Unset slots read as zero, and writing zero clears the slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Storage {
    slots: BTreeMap<U256, U256>,
}

impl Storage {
    pub const fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }

    pub fn load(&self, slot: U256) -> U256 {
        self.slots.get(&slot).copied().unwrap_or(U256::ZERO)
    }

    pub fn store(&mut self, slot: U256, value: U256) {
        if value.is_zero() {
            self.slots.remove(&slot);
        } else {
            self.slots.insert(slot, value);
        }
    }

    pub fn load_address(&self, slot: U256) -> Address {
        let word = self.load(slot).to_be_bytes::<32>();
        Address::from_slice(&word[12..])
    }

    pub fn store_address(&mut self, slot: U256, address: Address) {
        self.store(slot, U256::from_be_slice(address.as_slice()));
    }

    pub fn load_bool(&self, slot: U256) -> bool {
        !self.load(slot).is_zero()
    }

    pub fn store_bool(&mut self, slot: U256, flag: bool) {
        self.store(slot, U256::from(u8::from(flag)));
    }

    pub fn entries(&self) -> impl Iterator<Item = (U256, U256)> + '_ {
        self.slots.iter().map(|(slot, value)| (*slot, *value))
    }
}

impl FromIterator<(U256, U256)> for Storage {
    fn from_iter<I: IntoIterator<Item = (U256, U256)>>(iter: I) -> Self {
        let mut storage = Storage::new();
        for (slot, value) in iter {
            storage.store(slot, value);
        }
        storage
    }
}

/// Typed view over the engine slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineState {
    pub target_asset: Address,
    pub rate: U256,
    pub owner: Address,
    pub initialized: bool,
}

impl EngineState {
    pub fn load(storage: &Storage) -> Self {
        Self {
            target_asset: storage.load_address(engine_slots::TARGET_ASSET),
            rate: storage.load(engine_slots::RATE),
            owner: storage.load_address(engine_slots::OWNER),
            initialized: storage.load_bool(engine_slots::INITIALIZED),
        }
    }

    pub fn store(&self, storage: &mut Storage) {
        storage.store_address(engine_slots::TARGET_ASSET, self.target_asset);
        storage.store(engine_slots::RATE, self.rate);
        storage.store_address(engine_slots::OWNER, self.owner);
        storage.store_bool(engine_slots::INITIALIZED, self.initialized);
    }
}

/// Typed view over the reserved proxy slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProxyState {
    pub implementation: Address,
    pub owner: Address,
}

impl ProxyState {
    pub fn load(storage: &Storage) -> Self {
        Self {
            implementation: storage.load_address(proxy_slots::IMPLEMENTATION),
            owner: storage.load_address(proxy_slots::OWNER),
        }
    }

    pub fn store(&self, storage: &mut Storage) {
        storage.store_address(proxy_slots::IMPLEMENTATION, self.implementation);
        storage.store_address(proxy_slots::OWNER, self.owner);
    }
}
