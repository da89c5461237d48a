#![allow(dead_code)]

use alloy_primitives::{Address, U256};
use std::sync::Arc;
use swapper::application::engine::ExchangeEngine;
use swapper::application::host::Host;
use swapper::application::proxy::UpgradeableProxy;
use swapper::domain::call::{Call, Output};
use swapper::domain::units::pow10;
use swapper::error::Result;
use swapper::infrastructure::token::Erc20Ledger;

pub fn admin() -> Address {
    Address::repeat_byte(0x11)
}

pub fn alice() -> Address {
    Address::repeat_byte(0x22)
}

pub fn bob() -> Address {
    Address::repeat_byte(0x33)
}

pub fn units(whole: u64, decimals: u8) -> U256 {
    U256::from(whole) * pow10(decimals).unwrap()
}

pub fn ether(whole: u64) -> U256 {
    units(whole, 18)
}

/// Deploys a token whose whole supply belongs to `admin()`.
pub fn deploy_token(host: &mut Host, symbol: &str, decimals: u8) -> Address {
    let supply = units(1_000_000_000, decimals);
    host.deploy_token(
        admin(),
        Box::new(Erc20Ledger::with_supply(symbol, decimals, admin(), supply)),
    )
}

pub fn deploy_engine(host: &mut Host) -> Address {
    host.deploy(admin(), Arc::new(ExchangeEngine::default()))
}

pub struct Fixture {
    pub host: Host,
    pub token: Address,
    pub engine: Address,
}

impl Fixture {
    pub fn send(&mut self, caller: Address, call: Call) -> Result<Output> {
        self.host.call(caller, self.engine, U256::ZERO, &call)
    }

    pub fn pay(&mut self, caller: Address, value: U256) -> Result<Output> {
        self.host.call(caller, self.engine, value, &Call::Receive)
    }

    pub fn balance(&self, asset: Address, holder: Address) -> U256 {
        self.host.token_balance(asset, holder).unwrap()
    }
}

/// An engine used directly, initialized by `admin()` and holding 1,000,000 tokens.
/// Alice starts with 10 native units.
pub fn swap_fixture() -> Fixture {
    let mut host = Host::new();
    let token = deploy_token(&mut host, "DEXE", 18);
    let engine = deploy_engine(&mut host);
    host.call(admin(), engine, U256::ZERO, &Call::Initialize { target_asset: token })
        .unwrap();
    host.token_transfer(token, admin(), engine, ether(1_000_000))
        .unwrap();
    host.mint_native(alice(), ether(10)).unwrap();

    Fixture {
        host,
        token,
        engine,
    }
}

pub struct ProxyFixture {
    pub host: Host,
    pub token: Address,
    pub engine: Address,
    pub proxy: Address,
}

impl ProxyFixture {
    pub fn send(&mut self, caller: Address, call: Call) -> Result<Output> {
        self.host.call(caller, self.proxy, U256::ZERO, &call)
    }

    pub fn pay(&mut self, caller: Address, value: U256) -> Result<Output> {
        self.host.call(caller, self.proxy, value, &Call::Receive)
    }

    pub fn implementation(&mut self) -> Address {
        self.send(alice(), Call::GetImplementation)
            .unwrap()
            .as_address()
            .unwrap()
    }
}

/// A proxy deployed without init data and then initialized through the proxy, holding
/// 1,000,000 tokens. Alice starts with 10 native units.
pub fn proxy_fixture() -> ProxyFixture {
    let mut host = Host::new();
    let token = deploy_token(&mut host, "DEXE", 18);
    let engine = deploy_engine(&mut host);
    let proxy = UpgradeableProxy::deploy(&mut host, admin(), engine, None).unwrap();
    host.call(admin(), proxy, U256::ZERO, &Call::Initialize { target_asset: token })
        .unwrap();
    host.token_transfer(token, admin(), proxy, ether(1_000_000))
        .unwrap();
    host.mint_native(alice(), ether(10)).unwrap();

    ProxyFixture {
        host,
        token,
        engine,
        proxy,
    }
}
