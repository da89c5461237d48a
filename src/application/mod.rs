//! Application layer: the host the contracts execute in, the exchange engine and the
//! upgradeable proxy in front of it.
//!
//! Contracts implement [`host::Contract`] and keep no state of their own; the
//! [`host::Host`] owns balances and storage and reverts any call that fails.

pub mod deployment;
pub mod engine;
pub mod guard;
pub mod host;
pub mod proxy;
pub mod registry;
pub mod session;
