//! Domain types: call selectors, the storage schema, token and persistence ports.

pub mod call;
pub mod ports;
pub mod snapshot;
pub mod state;
pub mod units;
