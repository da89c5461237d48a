//! Adapters for the domain ports: the in-memory token ledger and checkpoint stores.

pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod token;
