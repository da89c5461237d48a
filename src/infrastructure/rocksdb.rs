use crate::domain::ports::StateStore;
use crate::domain::snapshot::{
    AccountRecord, Checkpoint, ContractRecord, Deployment, HostSnapshot, TokenRecord,
};
use crate::error::{Result, SwapperError};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, IteratorMode, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

/// Column Family for native balances and nonces.
pub const CF_ACCOUNTS: &str = "accounts";
/// Column Family for contract code ids and storage slots.
pub const CF_CONTRACTS: &str = "contracts";
/// Column Family for token ledgers.
pub const CF_TOKENS: &str = "tokens";
/// Column Family holding the single deployment record.
pub const CF_DEPLOYMENT: &str = "deployment";

const DEPLOYMENT_KEY: &[u8] = b"current";

/// A persistent checkpoint store implementation using RocksDB.
///
/// Accounts, contracts and tokens are kept in separate Column Families keyed by
/// address, with JSON values. A checkpoint is written in one atomic batch.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let families = [CF_ACCOUNTS, CF_CONTRACTS, CF_TOKENS, CF_DEPLOYMENT]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()));

        let db = DB::open_cf_descriptors(&opts, path, families)?;

        Ok(Self { db: Arc::new(db) })
    }

    fn column_family(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            SwapperError::InternalError(Box::new(std::io::Error::other(format!(
                "Column family `{name}` not found"
            ))))
        })
    }

    fn put_all<T: Serialize>(
        &self,
        batch: &mut WriteBatch,
        name: &str,
        records: &[T],
        key: impl Fn(&T) -> Vec<u8>,
    ) -> Result<()> {
        let cf = self.column_family(name)?;
        for record in records {
            batch.put_cf(cf, key(record), serde_json::to_vec(record)?);
        }
        Ok(())
    }

    fn read_all<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        let cf = self.column_family(name)?;
        let mut records = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            records.push(serde_json::from_slice(&value)?);
        }
        Ok(records)
    }
}

#[async_trait]
impl StateStore for RocksDBStore {
    async fn save(&self, checkpoint: Checkpoint) -> Result<()> {
        let mut batch = WriteBatch::default();

        self.put_all(&mut batch, CF_ACCOUNTS, &checkpoint.host.accounts, |record: &AccountRecord| {
            record.address.to_vec()
        })?;
        self.put_all(&mut batch, CF_CONTRACTS, &checkpoint.host.contracts, |record: &ContractRecord| {
            record.address.to_vec()
        })?;
        self.put_all(&mut batch, CF_TOKENS, &checkpoint.host.tokens, |record: &TokenRecord| {
            record.address.to_vec()
        })?;

        let cf = self.column_family(CF_DEPLOYMENT)?;
        batch.put_cf(cf, DEPLOYMENT_KEY, serde_json::to_vec(&checkpoint.deployment)?);

        self.db.write(batch)?;
        Ok(())
    }

    async fn load(&self) -> Result<Option<Checkpoint>> {
        let cf = self.column_family(CF_DEPLOYMENT)?;
        let Some(bytes) = self.db.get_cf(cf, DEPLOYMENT_KEY)? else {
            return Ok(None);
        };
        let deployment: Deployment = serde_json::from_slice(&bytes)?;

        let host = HostSnapshot {
            accounts: self.read_all(CF_ACCOUNTS)?,
            contracts: self.read_all(CF_CONTRACTS)?,
            tokens: self.read_all(CF_TOKENS)?,
        };

        Ok(Some(Checkpoint { deployment, host }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256};
    use tempfile::tempdir;

    fn checkpoint() -> Checkpoint {
        let holder = Address::repeat_byte(0x01);
        Checkpoint {
            deployment: Deployment {
                deployer: holder,
                token: Address::repeat_byte(0x02),
                implementation: Address::repeat_byte(0x03),
                proxy: Address::repeat_byte(0x04),
            },
            host: HostSnapshot {
                accounts: vec![AccountRecord {
                    address: holder,
                    native: U256::from(5u64),
                    nonce: 3,
                }],
                contracts: vec![ContractRecord {
                    address: Address::repeat_byte(0x04),
                    code_id: "upgradeable-proxy".to_string(),
                    slots: vec![(U256::from(3u64), U256::from(2000u64))],
                }],
                tokens: vec![TokenRecord {
                    address: Address::repeat_byte(0x02),
                    symbol: "DEXE".to_string(),
                    decimals: 18,
                    balances: vec![(holder, U256::from(7u64))],
                }],
            },
        }
    }

    #[tokio::test]
    async fn test_rocksdb_checkpoint_round_trip() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();

        assert!(store.load().await.unwrap().is_none());

        store.save(checkpoint()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(checkpoint()));
    }

    #[tokio::test]
    async fn test_rocksdb_checkpoint_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = RocksDBStore::open(dir.path()).unwrap();
            store.save(checkpoint()).await.unwrap();
        }

        let store = RocksDBStore::open(dir.path()).unwrap();
        assert_eq!(store.load().await.unwrap(), Some(checkpoint()));
    }
}
