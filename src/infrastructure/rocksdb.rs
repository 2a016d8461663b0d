use crate::domain::ports::TransactionLedger;
use crate::domain::transaction::{ExchangeTransaction, NewTransaction};
use crate::error::{ExchangeError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing exchange transactions.
pub const CF_TRANSACTIONS: &str = "transactions";

/// A persistent transaction ledger backed by RocksDB.
///
/// Records live in their own column family, keyed by the big-endian id so
/// iteration returns them in id order. The last assigned id is recovered
/// from the final key when the database is opened.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBLedger {
    db: Arc<DB>,
    last_id: Arc<Mutex<u64>>,
}

impl RocksDBLedger {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_transactions = ColumnFamilyDescriptor::new(CF_TRANSACTIONS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_transactions])?;

        let last_id = {
            let cf = column_family(&db)?;
            match db.iterator_cf(cf, IteratorMode::End).next() {
                Some(item) => {
                    let (key, _value) = item?;
                    decode_key(&key)?
                }
                None => 0,
            }
        };

        Ok(Self {
            db: Arc::new(db),
            last_id: Arc::new(Mutex::new(last_id)),
        })
    }
}

fn column_family(db: &DB) -> Result<&rocksdb::ColumnFamily> {
    db.cf_handle(CF_TRANSACTIONS).ok_or_else(|| {
        ExchangeError::Storage("Transactions column family not found".to_string())
    })
}

fn decode_key(key: &[u8]) -> Result<u64> {
    let bytes: [u8; 8] = key
        .try_into()
        .map_err(|_| ExchangeError::Storage(format!("Malformed transaction key: {:?}", key)))?;
    Ok(u64::from_be_bytes(bytes))
}

#[async_trait]
impl TransactionLedger for RocksDBLedger {
    async fn append(&self, tx: NewTransaction) -> Result<ExchangeTransaction> {
        // held until the put lands so a failed write does not burn an id
        let mut last_id = self.last_id.lock().await;
        let id = *last_id + 1;
        let record = tx.with_id(id);

        let cf = column_family(&self.db)?;
        let value = serde_json::to_vec(&record)?;
        self.db.put_cf(cf, id.to_be_bytes(), value)?;

        *last_id = id;
        Ok(record)
    }

    async fn all(&self) -> Result<Vec<ExchangeTransaction>> {
        let cf = column_family(&self.db)?;

        let mut transactions = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            let tx: ExchangeTransaction = serde_json::from_slice(&value)?;
            transactions.push(tx);
        }

        Ok(transactions)
    }
}
