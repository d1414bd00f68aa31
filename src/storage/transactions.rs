//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json, with a
//! category index so reference checks do not scan every transaction.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{TrackerError, TrackerResult};
use crate::models::{CategoryId, NewTransaction, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};
use super::TransactionStore;

/// Serializable transaction data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Transactions plus the category index, swapped as one unit
#[derive(Debug, Clone, Default)]
struct TransactionTable {
    data: HashMap<TransactionId, Transaction>,
    /// Index: category_id -> transaction_ids, in insertion order
    by_category: HashMap<CategoryId, Vec<TransactionId>>,
}

impl TransactionTable {
    fn insert(&mut self, txn: Transaction) {
        if let Some(old) = self.data.get(&txn.id) {
            if old.category_id != txn.category_id {
                self.unindex(old.category_id, txn.id);
                self.by_category.entry(txn.category_id).or_default().push(txn.id);
            }
        } else {
            self.by_category.entry(txn.category_id).or_default().push(txn.id);
        }
        self.data.insert(txn.id, txn);
    }

    fn remove(&mut self, id: TransactionId) -> Option<Transaction> {
        let txn = self.data.remove(&id)?;
        self.unindex(txn.category_id, id);
        Some(txn)
    }

    fn unindex(&mut self, category_id: CategoryId, id: TransactionId) {
        if let Some(ids) = self.by_category.get_mut(&category_id) {
            ids.retain(|&tid| tid != id);
            if ids.is_empty() {
                self.by_category.remove(&category_id);
            }
        }
    }
}

/// Repository for transaction persistence with indexing
pub struct TransactionRepository {
    path: PathBuf,
    table: RwLock<TransactionTable>,
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            table: RwLock::new(TransactionTable::default()),
        }
    }

    /// Load transactions from disk and build indexes
    pub fn load(&self) -> Result<(), TrackerError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut rebuilt = TransactionTable::default();
        for txn in file_data.transactions {
            rebuilt.insert(txn);
        }

        *self.write()? = rebuilt;
        Ok(())
    }

    /// Count transactions
    pub fn count(&self) -> Result<usize, TrackerError> {
        Ok(self.read()?.data.len())
    }

    fn read(&self) -> TrackerResult<RwLockReadGuard<'_, TransactionTable>> {
        self.table
            .read()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> TrackerResult<RwLockWriteGuard<'_, TransactionTable>> {
        self.table
            .write()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Write `next` to disk, then make it the live state
    fn commit(&self, live: &mut TransactionTable, next: TransactionTable) -> TrackerResult<()> {
        let mut transactions: Vec<_> = next.data.values().cloned().collect();
        transactions.sort_by_key(|t| t.id);

        write_json_atomic(&self.path, &TransactionData { transactions })?;
        *live = next;
        Ok(())
    }
}

impl TransactionStore for TransactionRepository {
    fn find_by_id(&self, id: TransactionId) -> TrackerResult<Option<Transaction>> {
        Ok(self.read()?.data.get(&id).cloned())
    }

    fn find_by_category_id(&self, category_id: CategoryId) -> TrackerResult<Vec<Transaction>> {
        let table = self.read()?;
        let ids = table
            .by_category
            .get(&category_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[]);

        Ok(ids
            .iter()
            .filter_map(|id| table.data.get(id).cloned())
            .collect())
    }

    fn exists_by_category_id(&self, category_id: CategoryId) -> TrackerResult<bool> {
        Ok(self
            .read()?
            .by_category
            .get(&category_id)
            .is_some_and(|ids| !ids.is_empty()))
    }

    fn find_all(&self) -> TrackerResult<Vec<Transaction>> {
        let mut transactions: Vec<_> = self.read()?.data.values().cloned().collect();
        transactions.sort_by_key(|t| t.id);
        Ok(transactions)
    }

    fn find_all_ordered_by_time_desc(&self) -> TrackerResult<Vec<Transaction>> {
        let mut transactions: Vec<_> = self.read()?.data.values().cloned().collect();
        // Equal times: later-created first
        transactions.sort_by(|a, b| b.time.cmp(&a.time).then(b.id.cmp(&a.id)));
        Ok(transactions)
    }

    fn insert(&self, transaction: NewTransaction) -> TrackerResult<Transaction> {
        let txn = Transaction::from_new(TransactionId::generate(), transaction);

        let mut table = self.write()?;
        let mut next = table.clone();
        next.insert(txn.clone());
        self.commit(&mut table, next)?;

        Ok(txn)
    }

    fn save(&self, transaction: Transaction) -> TrackerResult<Transaction> {
        let mut table = self.write()?;
        let mut next = table.clone();
        next.insert(transaction.clone());
        self.commit(&mut table, next)?;

        Ok(transaction)
    }

    fn delete_by_id(&self, id: TransactionId) -> TrackerResult<bool> {
        let mut table = self.write()?;
        let mut next = table.clone();
        if next.remove(id).is_none() {
            return Ok(false);
        }
        self.commit(&mut table, next)?;

        Ok(true)
    }
}
