//! Storage layer for fintrack
//!
//! The services only ever see the [`CategoryStore`] and [`TransactionStore`]
//! contracts, reached through a [`Store`]. [`Storage`] is the JSON-file
//! implementation used by the binary and the tests.

pub mod categories;
pub mod file_io;
pub mod transactions;

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub use categories::CategoryRepository;
pub use file_io::{read_json, write_json_atomic};
pub use transactions::TransactionRepository;

use crate::config::paths::TrackerPaths;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{
    Category, CategoryId, CategoryType, NewCategory, NewTransaction, Transaction, TransactionId,
};

/// Persistence contract for categories
pub trait CategoryStore {
    /// Look up a category by id
    fn find_by_id(&self, id: CategoryId) -> TrackerResult<Option<Category>>;

    /// Look up a category by name, compared trimmed and case-insensitively
    fn find_by_name(&self, name: &str) -> TrackerResult<Option<Category>>;

    /// All categories of one type
    fn find_by_type(&self, category_type: CategoryType) -> TrackerResult<Vec<Category>>;

    /// All categories, in store order
    fn find_all(&self) -> TrackerResult<Vec<Category>>;

    /// Store a new category and assign its id
    fn insert(&self, category: NewCategory) -> TrackerResult<Category>;

    /// Insert or replace the category with this id
    fn save(&self, category: Category) -> TrackerResult<Category>;

    /// Remove a category. Returns whether anything was removed.
    fn delete_by_id(&self, id: CategoryId) -> TrackerResult<bool>;

    fn exists_by_id(&self, id: CategoryId) -> TrackerResult<bool> {
        Ok(self.find_by_id(id)?.is_some())
    }
}

/// Persistence contract for transactions
pub trait TransactionStore {
    /// Look up a transaction by id
    fn find_by_id(&self, id: TransactionId) -> TrackerResult<Option<Transaction>>;

    /// Transactions referencing a category, in store order
    fn find_by_category_id(&self, category_id: CategoryId) -> TrackerResult<Vec<Transaction>>;

    /// Whether any transaction references the category
    fn exists_by_category_id(&self, category_id: CategoryId) -> TrackerResult<bool>;

    /// All transactions, in store order
    fn find_all(&self) -> TrackerResult<Vec<Transaction>>;

    /// All transactions, most recent first
    fn find_all_ordered_by_time_desc(&self) -> TrackerResult<Vec<Transaction>>;

    /// Store a new transaction and assign its id
    fn insert(&self, transaction: NewTransaction) -> TrackerResult<Transaction>;

    /// Insert or replace the transaction with this id
    fn save(&self, transaction: Transaction) -> TrackerResult<Transaction>;

    /// Remove a transaction. Returns whether anything was removed.
    fn delete_by_id(&self, id: TransactionId) -> TrackerResult<bool>;

    fn exists_by_id(&self, id: TransactionId) -> TrackerResult<bool> {
        Ok(self.find_by_id(id)?.is_some())
    }
}

/// Held for the duration of a check-then-act sequence
///
/// Holds the in-process gate and an exclusive lock on the data directory's
/// lock file, so writers in other processes wait as well. Dropping it
/// releases the file lock first, then the gate.
pub struct WriteGuard<'a> {
    _lock_file: File,
    _gate: MutexGuard<'a, ()>,
}

/// Both stores plus the gate that serializes writers
///
/// Mutating service calls hold [`Store::exclusive`] from their first check to
/// their last write, so two writers never interleave. Plain reads never take
/// it; the expense summary does, to see one consistent state.
pub trait Store {
    type Categories: CategoryStore;
    type Transactions: TransactionStore;

    fn categories(&self) -> &Self::Categories;

    fn transactions(&self) -> &Self::Transactions;

    /// Block until no other writer is active, in this process or another,
    /// and bring the stores up to date with what is on disk
    fn exclusive(&self) -> TrackerResult<WriteGuard<'_>>;
}

/// JSON-file storage holding both repositories
pub struct Storage {
    paths: TrackerPaths,
    pub categories: CategoryRepository,
    pub transactions: TransactionRepository,
    write_gate: Mutex<()>,
}

impl Storage {
    /// Create a new Storage instance, creating the data directory if needed
    pub fn new(paths: TrackerPaths) -> Result<Self, TrackerError> {
        paths.ensure_directories()?;

        Ok(Self {
            categories: CategoryRepository::new(paths.categories_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            write_gate: Mutex::new(()),
            paths,
        })
    }

    /// Create storage and load everything already on disk
    pub fn open(paths: TrackerPaths) -> Result<Self, TrackerError> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), TrackerError> {
        self.categories.load()?;
        self.transactions.load()?;
        tracing::debug!(
            data_dir = %self.paths.data_dir().display(),
            categories = self.categories.count()?,
            transactions = self.transactions.count()?,
            "loaded storage"
        );
        Ok(())
    }
}

impl Store for Storage {
    type Categories = CategoryRepository;
    type Transactions = TransactionRepository;

    fn categories(&self) -> &CategoryRepository {
        &self.categories
    }

    fn transactions(&self) -> &TransactionRepository {
        &self.transactions
    }

    fn exclusive(&self) -> TrackerResult<WriteGuard<'_>> {
        let gate = self
            .write_gate
            .lock()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire write gate: {}", e)))?;
        let lock_file = lock_exclusive(&self.paths.lock_file())?;

        // Another process may have committed since this one last loaded
        self.load_all()?;

        Ok(WriteGuard {
            _lock_file: lock_file,
            _gate: gate,
        })
    }
}

/// Open the lock file and block until this process holds it exclusively.
/// The OS releases the lock when the file is closed, including on a crash.
fn lock_exclusive(path: &Path) -> TrackerResult<File> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(path)
        .map_err(|e| {
            TrackerError::Storage(format!(
                "Failed to open lock file {}: {}",
                path.display(),
                e
            ))
        })?;

    file.lock().map_err(|e| {
        TrackerError::Storage(format!("Failed to lock {}: {}", path.display(), e))
    })?;

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::Utc;
    use std::sync::mpsc;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert_eq!(storage.categories.count().unwrap(), 0);
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_reopen_sees_written_data() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let category_id = {
            let storage = Storage::open(paths.clone()).unwrap();
            let category = storage
                .categories
                .insert(NewCategory::new("Rent", CategoryType::Expense))
                .unwrap();
            storage
                .transactions
                .insert(NewTransaction {
                    category_id: category.id,
                    description: None,
                    amount: Money::from_cents(100_000),
                    time: Utc::now(),
                })
                .unwrap();
            category.id
        };

        let storage = Storage::open(paths).unwrap();
        assert!(storage.categories.exists_by_id(category_id).unwrap());
        assert!(storage.transactions.exists_by_category_id(category_id).unwrap());
    }

    #[test]
    fn test_exclusive_gate_released_on_drop() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();

        drop(storage.exclusive().unwrap());
        let _guard = storage.exclusive().unwrap();
        assert!(temp_dir.path().join("data").join(".fintrack.lock").exists());
    }

    #[test]
    fn test_exclusive_reloads_writes_from_other_instance() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let first = Storage::open(paths.clone()).unwrap();
        let second = Storage::open(paths).unwrap();

        first
            .categories
            .insert(NewCategory::new("Rent", CategoryType::Expense))
            .unwrap();
        assert!(second.categories.find_by_name("Rent").unwrap().is_none());

        let _guard = second.exclusive().unwrap();
        assert!(second.categories.find_by_name("Rent").unwrap().is_some());
    }

    #[test]
    fn test_exclusive_blocks_other_instance() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let first = Storage::open(paths.clone()).unwrap();
        let second = Storage::open(paths).unwrap();

        let guard = first.exclusive().unwrap();
        let (tx, rx) = mpsc::channel();

        std::thread::scope(|scope| {
            scope.spawn(move || {
                let _guard = second.exclusive().unwrap();
                tx.send(()).unwrap();
            });

            assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
            drop(guard);
            assert!(rx.recv_timeout(Duration::from_secs(10)).is_ok());
        });
    }
}
