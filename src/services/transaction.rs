//! Transaction service
//!
//! Provides business logic for transaction management: CRUD operations,
//! validation of the category reference, and the per-category expense
//! summary.

use chrono::Utc;

use crate::error::{TrackerError, TrackerResult};
use crate::models::transaction::{normalize_description, validate_fields};
use crate::models::{
    Category, CategoryExpenseSummary, CategoryId, CategoryType, Money, NewTransaction, Transaction,
    TransactionId, TransactionInput,
};
use crate::storage::{CategoryStore, Store, TransactionStore};

/// Service for transaction management
pub struct TransactionService<'a, S: Store> {
    storage: &'a S,
}

/// Fields shared by create and update once they have been checked
struct CheckedInput {
    category_id: CategoryId,
    description: Option<String>,
    amount: Money,
}

impl<'a, S: Store> TransactionService<'a, S> {
    /// Create a new transaction service
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    /// Create a new transaction
    ///
    /// The time defaults to now when the input leaves it empty.
    pub fn create(&self, input: TransactionInput) -> TrackerResult<Transaction> {
        let checked = Self::check_input(&input)?;

        let _guard = self.storage.exclusive()?;

        self.require_category(checked.category_id)?;

        let transaction = self.storage.transactions().insert(NewTransaction {
            category_id: checked.category_id,
            description: checked.description,
            amount: checked.amount,
            time: input.time.unwrap_or_else(Utc::now),
        })?;

        tracing::info!(
            id = %transaction.id,
            category_id = %transaction.category_id,
            amount = %transaction.amount,
            "created transaction"
        );

        Ok(transaction)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> TrackerResult<Transaction> {
        self.storage
            .transactions()
            .find_by_id(id)?
            .ok_or_else(|| TrackerError::transaction_not_found(id.to_string()))
    }

    /// List all transactions, most recent first
    ///
    /// Transactions with the same time are listed in reverse creation order.
    pub fn list(&self) -> TrackerResult<Vec<Transaction>> {
        let transactions = self.storage.transactions().find_all_ordered_by_time_desc()?;
        tracing::debug!(count = transactions.len(), "listed transactions");
        Ok(transactions)
    }

    /// Replace every field of a transaction
    ///
    /// The category is only looked up again when the id actually changes.
    pub fn update(&self, id: TransactionId, input: TransactionInput) -> TrackerResult<Transaction> {
        let _guard = self.storage.exclusive()?;

        let existing = self.get(id)?;

        let checked = Self::check_input(&input)?;
        let time = input
            .time
            .ok_or_else(|| TrackerError::validation("time", "time cannot be null"))?;

        if checked.category_id != existing.category_id {
            self.require_category(checked.category_id)?;
        }

        let transaction = self.storage.transactions().save(Transaction {
            id,
            category_id: checked.category_id,
            description: checked.description,
            amount: checked.amount,
            time,
        })?;

        tracing::info!(
            %id,
            category_id = %transaction.category_id,
            amount = %transaction.amount,
            "updated transaction"
        );

        Ok(transaction)
    }

    /// Delete a transaction, returning what was removed
    pub fn delete(&self, id: TransactionId) -> TrackerResult<Transaction> {
        let _guard = self.storage.exclusive()?;

        let transaction = self.get(id)?;
        self.storage.transactions().delete_by_id(id)?;

        tracing::info!(%id, "deleted transaction");
        Ok(transaction)
    }

    /// All transactions in a category, in store order
    pub fn list_by_category(&self, category_id: CategoryId) -> TrackerResult<Vec<Transaction>> {
        self.require_category(category_id)?;
        self.storage.transactions().find_by_category_id(category_id)
    }

    /// Total spent per expense category, largest first
    ///
    /// Every expense category gets an entry, including those with no
    /// transactions. Equal totals keep category creation order. Holds the
    /// write gate so no transaction moves between categories mid-count.
    pub fn category_expense_summary(&self) -> TrackerResult<Vec<CategoryExpenseSummary>> {
        let _guard = self.storage.exclusive()?;

        let categories = self.storage.categories().find_by_type(CategoryType::Expense)?;

        let mut summary = Vec::with_capacity(categories.len());
        for category in categories {
            let total = self
                .storage
                .transactions()
                .find_by_category_id(category.id)?
                .iter()
                .try_fold(Money::zero(), |acc, t| acc.checked_add(t.amount))
                .ok_or_else(|| {
                    TrackerError::BusinessRule(format!(
                        "Total for category '{}' is too large to represent",
                        category.name
                    ))
                })?;

            summary.push(CategoryExpenseSummary {
                category_id: category.id,
                category_name: category.name,
                total_expenses: total,
            });
        }

        summary.sort_by(|a, b| {
            b.total_expenses
                .cmp(&a.total_expenses)
                .then(a.category_id.cmp(&b.category_id))
        });

        tracing::debug!(entries = summary.len(), "computed expense summary");
        Ok(summary)
    }

    /// Resolve the category a transaction belongs to
    pub fn category_of(&self, transaction: &Transaction) -> TrackerResult<Category> {
        self.storage
            .categories()
            .find_by_id(transaction.category_id)?
            .ok_or_else(|| TrackerError::category_not_found(transaction.category_id.to_string()))
    }

    fn require_category(&self, category_id: CategoryId) -> TrackerResult<()> {
        if !self.storage.categories().exists_by_id(category_id)? {
            tracing::warn!(%category_id, "transaction references unknown category");
            return Err(TrackerError::category_not_found(category_id.to_string()));
        }
        Ok(())
    }

    fn check_input(input: &TransactionInput) -> TrackerResult<CheckedInput> {
        let category_id = input
            .category_id
            .ok_or_else(|| TrackerError::validation("category_id", "category_id cannot be null"))?;

        let description = normalize_description(input.description.clone());
        validate_fields(input.amount, description.as_deref())
            .map_err(|e| TrackerError::validation(e.field(), e.to_string()))?;

        Ok(CheckedInput {
            category_id,
            description,
            amount: input.amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TrackerPaths;
    use crate::services::CategoryService;
    use crate::storage::Storage;
    use chrono::{DateTime, Duration, TimeZone};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, d, 12, 0, 0).unwrap()
    }

    fn money(s: &str) -> Money {
        Money::parse(s).unwrap()
    }

    fn open_storage(temp_dir: &TempDir) -> Storage {
        Storage::open(TrackerPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap()
    }

    fn create_category(storage: &Storage, name: &str, category_type: CategoryType) -> Category {
        CategoryService::new(storage)
            .create(name, category_type)
            .unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let (_temp_dir, storage) = create_test_storage();
        let groceries = create_category(&storage, "Groceries", CategoryType::Expense);
        let service = TransactionService::new(&storage);

        let created = service
            .create(
                TransactionInput::new(groceries.id, money("50.00"))
                    .description("  Weekly shop ")
                    .time(day(15)),
            )
            .unwrap();

        assert_eq!(created.description.as_deref(), Some("Weekly shop"));
        assert_eq!(created.time, day(15));
        assert_eq!(service.get(created.id).unwrap(), created);
    }

    #[test]
    fn test_create_defaults_time_to_now() {
        let (_temp_dir, storage) = create_test_storage();
        let groceries = create_category(&storage, "Groceries", CategoryType::Expense);
        let service = TransactionService::new(&storage);

        let before = Utc::now();
        let created = service
            .create(TransactionInput::new(groceries.id, money("12.34")))
            .unwrap();
        let after = Utc::now();

        assert!(created.time >= before && created.time <= after);
    }

    #[test]
    fn test_create_without_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        let input = TransactionInput {
            amount: money("10.00"),
            ..TransactionInput::default()
        };
        let err = service.create(input).unwrap_err();

        assert_eq!(
            err,
            TrackerError::validation("category_id", "category_id cannot be null")
        );
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_create_with_unknown_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        let err = service
            .create(TransactionInput::new(CategoryId::generate(), money("10.00")))
            .unwrap_err();

        assert!(matches!(
            err,
            TrackerError::NotFound {
                entity: crate::error::EntityKind::Category,
                ..
            }
        ));
    }

    #[test]
    fn test_create_rejects_negative_amount() {
        let (_temp_dir, storage) = create_test_storage();
        let groceries = create_category(&storage, "Groceries", CategoryType::Expense);
        let service = TransactionService::new(&storage);

        let err = service
            .create(TransactionInput::new(groceries.id, Money::from_cents(-1)))
            .unwrap_err();
        assert!(matches!(err, TrackerError::Validation { field: "amount", .. }));

        let zero = service
            .create(TransactionInput::new(groceries.id, Money::zero()))
            .unwrap();
        assert!(zero.amount.is_zero());
    }

    #[test]
    fn test_list_is_time_descending() {
        let (_temp_dir, storage) = create_test_storage();
        let groceries = create_category(&storage, "Groceries", CategoryType::Expense);
        let service = TransactionService::new(&storage);

        for d in [10, 25, 3, 17] {
            service
                .create(TransactionInput::new(groceries.id, money("1.00")).time(day(d)))
                .unwrap();
        }

        let times: Vec<_> = service.list().unwrap().iter().map(|t| t.time).collect();
        assert_eq!(times, vec![day(25), day(17), day(10), day(3)]);
    }

    #[test]
    fn test_update_replaces_fields() {
        let (_temp_dir, storage) = create_test_storage();
        let groceries = create_category(&storage, "Groceries", CategoryType::Expense);
        let rent = create_category(&storage, "Rent", CategoryType::Expense);
        let service = TransactionService::new(&storage);

        let txn = service
            .create(
                TransactionInput::new(groceries.id, money("50.00"))
                    .description("Shop")
                    .time(day(1)),
            )
            .unwrap();

        let updated = service
            .update(
                txn.id,
                TransactionInput::new(rent.id, money("900.00")).time(day(2)),
            )
            .unwrap();

        assert_eq!(updated.id, txn.id);
        assert_eq!(updated.category_id, rent.id);
        assert_eq!(updated.description, None);
        assert_eq!(updated.amount, money("900.00"));
        assert_eq!(service.get(txn.id).unwrap(), updated);
    }

    #[test]
    fn test_update_with_unchanged_category_does_not_look_it_up() {
        let (_temp_dir, storage) = create_test_storage();
        let groceries = create_category(&storage, "Groceries", CategoryType::Expense);
        let service = TransactionService::new(&storage);

        let txn = service
            .create(TransactionInput::new(groceries.id, money("50.00")).time(day(1)))
            .unwrap();

        // Leave the transaction dangling by going around the service
        storage.categories.delete_by_id(groceries.id).unwrap();

        // An equal id parsed from text is a different value instance
        let same_id: CategoryId = groceries.id.to_string().parse().unwrap();
        let updated = service
            .update(txn.id, TransactionInput::new(same_id, money("60.00")).time(day(1)))
            .unwrap();
        assert_eq!(updated.amount, money("60.00"));
    }

    #[test]
    fn test_update_to_unknown_category() {
        let (_temp_dir, storage) = create_test_storage();
        let groceries = create_category(&storage, "Groceries", CategoryType::Expense);
        let service = TransactionService::new(&storage);

        let txn = service
            .create(TransactionInput::new(groceries.id, money("50.00")).time(day(1)))
            .unwrap();

        let err = service
            .update(
                txn.id,
                TransactionInput::new(CategoryId::generate(), money("50.00")).time(day(1)),
            )
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(service.get(txn.id).unwrap(), txn);
    }

    #[test]
    fn test_update_requires_category_and_time() {
        let (_temp_dir, storage) = create_test_storage();
        let groceries = create_category(&storage, "Groceries", CategoryType::Expense);
        let service = TransactionService::new(&storage);

        let txn = service
            .create(TransactionInput::new(groceries.id, money("50.00")))
            .unwrap();

        let no_category = TransactionInput {
            amount: money("50.00"),
            time: Some(day(1)),
            ..TransactionInput::default()
        };
        let err = service.update(txn.id, no_category).unwrap_err();
        assert!(matches!(err, TrackerError::Validation { field: "category_id", .. }));

        let no_time = TransactionInput::new(groceries.id, money("50.00"));
        let err = service.update(txn.id, no_time).unwrap_err();
        assert!(matches!(err, TrackerError::Validation { field: "time", .. }));
    }

    #[test]
    fn test_update_missing() {
        let (_temp_dir, storage) = create_test_storage();
        let groceries = create_category(&storage, "Groceries", CategoryType::Expense);
        let service = TransactionService::new(&storage);

        let err = service
            .update(
                TransactionId::generate(),
                TransactionInput::new(groceries.id, money("1.00")).time(day(1)),
            )
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, storage) = create_test_storage();
        let groceries = create_category(&storage, "Groceries", CategoryType::Expense);
        let service = TransactionService::new(&storage);

        let txn = service
            .create(TransactionInput::new(groceries.id, money("50.00")))
            .unwrap();

        let removed = service.delete(txn.id).unwrap();
        assert_eq!(removed, txn);
        assert!(service.get(txn.id).unwrap_err().is_not_found());
        assert!(service.delete(txn.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_by_category() {
        let (_temp_dir, storage) = create_test_storage();
        let groceries = create_category(&storage, "Groceries", CategoryType::Expense);
        let rent = create_category(&storage, "Rent", CategoryType::Expense);
        let service = TransactionService::new(&storage);

        service
            .create(TransactionInput::new(groceries.id, money("50.00")))
            .unwrap();
        service
            .create(TransactionInput::new(groceries.id, money("30.00")))
            .unwrap();
        service
            .create(TransactionInput::new(rent.id, money("1000.00")))
            .unwrap();

        let txns = service.list_by_category(groceries.id).unwrap();
        assert_eq!(txns.len(), 2);
        assert!(txns.iter().all(|t| t.category_id == groceries.id));

        let err = service.list_by_category(CategoryId::generate()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_category_of() {
        let (_temp_dir, storage) = create_test_storage();
        let rent = create_category(&storage, "Rent", CategoryType::Expense);
        let service = TransactionService::new(&storage);

        let txn = service
            .create(TransactionInput::new(rent.id, money("1000.00")))
            .unwrap();
        assert_eq!(service.category_of(&txn).unwrap(), rent);
    }

    #[test]
    fn test_expense_summary_scenario() {
        let (_temp_dir, storage) = create_test_storage();
        create_category(&storage, "Salary", CategoryType::Income);
        let groceries = create_category(&storage, "Groceries", CategoryType::Expense);
        let rent = create_category(&storage, "Rent", CategoryType::Expense);
        let service = TransactionService::new(&storage);

        service
            .create(TransactionInput::new(groceries.id, money("50.00")))
            .unwrap();
        service
            .create(TransactionInput::new(groceries.id, money("30.00")))
            .unwrap();
        service
            .create(TransactionInput::new(rent.id, money("1000.00")))
            .unwrap();

        let summary = service.category_expense_summary().unwrap();
        assert_eq!(
            summary,
            vec![
                CategoryExpenseSummary {
                    category_id: rent.id,
                    category_name: "Rent".into(),
                    total_expenses: money("1000.00"),
                },
                CategoryExpenseSummary {
                    category_id: groceries.id,
                    category_name: "Groceries".into(),
                    total_expenses: money("80.00"),
                },
            ]
        );
    }

    #[test]
    fn test_expense_summary_includes_empty_categories() {
        let (_temp_dir, storage) = create_test_storage();
        let utilities = create_category(&storage, "Utilities", CategoryType::Expense);
        let travel = create_category(&storage, "Travel", CategoryType::Expense);
        let dining = create_category(&storage, "Dining", CategoryType::Expense);
        let service = TransactionService::new(&storage);

        service
            .create(TransactionInput::new(dining.id, money("0.01")))
            .unwrap();

        let summary = service.category_expense_summary().unwrap();
        let ids: Vec<_> = summary.iter().map(|s| s.category_id).collect();

        // Equal zero totals fall back to creation order
        assert_eq!(ids, vec![dining.id, utilities.id, travel.id]);
        assert!(summary[1].total_expenses.is_zero());
        assert!(summary[2].total_expenses.is_zero());
    }

    #[test]
    fn test_expense_summary_totals_match_transactions() {
        let (_temp_dir, storage) = create_test_storage();
        let salary = create_category(&storage, "Salary", CategoryType::Income);
        let groceries = create_category(&storage, "Groceries", CategoryType::Expense);
        let rent = create_category(&storage, "Rent", CategoryType::Expense);
        let service = TransactionService::new(&storage);

        let start = day(1);
        for i in 0..20i64 {
            let category = [salary.id, groceries.id, rent.id][(i % 3) as usize];
            service
                .create(
                    TransactionInput::new(category, Money::from_cents(i * 137 + 1))
                        .time(start + Duration::hours(i)),
                )
                .unwrap();
        }

        let summary = service.category_expense_summary().unwrap();
        assert_eq!(summary.len(), 2);
        assert!(summary
            .windows(2)
            .all(|w| w[0].total_expenses >= w[1].total_expenses));

        let all = service.list().unwrap();
        for entry in &summary {
            let expected: Money = all
                .iter()
                .filter(|t| t.category_id == entry.category_id)
                .map(|t| t.amount)
                .sum();
            assert_eq!(entry.total_expenses, expected);
        }
    }

    #[test]
    fn test_create_sees_category_deleted_by_other_instance() {
        let (temp_dir, storage) = create_test_storage();
        let other = open_storage(&temp_dir);
        let rent = create_category(&storage, "Rent", CategoryType::Expense);
        other.load_all().unwrap();

        CategoryService::new(&storage).delete(rent.id).unwrap();

        let err = TransactionService::new(&other)
            .create(TransactionInput::new(rent.id, money("1000.00")))
            .unwrap_err();
        assert!(err.is_not_found());

        let reopened = open_storage(&temp_dir);
        assert_eq!(reopened.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_delete_sees_transaction_added_by_other_instance() {
        let (temp_dir, storage) = create_test_storage();
        let other = open_storage(&temp_dir);
        let rent = create_category(&storage, "Rent", CategoryType::Expense);

        TransactionService::new(&other)
            .create(TransactionInput::new(rent.id, money("1000.00")))
            .unwrap();

        let err = CategoryService::new(&storage).delete(rent.id).unwrap_err();
        assert!(matches!(err, TrackerError::BusinessRule(_)));

        let reopened = open_storage(&temp_dir);
        let txn = &reopened.transactions.find_all().unwrap()[0];
        assert_eq!(
            TransactionService::new(&reopened).category_of(txn).unwrap(),
            rent
        );
    }

    #[test]
    fn test_instances_do_not_overwrite_each_other() {
        let (temp_dir, storage) = create_test_storage();
        let other = open_storage(&temp_dir);

        create_category(&storage, "Rent", CategoryType::Expense);
        create_category(&other, "Groceries", CategoryType::Expense);

        let err = CategoryService::new(&other)
            .create("rent", CategoryType::Expense)
            .unwrap_err();
        assert!(matches!(err, TrackerError::DuplicateName(_)));

        let reopened = open_storage(&temp_dir);
        assert_eq!(reopened.categories.count().unwrap(), 2);
    }

    #[test]
    fn test_expense_summary_reads_current_state() {
        let (temp_dir, storage) = create_test_storage();
        let other = open_storage(&temp_dir);
        let rent = create_category(&storage, "Rent", CategoryType::Expense);

        TransactionService::new(&other)
            .create(TransactionInput::new(rent.id, money("1000.00")))
            .unwrap();

        let summary = TransactionService::new(&storage)
            .category_expense_summary()
            .unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].total_expenses, money("1000.00"));
    }
}
