//! Category repository for JSON storage
//!
//! Manages loading and saving categories to categories.json. Names are kept
//! unique here as well as in the service, so a caller going straight to the
//! repository cannot create a duplicate either.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{TrackerError, TrackerResult};
use crate::models::category::name_key;
use crate::models::{Category, CategoryId, CategoryType, NewCategory};

use super::file_io::{read_json, write_json_atomic};
use super::CategoryStore;

/// Serializable category data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CategoryData {
    categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    data: RwLock<HashMap<CategoryId, Category>>,
}

impl CategoryRepository {
    /// Create a new category repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load categories from disk
    pub fn load(&self) -> Result<(), TrackerError> {
        let file_data: CategoryData = read_json(&self.path)?;
        let mut data = self.write()?;

        data.clear();
        for category in file_data.categories {
            data.insert(category.id, category);
        }

        Ok(())
    }

    /// Count categories
    pub fn count(&self) -> Result<usize, TrackerError> {
        Ok(self.read()?.len())
    }

    fn read(&self) -> TrackerResult<RwLockReadGuard<'_, HashMap<CategoryId, Category>>> {
        self.data
            .read()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> TrackerResult<RwLockWriteGuard<'_, HashMap<CategoryId, Category>>> {
        self.data
            .write()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Write `next` to disk, then make it the live state
    fn commit(
        &self,
        live: &mut HashMap<CategoryId, Category>,
        next: HashMap<CategoryId, Category>,
    ) -> TrackerResult<()> {
        let mut categories: Vec<_> = next.values().cloned().collect();
        categories.sort_by_key(|c| c.id);

        write_json_atomic(&self.path, &CategoryData { categories })?;
        *live = next;
        Ok(())
    }

    fn ensure_unique(
        data: &HashMap<CategoryId, Category>,
        name: &str,
        except: Option<CategoryId>,
    ) -> TrackerResult<()> {
        let key = name_key(name);
        let taken = data
            .values()
            .any(|c| Some(c.id) != except && name_key(&c.name) == key);

        if taken {
            return Err(TrackerError::DuplicateName(name.trim().to_string()));
        }
        Ok(())
    }

    fn sorted(mut categories: Vec<Category>) -> Vec<Category> {
        categories.sort_by(|a, b| name_key(&a.name).cmp(&name_key(&b.name)).then(a.id.cmp(&b.id)));
        categories
    }
}

impl CategoryStore for CategoryRepository {
    fn find_by_id(&self, id: CategoryId) -> TrackerResult<Option<Category>> {
        Ok(self.read()?.get(&id).cloned())
    }

    fn find_by_name(&self, name: &str) -> TrackerResult<Option<Category>> {
        let key = name_key(name);
        Ok(self
            .read()?
            .values()
            .find(|c| name_key(&c.name) == key)
            .cloned())
    }

    fn find_by_type(&self, category_type: CategoryType) -> TrackerResult<Vec<Category>> {
        let categories = self
            .read()?
            .values()
            .filter(|c| c.category_type == category_type)
            .cloned()
            .collect();
        Ok(Self::sorted(categories))
    }

    fn find_all(&self) -> TrackerResult<Vec<Category>> {
        let categories = self.read()?.values().cloned().collect();
        Ok(Self::sorted(categories))
    }

    fn insert(&self, category: NewCategory) -> TrackerResult<Category> {
        let mut data = self.write()?;
        Self::ensure_unique(&data, &category.name, None)?;

        let category = Category::from_new(CategoryId::generate(), category);
        let mut next = data.clone();
        next.insert(category.id, category.clone());
        self.commit(&mut data, next)?;

        Ok(category)
    }

    fn save(&self, category: Category) -> TrackerResult<Category> {
        let mut data = self.write()?;
        Self::ensure_unique(&data, &category.name, Some(category.id))?;

        let mut next = data.clone();
        next.insert(category.id, category.clone());
        self.commit(&mut data, next)?;

        Ok(category)
    }

    fn delete_by_id(&self, id: CategoryId) -> TrackerResult<bool> {
        let mut data = self.write()?;
        if !data.contains_key(&id) {
            return Ok(false);
        }

        let mut next = data.clone();
        next.remove(&id);
        self.commit(&mut data, next)?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, CategoryRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("categories.json");
        let repo = CategoryRepository::new(path);
        repo.load().unwrap();
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        assert_eq!(repo.count().unwrap(), 0);
        assert!(repo.find_all().unwrap().is_empty());
    }

    #[test]
    fn test_insert_assigns_id() {
        let (_temp_dir, repo) = create_test_repo();

        let rent = repo
            .insert(NewCategory::new("Rent", CategoryType::Expense))
            .unwrap();
        let salary = repo
            .insert(NewCategory::new("Salary", CategoryType::Income))
            .unwrap();

        assert_ne!(rent.id, salary.id);
        assert_eq!(repo.find_by_id(rent.id).unwrap(), Some(rent));
    }

    #[test]
    fn test_find_by_name_is_case_insensitive() {
        let (_temp_dir, repo) = create_test_repo();
        let groceries = repo
            .insert(NewCategory::new("Groceries", CategoryType::Expense))
            .unwrap();

        let found = repo.find_by_name("  groceries ").unwrap().unwrap();
        assert_eq!(found.id, groceries.id);
        assert!(repo.find_by_name("Grocery").unwrap().is_none());
    }

    #[test]
    fn test_find_by_type() {
        let (_temp_dir, repo) = create_test_repo();
        repo.insert(NewCategory::new("Salary", CategoryType::Income))
            .unwrap();
        repo.insert(NewCategory::new("Rent", CategoryType::Expense))
            .unwrap();
        repo.insert(NewCategory::new("Groceries", CategoryType::Expense))
            .unwrap();

        let expenses = repo.find_by_type(CategoryType::Expense).unwrap();
        let names: Vec<_> = expenses.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Groceries", "Rent"]);
    }

    #[test]
    fn test_store_rejects_duplicate_names() {
        let (_temp_dir, repo) = create_test_repo();
        let rent = repo
            .insert(NewCategory::new("Rent", CategoryType::Expense))
            .unwrap();
        let salary = repo
            .insert(NewCategory::new("Salary", CategoryType::Income))
            .unwrap();

        let result = repo.insert(NewCategory::new("RENT", CategoryType::Income));
        assert_eq!(result, Err(TrackerError::DuplicateName("RENT".into())));

        let mut renamed = salary.clone();
        renamed.name = "rent".into();
        assert!(matches!(
            repo.save(renamed),
            Err(TrackerError::DuplicateName(_))
        ));

        // Saving a record under its own name is not a collision
        assert!(repo.save(rent).is_ok());
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let mut rent = repo
            .insert(NewCategory::new("Rent", CategoryType::Expense))
            .unwrap();
        rent.name = "Housing".into();
        repo.save(rent.clone()).unwrap();

        let repo2 = CategoryRepository::new(temp_dir.path().join("categories.json"));
        repo2.load().unwrap();

        assert_eq!(repo2.count().unwrap(), 1);
        assert_eq!(repo2.find_by_id(rent.id).unwrap(), Some(rent));
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let rent = repo
            .insert(NewCategory::new("Rent", CategoryType::Expense))
            .unwrap();

        assert!(repo.delete_by_id(rent.id).unwrap());
        assert!(!repo.exists_by_id(rent.id).unwrap());
        assert!(!repo.delete_by_id(rent.id).unwrap());
    }
}
