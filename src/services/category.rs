//! Category service
//!
//! Provides business logic for category management: CRUD operations, the
//! name uniqueness rule, and the guard against deleting a category that
//! transactions still reference.

use crate::error::{TrackerError, TrackerResult};
use crate::models::{Category, CategoryId, CategoryType, NewCategory};
use crate::storage::{CategoryStore, Store, TransactionStore};

/// Service for category management
pub struct CategoryService<'a, S: Store> {
    storage: &'a S,
}

impl<'a, S: Store> CategoryService<'a, S> {
    /// Create a new category service
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    /// Create a new category
    ///
    /// The name is trimmed. Fails with `DuplicateName` if another category
    /// already has the same name, compared case-insensitively.
    pub fn create(&self, name: &str, category_type: CategoryType) -> TrackerResult<Category> {
        let new = NewCategory::new(name, category_type);
        new.validate()
            .map_err(|e| TrackerError::validation("name", e.to_string()))?;

        let _guard = self.storage.exclusive()?;

        if self.storage.categories().find_by_name(&new.name)?.is_some() {
            tracing::warn!(name = %new.name, "rejected duplicate category name");
            return Err(TrackerError::DuplicateName(new.name));
        }

        let category = self.storage.categories().insert(new)?;
        tracing::info!(
            id = %category.id,
            name = %category.name,
            category_type = %category.category_type,
            "created category"
        );

        Ok(category)
    }

    /// Get a category by ID
    pub fn get(&self, id: CategoryId) -> TrackerResult<Category> {
        self.storage
            .categories()
            .find_by_id(id)?
            .ok_or_else(|| TrackerError::category_not_found(id.to_string()))
    }

    /// Find a category by name or ID string
    pub fn find(&self, identifier: &str) -> TrackerResult<Option<Category>> {
        // Try by name first
        if let Some(category) = self.storage.categories().find_by_name(identifier)? {
            return Ok(Some(category));
        }

        // Try parsing as ID
        if let Ok(id) = identifier.trim().parse::<CategoryId>() {
            return self.storage.categories().find_by_id(id);
        }

        Ok(None)
    }

    /// List all categories
    pub fn list(&self) -> TrackerResult<Vec<Category>> {
        let categories = self.storage.categories().find_all()?;
        tracing::debug!(count = categories.len(), "listed categories");
        Ok(categories)
    }

    /// Replace a category's name and type
    ///
    /// Uniqueness is only re-checked when the name actually changes, and a
    /// match against the category's own record is not a collision.
    pub fn update(
        &self,
        id: CategoryId,
        name: &str,
        category_type: CategoryType,
    ) -> TrackerResult<Category> {
        let _guard = self.storage.exclusive()?;

        let mut category = self.get(id)?;
        let name = name.trim();

        if name != category.name {
            if let Some(existing) = self.storage.categories().find_by_name(name)? {
                if existing.id != id {
                    tracing::warn!(%id, name, "rejected rename to existing category name");
                    return Err(TrackerError::DuplicateName(name.to_string()));
                }
            }
        }

        category.name = name.to_string();
        category.category_type = category_type;
        category
            .validate()
            .map_err(|e| TrackerError::validation("name", e.to_string()))?;

        let category = self.storage.categories().save(category)?;
        tracing::info!(
            %id,
            name = %category.name,
            category_type = %category.category_type,
            "updated category"
        );

        Ok(category)
    }

    /// Delete a category
    ///
    /// Refused while any transaction still references it. Returns the
    /// removed category.
    pub fn delete(&self, id: CategoryId) -> TrackerResult<Category> {
        let _guard = self.storage.exclusive()?;

        let category = self.get(id)?;

        if self.storage.transactions().exists_by_category_id(id)? {
            tracing::warn!(%id, name = %category.name, "refused to delete referenced category");
            return Err(TrackerError::BusinessRule(format!(
                "Cannot delete category '{}' - it is used by existing transactions",
                category.name
            )));
        }

        self.storage.categories().delete_by_id(id)?;
        tracing::info!(%id, name = %category.name, "deleted category");

        Ok(category)
    }
}
