//! # Category Registry
//!
//! Admin-managed category/sub-category reference data. Slugs are validated at
//! the boundary and immutable after creation; deletion is blocked while any
//! task (including soft-deleted ones) still references the category.

use std::sync::Arc;
use tracing::{info, instrument};

use crate::error::{CoreError, Result};
use crate::models::{Category, CategoryUpdate, NewCategory};
use crate::storage::{CategoryStore, TaskStore};
use crate::tenancy::TenantContext;
use crate::validation;
use uuid::Uuid;

pub struct CategoryRegistry {
    categories: Arc<dyn CategoryStore>,
    tasks: Arc<dyn TaskStore>,
}

impl CategoryRegistry {
    pub fn new(categories: Arc<dyn CategoryStore>, tasks: Arc<dyn TaskStore>) -> Self {
        Self { categories, tasks }
    }

    #[instrument(skip(self, ctx, category), fields(slug = %category.value))]
    pub async fn create_category(
        &self,
        ctx: &TenantContext,
        category: NewCategory,
    ) -> Result<Category> {
        ctx.require_admin()?;
        validation::validate_slug(&category.value)?;
        validation::validate_title("category label", &category.label)?;
        for sub in &category.sub_categories {
            validation::validate_title("sub-category label", sub)?;
        }

        if self.categories.find_by_slug(&category.value).await?.is_some() {
            return Err(CoreError::InvalidInput(format!(
                "category slug '{}' already exists",
                category.value
            )));
        }

        let created = self.categories.insert(category).await?;
        info!(slug = %created.value, category_uuid = %created.category_uuid, "Created category");
        Ok(created)
    }

    #[instrument(skip(self, ctx, update))]
    pub async fn update_category(
        &self,
        ctx: &TenantContext,
        category_uuid: Uuid,
        update: CategoryUpdate,
    ) -> Result<Category> {
        ctx.require_admin()?;
        if let Some(ref label) = update.label {
            validation::validate_title("category label", label)?;
        }
        if let Some(ref subs) = update.sub_categories {
            for sub in subs {
                validation::validate_title("sub-category label", sub)?;
            }
        }

        self.categories
            .update(category_uuid, update)
            .await?
            .ok_or_else(|| CoreError::CategoryNotFound(category_uuid.to_string()))
    }

    /// Delete a category. Blocked while any task references its slug, so
    /// in-flight grievances never lose their classification.
    #[instrument(skip(self, ctx))]
    pub async fn delete_category(&self, ctx: &TenantContext, category_uuid: Uuid) -> Result<()> {
        ctx.require_admin()?;

        let category = self
            .categories
            .find_by_uuid(category_uuid)
            .await?
            .ok_or_else(|| CoreError::CategoryNotFound(category_uuid.to_string()))?;

        if self.tasks.category_in_use(&category.value).await? {
            return Err(CoreError::CategoryInUse(category.value));
        }

        self.categories.delete(category_uuid).await?;
        info!(slug = %category.value, "Deleted category");
        Ok(())
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Category> {
        self.categories
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| CoreError::CategoryNotFound(slug.to_string()))
    }

    pub async fn get_by_uuid(&self, category_uuid: Uuid) -> Result<Category> {
        self.categories
            .find_by_uuid(category_uuid)
            .await?
            .ok_or_else(|| CoreError::CategoryNotFound(category_uuid.to_string()))
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.categories.list().await?)
    }
}
