use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{CreateCategoryDto, UpdateCategoryDto};
use crate::features::categories::models::Category;
use crate::modules::store::{decode_rows, Filter, Query, TableStore};
use crate::shared::constants::TABLE_CATEGORIES;
use crate::shared::invalidation::{Collection, Invalidation};

/// Service for category operations
pub struct CategoryService {
    store: Arc<dyn TableStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    /// List all categories ordered by display order
    pub async fn list(&self) -> Result<Vec<Category>> {
        let query = Query::new().order("display_order", true);

        let categories: Vec<Category> = self
            .store
            .select(TABLE_CATEGORIES, &query)
            .await
            .and_then(decode_rows)
            .map_err(|e| {
                tracing::error!("Failed to list categories: {}", e);
                AppError::Fetch(e.to_string())
            })?;

        Ok(categories)
    }

    pub async fn create(&self, mut dto: CreateCategoryDto) -> Result<Invalidation> {
        if dto.display_order.is_none() {
            let count = self.list().await?.len();
            dto.display_order = Some(i32::try_from(count).unwrap_or(i32::MAX));
        }
        let row = serde_json::to_value(&dto).map_err(|e| AppError::Internal(e.to_string()))?;

        self.store
            .insert(TABLE_CATEGORIES, row)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create category: {}", e);
                AppError::Mutation(e.to_string())
            })?;

        tracing::info!("Category '{}' created", dto.name);
        Ok(Invalidation::of(&[Collection::Categories]))
    }

    /// Merge the provided fields into the category and stamp `updated_at`
    pub async fn update(&self, id: Uuid, dto: UpdateCategoryDto) -> Result<Invalidation> {
        let mut patch =
            serde_json::to_value(&dto).map_err(|e| AppError::Internal(e.to_string()))?;
        patch["updated_at"] = serde_json::json!(Utc::now());

        self.store
            .update(TABLE_CATEGORIES, &[Filter::eq("id", id)], patch)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update category {}: {}", id, e);
                AppError::Mutation(e.to_string())
            })?;

        // Places embed their category
        Ok(Invalidation::of(&[Collection::Categories, Collection::Places]))
    }

    pub async fn delete(&self, id: Uuid) -> Result<Invalidation> {
        self.store
            .delete(TABLE_CATEGORIES, &[Filter::eq("id", id)])
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete category {}: {}", id, e);
                AppError::Mutation(e.to_string())
            })?;

        tracing::info!("Category {} deleted", id);
        Ok(Invalidation::of(&[Collection::Categories, Collection::Places]))
    }

    pub async fn toggle_active(&self, id: Uuid, is_active: bool) -> Result<Invalidation> {
        self.update(
            id,
            UpdateCategoryDto {
                is_active: Some(is_active),
                ..Default::default()
            },
        )
        .await
    }
}
