use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::places::dtos::{CreatePlaceDto, UpdatePlaceDto};
use crate::features::places::models::Place;
use crate::modules::store::{decode_rows, Filter, Query, TableStore};
use crate::shared::constants::{TABLE_CATEGORIES, TABLE_PLACES};
use crate::shared::invalidation::{Collection, Invalidation};

/// Service for place operations
pub struct PlaceService {
    store: Arc<dyn TableStore>,
}

impl PlaceService {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    /// List all places, newest first, with their category embedded
    pub async fn list(&self) -> Result<Vec<Place>> {
        let query = Query::new()
            .embed("category", TABLE_CATEGORIES, "category_id", &["*"])
            .order("created_at", false);

        let places: Vec<Place> = self
            .store
            .select(TABLE_PLACES, &query)
            .await
            .and_then(decode_rows)
            .map_err(|e| {
                tracing::error!("Failed to list places: {}", e);
                AppError::Fetch(e.to_string())
            })?;

        Ok(places)
    }

    pub async fn create(&self, dto: CreatePlaceDto) -> Result<Invalidation> {
        let row = serde_json::to_value(&dto).map_err(|e| AppError::Internal(e.to_string()))?;

        self.store.insert(TABLE_PLACES, row).await.map_err(|e| {
            tracing::error!("Failed to create place: {}", e);
            AppError::Mutation(e.to_string())
        })?;

        tracing::info!("Place '{}' created in {}", dto.name, dto.city);
        Ok(Invalidation::of(&[Collection::Places]))
    }

    /// Merge the provided fields into the place and stamp `updated_at`
    pub async fn update(&self, id: Uuid, dto: UpdatePlaceDto) -> Result<Invalidation> {
        let mut patch =
            serde_json::to_value(&dto).map_err(|e| AppError::Internal(e.to_string()))?;
        patch["updated_at"] = serde_json::json!(Utc::now());

        self.store
            .update(TABLE_PLACES, &[Filter::eq("id", id)], patch)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update place {}: {}", id, e);
                AppError::Mutation(e.to_string())
            })?;

        // Reports embed their place
        Ok(Invalidation::of(&[Collection::Places, Collection::Reports]))
    }

    /// Delete a place; the backend cascades the delete to its reports
    pub async fn delete(&self, id: Uuid) -> Result<Invalidation> {
        self.store
            .delete(TABLE_PLACES, &[Filter::eq("id", id)])
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete place {}: {}", id, e);
                AppError::Mutation(e.to_string())
            })?;

        tracing::info!("Place {} deleted", id);
        Ok(Invalidation::of(&[Collection::Places, Collection::Reports]))
    }

    pub async fn toggle_active(&self, id: Uuid, is_active: bool) -> Result<Invalidation> {
        self.update(
            id,
            UpdatePlaceDto {
                is_active: Some(is_active),
                ..Default::default()
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::dashboard::aggregator::average_wait;
    use crate::shared::test_helpers::{seed_category, seed_place, MemoryStore};
    use serde_json::json;

    #[tokio::test]
    async fn test_list_embeds_category_newest_first() {
        let store = Arc::new(MemoryStore::dashboard());
        let banks = seed_category(&store, "Banks", 1);
        seed_place(&store, banks, "Old Branch", 10.0, 4);
        seed_place(&store, banks, "New Branch", 20.0, 2);
        let service = PlaceService::new(store);

        let places = service.list().await.unwrap();

        assert_eq!(places.len(), 2);
        assert_eq!(places[0].name, "New Branch");
        assert_eq!(places[1].name, "Old Branch");
        assert_eq!(
            places[0].category.as_ref().map(|c| c.name.as_str()),
            Some("Banks")
        );
    }

    #[tokio::test]
    async fn test_list_tolerates_null_aggregates() {
        let store = Arc::new(MemoryStore::dashboard());
        let banks = seed_category(&store, "Banks", 1);
        seed_place(&store, banks, "Old Branch", 30.0, 6);
        store.seed(
            TABLE_PLACES,
            json!({
                "name": "New Branch",
                "city": "Erbil",
                "category_id": banks,
                "avg_wait_minutes": null,
                "report_count": null,
                "confidence_score": null,
            }),
        );
        let service = PlaceService::new(store);

        let places = service.list().await.unwrap();

        assert_eq!(places.len(), 2);
        assert_eq!(places[0].name, "New Branch");
        assert_eq!(places[0].avg_wait_minutes, 0.0);
        assert_eq!(places[0].report_count, 0);
        assert_eq!(average_wait(&places), 15);
    }

    #[tokio::test]
    async fn test_create_then_list_round_trip() {
        let store = Arc::new(MemoryStore::dashboard());
        let banks = seed_category(&store, "Banks", 1);
        let service = PlaceService::new(store);

        service
            .create(CreatePlaceDto {
                name: "Rafidain Bank".to_string(),
                city: "Basra".to_string(),
                category_id: Some(banks),
                address: Some("Corniche St".to_string()),
                is_active: true,
            })
            .await
            .unwrap();

        let places = service.list().await.unwrap();
        assert_eq!(places.len(), 1);
        let place = &places[0];
        assert_eq!(place.name, "Rafidain Bank");
        assert_eq!(place.city, "Basra");
        assert_eq!(place.category_id, banks);
        assert_eq!(place.address.as_deref(), Some("Corniche St"));
        assert_eq!(place.report_count, 0);
    }

    #[tokio::test]
    async fn test_toggle_active_is_idempotent() {
        let store = Arc::new(MemoryStore::dashboard());
        let banks = seed_category(&store, "Banks", 1);
        let id = seed_place(&store, banks, "Branch", 5.0, 1);
        let service = PlaceService::new(store);

        service.toggle_active(id, true).await.unwrap();
        service.toggle_active(id, true).await.unwrap();

        assert!(service.list().await.unwrap()[0].is_active);
    }

    #[tokio::test]
    async fn test_update_invalidates_reports() {
        let store = Arc::new(MemoryStore::dashboard());
        let banks = seed_category(&store, "Banks", 1);
        let id = seed_place(&store, banks, "Branch", 5.0, 1);
        let service = PlaceService::new(store);

        let invalidation = service
            .update(
                id,
                UpdatePlaceDto {
                    city: Some("Erbil".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(
            invalidation.invalidates,
            vec![Collection::Places, Collection::Reports]
        );
        assert_eq!(service.list().await.unwrap()[0].city, "Erbil");
    }
}
