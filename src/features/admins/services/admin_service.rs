use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::admins::models::{Admin, AdminRole};
use crate::modules::store::{decode_rows, Filter, Query, TableStore};
use crate::shared::constants::TABLE_ADMINS;
use crate::shared::invalidation::{Collection, Invalidation};

/// Service for admin grants
pub struct AdminService {
    store: Arc<dyn TableStore>,
}

impl AdminService {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    /// List all admins in backend order
    pub async fn list(&self) -> Result<Vec<Admin>> {
        let admins: Vec<Admin> = self
            .store
            .select(TABLE_ADMINS, &Query::new())
            .await
            .and_then(decode_rows)
            .map_err(|e| {
                tracing::error!("Failed to list admins: {}", e);
                AppError::Fetch(e.to_string())
            })?;

        Ok(admins)
    }

    /// Grant `role` to `user_id`, replacing the role of an existing grant
    pub async fn upsert(&self, user_id: Uuid, role: AdminRole) -> Result<Invalidation> {
        self.store
            .upsert(
                TABLE_ADMINS,
                json!({ "user_id": user_id, "role": role }),
                "user_id",
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to upsert admin for user {}: {}", user_id, e);
                AppError::Mutation(e.to_string())
            })?;

        tracing::info!("User {} granted role {}", user_id, role);
        Ok(Invalidation::of(&[Collection::Admins]))
    }

    pub async fn delete(&self, id: Uuid) -> Result<Invalidation> {
        self.store
            .delete(TABLE_ADMINS, &[Filter::eq("id", id)])
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete admin {}: {}", id, e);
                AppError::Mutation(e.to_string())
            })?;

        tracing::info!("Admin {} removed", id);
        Ok(Invalidation::of(&[Collection::Admins]))
    }

    /// One-to-one lookup of the grant held by an authenticated user
    pub async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Admin>> {
        let query = Query::new().eq("user_id", user_id).limit(1);

        let mut admins: Vec<Admin> = self
            .store
            .select(TABLE_ADMINS, &query)
            .await
            .and_then(decode_rows)
            .map_err(|e| AppError::Fetch(e.to_string()))?;

        Ok(admins.pop())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{seed_admin, MemoryStore};

    #[tokio::test]
    async fn test_upsert_twice_keeps_one_row_with_latest_role() {
        let store = Arc::new(MemoryStore::dashboard());
        let service = AdminService::new(store);
        let user_id = Uuid::new_v4();

        service.upsert(user_id, AdminRole::Admin).await.unwrap();
        let invalidation = service.upsert(user_id, AdminRole::Superadmin).await.unwrap();

        assert_eq!(invalidation.invalidates, vec![Collection::Admins]);
        let admins = service.list().await.unwrap();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].user_id, user_id);
        assert_eq!(admins[0].role, AdminRole::Superadmin);
    }

    #[tokio::test]
    async fn test_find_by_user_id() {
        let store = Arc::new(MemoryStore::dashboard());
        let admin = seed_admin(&store, AdminRole::Admin);
        seed_admin(&store, AdminRole::Superadmin);
        let service = AdminService::new(store);

        let found = service.find_by_user_id(admin.user_id).await.unwrap();
        assert_eq!(found, Some(admin));

        let missing = service.find_by_user_id(Uuid::new_v4()).await.unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_delete_revokes_access() {
        let store = Arc::new(MemoryStore::dashboard());
        let admin = seed_admin(&store, AdminRole::Admin);
        let service = AdminService::new(store);

        service.delete(admin.id).await.unwrap();

        assert!(service.list().await.unwrap().is_empty());
        assert_eq!(service.find_by_user_id(admin.user_id).await.unwrap(), None);
    }
}
