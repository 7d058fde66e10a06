//! Tabular data store access.
//!
//! Every resource service talks to the backend through [`TableStore`], a
//! row-oriented CRUD surface over JSON values. The production implementation
//! is [`PostgrestClient`]; tests use an in-memory store from
//! `shared::test_helpers`.

mod postgrest_client;
mod query;

pub use postgrest_client::PostgrestClient;
pub use query::{Embed, Filter, Order, Query};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Request failed: {0}")]
    Request(String),

    /// Rejection reported by the backend, message passed through verbatim
    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("Failed to decode rows: {0}")]
    Decode(String),
}

#[async_trait]
pub trait TableStore: Send + Sync {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, StoreError>;

    /// Inserts one row and returns the stored representation
    async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, StoreError>;

    /// Applies `patch` to every row matching all `filters`
    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, StoreError>;

    /// Inserts `row`, or merges it into the existing row sharing `on_conflict`
    async fn upsert(
        &self,
        table: &str,
        row: Value,
        on_conflict: &str,
    ) -> Result<Vec<Value>, StoreError>;

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<(), StoreError>;
}

pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, StoreError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(|e| StoreError::Decode(e.to_string())))
        .collect()
}
