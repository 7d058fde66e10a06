use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;

use super::{Filter, Query, StoreError, TableStore};
use crate::core::config::SupabaseConfig;

/// PostgREST error body
#[derive(Debug, Deserialize)]
struct PostgrestErrorResponse {
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Option<String>,
}

/// Client for the backend's PostgREST endpoint (`/rest/v1`)
pub struct PostgrestClient {
    base_url: String,
    api_key: String,
    http_client: reqwest::Client,
}

impl PostgrestClient {
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            base_url: config.rest_url(),
            api_key: config.service_role_key.clone(),
            http_client: reqwest::Client::new(),
        }
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, urlencoding::encode(table));

        self.http_client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn send(&self, table: &str, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("PostgREST request on '{}' failed: {}", table, e);
            StoreError::Request(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<PostgrestErrorResponse>(&body) {
            Ok(err) if !err.message.is_empty() => match err.details {
                Some(details) if !details.is_empty() => format!("{} ({})", err.message, details),
                _ => err.message,
            },
            _ => format!("HTTP {}", status),
        };

        tracing::warn!("PostgREST error on '{}': HTTP {} - {}", table, status, message);
        Err(StoreError::Backend {
            status: status.as_u16(),
            message,
        })
    }

    async fn rows(response: Response) -> Result<Vec<Value>, StoreError> {
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Value>(&body).map_err(|e| StoreError::Decode(e.to_string()))? {
            Value::Array(rows) => Ok(rows),
            row @ Value::Object(_) => Ok(vec![row]),
            other => Err(StoreError::Decode(format!(
                "expected rows, got {}",
                other
            ))),
        }
    }

    fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
        filters.iter().map(Filter::to_param).collect()
    }
}

#[async_trait]
impl TableStore for PostgrestClient {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, StoreError> {
        tracing::debug!("Selecting from '{}'", table);

        let request = self.request(Method::GET, table).query(&query.to_params());
        let response = self.send(table, request).await?;
        Self::rows(response).await
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, StoreError> {
        tracing::debug!("Inserting into '{}'", table);

        let request = self
            .request(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(&row);
        let response = self.send(table, request).await?;
        Self::rows(response).await
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, StoreError> {
        tracing::debug!("Updating '{}' where {:?}", table, filters);

        let request = self
            .request(Method::PATCH, table)
            .header("Prefer", "return=representation")
            .query(&Self::filter_params(filters))
            .json(&patch);
        let response = self.send(table, request).await?;
        Self::rows(response).await
    }

    async fn upsert(
        &self,
        table: &str,
        row: Value,
        on_conflict: &str,
    ) -> Result<Vec<Value>, StoreError> {
        tracing::debug!("Upserting into '{}' on conflict '{}'", table, on_conflict);

        let request = self
            .request(Method::POST, table)
            .header(
                "Prefer",
                "resolution=merge-duplicates,return=representation",
            )
            .query(&[("on_conflict", on_conflict)])
            .json(&row);
        let response = self.send(table, request).await?;
        Self::rows(response).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<(), StoreError> {
        tracing::debug!("Deleting from '{}' where {:?}", table, filters);

        let request = self
            .request(Method::DELETE, table)
            .query(&Self::filter_params(filters));
        self.send(table, request).await?;
        Ok(())
    }
}
