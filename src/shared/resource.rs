use std::future::Future;

use crate::core::error::AppError;

/// An in-memory collection owned by one view, with its loading/error flags.
///
/// A failed refresh keeps the previously loaded items and records the error
/// message; the loading flag is cleared either way.
#[derive(Debug, Clone)]
pub struct ResourceState<T> {
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

impl<T> ResourceState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn refresh<F>(&mut self, fetch: F)
    where
        F: Future<Output = Result<Vec<T>, AppError>>,
    {
        self.loading = true;
        self.error = None;

        match fetch.await {
            Ok(items) => self.items = items,
            Err(e) => {
                tracing::warn!("Keeping stale collection after failed refresh: {}", e);
                self.error = Some(e.message().to_string());
            }
        }

        self.loading = false;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
