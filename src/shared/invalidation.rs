use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A collection held by dashboard clients
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Categories,
    Places,
    Reports,
    Admins,
}

/// Collections made stale by a successful mutation.
///
/// Services never refetch on their own; callers re-read every collection
/// listed here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Invalidation {
    pub invalidates: Vec<Collection>,
}

impl Invalidation {
    pub fn of(collections: &[Collection]) -> Self {
        let mut invalidates = collections.to_vec();
        invalidates.sort();
        invalidates.dedup();
        Self { invalidates }
    }

    pub fn contains(&self, collection: Collection) -> bool {
        self.invalidates.contains(&collection)
    }
}
