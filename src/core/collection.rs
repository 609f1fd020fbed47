//! The document store seam
//!
//! Everything the service needs from storage goes through [`Collection`].
//! The list path works on raw JSON documents (they may be projected), the
//! single-document paths on typed [`Food`] values.

use crate::core::food::Food;
use crate::core::query::{FilterPredicate, Projection, SortSpec};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

/// A collection of food documents
///
/// Implementations are agnostic of HTTP and of request parsing: they receive
/// fully built predicates, projections and sort specs.
#[async_trait]
pub trait Collection: Send + Sync {
    /// Total number of documents, ignoring any filter
    async fn count(&self) -> Result<u64>;

    /// Number of documents matching `filter`
    async fn count_matching(&self, filter: &FilterPredicate) -> Result<u64>;

    /// Filter, project, sort, then skip `skip` and take at most `limit`
    async fn find(
        &self,
        filter: &FilterPredicate,
        projection: &Projection,
        sort: &SortSpec,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<Value>>;

    /// Fetch a food by id
    async fn get(&self, id: &Uuid) -> Result<Option<Food>>;

    /// Fetch a food by its (unique) name
    async fn find_by_name(&self, name: &str) -> Result<Option<Food>>;

    /// Store a new food
    async fn insert(&self, food: Food) -> Result<Food>;

    /// Replace an existing food; `None` if there was nothing to replace
    async fn replace(&self, id: &Uuid, food: Food) -> Result<Option<Food>>;

    /// Remove a food; `false` if it did not exist
    async fn delete(&self, id: &Uuid) -> Result<bool>;
}
