//! The foods resource: list, get, create, update, delete and photo upload

use crate::config::{AppConfig, UploadConfig};
use crate::core::collection::Collection;
use crate::core::error::{FoodError, FoodsError, FoodsResult, StorageError};
use crate::core::food::{CreateFood, Food, UpdateFood};
use crate::core::query::{ListQueryBuilder, PaginationResult, RawParameters};
use crate::core::upload::{PhotoUpload, save_photo};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Response body of the list operation
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub success: bool,

    /// Number of documents in `data`
    pub count: usize,

    pub pagination: PaginationResult,
    pub data: Vec<Value>,
}

/// Resource controller for foods
///
/// Holds the collection and the configuration it was constructed with;
/// cheap to clone and share across handlers.
#[derive(Clone)]
pub struct FoodService {
    collection: Arc<dyn Collection>,
    query: ListQueryBuilder,
    uploads: UploadConfig,
}

impl FoodService {
    pub fn new(collection: Arc<dyn Collection>, config: &AppConfig) -> Self {
        Self {
            collection,
            query: ListQueryBuilder::new(config.query.clone()),
            uploads: config.upload.clone(),
        }
    }

    pub fn collection(&self) -> &Arc<dyn Collection> {
        &self.collection
    }

    pub fn uploads(&self) -> &UploadConfig {
        &self.uploads
    }

    /// Filtered, projected, sorted and paginated list
    pub async fn list(&self, params: &RawParameters) -> FoodsResult<ListResponse> {
        let outcome = self.query.execute(self.collection.as_ref(), params).await?;

        Ok(ListResponse {
            success: true,
            count: outcome.items.len(),
            pagination: outcome.pagination,
            data: outcome.items,
        })
    }

    pub async fn get(&self, id: &str) -> FoodsResult<Food> {
        let id = parse_id(id)?;
        self.fetch(&id).await
    }

    pub async fn create(&self, payload: CreateFood) -> FoodsResult<Food> {
        let payload = payload.trimmed();
        payload.validate()?;
        let food = payload.into_food();
        self.ensure_unique_name(&food.name, None).await?;

        let created = self
            .collection
            .insert(food)
            .await
            .map_err(|e| write_failed("insert", e))?;

        tracing::info!(id = %created.id, name = %created.name, "food created");
        Ok(created)
    }

    pub async fn update(&self, id: &str, payload: UpdateFood) -> FoodsResult<Food> {
        let id = parse_id(id)?;
        let payload = payload.trimmed();
        payload.validate()?;

        let mut food = self.fetch(&id).await?;
        if let Some(name) = payload.name.as_deref() {
            self.ensure_unique_name(name, Some(&id)).await?;
        }
        payload.apply_to(&mut food);

        let updated = self.store(&id, food).await?;
        tracing::info!(id = %id, "food updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> FoodsResult<()> {
        let id = parse_id(id)?;

        let deleted = self
            .collection
            .delete(&id)
            .await
            .map_err(|e| StorageError::query_failed("delete", e))?;
        if !deleted {
            return Err(not_found(&id));
        }

        tracing::info!(id = %id, "food deleted");
        Ok(())
    }

    /// Store a photo for the food and point its `photo` field at it
    ///
    /// Returns the stored file name.
    pub async fn upload_photo(&self, id: &str, upload: PhotoUpload) -> FoodsResult<String> {
        let id = parse_id(id)?;
        let mut food = self.fetch(&id).await?;

        let name = save_photo(&self.uploads, &id, &upload).await?;

        food.photo = name.clone();
        food.touch();
        self.store(&id, food).await?;

        Ok(name)
    }

    async fn fetch(&self, id: &Uuid) -> FoodsResult<Food> {
        self.collection
            .get(id)
            .await
            .map_err(|e| StorageError::query_failed("get", e))?
            .ok_or_else(|| not_found(id))
    }

    async fn store(&self, id: &Uuid, food: Food) -> FoodsResult<Food> {
        self.collection
            .replace(id, food)
            .await
            .map_err(|e| write_failed("replace", e))?
            .ok_or_else(|| not_found(id))
    }

    async fn ensure_unique_name(&self, name: &str, current: Option<&Uuid>) -> FoodsResult<()> {
        let existing = self
            .collection
            .find_by_name(name)
            .await
            .map_err(|e| StorageError::query_failed("find_by_name", e))?;

        match existing {
            Some(other) if Some(&other.id) != current => Err(FoodError::AlreadyExists {
                name: name.to_string(),
            }
            .into()),
            _ => Ok(()),
        }
    }
}

fn parse_id(raw: &str) -> FoodsResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| {
        FoodError::InvalidId {
            value: raw.to_string(),
        }
        .into()
    })
}

fn not_found(id: &Uuid) -> FoodsError {
    FoodError::NotFound { id: id.to_string() }.into()
}

/// Name conflicts raised by the collection itself surface as 409s
fn write_failed(operation: &str, err: anyhow::Error) -> FoodsError {
    match err.downcast::<FoodError>() {
        Ok(conflict) => conflict.into(),
        Err(err) => StorageError::query_failed(operation, err).into(),
    }
}
