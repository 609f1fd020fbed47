//! In-memory implementation of Collection for testing and development

use crate::core::collection::Collection;
use crate::core::error::FoodError;
use crate::core::food::Food;
use crate::core::query::{FilterPredicate, Projection, SortSpec};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory food collection
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// queries run over the JSON form of each food, so filters, sorts and
/// projections behave like they do against the document store.
#[derive(Clone, Default)]
pub struct InMemoryCollection {
    foods: Arc<RwLock<HashMap<Uuid, Food>>>,
}

impl InMemoryCollection {
    /// Create a new, empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collection pre-filled with `foods`
    pub fn with_foods(foods: impl IntoIterator<Item = Food>) -> Self {
        let map = foods.into_iter().map(|food| (food.id, food)).collect();
        Self {
            foods: Arc::new(RwLock::new(map)),
        }
    }

    fn documents(&self) -> Result<Vec<Value>> {
        let foods = self
            .foods
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        foods
            .values()
            .map(|food| serde_json::to_value(food).map_err(Into::into))
            .collect()
    }
}

/// Reject `food` when another id already holds its name
fn check_name_free(foods: &HashMap<Uuid, Food>, food: &Food) -> Result<()> {
    if foods
        .values()
        .any(|other| other.id != food.id && other.name == food.name)
    {
        return Err(FoodError::AlreadyExists {
            name: food.name.clone(),
        }
        .into());
    }
    Ok(())
}

#[async_trait]
impl Collection for InMemoryCollection {
    async fn count(&self) -> Result<u64> {
        let foods = self
            .foods
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(foods.len() as u64)
    }

    async fn count_matching(&self, filter: &FilterPredicate) -> Result<u64> {
        let count = self
            .documents()?
            .iter()
            .filter(|doc| filter.matches(doc))
            .count();
        Ok(count as u64)
    }

    async fn find(
        &self,
        filter: &FilterPredicate,
        projection: &Projection,
        sort: &SortSpec,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<Value>> {
        let mut docs: Vec<Value> = self
            .documents()?
            .into_iter()
            .filter(|doc| filter.matches(doc))
            .collect();

        // Stable sort; HashMap order is arbitrary, so tie-break on id
        docs.sort_by(|a, b| {
            sort.compare(a, b)
                .then_with(|| a["id"].as_str().cmp(&b["id"].as_str()))
        });

        Ok(docs
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|doc| projection.apply(doc))
            .collect())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Food>> {
        let foods = self
            .foods
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(foods.get(id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Food>> {
        let foods = self
            .foods
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(foods.values().find(|food| food.name == name).cloned())
    }

    async fn insert(&self, food: Food) -> Result<Food> {
        let mut foods = self
            .foods
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if foods.contains_key(&food.id) {
            return Err(anyhow!("Food already exists: {}", food.id));
        }
        check_name_free(&foods, &food)?;
        foods.insert(food.id, food.clone());

        Ok(food)
    }

    async fn replace(&self, id: &Uuid, food: Food) -> Result<Option<Food>> {
        let mut foods = self
            .foods
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if !foods.contains_key(id) {
            return Ok(None);
        }
        check_name_free(&foods, &food)?;
        let Some(slot) = foods.get_mut(id) else {
            return Ok(None);
        };
        *slot = food.clone();

        Ok(Some(food))
    }

    async fn delete(&self, id: &Uuid) -> Result<bool> {
        let mut foods = self
            .foods
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(foods.remove(id).is_some())
    }
}
