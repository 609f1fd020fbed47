//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides [`MongoCollection`], a [`Collection`] backed by one MongoDB
//! collection (`foods` by default).
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag:
//! ```toml
//! [dependencies]
//! foods-api = { version = "0.1", features = ["mongodb_backend"] }
//! ```
//!
//! # Serialization strategy
//!
//! Foods are serialized via `serde_json::Value` as an intermediate format,
//! then converted to BSON documents. UUIDs and timestamps are therefore stored
//! as strings. The `id` field is mapped to MongoDB's `_id` convention, both in
//! documents and in filter/sort/projection field names.
//!
//! # Operand casting
//!
//! Query strings only carry strings, while documents hold native numbers and
//! booleans. Equality and `$in` match any of the plausible representations of
//! an operand (`"25"` matches the string `"25"` and the integer `25`);
//! range comparisons use the numeric form when the operand parses as a number.

use crate::config::DatabaseConfig;
use crate::core::collection::Collection;
use crate::core::error::{FoodError, StorageError};
use crate::core::food::Food;
use crate::core::query::{Condition, FilterPredicate, Projection, SortSpec};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Database, IndexModel};
use serde_json::Value;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert a serde_json::Value (expected to be an Object) into a BSON Document,
/// renaming `id` → `_id` for MongoDB convention.
fn json_to_document(json: Value) -> Result<Document> {
    let bson_val = mongodb::bson::to_bson(&json)
        .map_err(|e| anyhow!("Failed to convert JSON to BSON: {}", e))?;

    let mut doc = match bson_val {
        Bson::Document(d) => d,
        _ => return Err(anyhow!("Expected BSON document, got non-object")),
    };

    if let Some(id) = doc.remove("id") {
        doc.insert("_id", id);
    }

    Ok(doc)
}

/// Convert a BSON Document back into a serde_json::Value,
/// renaming `_id` → `id` for domain convention.
fn document_to_json(mut doc: Document) -> Value {
    if let Some(id) = doc.remove("_id") {
        doc.insert("id", id);
    }

    Bson::Document(doc).into_relaxed_extjson()
}

/// Server error code for a unique index violation
const DUPLICATE_KEY: i32 = 11000;

/// Largest skip the server accepts; a signed 64-bit count
const MAX_SKIP: u64 = i64::MAX as u64;

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY
    )
}

/// Map a write error, turning a unique index violation into a name conflict
fn write_error(err: mongodb::error::Error, food: &Food, action: &str) -> anyhow::Error {
    if is_duplicate_key(&err) {
        FoodError::AlreadyExists {
            name: food.name.clone(),
        }
        .into()
    } else {
        anyhow!("Failed to {} food: {}", action, err)
    }
}

/// Convert a UUID to its BSON string representation for queries.
fn uuid_bson(id: &Uuid) -> Bson {
    Bson::String(id.to_string())
}

/// Field name as stored: `id` lives in `_id`
fn stored_field(field: &str) -> &str {
    if field == "id" { "_id" } else { field }
}

/// Every representation a raw operand could be stored as
fn operand_variants(raw: &str) -> Vec<Bson> {
    let mut variants = vec![Bson::String(raw.to_string())];

    match raw {
        "true" => variants.push(Bson::Boolean(true)),
        "false" => variants.push(Bson::Boolean(false)),
        _ => {
            if let Ok(i) = raw.parse::<i64>() {
                variants.push(Bson::Int64(i));
                variants.push(Bson::Double(i as f64));
            } else if let Some(f) = raw.parse::<f64>().ok().filter(|f| f.is_finite()) {
                variants.push(Bson::Double(f));
            }
        }
    }

    variants
}

/// Operand for range comparisons: numeric when it parses as one
fn range_operand(raw: &str) -> Bson {
    match raw.trim().parse::<f64>() {
        Ok(f) if f.is_finite() => Bson::Double(f),
        _ => Bson::String(raw.to_string()),
    }
}

/// Translate a typed predicate into a MongoDB filter document
fn filter_document(filter: &FilterPredicate) -> Document {
    let mut root = Document::new();
    // Conditions whose operator is already taken on the same field
    let mut overflow: Vec<Bson> = Vec::new();

    for (field, conditions) in filter.iter() {
        let field = stored_field(field);
        let mut operators = Document::new();
        for condition in conditions {
            let (tag, operand) = condition_operand(condition);
            if operators.contains_key(tag) {
                let mut single = Document::new();
                single.insert(tag, operand);
                let mut clause = Document::new();
                clause.insert(field, single);
                overflow.push(Bson::Document(clause));
            } else {
                operators.insert(tag, operand);
            }
        }
        root.insert(field, operators);
    }

    if !overflow.is_empty() {
        root.insert("$and", overflow);
    }

    root
}

fn condition_operand(condition: &Condition) -> (&'static str, Bson) {
    match condition {
        Condition::Equals(raw) => ("$in", Bson::Array(operand_variants(raw))),
        Condition::In(values) => (
            "$in",
            Bson::Array(values.iter().flat_map(|v| operand_variants(v)).collect()),
        ),
        Condition::GreaterThan(raw)
        | Condition::GreaterOrEqual(raw)
        | Condition::LessThan(raw)
        | Condition::LessOrEqual(raw) => (condition.store_tag(), range_operand(raw)),
    }
}

fn projection_document(projection: &Projection) -> Document {
    projection
        .fields()
        .iter()
        .map(|field| (stored_field(field).to_string(), Bson::Int32(1)))
        .collect()
}

fn sort_document(sort: &SortSpec) -> Document {
    sort.keys()
        .iter()
        .map(|key| {
            (
                stored_field(&key.field).to_string(),
                Bson::Int32(key.direction.as_i32()),
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// MongoCollection
// ---------------------------------------------------------------------------

/// Food collection backed by MongoDB.
///
/// # Example
///
/// ```rust,ignore
/// use mongodb::Client;
/// use foods::storage::MongoCollection;
///
/// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
/// let collection = MongoCollection::new(client.database("foods"), "foods");
/// collection.ensure_indexes().await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoCollection {
    database: Database,
    name: String,
}

impl MongoCollection {
    /// Create a new `MongoCollection` over `database.<name>`.
    pub fn new(database: Database, name: impl Into<String>) -> Self {
        Self {
            database,
            name: name.into(),
        }
    }

    /// Connect using the database section of the configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StorageError> {
        let uri = config
            .uri
            .as_deref()
            .ok_or_else(|| StorageError::ConnectionFailed {
                backend: "MongoDB".to_string(),
                message: "no connection URI configured".to_string(),
            })?;

        let client =
            Client::with_uri_str(uri)
                .await
                .map_err(|e| StorageError::ConnectionFailed {
                    backend: "MongoDB".to_string(),
                    message: e.to_string(),
                })?;

        tracing::info!(database = %config.name, collection = %config.collection, "connected to MongoDB");
        Ok(Self::new(client.database(&config.name), &config.collection))
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self) -> mongodb::Collection<Document> {
        self.database.collection(&self.name)
    }

    /// Create a unique index on `name`.
    ///
    /// This method is idempotent, safe to call on every startup.
    pub async fn ensure_indexes(&self) -> Result<()> {
        let index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection()
            .create_index(index)
            .await
            .map_err(|e| anyhow!("Failed to create indexes on {}: {}", self.name, e))?;

        Ok(())
    }

    fn food_to_document(food: &Food) -> Result<Document> {
        let json =
            serde_json::to_value(food).map_err(|e| anyhow!("Failed to serialize food: {}", e))?;
        json_to_document(json)
    }

    fn document_to_food(doc: Document) -> Result<Food> {
        let json = document_to_json(doc);
        serde_json::from_value(json)
            .map_err(|e| anyhow!("Failed to deserialize food from document: {}", e))
    }

    async fn find_one_food(&self, filter: Document) -> Result<Option<Food>> {
        let doc = self
            .collection()
            .find_one(filter)
            .await
            .map_err(|e| anyhow!("Failed to get food: {}", e))?;

        doc.map(Self::document_to_food).transpose()
    }
}

#[async_trait]
impl Collection for MongoCollection {
    async fn count(&self) -> Result<u64> {
        self.collection()
            .estimated_document_count()
            .await
            .map_err(|e| anyhow!("Failed to count foods: {}", e))
    }

    async fn count_matching(&self, filter: &FilterPredicate) -> Result<u64> {
        self.collection()
            .count_documents(filter_document(filter))
            .await
            .map_err(|e| anyhow!("Failed to count matching foods: {}", e))
    }

    async fn find(
        &self,
        filter: &FilterPredicate,
        projection: &Projection,
        sort: &SortSpec,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<Value>> {
        let collection = self.collection();
        let mut action = collection
            .find(filter_document(filter))
            .sort(sort_document(sort))
            .skip(u64::try_from(skip).unwrap_or(u64::MAX).min(MAX_SKIP))
            .limit(i64::try_from(limit).unwrap_or(i64::MAX));
        if !projection.is_all() {
            action = action.projection(projection_document(projection));
        }

        let docs: Vec<Document> = action
            .await
            .map_err(|e| anyhow!("Failed to list foods: {}", e))?
            .try_collect()
            .await
            .map_err(|e| anyhow!("Failed to collect foods: {}", e))?;

        Ok(docs.into_iter().map(document_to_json).collect())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Food>> {
        self.find_one_food(doc! { "_id": uuid_bson(id) }).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Food>> {
        self.find_one_food(doc! { "name": name }).await
    }

    async fn insert(&self, food: Food) -> Result<Food> {
        let doc = Self::food_to_document(&food)?;

        self.collection()
            .insert_one(doc)
            .await
            .map_err(|e| write_error(e, &food, "create"))?;

        // Read back the stored version
        self.get(&food.id)
            .await?
            .ok_or_else(|| anyhow!("Food not found after insert"))
    }

    async fn replace(&self, id: &Uuid, food: Food) -> Result<Option<Food>> {
        let doc = Self::food_to_document(&food)?;

        let result = self
            .collection()
            .replace_one(doc! { "_id": uuid_bson(id) }, doc)
            .await
            .map_err(|e| write_error(e, &food, "update"))?;

        if result.matched_count == 0 {
            return Ok(None);
        }

        self.get(id).await
    }

    async fn delete(&self, id: &Uuid) -> Result<bool> {
        let result = self
            .collection()
            .delete_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to delete food: {}", e))?;

        Ok(result.deleted_count > 0)
    }
}
