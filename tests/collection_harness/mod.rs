//! Shared test harness for collection backends
//!
//! Provides a twelve-food fixture plus two macros that every backend test
//! file invokes with a factory expression producing a fresh, empty
//! collection:
//!
//! - `collection_contract_tests!` exercises the `Collection` trait directly
//! - `rest_integration_tests!` drives the full HTTP surface through
//!   `axum_test::TestServer`
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod collection_harness;
//! use collection_harness::*;
//!
//! collection_contract_tests!(InMemoryCollection::new());
//! rest_integration_tests!(InMemoryCollection::new());
//! ```

#![allow(dead_code)]

pub mod contract;
pub mod rest;

use foods::core::collection::Collection;
use foods::core::food::Food;
use serde_json::{Value, json};

pub const CATEGORIES: [&str; 3] = ["fruit", "veg", "grain"];

/// Food number `n` (1-based): "Food 01", calories `n * 10`, price `n + 0.5`
pub fn numbered_food(n: u32) -> Food {
    let mut food = Food::new(format!("Food {:02}", n), format!("Description of food {}", n));
    food.category = Some(CATEGORIES[((n - 1) % 3) as usize].to_string());
    food.calories = Some(n * 10);
    food.price = Some(n as f64 + 0.5);
    food
}

/// Twelve foods; four per category
pub fn sample_foods() -> Vec<Food> {
    (1..=12).map(numbered_food).collect()
}

/// JSON body creating food number `n` over HTTP
pub fn numbered_payload(n: u32) -> Value {
    let food = numbered_food(n);
    json!({
        "name": food.name,
        "description": food.description,
        "category": food.category,
        "calories": food.calories,
        "price": food.price,
    })
}

/// Insert the twelve sample foods
pub async fn seed(collection: &dyn Collection) {
    for food in sample_foods() {
        collection.insert(food).await.expect("seed insert should succeed");
    }
}

/// `name` of every document, in order
pub fn names(docs: &[Value]) -> Vec<String> {
    docs.iter()
        .map(|doc| doc["name"].as_str().expect("name should be a string").to_string())
        .collect()
}

/// Sorted keys of a JSON object
pub fn keys(doc: &Value) -> Vec<String> {
    let mut keys: Vec<String> = doc
        .as_object()
        .expect("document should be an object")
        .keys()
        .cloned()
        .collect();
    keys.sort();
    keys
}
