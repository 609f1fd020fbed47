//! The food document and its request payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Photo assigned to foods that have none uploaded yet
pub const DEFAULT_PHOTO: &str = "no-photo.jpg";

fn default_photo() -> String {
    DEFAULT_PHOTO.to_string()
}

/// A food document
///
/// Serialized with camelCase keys; those are the names `select`, `sort` and
/// filter parameters refer to (`createdAt`, not `created_at`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    pub id: Uuid,
    pub name: String,
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(default = "default_photo")]
    pub photo: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Food {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            category: None,
            calories: None,
            price: None,
            photo: default_photo(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Body of `POST /api/v1/foods`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFood {
    #[validate(length(min = 1, max = 50, message = "Name must be 1 to 50 characters"))]
    pub name: String,

    #[validate(length(
        min = 1,
        max = 500,
        message = "Description must be 1 to 500 characters"
    ))]
    pub description: String,

    #[validate(length(max = 50, message = "Category can not be more than 50 characters"))]
    pub category: Option<String>,

    pub calories: Option<u32>,

    #[validate(range(min = 0.0, message = "Price can not be negative"))]
    pub price: Option<f64>,
}

fn trim_owned(value: String) -> String {
    value.trim().to_string()
}

impl CreateFood {
    /// Strip surrounding whitespace so length rules see the stored value
    pub fn trimmed(self) -> Self {
        Self {
            name: trim_owned(self.name),
            description: trim_owned(self.description),
            category: self.category.map(trim_owned),
            ..self
        }
    }

    pub fn into_food(self) -> Food {
        let mut food = Food::new(self.name.trim(), self.description.trim());
        food.category = self.category;
        food.calories = self.calories;
        food.price = self.price;
        food
    }
}

/// Body of `PUT /api/v1/foods/{id}`; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFood {
    #[validate(length(min = 1, max = 50, message = "Name must be 1 to 50 characters"))]
    pub name: Option<String>,

    #[validate(length(
        min = 1,
        max = 500,
        message = "Description must be 1 to 500 characters"
    ))]
    pub description: Option<String>,

    #[validate(length(max = 50, message = "Category can not be more than 50 characters"))]
    pub category: Option<String>,

    pub calories: Option<u32>,

    #[validate(range(min = 0.0, message = "Price can not be negative"))]
    pub price: Option<f64>,
}

impl UpdateFood {
    /// Strip surrounding whitespace so length rules see the stored value
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.map(trim_owned),
            description: self.description.map(trim_owned),
            category: self.category.map(trim_owned),
            ..self
        }
    }

    /// Apply the provided fields to `food` and bump `updatedAt`
    pub fn apply_to(self, food: &mut Food) {
        if let Some(name) = self.name {
            food.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            food.description = description.trim().to_string();
        }
        if let Some(category) = self.category {
            food.category = Some(category);
        }
        if let Some(calories) = self.calories {
            food.calories = Some(calories);
        }
        if let Some(price) = self.price {
            food.price = Some(price);
        }
        food.touch();
    }
}
