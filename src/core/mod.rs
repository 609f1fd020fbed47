//! Core module: the food model, the collection seam, list queries and the resource service

pub mod collection;
pub mod error;
pub mod food;
pub mod query;
pub mod service;
pub mod upload;

pub use collection::Collection;
pub use error::{FoodsError, FoodsResult};
pub use food::{CreateFood, DEFAULT_PHOTO, Food, UpdateFood};
pub use service::{FoodService, ListResponse};
pub use upload::PhotoUpload;
