//! API exposure modules
//!
//! Each exposure consumes a `FoodService` and produces a Router for its protocol.

pub mod rest;

// Re-export for convenience
pub use rest::RestExposure;
