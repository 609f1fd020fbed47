//! # Foods API
//!
//! A REST resource service for foods, backed by a document collection.
//!
//! ## Features
//!
//! - **List queries**: query-string filters with comparison operators
//!   (`price[lte]=3`, `category[in]=fruit,veg`), field projection
//!   (`select=name,price`), multi-key sorting (`sort=-price,name`) and
//!   page/limit pagination with next/prev links
//! - **CRUD**: create, read, update and delete with validated payloads
//!   and unique names
//! - **Photo upload**: multipart image upload stored on disk
//! - **Pluggable storage**: in-memory collection, or MongoDB behind the
//!   `mongodb_backend` feature
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use foods::prelude::*;
//!
//! let config = AppConfig::default().with_env_overrides()?;
//! ServerBuilder::new()
//!     .with_config(config)
//!     .with_collection(InMemoryCollection::new())
//!     .serve_configured()
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        collection::Collection,
        error::{FoodsError, FoodsResult},
        food::{CreateFood, Food, UpdateFood},
        query::{
            FilterPredicate, ListQuery, ListQueryBuilder, PageWindow, PaginationResult,
            Projection, RawParameters, SortSpec,
        },
        service::{FoodService, ListResponse},
        upload::PhotoUpload,
    };

    // === Storage ===
    pub use crate::storage::InMemoryCollection;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoCollection;

    // === Config ===
    pub use crate::config::{AppConfig, CountMode, QueryConfig, UploadConfig};

    // === Server ===
    pub use crate::server::{RestExposure, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
