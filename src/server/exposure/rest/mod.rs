//! REST API exposure for the foods resource
//!
//! The REST exposure consumes a [`FoodService`] and produces an Axum `Router`:
//!
//! | Method | Path                      | Handler          |
//! |--------|---------------------------|------------------|
//! | GET    | `/api/v1/foods`           | [`list_foods`]   |
//! | POST   | `/api/v1/foods`           | [`create_food`]  |
//! | GET    | `/api/v1/foods/{id}`      | [`get_food`]     |
//! | PUT    | `/api/v1/foods/{id}`      | [`update_food`]  |
//! | DELETE | `/api/v1/foods/{id}`      | [`delete_food`]  |
//! | PUT    | `/api/v1/foods/{id}/photo`| [`upload_photo`] |
//! | GET    | `/health`, `/healthz`     | health check     |

pub mod handlers;

pub use handlers::{
    DataResponse, create_food, delete_food, get_food, list_foods, update_food, upload_photo,
};

use crate::core::service::FoodService;
use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    routing::{get, put},
};
use serde_json::{Value, json};

/// Base path of the foods resource
pub const FOODS_PATH: &str = "/api/v1/foods";

/// Room for multipart boundaries and headers on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router for a service
    ///
    /// `custom_routes` are merged after the resource and health routes.
    pub fn build_router(service: FoodService, custom_routes: Vec<Router>) -> Router {
        let mut app = Self::health_routes().merge(Self::food_routes(service));

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        app
    }

    /// Resource routes, with the photo route allowed a larger body
    fn food_routes(service: FoodService) -> Router {
        let photo_limit = service
            .uploads()
            .max_file_upload
            .saturating_add(MULTIPART_OVERHEAD);

        Router::new()
            .route(FOODS_PATH, get(list_foods).post(create_food))
            .route(
                &format!("{FOODS_PATH}/{{id}}"),
                get(get_food).put(update_food).delete(delete_food),
            )
            .route(
                &format!("{FOODS_PATH}/{{id}}/photo"),
                put(upload_photo).layer(DefaultBodyLimit::max(photo_limit)),
            )
            .with_state(service)
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "foods-api"
        }))
    }
}
