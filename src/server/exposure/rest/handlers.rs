//! HTTP handlers for the foods resource
//!
//! Handlers are thin: they turn the request into service inputs and wrap the
//! result in the `{ "success": true, ... }` envelope. Every failure surfaces
//! as a [`FoodsError`], which renders itself.

use crate::core::error::{FoodsError, UploadError, ValidationError};
use crate::core::food::{CreateFood, Food, UpdateFood};
use crate::core::query::RawParameters;
use crate::core::service::{FoodService, ListResponse};
use crate::core::upload::PhotoUpload;
use axum::{
    Json,
    extract::{Multipart, Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

/// Name of the multipart field carrying the photo
pub const PHOTO_FIELD: &str = "file";

/// `{ "success": true, "data": ... }`
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

/// Deserialize a JSON body, reporting syntax and shape errors as validation
/// failures
fn parse_body<T: DeserializeOwned>(
    body: Result<Json<Value>, JsonRejection>,
) -> Result<T, FoodsError> {
    let Json(body) = body.map_err(|rejection| ValidationError::InvalidJson {
        message: rejection.body_text(),
    })?;

    serde_json::from_value(body).map_err(|e| {
        ValidationError::InvalidJson {
            message: e.to_string(),
        }
        .into()
    })
}

/// GET /api/v1/foods
pub async fn list_foods(
    State(service): State<FoodService>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ListResponse>, FoodsError> {
    let params = RawParameters::from_pairs(pairs);
    Ok(Json(service.list(&params).await?))
}

/// GET /api/v1/foods/{id}
pub async fn get_food(
    State(service): State<FoodService>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Food>>, FoodsError> {
    Ok(DataResponse::new(service.get(&id).await?))
}

/// POST /api/v1/foods
pub async fn create_food(
    State(service): State<FoodService>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<Food>>), FoodsError> {
    let payload: CreateFood = parse_body(body)?;
    let food = service.create(payload).await?;
    Ok((StatusCode::CREATED, DataResponse::new(food)))
}

/// PUT /api/v1/foods/{id}
pub async fn update_food(
    State(service): State<FoodService>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<DataResponse<Food>>, FoodsError> {
    let payload: UpdateFood = parse_body(body)?;
    Ok(DataResponse::new(service.update(&id, payload).await?))
}

/// DELETE /api/v1/foods/{id}
pub async fn delete_food(
    State(service): State<FoodService>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Value>>, FoodsError> {
    service.delete(&id).await?;
    Ok(DataResponse::new(json!({})))
}

/// PUT /api/v1/foods/{id}/photo
pub async fn upload_photo(
    State(service): State<FoodService>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<DataResponse<String>>, FoodsError> {
    let upload = read_photo(multipart).await?;
    Ok(DataResponse::new(service.upload_photo(&id, upload).await?))
}

/// Pull the photo field out of a multipart body, skipping other fields
async fn read_photo(mut multipart: Multipart) -> Result<PhotoUpload, UploadError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        return Ok(PhotoUpload {
            file_name,
            content_type,
            bytes,
        });
    }

    Err(UploadError::MissingFile)
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> UploadError {
    UploadError::Multipart {
        message: err.body_text(),
    }
}
