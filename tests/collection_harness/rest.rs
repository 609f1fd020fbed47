//! REST integration test macro for collection backends.
//!
//! The `rest_integration_tests!` macro generates HTTP-level tests that drive
//! a collection through full round-trips:
//! JSON → HTTP request → handler → FoodService → Collection → HTTP response.
//!
//! # Generated Tests
//!
//! ## CRUD
//! - create 201 with the `{success, data}` envelope, get, update, delete
//!
//! ## Listing
//! - select/sort/page/limit end to end, bracket filters, bad operators
//!
//! ## Errors
//! - unknown id 404, malformed id 400, validation 400, duplicate name 409
//!
//! ## Uploads
//! - image stored and photo updated, non-image, missing file, oversized file

/// Generate a REST integration test suite for a backend.
///
/// `$factory` must produce a fresh, empty `impl Collection + 'static`.
#[macro_export]
macro_rules! rest_integration_tests {
    ($factory:expr) => {
        mod rest_integration_tests {
            use super::*;
            use axum::http::StatusCode;
            use axum_test::TestServer;
            use axum_test::multipart::{MultipartForm, Part};
            use foods::config::AppConfig;
            use foods::server::ServerBuilder;
            use serde_json::{Value, json};
            use tempfile::TempDir;

            const FOODS: &str = "/api/v1/foods";

            /// Server plus the temporary upload directory it writes into
            async fn make_server() -> (TestServer, TempDir) {
                let uploads = tempfile::tempdir().unwrap();
                let mut config = AppConfig::default();
                config.upload.file_upload_path = uploads.path().to_path_buf();
                config.upload.max_file_upload = 1024;

                let router = ServerBuilder::new()
                    .with_config(config)
                    .with_collection($factory)
                    .build()
                    .unwrap();

                (TestServer::new(router), uploads)
            }

            async fn create(server: &TestServer, body: Value) -> Value {
                let response = server.post(FOODS).json(&body).await;
                response.assert_status(StatusCode::CREATED);
                let body: Value = response.json();
                body["data"].clone()
            }

            async fn seed_over_http(server: &TestServer) {
                for n in 1..=12 {
                    create(server, numbered_payload(n)).await;
                }
            }

            // ==============================================================
            // CRUD
            // ==============================================================

            #[tokio::test]
            async fn test_rest_create() {
                let (server, _uploads) = make_server().await;

                let response = server
                    .post(FOODS)
                    .json(&json!({
                        "name": "  Kale  ",
                        "description": "Leafy green",
                        "category": "veg",
                        "calories": 49,
                        "price": 2.5
                    }))
                    .await;

                response.assert_status(StatusCode::CREATED);
                let body: Value = response.json();
                assert_eq!(body["success"], true);
                assert_eq!(body["data"]["name"], "Kale");
                assert_eq!(body["data"]["calories"], 49);
                assert_eq!(body["data"]["price"], 2.5);
                assert_eq!(body["data"]["photo"], "no-photo.jpg");
                assert!(body["data"]["createdAt"].is_string());
                uuid::Uuid::parse_str(body["data"]["id"].as_str().unwrap()).unwrap();
            }

            #[tokio::test]
            async fn test_rest_get() {
                let (server, _uploads) = make_server().await;
                let created = create(&server, numbered_payload(4)).await;
                let id = created["id"].as_str().unwrap();

                let response = server.get(&format!("{FOODS}/{id}")).await;

                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(body["success"], true);
                assert_eq!(body["data"]["name"], "Food 04");
                assert_eq!(body["data"]["category"], "fruit");
            }

            #[tokio::test]
            async fn test_rest_update() {
                let (server, _uploads) = make_server().await;
                let created = create(&server, numbered_payload(1)).await;
                let id = created["id"].as_str().unwrap();

                let response = server
                    .put(&format!("{FOODS}/{id}"))
                    .json(&json!({"price": 9.75, "category": "snack"}))
                    .await;

                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(body["data"]["price"], 9.75);
                assert_eq!(body["data"]["category"], "snack");
                assert_eq!(body["data"]["name"], "Food 01");
            }

            #[tokio::test]
            async fn test_rest_delete() {
                let (server, _uploads) = make_server().await;
                let created = create(&server, numbered_payload(1)).await;
                let path = format!("{FOODS}/{}", created["id"].as_str().unwrap());

                let response = server.delete(&path).await;
                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(body, json!({"success": true, "data": {}}));

                server
                    .get(&path)
                    .expect_failure()
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            // ==============================================================
            // Listing
            // ==============================================================

            #[tokio::test]
            async fn test_rest_list_select_sort_page() {
                let (server, _uploads) = make_server().await;
                seed_over_http(&server).await;

                let response = server
                    .get(FOODS)
                    .add_query_param("select", "name")
                    .add_query_param("sort", "-name")
                    .add_query_param("page", "2")
                    .add_query_param("limit", "5")
                    .await;

                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(body["success"], true);
                assert_eq!(body["count"], 5);
                assert_eq!(
                    body["pagination"],
                    json!({"next": {"page": 3, "limit": 5}, "prev": {"page": 1, "limit": 5}})
                );

                let data = body["data"].as_array().unwrap();
                assert_eq!(
                    names(data),
                    ["Food 07", "Food 06", "Food 05", "Food 04", "Food 03"]
                );
                for doc in data {
                    assert_eq!(keys(doc), ["id", "name"]);
                }
            }

            #[tokio::test]
            async fn test_rest_list_defaults() {
                let (server, _uploads) = make_server().await;
                seed_over_http(&server).await;

                let response = server.get(FOODS).await;

                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(body["count"], 10);
                assert_eq!(body["pagination"], json!({"next": {"page": 2, "limit": 10}}));
            }

            #[tokio::test]
            async fn test_rest_list_bracket_filters() {
                let (server, _uploads) = make_server().await;
                seed_over_http(&server).await;

                let response = server
                    .get(FOODS)
                    .add_query_param("price[lte]", "3.5")
                    .add_query_param("sort", "price")
                    .await;

                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(
                    names(body["data"].as_array().unwrap()),
                    ["Food 01", "Food 02", "Food 03"]
                );

                let response = server
                    .get(FOODS)
                    .add_query_param("category[in]", "veg,grain")
                    .add_query_param("calories[gt]", "90")
                    .add_query_param("sort", "name")
                    .await;

                let body: Value = response.json();
                assert_eq!(
                    names(body["data"].as_array().unwrap()),
                    ["Food 11", "Food 12"]
                );
            }

            #[tokio::test]
            async fn test_rest_list_invalid_operator() {
                let (server, _uploads) = make_server().await;

                let response = server
                    .get(FOODS)
                    .add_query_param("price[between]", "1")
                    .expect_failure()
                    .await;

                response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
                let body: Value = response.json();
                assert_eq!(body["success"], false);
                assert_eq!(body["code"], "INVALID_FILTER_SYNTAX");
            }

            #[tokio::test]
            async fn test_rest_list_lenient_paging() {
                let (server, _uploads) = make_server().await;
                seed_over_http(&server).await;

                let response = server
                    .get(FOODS)
                    .add_query_param("page", "zero")
                    .add_query_param("limit", "-3")
                    .await;

                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(body["count"], 10);
            }

            // ==============================================================
            // Errors
            // ==============================================================

            #[tokio::test]
            async fn test_rest_error_not_found() {
                let (server, _uploads) = make_server().await;

                let response = server
                    .get(&format!("{FOODS}/{}", uuid::Uuid::new_v4()))
                    .expect_failure()
                    .await;

                response.assert_status(StatusCode::NOT_FOUND);
                let body: Value = response.json();
                assert_eq!(body["code"], "FOOD_NOT_FOUND");
            }

            #[tokio::test]
            async fn test_rest_error_invalid_id() {
                let (server, _uploads) = make_server().await;

                let response = server
                    .get(&format!("{FOODS}/not-a-uuid"))
                    .expect_failure()
                    .await;

                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["code"], "INVALID_ID");
            }

            #[tokio::test]
            async fn test_rest_error_validation() {
                let (server, _uploads) = make_server().await;

                let response = server
                    .post(FOODS)
                    .json(&json!({"name": "x".repeat(51), "description": "too long a name"}))
                    .expect_failure()
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["code"], "VALIDATION_ERROR");
                assert!(body["details"]["fields"].is_array());

                let response = server
                    .post(FOODS)
                    .json(&json!({"name": "No description"}))
                    .expect_failure()
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
            }

            #[tokio::test]
            async fn test_rest_error_blank_text() {
                let (server, _uploads) = make_server().await;

                let response = server
                    .post(FOODS)
                    .json(&json!({"name": "   ", "description": "  x "}))
                    .expect_failure()
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["code"], "VALIDATION_ERROR");

                let created = create(&server, numbered_payload(1)).await;
                let response = server
                    .put(&format!("{FOODS}/{}", created["id"].as_str().unwrap()))
                    .json(&json!({"description": "   "}))
                    .expect_failure()
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);

                let body: Value = server.get(FOODS).await.json();
                assert_eq!(body["count"], 1);
            }

            #[tokio::test]
            async fn test_rest_error_malformed_json() {
                let (server, _uploads) = make_server().await;

                let response = server
                    .post(FOODS)
                    .bytes(axum::body::Bytes::from_static(b"{\"name\": "))
                    .content_type("application/json")
                    .expect_failure()
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["success"], false);
                assert_eq!(body["code"], "VALIDATION_ERROR");

                let created = create(&server, numbered_payload(1)).await;
                let response = server
                    .put(&format!("{FOODS}/{}", created["id"].as_str().unwrap()))
                    .text("price=3")
                    .expect_failure()
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["code"], "VALIDATION_ERROR");
            }

            #[tokio::test]
            async fn test_rest_error_duplicate_name() {
                let (server, _uploads) = make_server().await;
                create(&server, numbered_payload(1)).await;

                let response = server
                    .post(FOODS)
                    .json(&numbered_payload(1))
                    .expect_failure()
                    .await;

                response.assert_status(StatusCode::CONFLICT);
                let body: Value = response.json();
                assert_eq!(body["code"], "FOOD_ALREADY_EXISTS");
            }

            // ==============================================================
            // Uploads
            // ==============================================================

            fn photo_form(name: &str, mime: &str, size: usize) -> MultipartForm {
                let part = Part::bytes(vec![7u8; size]).file_name(name).mime_type(mime);
                MultipartForm::new().add_part("file", part)
            }

            #[tokio::test]
            async fn test_rest_upload_photo() {
                let (server, uploads) = make_server().await;
                let created = create(&server, numbered_payload(1)).await;
                let id = created["id"].as_str().unwrap();

                let response = server
                    .put(&format!("{FOODS}/{id}/photo"))
                    .multipart(photo_form("Kale.PNG", "image/png", 64))
                    .await;

                response.assert_status_ok();
                let body: Value = response.json();
                let expected = format!("photo_{id}.png");
                assert_eq!(body, json!({"success": true, "data": expected}));
                assert_eq!(std::fs::read(uploads.path().join(&expected)).unwrap().len(), 64);

                let body: Value = server.get(&format!("{FOODS}/{id}")).await.json();
                assert_eq!(body["data"]["photo"], expected);
            }

            #[tokio::test]
            async fn test_rest_upload_rejects_bad_files() {
                let (server, _uploads) = make_server().await;
                let created = create(&server, numbered_payload(1)).await;
                let path = format!("{FOODS}/{}/photo", created["id"].as_str().unwrap());

                let response = server
                    .put(&path)
                    .multipart(photo_form("notes.txt", "text/plain", 8))
                    .expect_failure()
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["code"], "UPLOAD_NOT_AN_IMAGE");

                let response = server
                    .put(&path)
                    .multipart(photo_form("big.png", "image/png", 2048))
                    .expect_failure()
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["code"], "UPLOAD_TOO_LARGE");

                let response = server
                    .put(&path)
                    .multipart(MultipartForm::new().add_text("caption", "no file here"))
                    .expect_failure()
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["code"], "UPLOAD_MISSING_FILE");
            }

            // ==============================================================
            // Health
            // ==============================================================

            #[tokio::test]
            async fn test_rest_health() {
                let (server, _uploads) = make_server().await;

                for path in ["/health", "/healthz"] {
                    let body: Value = server.get(path).await.json();
                    assert_eq!(body, json!({"status": "ok", "service": "foods-api"}));
                }
            }
        }
    };
}
