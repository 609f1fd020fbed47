//! ServerBuilder for fluent API to build the foods HTTP server

use super::exposure::RestExposure;
use crate::config::AppConfig;
use crate::core::collection::Collection;
use crate::core::service::FoodService;
use anyhow::Result;
use axum::Router;
use axum::http::{Method, header::CONTENT_TYPE};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Builder for the foods HTTP server
///
/// # Example
///
/// ```ignore
/// ServerBuilder::new()
///     .with_config(AppConfig::default())
///     .with_collection(InMemoryCollection::new())
///     .serve("127.0.0.1:5000")
///     .await?;
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    collection: Option<Arc<dyn Collection>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with the default configuration
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            collection: None,
            custom_routes: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the collection backing the resource (required)
    pub fn with_collection(mut self, collection: impl Collection + 'static) -> Self {
        self.collection = Some(Arc::new(collection));
        self
    }

    /// Set an already shared collection
    pub fn with_shared_collection(mut self, collection: Arc<dyn Collection>) -> Self {
        self.collection = Some(collection);
        self
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the service the routes are bound to
    pub fn build_service(&self) -> Result<FoodService> {
        let collection = self
            .collection
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Collection is required. Call .with_collection()"))?;

        Ok(FoodService::new(collection, &self.config))
    }

    /// Build the final REST router with tracing and CORS layers
    pub fn build(mut self) -> Result<Router> {
        let service = self.build_service()?;
        let custom_routes = std::mem::take(&mut self.custom_routes);

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([CONTENT_TYPE])
            .max_age(Duration::from_secs(60 * 60));

        Ok(RestExposure::build_router(service, custom_routes)
            .layer(cors)
            .layer(TraceLayer::new_for_http()))
    }

    /// Serve on the configured host and port
    pub async fn serve_configured(self) -> Result<()> {
        let addr = self.config.server.addr();
        self.serve(&addr).await
    }

    /// Serve the application with graceful shutdown
    ///
    /// Handles SIGTERM and SIGINT (Ctrl+C).
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
