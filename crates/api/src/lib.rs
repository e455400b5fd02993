//! # DentalSync API
//!
//! The web server for the DentalSync clinic backend. It exposes free slot
//! lookup, booking checks and the appointment lifecycle over HTTP.
//!
//! ## Architecture
//!
//! - **Routes**: endpoint paths
//! - **Handlers**: request parsing and response shaping around [`BookingService`]
//! - **Middleware**: the request context extractor and error mapping
//! - **Config**: environment-driven settings
//!
//! Scheduling rules live in `dentalsync-core`. This crate only translates
//! between HTTP and those rules.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Request context extraction and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    BoxError, Router,
    error_handling::HandleErrorLayer,
    http::{HeaderValue, Method, StatusCode, header},
};
use dentalsync_core::{booking::BookingService, store::memory::InMemoryStore};
use dentalsync_db::store::PgStore;
use eyre::Result;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use crate::middleware::context::{ACTOR_ID_HEADER, ACTOR_ROLE_HEADER};

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub booking: BookingService,
}

impl ApiState {
    pub fn new(booking: BookingService) -> Self {
        Self { booking }
    }

    /// State backed by PostgreSQL for every collaborator.
    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self::new(BookingService::new(store.clone(), store.clone(), store))
    }

    /// State backed by a process-local store, used by tests and demos.
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self::new(BookingService::new(store.clone(), store.clone(), store))
    }
}

/// Builds the application router with every endpoint attached to `state`.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Free slots and booking checks
        .merge(routes::availability::routes())
        // Appointment lifecycle
        .merge(routes::appointment::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Starts the API server with the provided configuration and database connection
///
/// Installs the tracing subscriber at the configured level, layers CORS and
/// the request timeout over [`router`], then serves until the listener fails.
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState::postgres(db_pool));
    let app = router(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()?;
        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::OPTIONS,
            ])
            .allow_headers([
                header::CONTENT_TYPE,
                header::ACCEPT,
                header::HeaderName::from_static(ACTOR_ROLE_HEADER),
                header::HeaderName::from_static(ACTOR_ID_HEADER),
            ])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(|_: BoxError| async {
                StatusCode::REQUEST_TIMEOUT
            }))
            .timeout(Duration::from_secs(config.request_timeout)),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
