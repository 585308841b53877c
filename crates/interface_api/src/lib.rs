//! HTTP API Layer
//!
//! This crate provides the REST API for the garments financial core using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for accounts, documents, ledger, and tax
//! - **Middleware**: Authentication, authorization, tracing, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(pool, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;

use axum::{
    Router,
    routing::{get, post, put, delete},
    middleware as axum_middleware,
};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;
use tower_http::cors::{CorsLayer, Any};

use crate::config::ApiConfig;
use crate::middleware::{auth_middleware, audit_middleware};
use crate::handlers::{accounts, documents, health, ledger, tax};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `config` - API configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(pool: PgPool, config: ApiConfig) -> Router {
    let state = AppState { pool, config };

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Chart-of-accounts routes
    let account_routes = Router::new()
        .route("/", post(accounts::create_account))
        .route("/", get(accounts::list_accounts))
        .route("/:code", get(accounts::get_account))
        .route("/:code", delete(accounts::deactivate_account))
        .route("/:code/balance", get(ledger::account_balance));

    // Document lifecycle routes
    let document_routes = Router::new()
        .route("/", post(documents::create_document))
        .route("/", get(documents::list_documents))
        .route("/:id", get(documents::get_document))
        .route("/:id", put(documents::update_document))
        .route("/:id", delete(documents::delete_document))
        .route("/:id/confirm", post(documents::confirm_document))
        .route("/:id/ship", post(documents::ship_document))
        .route("/:id/complete", post(documents::complete_document))
        .route("/:id/cancel", post(documents::cancel_document))
        .route("/:id/payments", post(documents::record_payment))
        .route("/:id/payments", get(documents::list_payments));

    // Ledger posting and reporting routes
    let ledger_routes = Router::new()
        .route("/batches", post(ledger::post_batch))
        .route("/batches/:id", get(ledger::get_batch))
        .route("/batches/:id/reverse", post(ledger::reverse_batch))
        .route("/trial-balance", get(ledger::trial_balance));

    // Tax preview routes
    let tax_routes = Router::new().route("/calculate", post(tax::preview));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/accounts", account_routes)
        .nest("/documents", document_routes)
        .nest("/ledger", ledger_routes)
        .nest("/tax", tax_routes)
        .layer(axum_middleware::from_fn_with_state(state.clone(), audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
