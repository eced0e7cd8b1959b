//! Athletic equipment inventory
//!
//! An administrator manages a shared equipment catalog; registered users
//! collect units into a personal holding or swap one holding for another.
//! State lives in two JSON files. The server offers a form-based HTML UI
//! and a JSON REST API over the same services.

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod ui;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub templates: Arc<tera::Tera>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, tera::Error> {
        let services = services::Services::new(&config);
        Ok(Self {
            config: Arc::new(config),
            services: Arc::new(services),
            templates: Arc::new(ui::templates()?),
        })
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/register", post(api::auth::register))
        .route("/auth/me", get(api::auth::me))
        // Catalog
        .route("/equipment", get(api::equipment::list_equipment))
        .route("/equipment", post(api::equipment::create_equipment))
        .route("/equipment/:id", get(api::equipment::get_equipment))
        .route("/equipment/:id", delete(api::equipment::delete_equipment))
        // Holdings
        .route("/me/equipment", get(api::holdings::my_equipment))
        .route("/me/equipment/collect", post(api::holdings::collect))
        .route("/me/equipment/replace", post(api::holdings::replace))
        .layer(cors);

    Router::new()
        .merge(ui::routes())
        .nest("/api/v1", api_v1)
        .with_state(state)
        .merge(api::openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
}
