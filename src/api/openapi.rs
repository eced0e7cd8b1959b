//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, equipment, health, holdings};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Athletic Inventory API",
        version = "0.1.0",
        description = "Athletic equipment catalog and personal holdings"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::register,
        auth::me,
        // Catalog
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::delete_equipment,
        // Holdings
        holdings::my_equipment,
        holdings::collect,
        holdings::replace,
    ),
    components(
        schemas(
            // Auth
            auth::LoginResponse,
            auth::SessionInfo,
            auth::RegisterResponse,
            crate::models::user::LoginRequest,
            crate::models::user::RegisterUser,
            crate::models::user::Role,
            // Catalog
            crate::models::equipment::Equipment,
            crate::models::equipment::CatalogEntry,
            crate::models::equipment::CreateEquipment,
            // Holdings
            crate::models::user::Holding,
            crate::models::user::HoldingEntry,
            crate::models::user::CollectRequest,
            crate::models::user::ReplaceRequest,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Login and registration"),
        (name = "equipment", description = "Equipment catalog"),
        (name = "holdings", description = "Personal equipment holdings")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
