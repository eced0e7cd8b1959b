//! Personal holdings endpoints (registered users)

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::user::{CollectRequest, Holding, HoldingEntry, ReplaceRequest},
};

use super::AuthenticatedUser;

/// List my equipment
#[utoipa::path(
    get,
    path = "/me/equipment",
    tag = "holdings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Equipment held by the current user", body = Vec<HoldingEntry>),
        (status = 403, description = "Users only")
    )
)]
pub async fn my_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<HoldingEntry>>> {
    claims.require_user()?;
    let holdings = state.services.holdings.my_equipment(claims.username()).await?;
    Ok(Json(HoldingEntry::list(&holdings)))
}

/// Collect units from the catalog
#[utoipa::path(
    post,
    path = "/me/equipment/collect",
    tag = "holdings",
    security(("bearer_auth" = [])),
    request_body = CollectRequest,
    responses(
        (status = 200, description = "Updated holding", body = Holding),
        (status = 400, description = "Quantity below 1"),
        (status = 404, description = "Unknown equipment"),
        (status = 422, description = "Not enough stock")
    )
)]
pub async fn collect(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CollectRequest>,
) -> AppResult<Json<Holding>> {
    claims.require_user()?;
    let holding = state
        .services
        .holdings
        .collect(claims.username(), &request.equipment_id, request.quantity)
        .await?;
    Ok(Json(holding))
}

/// Replace a whole holding with another catalog item
#[utoipa::path(
    post,
    path = "/me/equipment/replace",
    tag = "holdings",
    security(("bearer_auth" = [])),
    request_body = ReplaceRequest,
    responses(
        (status = 200, description = "Resulting holding of the new item", body = Holding),
        (status = 404, description = "Holding or equipment not found"),
        (status = 422, description = "Not enough stock")
    )
)]
pub async fn replace(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<ReplaceRequest>,
) -> AppResult<Json<Holding>> {
    claims.require_user()?;
    let holding = state
        .services
        .holdings
        .replace(claims.username(), &request.old_id, &request.new_id)
        .await?;
    Ok(Json(holding))
}
