//! API handlers for the JSON REST endpoints

pub mod auth;
pub mod equipment;
pub mod health;
pub mod holdings;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::CookieJar;

use crate::{error::AppError, models::user::SessionClaims, AppState};

/// Name of the cookie carrying the session token in the form UI
pub const SESSION_COOKIE: &str = "session";

/// Extractor for a logged-in session, from a Bearer token or the session cookie
pub struct AuthenticatedUser(pub SessionClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = session_token(parts)
            .ok_or_else(|| AppError::Authentication("Missing session token".to_string()))?;

        let claims = state.services.auth.verify_token(&token)?;
        Ok(AuthenticatedUser(claims))
    }
}

/// Session if one is present and valid; `None` means logged out
pub struct MaybeAuthenticated(pub Option<SessionClaims>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthenticated {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = session_token(parts).and_then(|token| state.services.auth.verify_token(&token).ok());
        Ok(MaybeAuthenticated(claims))
    }
}

fn session_token(parts: &Parts) -> Option<String> {
    if let Some(header) = parts.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        if let Some(token) = header.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    CookieJar::from_headers(&parts.headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}
