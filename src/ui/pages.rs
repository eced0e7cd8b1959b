//! Page handlers for the HTML interface

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;

use super::{
    forms::{self, CollectForm, DeleteForm, InsertForm, LoginForm, PanelQuery, RegisterForm, ReplaceForm},
    CatalogRow, HoldingRow, Message,
};
use crate::{
    api::{MaybeAuthenticated, SESSION_COOKIE},
    error::{AppError, AppResult},
    models::{
        equipment::CreateEquipment,
        user::{Action, Role, SessionClaims},
    },
    AppState,
};

#[derive(Serialize)]
struct LoginPage {
    role: &'static str,
    username: String,
    message: Option<Message>,
}

#[derive(Serialize)]
struct ActionOption {
    slug: &'static str,
    label: &'static str,
}

#[derive(Serialize)]
struct PanelPage {
    username: String,
    role: &'static str,
    actions: Vec<ActionOption>,
    action: &'static str,
    catalog: Vec<CatalogRow>,
    holdings: Vec<HoldingRow>,
    /// Collect form target and its stock
    selected_id: String,
    max_quantity: u32,
    message: Option<Message>,
    today: String,
}

/// Login page when logged out, the role's panel otherwise
pub async fn index(State(state): State<AppState>, MaybeAuthenticated(session): MaybeAuthenticated) -> Response {
    match session {
        Some(_) => Redirect::to("/panel").into_response(),
        None => render_login(&state, Role::Admin, String::new(), None),
    }
}

pub async fn login(State(state): State<AppState>, jar: CookieJar, Form(form): Form<LoginForm>) -> Response {
    let role = form.role;
    let username = form.username.clone();

    match state.services.auth.login(&form.into()).await {
        Ok((token, _)) => {
            let cookie = Cookie::build((SESSION_COOKIE, token))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax);
            (jar.add(cookie), Redirect::to("/panel")).into_response()
        }
        Err(AppError::Authentication(_)) => render_login(
            &state,
            role,
            username,
            Some(Message::error("Invalid username or password")),
        ),
        Err(e) => render_login(&state, role, username, Some(Message::error(e.user_message()))),
    }
}

pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    let message = match state.services.auth.register(form.into()).await {
        Ok(()) => Message::success("Registration successful. You can now login."),
        Err(e) => Message::error(e.user_message()),
    };
    render_login(&state, Role::User, String::new(), Some(message))
}

pub async fn logout(jar: CookieJar) -> Response {
    (jar.remove(Cookie::build(SESSION_COOKIE).path("/")), Redirect::to("/")).into_response()
}

/// Role panel with the selected action
pub async fn panel(
    State(state): State<AppState>,
    MaybeAuthenticated(session): MaybeAuthenticated,
    Query(query): Query<PanelQuery>,
) -> Response {
    let Some(claims) = session else {
        return Redirect::to("/").into_response();
    };

    let action = query
        .action
        .as_deref()
        .and_then(Action::from_slug)
        .filter(|action| claims.role.allows(*action))
        .unwrap_or_else(|| claims.role.default_action());

    render_panel(&state, &claims, action, query.equipment_id.as_deref(), None).await
}

pub async fn insert(
    State(state): State<AppState>,
    MaybeAuthenticated(session): MaybeAuthenticated,
    Form(form): Form<InsertForm>,
) -> Response {
    let Some(claims) = session else {
        return Redirect::to("/").into_response();
    };

    let result: AppResult<()> = async {
        claims.require_admin()?;
        let request = CreateEquipment::try_from(form)?;
        state.services.catalog.insert(request).await.map(|_| ())
    }
    .await;

    let message = outcome(result, "Equipment added successfully!");
    render_panel(&state, &claims, Action::Insert, None, Some(message)).await
}

pub async fn delete(
    State(state): State<AppState>,
    MaybeAuthenticated(session): MaybeAuthenticated,
    Form(form): Form<DeleteForm>,
) -> Response {
    let Some(claims) = session else {
        return Redirect::to("/").into_response();
    };

    let result: AppResult<()> = async {
        claims.require_admin()?;
        state.services.catalog.delete(&form.id).await
    }
    .await;

    let message = outcome(result, "Deleted successfully!");
    render_panel(&state, &claims, Action::Delete, None, Some(message)).await
}

pub async fn collect(
    State(state): State<AppState>,
    MaybeAuthenticated(session): MaybeAuthenticated,
    Form(form): Form<CollectForm>,
) -> Response {
    let Some(claims) = session else {
        return Redirect::to("/").into_response();
    };

    let result: AppResult<()> = async {
        claims.require_user()?;
        let quantity = form.quantity()?;
        state
            .services
            .holdings
            .collect(claims.username(), &form.equipment_id, quantity)
            .await
            .map(|_| ())
    }
    .await;

    let message = outcome(result, "Equipment collected successfully!");
    render_panel(&state, &claims, Action::Collect, Some(&form.equipment_id), Some(message)).await
}

pub async fn replace(
    State(state): State<AppState>,
    MaybeAuthenticated(session): MaybeAuthenticated,
    Form(form): Form<ReplaceForm>,
) -> Response {
    let Some(claims) = session else {
        return Redirect::to("/").into_response();
    };

    let result: AppResult<()> = async {
        claims.require_user()?;
        state
            .services
            .holdings
            .replace(claims.username(), &form.old_id, &form.new_id)
            .await
            .map(|_| ())
    }
    .await;

    let message = outcome(result, "Equipment replaced successfully!");
    render_panel(&state, &claims, Action::Replace, None, Some(message)).await
}

fn outcome(result: AppResult<()>, success: &str) -> Message {
    match result {
        Ok(()) => Message::success(success),
        Err(AppError::Conflict(msg)) => Message::warning(msg),
        Err(e) => Message::error(e.user_message()),
    }
}

fn render_login(state: &AppState, role: Role, username: String, message: Option<Message>) -> Response {
    render(
        state,
        "login.html",
        &LoginPage {
            role: role.as_str(),
            username,
            message,
        },
    )
}

/// `selected` picks the catalog row offered in the collect form; the first
/// row is used when it is absent or unknown.
async fn render_panel(
    state: &AppState,
    claims: &SessionClaims,
    action: Action,
    selected: Option<&str>,
    mut message: Option<Message>,
) -> Response {
    let mut catalog = Vec::new();
    let mut holdings = Vec::new();

    if matches!(
        action,
        Action::Display | Action::View | Action::Collect | Action::Replace
    ) {
        match state.services.catalog.list().await {
            Ok(c) => catalog = CatalogRow::rows(&c),
            Err(e) => message = Some(Message::error(e.user_message())),
        }
    }
    if matches!(action, Action::Replace | Action::MyEquipment) {
        match state.services.holdings.my_equipment(claims.username()).await {
            Ok(h) => holdings = HoldingRow::rows(&h),
            Err(e) => message = Some(Message::error(e.user_message())),
        }
    }

    let (selected_id, max_quantity) = catalog
        .iter()
        .find(|row| Some(row.id.as_str()) == selected)
        .or_else(|| catalog.first())
        .map(|row| (row.id.clone(), row.quantity))
        .unwrap_or_default();

    let page = PanelPage {
        username: claims.sub.clone(),
        role: claims.role.as_str(),
        actions: claims
            .role
            .actions()
            .iter()
            .map(|a| ActionOption {
                slug: a.slug(),
                label: a.label(),
            })
            .collect(),
        action: action.slug(),
        catalog,
        holdings,
        selected_id,
        max_quantity,
        message,
        today: forms::html_today(),
    };
    render(state, "panel.html", &page)
}

fn render<T: Serialize>(state: &AppState, template: &str, page: &T) -> Response {
    let rendered = tera::Context::from_serialize(page)
        .and_then(|context| state.templates.render(template, &context));

    match rendered {
        Ok(body) => Html(body).into_response(),
        Err(e) => AppError::Internal(format!("Failed to render {}: {}", template, e)).into_response(),
    }
}
