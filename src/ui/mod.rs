//! Form-based HTML interface
//!
//! Pages are rendered server-side with Tera. The session lives in an
//! HttpOnly cookie holding the same signed token the JSON API accepts.

pub mod forms;
pub mod pages;

use axum::{
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tera::Tera;

use crate::{
    models::{equipment::Catalog, user::Holdings},
    AppState,
};

/// Compile the page templates bundled into the binary
pub fn templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../../templates/base.html")),
        ("catalog_table.html", include_str!("../../templates/catalog_table.html")),
        ("login.html", include_str!("../../templates/login.html")),
        ("panel.html", include_str!("../../templates/panel.html")),
    ])?;
    Ok(tera)
}

/// Routes serving the HTML pages
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/login", post(pages::login))
        .route("/register", post(pages::register))
        .route("/logout", post(pages::logout))
        .route("/panel", get(pages::panel))
        .route("/panel/insert", post(pages::insert))
        .route("/panel/delete", post(pages::delete))
        .route("/panel/collect", post(pages::collect))
        .route("/panel/replace", post(pages::replace))
}

/// Inline notice shown above the page content
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub kind: &'static str,
    pub text: String,
}

impl Message {
    pub fn success(text: impl Into<String>) -> Self {
        Self { kind: "success", text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: "error", text: text.into() }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self { kind: "warning", text: text.into() }
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub quantity: u32,
    pub date: String,
}

impl CatalogRow {
    pub fn rows(catalog: &Catalog) -> Vec<CatalogRow> {
        catalog
            .iter()
            .map(|(id, e)| CatalogRow {
                id: id.clone(),
                name: e.name.clone(),
                category: e.category.clone(),
                price: format!("{:.2}", e.price),
                quantity: e.quantity,
                date: e.date.format("%d/%m/%Y").to_string(),
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct HoldingRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub quantity: u32,
}

impl HoldingRow {
    pub fn rows(holdings: &Holdings) -> Vec<HoldingRow> {
        holdings
            .iter()
            .map(|(id, h)| HoldingRow {
                id: id.clone(),
                name: h.name.clone(),
                category: h.category.clone(),
                quantity: h.quantity,
            })
            .collect()
    }
}
