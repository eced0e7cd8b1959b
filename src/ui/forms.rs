//! HTML form payloads
//!
//! Numeric and date fields arrive as raw strings so that bad input is
//! reported inline on the page instead of rejecting the request.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::CreateEquipment,
        user::{LoginRequest, RegisterUser, Role},
    },
};

/// Layout produced by `<input type="date">`
const HTML_DATE: &str = "%Y-%m-%d";

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub role: Role,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl From<LoginForm> for LoginRequest {
    fn from(form: LoginForm) -> Self {
        LoginRequest {
            role: form.role,
            username: form.username,
            password: form.password,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub new_username: String,
    #[serde(default)]
    pub new_password: String,
}

impl From<RegisterForm> for RegisterUser {
    fn from(form: RegisterForm) -> Self {
        RegisterUser {
            username: form.new_username,
            password: form.new_password,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PanelQuery {
    pub action: Option<String>,
    pub equipment_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InsertForm {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub date: String,
}

impl TryFrom<InsertForm> for CreateEquipment {
    type Error = AppError;

    fn try_from(form: InsertForm) -> AppResult<Self> {
        let price = match form.price.trim() {
            "" => Decimal::ZERO,
            raw => Decimal::from_str(raw)
                .map_err(|_| AppError::Validation(format!("Invalid price: {}", raw)))?,
        };
        let quantity = parse_quantity(&form.quantity, 0)?;
        let date = match form.date.trim() {
            "" => None,
            raw => Some(
                NaiveDate::parse_from_str(raw, HTML_DATE)
                    .map_err(|_| AppError::Validation(format!("Invalid date: {}", raw)))?,
            ),
        };

        Ok(CreateEquipment {
            id: form.id,
            name: form.name,
            category: form.category,
            price,
            quantity,
            date,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct CollectForm {
    pub equipment_id: String,
    #[serde(default)]
    pub quantity: String,
}

impl CollectForm {
    pub fn quantity(&self) -> AppResult<u32> {
        parse_quantity(&self.quantity, 1)
    }
}

#[derive(Debug, Deserialize)]
pub struct ReplaceForm {
    pub old_id: String,
    pub new_id: String,
}

fn parse_quantity(raw: &str, default: u32) -> AppResult<u32> {
    match raw.trim() {
        "" => Ok(default),
        raw => raw
            .parse()
            .map_err(|_| AppError::Validation(format!("Invalid quantity: {}", raw))),
    }
}

/// Today's date in the layout expected by `<input type="date">`
pub fn html_today() -> String {
    chrono::Local::now().date_naive().format(HTML_DATE).to_string()
}
