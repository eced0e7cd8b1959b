//! User accounts, holdings and session claims

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// User accounts keyed by username
pub type UserDirectory = IndexMap<String, UserAccount>;

/// Holdings keyed by equipment ID
pub type Holdings = IndexMap<String, Holding>;

/// Registered user as stored in the users file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Plaintext, compared verbatim at login
    pub password: String,
    #[serde(rename = "equipment", default)]
    pub holdings: Holdings,
}

impl UserAccount {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            holdings: Holdings::new(),
        }
    }

    pub fn held_quantity(&self, equipment_id: &str) -> u32 {
        self.holdings.get(equipment_id).map(|h| h.quantity).unwrap_or(0)
    }
}

/// Snapshot of a catalog record taken when equipment is collected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Holding {
    #[serde(rename = "Equipment_name")]
    pub name: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Quantity")]
    pub quantity: u32,
}

/// Holding together with its equipment ID
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HoldingEntry {
    pub id: String,
    #[serde(flatten)]
    pub holding: Holding,
}

impl HoldingEntry {
    pub fn list(holdings: &Holdings) -> Vec<HoldingEntry> {
        holdings
            .iter()
            .map(|(id, holding)| HoldingEntry {
                id: id.clone(),
                holding: holding.clone(),
            })
            .collect()
    }
}

/// Session role. Fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// Panel actions offered to each role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Display,
    Insert,
    Delete,
    View,
    Collect,
    Replace,
    MyEquipment,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::Display => "Display Equipment",
            Action::Insert => "Insert Equipment",
            Action::Delete => "Delete Equipment",
            Action::View => "View Equipment",
            Action::Collect => "Collect Equipment",
            Action::Replace => "Replace Equipment",
            Action::MyEquipment => "My Equipment",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Action::Display => "display",
            Action::Insert => "insert",
            Action::Delete => "delete",
            Action::View => "view",
            Action::Collect => "collect",
            Action::Replace => "replace",
            Action::MyEquipment => "my_equipment",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Action> {
        [
            Action::Display,
            Action::Insert,
            Action::Delete,
            Action::View,
            Action::Collect,
            Action::Replace,
            Action::MyEquipment,
        ]
        .into_iter()
        .find(|action| action.slug() == slug)
    }
}

impl Role {
    pub fn actions(&self) -> &'static [Action] {
        match self {
            Role::Admin => &[Action::Display, Action::Insert, Action::Delete],
            Role::User => &[
                Action::View,
                Action::Collect,
                Action::Replace,
                Action::MyEquipment,
            ],
        }
    }

    /// Action shown when none (or a foreign one) is requested
    pub fn default_action(&self) -> Action {
        self.actions()[0]
    }

    pub fn allows(&self, action: Action) -> bool {
        self.actions().contains(&action)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

/// Login request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub role: Role,
    pub username: String,
    pub password: String,
}

/// Self-registration request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterUser {
    #[validate(length(min = 1, message = "Username must not be empty"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// Collect request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CollectRequest {
    pub equipment_id: String,
    pub quantity: u32,
}

/// Replace request: swap the whole holding of `old_id` for `new_id`
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReplaceRequest {
    pub old_id: String,
    pub new_id: String,
}

/// JWT claims identifying a logged-in session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn new(username: &str, role: Role, valid_hours: u64) -> Self {
        let now = chrono::Utc::now();
        // Oversized lifetimes saturate at the latest representable instant
        let exp = i64::try_from(valid_hours)
            .ok()
            .and_then(chrono::Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .unwrap_or(chrono::DateTime::<chrono::Utc>::MAX_UTC);
        Self {
            sub: username.to_string(),
            role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn username(&self) -> &str {
        &self.sub
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        match self.role {
            Role::Admin => Ok(()),
            Role::User => Err(AppError::Authorization(
                "Administrator privileges required".to_string(),
            )),
        }
    }

    pub fn require_user(&self) -> Result<(), AppError> {
        match self.role {
            Role::User => Ok(()),
            Role::Admin => Err(AppError::Authorization(
                "Only registered users hold equipment".to_string(),
            )),
        }
    }
}
