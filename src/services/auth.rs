//! Authentication, registration and session tokens

use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{LoginRequest, RegisterUser, Role, SessionClaims, UserAccount},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// True iff the pair matches the configured admin credential
    pub fn admin_login(&self, username: &str, password: &str) -> bool {
        username == self.config.admin_username && password == self.config.admin_password
    }

    /// True iff the account exists and the stored password matches exactly
    pub async fn user_login(&self, username: &str, password: &str) -> AppResult<bool> {
        let users = self.repository.lock().await.users().await?;
        Ok(users
            .get(username)
            .map(|account| account.password == password)
            .unwrap_or(false))
    }

    /// Check credentials for the requested role and issue a session token
    pub async fn login(&self, request: &LoginRequest) -> AppResult<(String, SessionClaims)> {
        let valid = match request.role {
            Role::Admin => self.admin_login(&request.username, &request.password),
            Role::User => self.user_login(&request.username, &request.password).await?,
        };
        if !valid {
            tracing::warn!("Failed {} login for {}", request.role.as_str(), request.username);
            return Err(AppError::Authentication("Invalid username or password".to_string()));
        }

        let claims = SessionClaims::new(&request.username, request.role, self.config.session_hours);
        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to sign session token: {}", e)))?;

        tracing::info!("{} logged in as {}", request.username, request.role.as_str());
        Ok((token, claims))
    }

    /// Decode and check a session token
    pub fn verify_token(&self, token: &str) -> AppResult<SessionClaims> {
        SessionClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))
    }

    /// Create an account with empty holdings
    pub async fn register(&self, request: RegisterUser) -> AppResult<()> {
        request.validate()?;

        let store = self.repository.lock().await;
        let mut users = store.users().await?;

        if users.contains_key(&request.username) {
            return Err(AppError::Conflict(
                "Username already exists. Please choose another one.".to_string(),
            ));
        }

        users.insert(request.username.clone(), UserAccount::new(request.password));
        store.save_users(&users).await?;

        tracing::info!("Registered user {}", request.username);
        Ok(())
    }
}
