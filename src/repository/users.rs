//! User accounts file

use std::path::PathBuf;

use super::store::JsonFile;
use crate::{error::AppResult, models::user::UserDirectory};

#[derive(Clone)]
pub struct UsersRepository {
    file: JsonFile<UserDirectory>,
}

impl UsersRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }

    /// Load every account
    pub async fn load(&self) -> AppResult<UserDirectory> {
        self.file.load().await
    }

    /// Overwrite the users file
    pub async fn save(&self, users: &UserDirectory) -> AppResult<()> {
        self.file.save(users).await
    }
}
