//! Login form

use crate::error::{EditorResult, ValidationError};
use tracing::{info, warn};
use wms_core::User;
use wms_persistence::{Database, UserRepo};

/// Form đăng nhập: username, password và status line
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    username: String,
    password: String,
    status: Option<String>,
}

impl LoginForm {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            status: None,
        }
    }

    pub fn set_username(&mut self, username: &str) {
        self.username = username.to_string();
    }

    pub fn set_password(&mut self, password: &str) {
        self.password = password.to_string();
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Status line sau lần thử gần nhất
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Kiểm tra credentials.
    ///
    /// Thất bại: status "Invalid username or password", chỉ password bị xóa.
    pub fn attempt_login(&mut self, db: &Database) -> EditorResult<User> {
        if self.username.is_empty() || self.password.is_empty() {
            let err = ValidationError::MissingCredentials;
            self.status = Some(err.to_string());
            return Err(err.into());
        }

        let user = UserRepo::get_by_login(db.conn(), &self.username)?
            .filter(|user| user.verify(&self.password));

        match user {
            Some(user) => {
                info!(login = %user.login, "User logged in");
                self.status = None;
                self.password.clear();
                Ok(user)
            }
            None => {
                warn!(login = %self.username, "Login failed");
                let err = ValidationError::InvalidCredentials;
                self.status = Some(err.to_string());
                self.password.clear();
                Err(err.into())
            }
        }
    }
}
