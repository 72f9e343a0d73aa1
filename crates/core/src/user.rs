//! # User Module
//!
//! Tài khoản đăng nhập. Password không bao giờ được lưu dạng plaintext,
//! chỉ lưu SHA-256 hex digest.

use crate::error::CoreResult;
use crate::record::{expect_id, into_text, FieldName, Record};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Tính SHA-256 digest (hex, lowercase) của password UTF-8
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// So sánh password với digest đã lưu
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    hash_password(password) == stored_hash
}

/// Fields của bảng `users`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserField {
    Id,
    Login,
    PasswordHash,
}

impl FieldName for UserField {
    fn all() -> &'static [Self] {
        &[UserField::Id, UserField::Login, UserField::PasswordHash]
    }

    fn column(&self) -> &'static str {
        match self {
            UserField::Id => "id",
            UserField::Login => "login",
            UserField::PasswordHash => "password",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            UserField::Id => "ID",
            UserField::Login => "Login",
            UserField::PasswordHash => "Password",
        }
    }

    fn is_key(&self) -> bool {
        matches!(self, UserField::Id)
    }
}

/// Người dùng của hệ thống
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Option<i64>,
    pub login: String,
    /// SHA-256 hex digest, không bao giờ là plaintext
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    /// Tạo user mới từ plaintext password (hash ngay lập tức)
    pub fn new(login: &str, password: &str) -> Self {
        Self {
            id: None,
            login: login.to_string(),
            password_hash: hash_password(password),
        }
    }

    /// Kiểm tra password
    pub fn verify(&self, password: &str) -> bool {
        verify_password(password, &self.password_hash)
    }
}

impl Record for User {
    type Field = UserField;

    const ENTITY: &'static str = "user";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn get(&self, field: UserField) -> Value {
        match field {
            UserField::Id => Value::from(self.id),
            UserField::Login => Value::from(self.login.as_str()),
            UserField::PasswordHash => Value::from(self.password_hash.as_str()),
        }
    }

    fn set(&mut self, field: UserField, value: Value) -> CoreResult<()> {
        match field {
            UserField::Id => self.id = expect_id(Self::ENTITY, "id", value)?,
            UserField::Login => self.login = into_text(value),
            UserField::PasswordHash => self.password_hash = into_text(value),
        }
        Ok(())
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "{} (#{})", self.login, id),
            None => write!(f, "{} (new)", self.login),
        }
    }
}
