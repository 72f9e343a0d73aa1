//! Configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;

/// Cấu hình của `wms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("data/wms.db"),
            log_level: "info".to_string(),
            user: None,
            password: None,
        }
    }
}

impl AppConfig {
    /// Load config từ environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            db_path: env::var("WMS_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            log_level: env::var("WMS_LOG_LEVEL").unwrap_or(defaults.log_level),
            user: env::var("WMS_USER").ok(),
            password: env::var("WMS_PASSWORD").ok(),
        }
    }

    /// Flags trên command line đè lên environment
    pub fn with_overrides(
        mut self,
        db: Option<PathBuf>,
        user: Option<String>,
        password: Option<String>,
    ) -> Self {
        if let Some(db) = db {
            self.db_path = db;
        }
        if user.is_some() {
            self.user = user;
        }
        if password.is_some() {
            self.password = password;
        }
        self
    }

    /// Max level cho subscriber; giá trị lạ rơi về INFO
    pub fn level(&self) -> Level {
        Level::from_str(self.log_level.trim()).unwrap_or(Level::INFO)
    }
}
