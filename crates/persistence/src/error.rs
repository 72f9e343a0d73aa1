//! # Persistence Errors
//!
//! Error types cho persistence layer, wrapping rusqlite errors.

use thiserror::Error;

/// Persistence layer errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    // === Database errors ===
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Batch operation {index} ({operation}) failed: {message}")]
    BatchFailed {
        index: usize,
        operation: &'static str,
        message: String,
    },

    #[error("Inconsistent order lines: order_number differs from order for line ids {0:?}")]
    InconsistentOrderLines(Vec<i64>),

    // === Restricted operations ===
    #[error("For safety reasons, only SELECT queries are allowed")]
    ReadOnlyViolation,

    // === Initialization errors ===
    #[error("Failed to initialize database: {0}")]
    Initialization(String),
}

/// Result type alias cho PersistenceError
pub type PersistenceResult<T> = Result<T, PersistenceError>;

impl PersistenceError {
    /// Tạo NotFound error
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Tạo Initialization error từ lỗi bất kỳ
    pub fn initialization(err: impl std::fmt::Display) -> Self {
        Self::Initialization(err.to_string())
    }

    /// Kiểm tra có phải lỗi not found không
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Kiểm tra có phải lỗi database không
    pub fn is_database_error(&self) -> bool {
        matches!(self, Self::Database(_) | Self::BatchFailed { .. })
    }

    /// Query bị từ chối vì không phải read-only
    pub fn is_restricted(&self) -> bool {
        matches!(self, Self::ReadOnlyViolation)
    }
}
