//! Editor layer errors
//!
//! Bốn loại lỗi mà actor có thể sửa rồi thử lại: validation, guard,
//! store và restricted query.

use crate::schema::EditMode;
use thiserror::Error;
use wms_core::CoreError;
use wms_persistence::PersistenceError;

/// Input vi phạm rule cục bộ. Không có thay đổi state nào.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} is required.")]
    Required { field: &'static str },

    #[error("{field} must be greater than zero.")]
    NotPositive { field: &'static str },

    #[error("{field} cannot be negative.")]
    Negative { field: &'static str },

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("{field} already exists: {value}")]
    Duplicate { field: &'static str, value: String },

    #[error("Unknown {field}: {value}")]
    UnknownReference { field: &'static str, value: String },

    #[error("Please select an item.")]
    ItemNotSelected,

    #[error("Please enter both username and password")]
    MissingCredentials,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Please enter a valid SQL query.")]
    EmptyQuery,

    #[error("Please enter an order number to search.")]
    EmptyOrderNumber,

    #[error("Order number not found.")]
    OrderNotFound { order_number: String },

    #[error("Invalid order ID.")]
    InvalidOrderId { id: i64 },

    #[error("No order is loaded.")]
    NoParentOrder,

    #[error("{0}")]
    InvalidValue(#[from] CoreError),
}

/// Mutation vi phạm invariant giữa các entities
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuardError {
    #[error("This item cannot be deleted because it is used in {count} order lines.")]
    ItemInUse { code: String, count: i64 },

    #[error("This order cannot be deleted because it has {count} order lines.")]
    OrderHasLines { order_number: String, count: i64 },

    #[error("Cannot delete the last user in the system.")]
    LastUser,

    #[error("Cannot delete the admin user.")]
    ProtectedAdmin,
}

/// Editor operation errors
#[derive(Debug, Error)]
pub enum EditorError {
    // === Actor errors ===
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Guard(#[from] GuardError),

    #[error("Please select {} {entity} to {action}.", article(.entity))]
    SelectionRequired {
        entity: &'static str,
        action: &'static str,
    },

    #[error("Cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: EditMode,
    },

    #[error("Row {index} out of range ({count} rows)")]
    RowOutOfRange { index: usize, count: usize },

    #[error("Please log in first")]
    NotLoggedIn,

    // === Store errors ===
    #[error(transparent)]
    Store(#[from] PersistenceError),

    #[error("Failed to save row {row}: {source}")]
    Submit {
        row: usize,
        #[source]
        source: PersistenceError,
    },
}

/// Result type alias cho editor operations
pub type EditorResult<T> = Result<T, EditorError>;

fn article(entity: &str) -> &'static str {
    match entity.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

impl From<CoreError> for EditorError {
    fn from(err: CoreError) -> Self {
        Self::Validation(ValidationError::InvalidValue(err))
    }
}

impl EditorError {
    /// Tạo SelectionRequired error
    pub fn selection_required(entity: &'static str, action: &'static str) -> Self {
        Self::SelectionRequired { entity, action }
    }

    /// Lỗi input của actor (validation hoặc thiếu selection)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::SelectionRequired { .. }
                | Self::InvalidState { .. }
                | Self::RowOutOfRange { .. }
        )
    }

    /// Mutation bị guard từ chối
    pub fn is_guard(&self) -> bool {
        matches!(self, Self::Guard(_))
    }

    /// Store từ chối operation
    pub fn is_store(&self) -> bool {
        match self {
            Self::Store(e) => !e.is_restricted(),
            Self::Submit { .. } => true,
            _ => false,
        }
    }

    /// Query ad-hoc không phải read-only
    pub fn is_restricted(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_restricted())
    }

    /// ValidationError nếu có
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }

    /// GuardError nếu có
    pub fn guard(&self) -> Option<&GuardError> {
        match self {
            Self::Guard(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = GuardError::ItemInUse {
            code: "IT001".to_string(),
            count: 1,
        };
        assert_eq!(
            err.to_string(),
            "This item cannot be deleted because it is used in 1 order lines."
        );

        let err = EditorError::selection_required("item", "edit");
        assert_eq!(err.to_string(), "Please select an item to edit.");
        let err = EditorError::selection_required("user", "delete");
        assert_eq!(err.to_string(), "Please select a user to delete.");

        let err: EditorError = ValidationError::NotPositive { field: "Quantity" }.into();
        assert_eq!(err.to_string(), "Quantity must be greater than zero.");
    }

    #[test]
    fn test_classifiers() {
        let err: EditorError = GuardError::LastUser.into();
        assert!(err.is_guard());
        assert!(!err.is_validation());

        let err: EditorError = PersistenceError::ReadOnlyViolation.into();
        assert!(err.is_restricted());
        assert!(!err.is_store());

        let err = EditorError::Submit {
            row: 0,
            source: PersistenceError::not_found("Item", 9),
        };
        assert!(err.is_store());

        let err: EditorError = CoreError::UnknownOrderType("in".to_string()).into();
        assert!(err.is_validation());
    }
}
