//! # Error Module
//!
//! Domain errors cho WMS core, dùng thiserror.

use thiserror::Error;

/// Core domain errors.
///
/// Lỗi khi chuyển đổi giá trị field, không liên quan đến infrastructure.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    // === Field errors ===
    #[error("Invalid value for {entity}.{field}: expected {expected}, got '{value}'")]
    InvalidFieldValue {
        entity: &'static str,
        field: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("Field {entity}.{field} is read-only")]
    ReadOnlyField {
        entity: &'static str,
        field: &'static str,
    },

    // === Enum errors ===
    #[error("Unknown order type: {0} (expected 'to' or 'from')")]
    UnknownOrderType(String),
}

/// Result type alias với CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Tạo InvalidFieldValue error
    pub fn invalid_field(
        entity: &'static str,
        field: &'static str,
        expected: &'static str,
        value: impl ToString,
    ) -> Self {
        Self::InvalidFieldValue {
            entity,
            field,
            expected,
            value: value.to_string(),
        }
    }

    /// Kiểm tra có phải lỗi field value không
    pub fn is_field_error(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidFieldValue { .. } | CoreError::ReadOnlyField { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_field("item", "quantity", "integer", "abc");
        assert_eq!(
            err.to_string(),
            "Invalid value for item.quantity: expected integer, got 'abc'"
        );
        assert!(err.is_field_error());

        let err = CoreError::UnknownOrderType("sideways".to_string());
        assert!(err.to_string().contains("sideways"));
        assert!(!err.is_field_error());
    }
}
