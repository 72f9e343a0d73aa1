//! SQL console (read-only)

use crate::error::{EditorError, EditorResult, ValidationError};
use wms_persistence::{Database, QueryResult};

/// Text mẫu hiển thị khi mở console
pub const TEMPLATE: &str = "-- Enter your SQL query here\n\
-- Example: SELECT * FROM items;\n\
-- SELECT * FROM users;\n\
-- SELECT * FROM orders;\n\
-- SELECT * FROM order_lines;\n";

/// Query text + kết quả và status line của lần chạy gần nhất
#[derive(Debug, Clone, Default)]
pub struct SqlConsole {
    text: String,
    result: Option<QueryResult>,
    status: String,
}

impl SqlConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn result(&self) -> Option<&QueryResult> {
        self.result.as_ref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Chạy query hiện tại.
    ///
    /// Text rỗng hoặc chỉ là comment bị từ chối; statement không phải
    /// SELECT / WITH bị từ chối trước khi thực thi.
    pub fn execute(&mut self, db: &Database) -> EditorResult<&QueryResult> {
        let text = self.text.trim();
        if text.is_empty() || text.starts_with("--") {
            let err = ValidationError::EmptyQuery;
            self.status = err.to_string();
            return Err(err.into());
        }

        self.result = None;
        match db.execute_read_only(text) {
            Ok(result) => {
                self.status = result.summary();
                Ok(self.result.insert(result))
            }
            Err(e) if e.is_restricted() => {
                self.status = e.to_string();
                Err(EditorError::Store(e))
            }
            Err(e) => {
                self.status = format!("Error: {}", e);
                Err(EditorError::Store(e))
            }
        }
    }

    /// Xóa text, kết quả và status
    pub fn clear(&mut self) {
        self.text.clear();
        self.result = None;
        self.status.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select() {
        let db = Database::open_in_memory().unwrap();
        let mut console = SqlConsole::new();
        console.set_text("SELECT * FROM items");

        let result = console.execute(&db).unwrap();
        assert_eq!(result.row_count, 3);
        assert!(console
            .status()
            .starts_with("Query executed successfully. Returned 3 rows."));
    }

    #[test]
    fn test_template_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let mut console = SqlConsole::new();
        console.set_text(TEMPLATE);
        assert!(console.execute(&db).unwrap_err().is_validation());
        assert_eq!(console.status(), "Please enter a valid SQL query.");
    }

    #[test]
    fn test_delete_is_restricted() {
        let db = Database::open_in_memory().unwrap();
        let mut console = SqlConsole::new();
        console.set_text("DELETE FROM items");

        let err = console.execute(&db).unwrap_err();
        assert!(err.is_restricted());
        assert!(console.result().is_none());
        assert_eq!(db.counts().unwrap().items, 3);
    }

    #[test]
    fn test_store_error_and_clear() {
        let db = Database::open_in_memory().unwrap();
        let mut console = SqlConsole::new();
        console.set_text("SELECT nope FROM items");
        assert!(console.execute(&db).unwrap_err().is_store());
        assert!(console.status().starts_with("Error: "));

        console.clear();
        assert_eq!(console.text(), "");
        assert_eq!(console.status(), "");
    }
}
