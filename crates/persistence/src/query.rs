//! Ad-hoc read-only queries
//!
//! Chỉ chấp nhận statement bắt đầu bằng SELECT hoặc WITH, và statement
//! sau khi prepare phải là read-only.

use crate::error::{PersistenceError, PersistenceResult};
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Một ô trong kết quả query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl From<ValueRef<'_>> for Cell {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Cell::Null,
            ValueRef::Integer(n) => Cell::Integer(n),
            ValueRef::Real(f) => Cell::Real(f),
            ValueRef::Text(t) => Cell::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Cell::Blob(b.to_vec()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => write!(f, "NULL"),
            Cell::Integer(n) => write!(f, "{}", n),
            Cell::Real(x) => write!(f, "{}", x),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

/// Kết quả dạng bảng
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    pub row_count: usize,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl QueryResult {
    /// Status line: "Query executed successfully. Returned 3 rows. Execution time: 0 ms."
    pub fn summary(&self) -> String {
        format!(
            "Query executed successfully. Returned {} {}. Execution time: {} ms.",
            self.row_count,
            if self.row_count == 1 { "row" } else { "rows" },
            self.elapsed.as_millis()
        )
    }
}

/// Text có bắt đầu bằng SELECT / WITH không (không phân biệt hoa thường)
pub fn is_read_statement(text: &str) -> bool {
    let upper = text.trim().to_uppercase();
    upper.starts_with("SELECT") || upper.starts_with("WITH")
}

/// Còn statement nào sau dấu `;` đầu tiên không.
///
/// Bỏ qua `;` nằm trong string / identifier có quote và trong comment.
pub fn has_trailing_statement(text: &str) -> bool {
    let mut chars = text.chars().peekable();
    let mut ended = false;

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' | '`' => {
                if ended {
                    return true;
                }
                for next in chars.by_ref() {
                    if next == c {
                        break;
                    }
                }
            }
            '-' if chars.peek() == Some(&'-') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = ' ';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            ';' => ended = true,
            c if c.is_whitespace() => {}
            _ if ended => return true,
            _ => {}
        }
    }
    false
}

/// Chạy query read-only, từ chối mọi statement khác trước khi thực thi
pub fn execute_read_only(conn: &Connection, text: &str) -> PersistenceResult<QueryResult> {
    let text = text.trim();
    if !is_read_statement(text) {
        warn!("Rejected non-read query");
        return Err(PersistenceError::ReadOnlyViolation);
    }

    // prepare chỉ giữ statement đầu tiên
    if has_trailing_statement(text) {
        warn!("Rejected query with more than one statement");
        return Err(PersistenceError::ReadOnlyViolation);
    }

    let started = Instant::now();
    let mut stmt = conn.prepare(text)?;
    // "WITH ... DELETE" cũng bắt đầu bằng WITH
    if !stmt.readonly() {
        warn!("Rejected query that writes");
        return Err(PersistenceError::ReadOnlyViolation);
    }

    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let width = columns.len();

    let mut rows = Vec::new();
    let mut cursor = stmt.query([])?;
    while let Some(row) = cursor.next()? {
        let mut cells = Vec::with_capacity(width);
        for i in 0..width {
            cells.push(Cell::from(row.get_ref(i)?));
        }
        rows.push(cells);
    }

    let elapsed = started.elapsed();
    let row_count = rows.len();
    debug!(row_count, elapsed_ms = elapsed.as_millis() as u64, "query executed");

    Ok(QueryResult {
        columns,
        rows,
        row_count,
        elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::schema;
    use chrono::NaiveDate;

    fn seeded() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        schema::create_tables(&conn).unwrap();
        schema::seed_demo_data(&conn, NaiveDate::from_ymd_opt(2026, 1, 25).unwrap()).unwrap();
        conn
    }

    #[test]
    fn test_select_returns_rows() {
        let conn = seeded();
        let result = execute_read_only(&conn, "SELECT * FROM items").unwrap();
        assert_eq!(result.row_count, 3);
        assert_eq!(
            result.columns,
            vec!["id", "item_code", "item_description", "quantity", "price"]
        );
        assert_eq!(result.rows[0][1], Cell::Text("IT001".to_string()));
        assert!(result.summary().starts_with("Query executed successfully. Returned 3 rows."));
    }

    #[test]
    fn test_with_and_lowercase_accepted() {
        let conn = seeded();
        let result = execute_read_only(
            &conn,
            "  with t as (select count(*) as n from order_lines) select n from t",
        )
        .unwrap();
        assert_eq!(result.rows, vec![vec![Cell::Integer(3)]]);
        assert!(result.summary().contains("Returned 1 row."));
    }

    #[test]
    fn test_write_statements_rejected() {
        let conn = seeded();
        let err = execute_read_only(&conn, "DELETE FROM items").unwrap_err();
        assert!(err.is_restricted());

        let err = execute_read_only(
            &conn,
            "WITH x AS (SELECT 1) DELETE FROM order_lines WHERE id IN (SELECT * FROM x)",
        )
        .unwrap_err();
        assert!(err.is_restricted());

        // Không có gì bị xóa
        let result = execute_read_only(&conn, "SELECT id FROM order_lines").unwrap();
        assert_eq!(result.row_count, 3);
    }

    #[test]
    fn test_multiple_statements_rejected() {
        let conn = seeded();
        let err = execute_read_only(&conn, "SELECT 1; DELETE FROM order_lines").unwrap_err();
        assert!(err.is_restricted());
        let err = execute_read_only(&conn, "select 1;select 2").unwrap_err();
        assert!(err.is_restricted());

        let result = execute_read_only(&conn, "SELECT id FROM order_lines").unwrap();
        assert_eq!(result.row_count, 3);
    }

    #[test]
    fn test_trailing_semicolon_and_comments_allowed() {
        assert!(!has_trailing_statement("SELECT 1;"));
        assert!(!has_trailing_statement("SELECT 1; ;  -- done\n"));
        assert!(!has_trailing_statement("SELECT 1; /* note */"));
        assert!(!has_trailing_statement("SELECT 'a;b' FROM items"));
        assert!(has_trailing_statement("SELECT 1; SELECT 2"));

        let conn = seeded();
        let result = execute_read_only(&conn, "SELECT * FROM items WHERE item_code = 'IT;1';").unwrap();
        assert_eq!(result.row_count, 0);
    }

    #[test]
    fn test_store_error_surfaced() {
        let conn = seeded();
        let err = execute_read_only(&conn, "SELECT * FROM missing_table").unwrap_err();
        assert!(err.is_database_error());
        assert!(err.to_string().contains("no such table"));
    }
}
