//! # WMS Persistence
//!
//! Persistence gateway cho WMS - một SQLite store cục bộ.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       Database                           │
//! │  ┌─────────────┐   ┌─────────────┐   ┌────────────────┐  │
//! │  │   Repos     │   │   Batch     │   │  Read-only     │  │
//! │  │   (CRUD)    │   │  (submit)   │   │  query path    │  │
//! │  └─────────────┘   └─────────────┘   └────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wms_persistence::{Database, ItemRepo};
//!
//! // Mở store, tạo schema + seed nếu store mới
//! let db = Database::open("data/wms.db")?;
//!
//! let items = ItemRepo::get_all(db.conn())?;
//! let result = db.execute_read_only("SELECT * FROM orders")?;
//! ```

pub mod error;
pub mod query;
pub mod sqlite;

pub use error::{PersistenceError, PersistenceResult};
pub use query::{Cell, QueryResult};
pub use sqlite::{
    BatchSummary, ItemRepo, OrderLineRepo, OrderRepo, RowOp, Table, UserRepo,
};

use chrono::{Local, NaiveDate};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Số records theo bảng
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct TableCounts {
    pub users: i64,
    pub items: i64,
    pub orders: i64,
    pub order_lines: i64,
}

/// Database facade - sở hữu connection tới store
#[derive(Debug)]
pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Mở (hoặc tạo) store tại `path`.
    ///
    /// Store chưa có bảng nào sẽ được tạo schema và seed demo data một lần.
    pub fn open<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        Self::open_with_seed_date(path, Local::now().date_naive())
    }

    /// Như `open`, với ngày "hôm nay" cố định cho seed orders
    pub fn open_with_seed_date<P: AsRef<Path>>(
        path: P,
        today: NaiveDate,
    ) -> PersistenceResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(PersistenceError::initialization)?;
            }
        }

        let conn = Connection::open(path).map_err(PersistenceError::initialization)?;
        info!(path = %path.display(), "Opened store");

        Self::initialize(conn, Some(path.to_path_buf()), today)
    }

    /// Store in-memory đã seed (dùng cho tests)
    pub fn open_in_memory() -> PersistenceResult<Self> {
        Self::open_in_memory_with_seed_date(Local::now().date_naive())
    }

    /// Store in-memory, seed với ngày cố định
    pub fn open_in_memory_with_seed_date(today: NaiveDate) -> PersistenceResult<Self> {
        let conn = Connection::open_in_memory().map_err(PersistenceError::initialization)?;
        Self::initialize(conn, None, today)
    }

    fn initialize(
        mut conn: Connection,
        path: Option<PathBuf>,
        today: NaiveDate,
    ) -> PersistenceResult<Self> {
        sqlite::schema::enable_foreign_keys(&conn).map_err(PersistenceError::initialization)?;

        if sqlite::schema::is_empty(&conn).map_err(PersistenceError::initialization)? {
            let tx = conn.transaction().map_err(PersistenceError::initialization)?;
            sqlite::schema::create_tables(&tx).map_err(PersistenceError::initialization)?;
            sqlite::schema::seed_demo_data(&tx, today).map_err(PersistenceError::initialization)?;
            tx.commit().map_err(PersistenceError::initialization)?;
            info!("New store initialized with demo data");
        } else {
            debug!("Existing store, skipping seed");
        }

        Ok(Self { conn, path })
    }

    /// Connection cho repos
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Đường dẫn file, None cho in-memory store
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Đọc rows của một bảng theo id
    pub fn load<R: Table>(&self, scope: &R::Scope) -> PersistenceResult<Vec<R>> {
        R::select(&self.conn, scope)
    }

    /// Ghi batch trong một transaction (all-or-nothing)
    pub fn submit_batch<R: Table>(&mut self, ops: &[RowOp<R>]) -> PersistenceResult<BatchSummary> {
        let summary = sqlite::batch::submit(&mut self.conn, ops)?;
        info!(
            table = R::TABLE,
            inserted = summary.inserted,
            updated = summary.updated,
            deleted = summary.deleted,
            "Batch submitted"
        );
        Ok(summary)
    }

    /// Query ad-hoc, chỉ SELECT / WITH
    pub fn execute_read_only(&self, text: &str) -> PersistenceResult<QueryResult> {
        query::execute_read_only(&self.conn, text)
    }

    /// Kiểm tra login + password
    pub fn validate_user(&self, login: &str, password: &str) -> PersistenceResult<bool> {
        let valid = UserRepo::get_by_login(&self.conn, login)?
            .map(|user| user.verify(password))
            .unwrap_or(false);

        if !valid {
            warn!(login, "Authentication failed");
        }
        Ok(valid)
    }

    /// Đếm records mỗi bảng
    pub fn counts(&self) -> PersistenceResult<TableCounts> {
        let count = |table: &str| -> PersistenceResult<i64> {
            let n = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
            Ok(n)
        };

        let [users, items, orders, order_lines] = sqlite::schema::TABLES;
        Ok(TableCounts {
            users: count(users)?,
            items: count(items)?,
            orders: count(orders)?,
            order_lines: count(order_lines)?,
        })
    }

    /// Lỗi nếu có order line mà order_number khác order cha
    pub fn verify_order_lines(&self) -> PersistenceResult<()> {
        OrderLineRepo::verify_order_numbers(&self.conn)
    }
}
