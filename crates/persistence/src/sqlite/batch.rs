//! Atomic batch submit
//!
//! Mọi thay đổi pending của một bảng được ghi trong một transaction.
//! Lỗi đầu tiên làm rollback toàn bộ batch.

use crate::error::{PersistenceError, PersistenceResult};
use crate::sqlite::table::Table;
use rusqlite::Connection;
use tracing::{debug, warn};

/// Một thao tác trong batch
#[derive(Debug, Clone, PartialEq)]
pub enum RowOp<R> {
    Insert(R),
    Update(R),
    Delete(i64),
}

impl<R> RowOp<R> {
    /// Tên thao tác cho messages
    pub fn name(&self) -> &'static str {
        match self {
            RowOp::Insert(_) => "insert",
            RowOp::Update(_) => "update",
            RowOp::Delete(_) => "delete",
        }
    }
}

/// Kết quả batch đã commit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
    /// Ids được cấp cho các inserts, theo thứ tự trong batch
    pub new_ids: Vec<i64>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.inserted + self.updated + self.deleted
    }
}

/// Ghi batch trong một transaction.
///
/// Trả `BatchFailed` với index của thao tác lỗi; store không thay đổi.
/// `Table::verify` chạy trước commit, lỗi ở đó cũng rollback.
pub fn submit<R: Table>(conn: &mut Connection, ops: &[RowOp<R>]) -> PersistenceResult<BatchSummary> {
    let tx = conn.transaction()?;
    let mut summary = BatchSummary::default();

    for (index, op) in ops.iter().enumerate() {
        let result = match op {
            RowOp::Insert(record) => R::insert(&tx, record).map(|id| {
                summary.inserted += 1;
                summary.new_ids.push(id);
            }),
            RowOp::Update(record) => R::update(&tx, record).map(|_| summary.updated += 1),
            RowOp::Delete(id) => R::delete(&tx, *id).map(|_| summary.deleted += 1),
        };

        if let Err(e) = result {
            warn!(table = R::TABLE, index, operation = op.name(), error = %e, "batch rolled back");
            // tx drop => rollback
            return Err(PersistenceError::BatchFailed {
                index,
                operation: op.name(),
                message: e.to_string(),
            });
        }
    }

    R::verify(&tx)?;
    tx.commit()?;
    debug!(table = R::TABLE, total = summary.total(), "batch committed");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::repos::ItemRepo;
    use crate::sqlite::schema;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use wms_core::Item;

    fn seeded() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        schema::enable_foreign_keys(&conn).unwrap();
        schema::create_tables(&conn).unwrap();
        schema::seed_demo_data(&conn, NaiveDate::from_ymd_opt(2026, 1, 25).unwrap()).unwrap();
        conn
    }

    #[test]
    fn test_batch_commits_all() {
        let mut conn = seeded();
        let mut mouse = ItemRepo::get_by_code(&conn, "IT002").unwrap().unwrap();
        mouse.quantity = 60;

        let ops = vec![
            RowOp::Insert(Item::new("IT004", "Monitor", 7, dec!(199.99))),
            RowOp::Update(mouse),
        ];
        let summary = submit(&mut conn, &ops).unwrap();
        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.new_ids, vec![4]);
        assert_eq!(ItemRepo::get_all(&conn).unwrap().len(), 4);
    }

    #[test]
    fn test_batch_rolls_back_on_failure() {
        let mut conn = seeded();
        let ops = vec![
            RowOp::Insert(Item::new("IT004", "Monitor", 7, dec!(199.99))),
            RowOp::Insert(Item::new("IT001", "Duplicate", 1, dec!(1))),
        ];

        let err = submit(&mut conn, &ops).unwrap_err();
        match err {
            PersistenceError::BatchFailed { index, operation, .. } => {
                assert_eq!(index, 1);
                assert_eq!(operation, "insert");
            }
            other => panic!("unexpected error: {other}"),
        }
        // IT004 cũng không được ghi
        assert!(ItemRepo::get_by_code(&conn, "IT004").unwrap().is_none());
        assert_eq!(ItemRepo::get_all(&conn).unwrap().len(), 3);
    }
}
