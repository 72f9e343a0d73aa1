//! Record model với pending overlay
//!
//! Rows được load theo id; insert / update / remove chỉ ghi vào overlay
//! cho tới khi `submit_all` flush toàn bộ trong một transaction.

use crate::error::{EditorError, EditorResult};
use tracing::{debug, info};
use wms_core::{Record, Value};
use wms_persistence::{BatchSummary, Database, PersistenceError, RowOp, Table};

/// Trạng thái của một row trong overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    Clean,
    Inserted,
    Updated,
    Removed,
}

#[derive(Debug, Clone)]
struct Slot<R> {
    record: R,
    status: RowStatus,
}

impl<R> Slot<R> {
    fn clean(record: R) -> Self {
        Self {
            record,
            status: RowStatus::Clean,
        }
    }
}

/// Cache rows của một bảng + các thay đổi chưa submit.
#[derive(Debug)]
pub struct RecordModel<R: Table> {
    scope: R::Scope,
    loaded: Vec<R>,
    slots: Vec<Slot<R>>,
}

impl<R: Table> Default for RecordModel<R> {
    fn default() -> Self {
        Self::new(R::Scope::default())
    }
}

impl<R: Table> RecordModel<R> {
    /// Model rỗng, chưa load
    pub fn new(scope: R::Scope) -> Self {
        Self {
            scope,
            loaded: Vec::new(),
            slots: Vec::new(),
        }
    }

    pub fn scope(&self) -> &R::Scope {
        &self.scope
    }

    /// Đổi bộ lọc; có hiệu lực ở lần `load` tiếp theo
    pub fn set_scope(&mut self, scope: R::Scope) {
        self.scope = scope;
    }

    /// Đọc lại rows từ store, bỏ overlay
    pub fn load(&mut self, db: &Database) -> EditorResult<usize> {
        self.loaded = db.load::<R>(&self.scope)?;
        self.slots = self.loaded.iter().cloned().map(Slot::clean).collect();
        debug!(entity = R::ENTITY, rows = self.slots.len(), "model loaded");
        Ok(self.slots.len())
    }

    // === Accessors ===

    pub fn row_count(&self) -> usize {
        self.slots.len()
    }

    pub fn row(&self, index: usize) -> Option<&R> {
        self.slots.get(index).map(|s| &s.record)
    }

    pub fn rows(&self) -> impl Iterator<Item = &R> {
        self.slots.iter().map(|s| &s.record)
    }

    pub fn status(&self, index: usize) -> Option<RowStatus> {
        self.slots.get(index).map(|s| s.status)
    }

    /// Vị trí của row có id
    pub fn position_of_id(&self, id: i64) -> Option<usize> {
        self.slots.iter().position(|s| s.record.id() == Some(id))
    }

    /// Vị trí của row đầu tiên thỏa điều kiện
    pub fn position<P>(&self, predicate: P) -> Option<usize>
    where
        P: Fn(&R) -> bool,
    {
        self.slots.iter().position(|s| predicate(&s.record))
    }

    /// Có thay đổi chưa submit
    pub fn is_dirty(&self) -> bool {
        self.slots.iter().any(|s| s.status != RowStatus::Clean)
    }

    fn check_index(&self, index: usize) -> EditorResult<()> {
        if index < self.slots.len() {
            Ok(())
        } else {
            Err(EditorError::RowOutOfRange {
                index,
                count: self.slots.len(),
            })
        }
    }

    // === Overlay mutations ===

    /// Thêm row pending, trả về index
    pub fn insert_pending(&mut self, record: R) -> usize {
        self.slots.push(Slot {
            record,
            status: RowStatus::Inserted,
        });
        self.slots.len() - 1
    }

    /// Ghi một field của row
    pub fn set_field(&mut self, index: usize, field: R::Field, value: Value) -> EditorResult<()> {
        self.check_index(index)?;
        let mut record = self.slots[index].record.clone();
        record.set(field, value)?;
        self.set_row(index, record)
    }

    /// Thay toàn bộ row
    pub fn set_row(&mut self, index: usize, record: R) -> EditorResult<()> {
        self.check_index(index)?;
        let unchanged = self.original_of(index).is_some_and(|o| *o == record);
        let slot = &mut self.slots[index];

        slot.status = match slot.status {
            RowStatus::Inserted => RowStatus::Inserted,
            RowStatus::Removed => RowStatus::Removed,
            _ if unchanged => RowStatus::Clean,
            _ => RowStatus::Updated,
        };
        slot.record = record;
        Ok(())
    }

    /// Đánh dấu row bị xóa; row vẫn giữ vị trí cho tới khi submit
    pub fn remove_pending(&mut self, index: usize) -> EditorResult<()> {
        self.check_index(index)?;
        self.slots[index].status = RowStatus::Removed;
        Ok(())
    }

    fn original_of(&self, index: usize) -> Option<&R> {
        let id = self.slots[index].record.id()?;
        self.loaded.iter().find(|r| r.id() == Some(id))
    }

    /// Overlay thành batch; kèm row index của từng thao tác
    fn pending_ops(&self) -> (Vec<RowOp<R>>, Vec<usize>) {
        let mut ops = Vec::new();
        let mut rows = Vec::new();

        for (index, slot) in self.slots.iter().enumerate() {
            let op = match (slot.status, slot.record.id()) {
                (RowStatus::Clean, _) => continue,
                (RowStatus::Inserted, _) => RowOp::Insert(slot.record.clone()),
                (RowStatus::Updated, _) => RowOp::Update(slot.record.clone()),
                (RowStatus::Removed, Some(id)) => RowOp::Delete(id),
                // Row mới bị xóa trước khi submit
                (RowStatus::Removed, None) => continue,
            };
            ops.push(op);
            rows.push(index);
        }
        (ops, rows)
    }

    /// Flush overlay trong một transaction.
    ///
    /// Lỗi trả về `Submit` với row index gây lỗi; overlay giữ nguyên để
    /// actor sửa rồi thử lại, hoặc `revert_all`.
    pub fn submit_all(&mut self, db: &mut Database) -> EditorResult<BatchSummary> {
        let (ops, rows) = self.pending_ops();
        if ops.is_empty() {
            self.load(db)?;
            return Ok(BatchSummary::default());
        }

        let summary = db.submit_batch(&ops).map_err(|source| {
            let row = match &source {
                PersistenceError::BatchFailed { index, .. } => rows.get(*index).copied(),
                _ => None,
            };
            EditorError::Submit {
                row: row.or_else(|| rows.first().copied()).unwrap_or(0),
                source,
            }
        })?;

        info!(entity = R::ENTITY, total = summary.total(), "Changes submitted");
        self.load(db)?;
        Ok(summary)
    }

    /// Bỏ overlay, trở về rows đã load lần cuối
    pub fn revert_all(&mut self) {
        self.slots = self.loaded.iter().cloned().map(Slot::clean).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use wms_core::{Item, ItemField};

    fn items(db: &Database) -> RecordModel<Item> {
        let mut model = RecordModel::default();
        model.load(db).unwrap();
        model
    }

    #[test]
    fn test_load_in_id_order() {
        let db = Database::open_in_memory().unwrap();
        let model = items(&db);
        assert_eq!(model.row_count(), 3);
        let codes: Vec<_> = model.rows().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["IT001", "IT002", "IT003"]);
        assert!(!model.is_dirty());
    }

    #[test]
    fn test_overlay_not_written_until_submit() {
        let mut db = Database::open_in_memory().unwrap();
        let mut model = items(&db);

        model
            .set_field(1, ItemField::Quantity, Value::Integer(99))
            .unwrap();
        assert_eq!(model.status(1), Some(RowStatus::Updated));
        assert_eq!(db.counts().unwrap().items, 3);

        let other = items(&db);
        assert_eq!(other.row(1).unwrap().quantity, 50);

        model.submit_all(&mut db).unwrap();
        assert_eq!(items(&db).row(1).unwrap().quantity, 99);
        assert!(!model.is_dirty());
    }

    #[test]
    fn test_set_back_to_original_is_clean() {
        let db = Database::open_in_memory().unwrap();
        let mut model = items(&db);
        model.set_field(0, ItemField::Quantity, Value::Integer(11)).unwrap();
        model.set_field(0, ItemField::Quantity, Value::Integer(10)).unwrap();
        assert_eq!(model.status(0), Some(RowStatus::Clean));
    }

    #[test]
    fn test_insert_round_trip() {
        let mut db = Database::open_in_memory().unwrap();
        let mut model = items(&db);

        let index = model.insert_pending(Item::new("IT004", "Monitor", 7, dec!(199.99)));
        assert_eq!(index, 3);
        let summary = model.submit_all(&mut db).unwrap();
        let id = summary.new_ids[0];

        let fresh = items(&db);
        let row = fresh.row(fresh.position_of_id(id).unwrap()).unwrap();
        assert_eq!(row.code, "IT004");
        assert_eq!(row.description, "Monitor");
        assert_eq!(row.quantity, 7);
        assert_eq!(row.price, dec!(199.99));
    }

    #[test]
    fn test_failed_submit_keeps_overlay() {
        let mut db = Database::open_in_memory().unwrap();
        let mut model = items(&db);

        model.insert_pending(Item::new("IT004", "Monitor", 7, dec!(199.99)));
        model.insert_pending(Item::new("IT002", "Duplicate", 1, dec!(1)));

        let err = model.submit_all(&mut db).unwrap_err();
        match &err {
            EditorError::Submit { row, source } => {
                assert_eq!(*row, 4);
                assert!(source.to_string().contains("UNIQUE"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.is_store());

        // Overlay còn nguyên, store không đổi
        assert_eq!(model.row_count(), 5);
        assert!(model.is_dirty());
        assert_eq!(db.counts().unwrap().items, 3);

        // Sửa row lỗi rồi thử lại
        model
            .set_field(4, ItemField::Code, Value::from("IT005"))
            .unwrap();
        model.submit_all(&mut db).unwrap();
        assert_eq!(db.counts().unwrap().items, 5);
    }

    #[test]
    fn test_revert_all_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        let mut model = items(&db);

        model.insert_pending(Item::new("IT004", "Monitor", 7, dec!(199.99)));
        model.remove_pending(0).unwrap();
        model.set_field(1, ItemField::Description, Value::from("Wireless mouse")).unwrap();

        model.revert_all();
        let once: Vec<Item> = model.rows().cloned().collect();
        model.revert_all();
        let twice: Vec<Item> = model.rows().cloned().collect();

        assert_eq!(once, twice);
        assert_eq!(once, items(&db).rows().cloned().collect::<Vec<_>>());
        assert!(!model.is_dirty());
    }

    #[test]
    fn test_remove_keeps_indices() {
        let mut db = Database::open_in_memory().unwrap();
        let mut model = items(&db);
        model.insert_pending(Item::new("IT004", "Monitor", 7, dec!(1)));
        model.submit_all(&mut db).unwrap();

        let index = model.position(|i| i.code == "IT004").unwrap();
        model.remove_pending(index).unwrap();
        assert_eq!(model.row_count(), 4);
        assert_eq!(model.status(index), Some(RowStatus::Removed));

        model.submit_all(&mut db).unwrap();
        assert_eq!(model.row_count(), 3);
        assert!(model.position(|i| i.code == "IT004").is_none());
    }

    #[test]
    fn test_out_of_range() {
        let db = Database::open_in_memory().unwrap();
        let mut model = items(&db);
        let err = model.remove_pending(10).unwrap_err();
        assert!(matches!(err, EditorError::RowOutOfRange { index: 10, count: 3 }));
    }
}
