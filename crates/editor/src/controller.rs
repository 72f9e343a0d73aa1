//! Editor controller
//!
//! State machine Viewing / Adding / Editing dùng chung cho mọi entity.
//!
//! ```text
//!            add()                 save() ok / cancel()
//!   Viewing ───────▶ Adding  ──────────────────────────▶ Viewing
//!      │                                                    ▲
//!      │ edit() (cần selection)    save() ok / cancel()     │
//!      └───────────▶ Editing ───────────────────────────────┘
//! ```
//!
//! Mọi lỗi (validation, guard, store) giữ nguyên state hiện tại.

use crate::binding::{FormBinding, Relation};
use crate::error::{EditorError, EditorResult};
use crate::model::RecordModel;
use crate::schema::{Confirm, Deletion, EditMode, EditorSchema, FieldOf};
use tracing::{debug, info, warn};
use wms_core::{Record, Value};
use wms_persistence::Database;

/// Trigger nào đang được bật (tương đương trạng thái các nút)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actions {
    pub add: bool,
    pub edit: bool,
    pub delete: bool,
    pub save: bool,
    pub cancel: bool,
    pub select: bool,
    pub navigate: bool,
}

/// Generic editor cho một bảng
pub struct RecordEditor<S: EditorSchema> {
    model: RecordModel<S::Record>,
    form: FormBinding<S::Record>,
    schema: S,
    mode: EditMode,
    selected: Option<usize>,
    /// Selection trước khi add, trả lại khi cancel
    previous: Option<usize>,
}

impl<S: EditorSchema> RecordEditor<S> {
    /// Tạo editor và load rows; row đầu tiên được chọn nếu có
    pub fn new(schema: S, db: &Database) -> EditorResult<Self> {
        let mut form = FormBinding::new(schema.form_fields());
        for (field, relation) in schema.relations() {
            form.set_relation(field, relation);
        }

        let mut editor = Self {
            model: RecordModel::new(schema.scope()),
            form,
            schema,
            mode: EditMode::Viewing,
            selected: None,
            previous: None,
        };
        editor.refresh(db)?;
        Ok(editor)
    }

    // === Accessors ===

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }

    pub(crate) fn schema_mut(&mut self) -> &mut S {
        &mut self.schema
    }

    pub fn model(&self) -> &RecordModel<S::Record> {
        &self.model
    }

    pub fn form(&self) -> &FormBinding<S::Record> {
        &self.form
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_record(&self) -> Option<&S::Record> {
        self.selected.and_then(|i| self.model.row(i))
    }

    /// Giá trị form
    pub fn value(&self, field: FieldOf<S>) -> Value {
        self.form.value(field)
    }

    /// Text form hiển thị
    pub fn display(&self, field: FieldOf<S>) -> String {
        self.form.display(field)
    }

    pub fn actions(&self) -> Actions {
        let viewing = self.mode == EditMode::Viewing;
        let has_selection = self.selected.is_some();
        Actions {
            add: viewing,
            edit: viewing && has_selection,
            delete: viewing && has_selection,
            save: !viewing,
            cancel: !viewing,
            select: viewing,
            navigate: viewing,
        }
    }

    pub(crate) fn ensure_viewing(&self, action: &'static str) -> EditorResult<()> {
        if self.mode == EditMode::Viewing {
            Ok(())
        } else {
            Err(EditorError::InvalidState {
                action,
                state: self.mode,
            })
        }
    }

    fn entity() -> &'static str {
        <S::Record as Record>::ENTITY
    }

    fn sync_form(&mut self) -> EditorResult<()> {
        match self.selected {
            Some(index) => self.form.set_current_row(&self.model, index),
            None => {
                self.form.unbind();
                self.form.bind(&self.model);
                Ok(())
            }
        }
    }

    // === Transitions ===

    /// Đọc lại rows theo scope của schema; giữ selection theo id nếu còn
    pub fn refresh(&mut self, db: &Database) -> EditorResult<usize> {
        self.ensure_viewing("refresh")?;
        let keep = self.selected_record().and_then(|r| r.id());

        self.model.set_scope(self.schema.scope());
        let count = self.model.load(db)?;

        self.selected = keep
            .and_then(|id| self.model.position_of_id(id))
            .or(if count > 0 { Some(0) } else { None });
        self.sync_form()?;
        Ok(count)
    }

    /// Thay relation của một field (vd. catalog đã load lại)
    pub fn set_relation(&mut self, field: FieldOf<S>, relation: Relation) {
        self.form.set_relation(field, relation);
    }

    /// Chọn row; chỉ khi Viewing
    pub fn select_row(&mut self, index: usize) -> EditorResult<()> {
        self.ensure_viewing("select a row")?;
        self.form.set_current_row(&self.model, index)?;
        self.selected = Some(index);
        Ok(())
    }

    /// Chọn row theo id
    pub fn select_id(&mut self, id: i64) -> EditorResult<()> {
        let index = self
            .model
            .position_of_id(id)
            .ok_or_else(|| wms_persistence::PersistenceError::not_found(Self::entity(), id))?;
        self.select_row(index)
    }

    /// Viewing → Adding: form trống, selection bị khóa
    pub fn add(&mut self) -> EditorResult<()> {
        self.ensure_viewing("add")?;
        self.mode = EditMode::Adding;
        self.previous = self.selected.take();
        self.form.clear();
        self.schema.on_begin(EditMode::Adding);
        debug!(entity = Self::entity(), "adding");
        Ok(())
    }

    /// Viewing → Editing row đang chọn
    pub fn edit(&mut self) -> EditorResult<()> {
        self.ensure_viewing("edit")?;
        let index = self
            .selected
            .ok_or_else(|| EditorError::selection_required(Self::entity(), "edit"))?;

        self.form.set_current_row(&self.model, index)?;
        self.mode = EditMode::Editing;
        self.schema.on_begin(EditMode::Editing);
        debug!(entity = Self::entity(), index, "editing");
        Ok(())
    }

    /// Ghi giá trị vào form; chỉ khi Adding / Editing
    pub fn set_field(&mut self, field: FieldOf<S>, value: impl Into<Value>) -> EditorResult<()> {
        if !self.mode.is_editing() {
            return Err(EditorError::InvalidState {
                action: "change a field",
                state: self.mode,
            });
        }
        self.form.set_value(field, value.into())
    }

    /// Validate rồi submit; trả về id của record đã lưu.
    ///
    /// Lỗi validation không đụng tới model. Lỗi store revert overlay và
    /// giữ state để actor sửa rồi thử lại.
    pub fn save(&mut self, db: &mut Database) -> EditorResult<Option<i64>> {
        match self.mode {
            EditMode::Viewing => Err(EditorError::InvalidState {
                action: "save",
                state: self.mode,
            }),
            EditMode::Adding => self.save_new(db),
            EditMode::Editing => self.save_existing(db),
        }
    }

    fn save_new(&mut self, db: &mut Database) -> EditorResult<Option<i64>> {
        let mut candidate = self.form.to_record(&S::Record::default())?;
        self.schema.prepare(EditMode::Adding, &mut candidate)?;
        self.schema.validate(db, EditMode::Adding, &candidate)?;

        self.model.insert_pending(candidate);
        let summary = match self.model.submit_all(db) {
            Ok(summary) => summary,
            Err(e) => {
                self.model.revert_all();
                return Err(e);
            }
        };

        let id = summary.new_ids.first().copied();
        info!(entity = Self::entity(), id, "Record added");

        self.mode = EditMode::Viewing;
        self.selected = None;
        self.previous = None;
        self.form.clear();
        self.schema.on_saved();
        Ok(id)
    }

    fn save_existing(&mut self, db: &mut Database) -> EditorResult<Option<i64>> {
        let index = self
            .selected
            .ok_or_else(|| EditorError::selection_required(Self::entity(), "save"))?;
        let base = self
            .model
            .row(index)
            .cloned()
            .ok_or(EditorError::RowOutOfRange {
                index,
                count: self.model.row_count(),
            })?;

        let mut candidate = self.form.to_record(&base)?;
        self.schema.prepare(EditMode::Editing, &mut candidate)?;
        self.schema.validate(db, EditMode::Editing, &candidate)?;

        let id = candidate.id();
        self.model.set_row(index, candidate)?;
        if let Err(e) = self.model.submit_all(db) {
            self.model.revert_all();
            return Err(e);
        }
        info!(entity = Self::entity(), id, "Record updated");

        self.mode = EditMode::Viewing;
        self.selected = id
            .and_then(|id| self.model.position_of_id(id))
            .or(Some(index).filter(|i| *i < self.model.row_count()));
        self.schema.on_saved();
        self.sync_form()?;
        Ok(id)
    }

    /// Bỏ thay đổi, trở về Viewing và đồng bộ form với row đã chọn trước đó
    pub fn cancel(&mut self) -> EditorResult<()> {
        match self.mode {
            EditMode::Viewing => return Ok(()),
            EditMode::Adding => {
                self.form.clear();
                self.selected = self
                    .previous
                    .take()
                    .filter(|i| *i < self.model.row_count());
            }
            EditMode::Editing => self.model.revert_all(),
        }

        self.mode = EditMode::Viewing;
        self.schema.on_cancel();
        self.sync_form()
    }

    /// Xóa row đang chọn: guard, xác nhận, rồi submit ngay
    pub fn delete(&mut self, db: &mut Database, confirm: &mut impl Confirm) -> EditorResult<Deletion> {
        self.ensure_viewing("delete")?;
        let index = self
            .selected
            .ok_or_else(|| EditorError::selection_required(Self::entity(), "delete"))?;
        let row = self
            .model
            .row(index)
            .cloned()
            .ok_or(EditorError::RowOutOfRange {
                index,
                count: self.model.row_count(),
            })?;

        if let Err(e) = self.schema.check_delete(db, &row) {
            warn!(entity = Self::entity(), id = row.id(), reason = %e, "Delete rejected");
            return Err(e);
        }

        let title = format!("Delete {}", Self::entity());
        if !confirm.confirm(&title, &self.schema.delete_question()) {
            return Ok(Deletion::Declined);
        }

        self.model.remove_pending(index)?;
        if let Err(e) = self.model.submit_all(db) {
            self.model.revert_all();
            return Err(e);
        }
        info!(entity = Self::entity(), id = row.id(), "Record deleted");

        self.selected = None;
        self.sync_form()?;
        Ok(Deletion::Deleted)
    }
}
