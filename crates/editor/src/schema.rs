//! Entity schema cho editor controller
//!
//! `RecordEditor` cài đặt state machine một lần; mỗi entity chỉ khai báo
//! form fields, validation và delete guards qua `EditorSchema`.

use crate::binding::Relation;
use crate::error::EditorResult;
use std::fmt;
use wms_core::Record;
use wms_persistence::{Database, Table};

/// Trạng thái của editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Viewing,
    Adding,
    Editing,
}

impl EditMode {
    /// Đang trong Adding hoặc Editing
    pub fn is_editing(&self) -> bool {
        !matches!(self, EditMode::Viewing)
    }
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditMode::Viewing => write!(f, "viewing"),
            EditMode::Adding => write!(f, "adding"),
            EditMode::Editing => write!(f, "editing"),
        }
    }
}

/// Hỏi actor yes/no (đồng bộ)
pub trait Confirm {
    fn confirm(&mut self, title: &str, question: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str, &str) -> bool,
{
    fn confirm(&mut self, title: &str, question: &str) -> bool {
        self(title, question)
    }
}

/// Trả lời cố định, không hỏi (vd. `--yes`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&mut self, _title: &str, _question: &str) -> bool {
        self.0
    }
}

/// Kết quả của delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    Deleted,
    Declined,
}

/// Field key của record type mà schema quản lý
pub type FieldOf<S> = <<S as EditorSchema>::Record as Record>::Field;

/// Khai báo entity-specific cho `RecordEditor`.
pub trait EditorSchema: Sized {
    type Record: Table;

    /// Fields được bind vào form, theo thứ tự hiển thị
    fn form_fields(&self) -> &'static [FieldOf<Self>];

    /// Relations (key ↔ label) cho các field tham chiếu
    fn relations(&self) -> Vec<(FieldOf<Self>, Relation)> {
        Vec::new()
    }

    /// Bộ lọc khi load model
    fn scope(&self) -> <Self::Record as Table>::Scope {
        Default::default()
    }

    /// Hoàn thiện candidate trước validation (trim, hash, parent keys)
    fn prepare(&mut self, _mode: EditMode, _candidate: &mut Self::Record) -> EditorResult<()> {
        Ok(())
    }

    /// Validation rules; chạy trước mọi thay đổi model
    fn validate(&self, db: &Database, mode: EditMode, candidate: &Self::Record) -> EditorResult<()>;

    /// Referential guard cho delete
    fn check_delete(&self, _db: &Database, _row: &Self::Record) -> EditorResult<()> {
        Ok(())
    }

    fn on_begin(&mut self, _mode: EditMode) {}

    fn on_cancel(&mut self) {}

    /// Sau khi save thành công
    fn on_saved(&mut self) {}

    /// Câu hỏi xác nhận delete
    fn delete_question(&self) -> String {
        format!(
            "Are you sure you want to delete this {}?",
            <Self::Record as Record>::ENTITY
        )
    }
}
