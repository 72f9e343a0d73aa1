//! Items editor

use crate::controller::RecordEditor;
use crate::error::{EditorResult, GuardError, ValidationError};
use crate::schema::{EditMode, EditorSchema};
use rust_decimal::Decimal;
use tracing::warn;
use wms_core::{Item, ItemField};
use wms_persistence::{Database, ItemRepo, OrderLineRepo};

/// Editor cho bảng items
pub type ItemsEditor = RecordEditor<ItemSchema>;

/// Rules của items: code bắt buộc + unique, quantity / price không âm
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemSchema;

impl EditorSchema for ItemSchema {
    type Record = Item;

    fn form_fields(&self) -> &'static [ItemField] {
        &[
            ItemField::Code,
            ItemField::Description,
            ItemField::Quantity,
            ItemField::Price,
        ]
    }

    fn prepare(&mut self, _mode: EditMode, candidate: &mut Item) -> EditorResult<()> {
        candidate.code = candidate.code.trim().to_string();
        Ok(())
    }

    fn validate(&self, db: &Database, _mode: EditMode, candidate: &Item) -> EditorResult<()> {
        if candidate.code.is_empty() {
            return Err(ValidationError::Required { field: "Item Code" }.into());
        }
        if candidate.quantity < 0 {
            return Err(ValidationError::Negative { field: "Quantity" }.into());
        }
        if candidate.price < Decimal::ZERO {
            return Err(ValidationError::Negative { field: "Price" }.into());
        }

        if let Some(existing) = ItemRepo::get_by_code(db.conn(), &candidate.code)? {
            if existing.id != candidate.id {
                return Err(ValidationError::Duplicate {
                    field: "Item Code",
                    value: candidate.code.clone(),
                }
                .into());
            }
        }
        Ok(())
    }

    fn check_delete(&self, db: &Database, row: &Item) -> EditorResult<()> {
        let Some(id) = row.id else {
            return Ok(());
        };

        let count = OrderLineRepo::count_by_item(db.conn(), id)?;
        if count > 0 {
            warn!(code = %row.code, count, "Item is referenced by order lines");
            return Err(GuardError::ItemInUse {
                code: row.code.clone(),
                count,
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AutoConfirm, Deletion};
    use rust_decimal_macros::dec;

    fn editor() -> (Database, ItemsEditor) {
        let db = Database::open_in_memory().unwrap();
        let editor = ItemsEditor::new(ItemSchema, &db).unwrap();
        (db, editor)
    }

    #[test]
    fn test_add_item() {
        let (mut db, mut editor) = editor();
        editor.add().unwrap();
        editor.set_field(ItemField::Code, " IT004 ").unwrap();
        editor.set_field(ItemField::Description, "Monitor").unwrap();
        editor.set_field(ItemField::Quantity, 7).unwrap();
        editor.set_field(ItemField::Price, dec!(199.99)).unwrap();

        let id = editor.save(&mut db).unwrap().unwrap();
        assert_eq!(editor.mode(), EditMode::Viewing);

        let item = ItemRepo::get_by_id(db.conn(), id).unwrap();
        assert_eq!(item.code, "IT004");
        assert_eq!(item.price, dec!(199.99));
    }

    #[test]
    fn test_required_code() {
        let (mut db, mut editor) = editor();
        editor.add().unwrap();
        let err = editor.save(&mut db).unwrap_err();
        assert_eq!(err.to_string(), "Item Code is required.");
        assert_eq!(editor.mode(), EditMode::Adding);
    }

    #[test]
    fn test_negative_values_rejected() {
        let (mut db, mut editor) = editor();
        editor.add().unwrap();
        editor.set_field(ItemField::Code, "IT004").unwrap();
        editor.set_field(ItemField::Quantity, -1).unwrap();
        assert!(editor.save(&mut db).unwrap_err().is_validation());

        editor.set_field(ItemField::Quantity, 0).unwrap();
        editor.set_field(ItemField::Price, "-0.01").unwrap();
        assert!(editor.save(&mut db).unwrap_err().is_validation());
        assert_eq!(db.counts().unwrap().items, 3);
    }

    #[test]
    fn test_duplicate_code() {
        let (mut db, mut editor) = editor();
        editor.select_row(1).unwrap();
        editor.edit().unwrap();
        editor.set_field(ItemField::Code, "IT001").unwrap();

        let err = editor.save(&mut db).unwrap_err();
        assert!(matches!(
            err.validation(),
            Some(ValidationError::Duplicate { .. })
        ));
        assert_eq!(editor.mode(), EditMode::Editing);

        // Giữ nguyên code của chính nó thì hợp lệ
        editor.set_field(ItemField::Code, "IT002").unwrap();
        editor.set_field(ItemField::Description, "Optical mouse").unwrap();
        editor.save(&mut db).unwrap();
        assert_eq!(editor.selected_record().unwrap().description, "Optical mouse");
    }

    #[test]
    fn test_delete_unused_item() {
        let (mut db, mut editor) = editor();
        editor.add().unwrap();
        editor.set_field(ItemField::Code, "IT004").unwrap();
        let id = editor.save(&mut db).unwrap().unwrap();

        editor.select_id(id).unwrap();
        let result = editor.delete(&mut db, &mut AutoConfirm(true)).unwrap();
        assert_eq!(result, Deletion::Deleted);
        assert!(editor.model().position_of_id(id).is_none());
    }
}
