//! Orders editor

use crate::controller::RecordEditor;
use crate::error::{EditorResult, GuardError, ValidationError};
use crate::schema::{EditMode, EditorSchema};
use tracing::warn;
use wms_core::{Order, OrderField};
use wms_persistence::{Database, OrderLineRepo, OrderRepo};

/// Editor cho bảng orders
pub type OrdersEditor = RecordEditor<OrderSchema>;

/// Rules của orders: order number bắt buộc + unique
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderSchema;

impl EditorSchema for OrderSchema {
    type Record = Order;

    fn form_fields(&self) -> &'static [OrderField] {
        &[OrderField::OrderNumber, OrderField::Date, OrderField::Type]
    }

    fn prepare(&mut self, _mode: EditMode, candidate: &mut Order) -> EditorResult<()> {
        candidate.order_number = candidate.order_number.trim().to_string();
        Ok(())
    }

    fn validate(&self, db: &Database, _mode: EditMode, candidate: &Order) -> EditorResult<()> {
        if candidate.order_number.is_empty() {
            return Err(ValidationError::Required {
                field: "Order Number",
            }
            .into());
        }

        if let Some(existing) = OrderRepo::get_by_number(db.conn(), &candidate.order_number)? {
            if existing.id != candidate.id {
                return Err(ValidationError::Duplicate {
                    field: "Order Number",
                    value: candidate.order_number.clone(),
                }
                .into());
            }
        }
        Ok(())
    }

    fn check_delete(&self, db: &Database, row: &Order) -> EditorResult<()> {
        let Some(id) = row.id else {
            return Ok(());
        };

        let count = OrderLineRepo::count_by_order(db.conn(), id)?;
        if count > 0 {
            warn!(order_number = %row.order_number, count, "Order still has lines");
            return Err(GuardError::OrderHasLines {
                order_number: row.order_number.clone(),
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
    use chrono::NaiveDate;
    use wms_core::OrderType;

    #[test]
    fn test_add_order() {
        let mut db = Database::open_in_memory().unwrap();
        let mut editor = OrdersEditor::new(OrderSchema, &db).unwrap();

        editor.add().unwrap();
        editor.set_field(OrderField::OrderNumber, "ORD003").unwrap();
        editor.set_field(OrderField::Date, "2026-02-01").unwrap();
        editor.set_field(OrderField::Type, "from").unwrap();
        let id = editor.save(&mut db).unwrap().unwrap();

        let order = OrderRepo::get_by_id(db.conn(), id).unwrap();
        assert_eq!(order.date, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(order.order_type, OrderType::From);
    }

    #[test]
    fn test_invalid_type_and_date() {
        let mut db = Database::open_in_memory().unwrap();
        let mut editor = OrdersEditor::new(OrderSchema, &db).unwrap();

        editor.add().unwrap();
        editor.set_field(OrderField::OrderNumber, "ORD003").unwrap();
        editor.set_field(OrderField::Type, "inbound").unwrap();
        assert!(editor.save(&mut db).unwrap_err().is_validation());

        editor.set_field(OrderField::Type, "to").unwrap();
        editor.set_field(OrderField::Date, "01/02/2026").unwrap();
        assert!(editor.save(&mut db).unwrap_err().is_validation());
        assert_eq!(db.counts().unwrap().orders, 2);
    }

    #[test]
    fn test_order_with_lines_is_guarded() {
        let mut db = Database::open_in_memory().unwrap();
        let mut editor = OrdersEditor::new(OrderSchema, &db).unwrap();

        editor.select_row(0).unwrap();
        let err = editor.delete(&mut db, &mut AutoConfirm(true)).unwrap_err();
        assert_eq!(
            err.guard(),
            Some(&GuardError::OrderHasLines {
                order_number: "ORD001".to_string(),
                count: 2
            })
        );

        // Declined: không có gì thay đổi
        editor.add().unwrap();
        editor.set_field(OrderField::OrderNumber, "ORD003").unwrap();
        let id = editor.save(&mut db).unwrap().unwrap();
        editor.select_id(id).unwrap();
        let result = editor.delete(&mut db, &mut AutoConfirm(false)).unwrap();
        assert_eq!(result, Deletion::Declined);
        assert_eq!(db.counts().unwrap().orders, 3);

        let result = editor.delete(&mut db, &mut AutoConfirm(true)).unwrap();
        assert_eq!(result, Deletion::Deleted);
        assert_eq!(db.counts().unwrap().orders, 2);
    }
}
