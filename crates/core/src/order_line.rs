//! # Order Line Module
//!
//! Dòng chi tiết của order. `order_number` là bản sao denormalized của
//! `Order.order_number`, chỉ được ghi bởi persistence layer.

use crate::error::CoreResult;
use crate::record::{expect_i64, expect_id, into_text, FieldName, Record};
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Fields của bảng `order_lines`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderLineField {
    Id,
    OrderId,
    OrderNumber,
    ItemId,
    Quantity,
}

impl FieldName for OrderLineField {
    fn all() -> &'static [Self] {
        &[
            OrderLineField::Id,
            OrderLineField::OrderId,
            OrderLineField::OrderNumber,
            OrderLineField::ItemId,
            OrderLineField::Quantity,
        ]
    }

    fn column(&self) -> &'static str {
        match self {
            OrderLineField::Id => "id",
            OrderLineField::OrderId => "order_id",
            OrderLineField::OrderNumber => "order_number",
            OrderLineField::ItemId => "item_id",
            OrderLineField::Quantity => "quantity",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            OrderLineField::Id => "ID",
            OrderLineField::OrderId => "Order ID",
            OrderLineField::OrderNumber => "Order Number",
            OrderLineField::ItemId => "Item",
            OrderLineField::Quantity => "Quantity",
        }
    }

    fn is_key(&self) -> bool {
        matches!(self, OrderLineField::Id)
    }
}

/// Dòng chi tiết order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: Option<i64>,
    pub order_id: i64,
    /// Bản sao của orders.order_number cho order_id
    pub order_number: String,
    pub item_id: i64,
    /// Luôn > 0
    pub quantity: i64,
}

impl OrderLine {
    /// Tạo order line mới (chưa có id)
    pub fn new(order_id: i64, order_number: &str, item_id: i64, quantity: i64) -> Self {
        Self {
            id: None,
            order_id,
            order_number: order_number.to_string(),
            item_id,
            quantity,
        }
    }
}

impl Record for OrderLine {
    type Field = OrderLineField;

    const ENTITY: &'static str = "order line";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn get(&self, field: OrderLineField) -> Value {
        match field {
            OrderLineField::Id => Value::from(self.id),
            OrderLineField::OrderId => Value::Integer(self.order_id),
            OrderLineField::OrderNumber => Value::from(self.order_number.as_str()),
            OrderLineField::ItemId => Value::Integer(self.item_id),
            OrderLineField::Quantity => Value::Integer(self.quantity),
        }
    }

    fn set(&mut self, field: OrderLineField, value: Value) -> CoreResult<()> {
        match field {
            OrderLineField::Id => self.id = expect_id(Self::ENTITY, "id", value)?,
            OrderLineField::OrderId => {
                self.order_id = expect_i64(Self::ENTITY, "order_id", value)?
            }
            OrderLineField::OrderNumber => self.order_number = into_text(value),
            OrderLineField::ItemId => self.item_id = expect_i64(Self::ENTITY, "item_id", value)?,
            OrderLineField::Quantity => {
                self.quantity = expect_i64(Self::ENTITY, "quantity", value)?
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_line_fields() {
        let mut line = OrderLine::new(1, "ORD001", 2, 5);
        assert_eq!(line.get(OrderLineField::ItemId), Value::Integer(2));

        line.set(OrderLineField::Quantity, Value::Integer(0)).unwrap();
        assert_eq!(line.quantity, 0);

        // Item label không phải là item id
        assert!(line
            .set(OrderLineField::ItemId, Value::from("IT002 - Mouse"))
            .is_err());
        assert_eq!(line.item_id, 2);
    }
}
