//! # Item Module
//!
//! SKU catalog entry.

use crate::error::CoreResult;
use crate::record::{expect_decimal, expect_i64, expect_id, into_text, FieldName, Record};
use crate::value::Value;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fields của bảng `items`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemField {
    Id,
    Code,
    Description,
    Quantity,
    Price,
}

impl FieldName for ItemField {
    fn all() -> &'static [Self] {
        &[
            ItemField::Id,
            ItemField::Code,
            ItemField::Description,
            ItemField::Quantity,
            ItemField::Price,
        ]
    }

    fn column(&self) -> &'static str {
        match self {
            ItemField::Id => "id",
            ItemField::Code => "item_code",
            ItemField::Description => "item_description",
            ItemField::Quantity => "quantity",
            ItemField::Price => "price",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ItemField::Id => "ID",
            ItemField::Code => "Item Code",
            ItemField::Description => "Description",
            ItemField::Quantity => "Quantity",
            ItemField::Price => "Price",
        }
    }

    fn is_key(&self) -> bool {
        matches!(self, ItemField::Id)
    }
}

/// Mặt hàng trong kho
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: Option<i64>,
    /// Mã hàng, unique (IT001, IT002, ...)
    pub code: String,
    pub description: String,
    /// Số lượng tồn, mặc định 0
    pub quantity: i64,
    /// Đơn giá, mặc định 0
    pub price: Decimal,
}

impl Item {
    /// Tạo item mới (chưa có id)
    pub fn new(code: &str, description: &str, quantity: i64, price: Decimal) -> Self {
        Self {
            id: None,
            code: code.to_string(),
            description: description.to_string(),
            quantity,
            price,
        }
    }

    /// Nhãn hiển thị trong danh sách chọn: "IT001 - Laptop"
    pub fn label(&self) -> String {
        format!("{} - {}", self.code, self.description)
    }
}

impl Record for Item {
    type Field = ItemField;

    const ENTITY: &'static str = "item";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn get(&self, field: ItemField) -> Value {
        match field {
            ItemField::Id => Value::from(self.id),
            ItemField::Code => Value::from(self.code.as_str()),
            ItemField::Description => Value::from(self.description.as_str()),
            ItemField::Quantity => Value::Integer(self.quantity),
            ItemField::Price => Value::Decimal(self.price),
        }
    }

    fn set(&mut self, field: ItemField, value: Value) -> CoreResult<()> {
        match field {
            ItemField::Id => self.id = expect_id(Self::ENTITY, "id", value)?,
            ItemField::Code => self.code = into_text(value),
            ItemField::Description => self.description = into_text(value),
            ItemField::Quantity => self.quantity = expect_i64(Self::ENTITY, "quantity", value)?,
            ItemField::Price => self.price = expect_decimal(Self::ENTITY, "price", value)?,
        }
        Ok(())
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (qty {}, price {})", self.label(), self.quantity, self.price)
    }
}
