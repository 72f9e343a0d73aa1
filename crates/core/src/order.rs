//! # Order Module
//!
//! Order header và OrderType (nhập/xuất kho).

use crate::error::{CoreError, CoreResult};
use crate::record::{expect_date, expect_id, into_text, FieldName, Record};
use crate::value::Value;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Loại order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Hàng nhập vào kho
    #[default]
    To,
    /// Hàng xuất khỏi kho
    From,
}

impl OrderType {
    /// Trả về code string cho DB
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::To => "to",
            OrderType::From => "from",
        }
    }

    /// Tất cả lựa chọn, theo thứ tự hiển thị
    pub fn all() -> &'static [OrderType] {
        &[OrderType::To, OrderType::From]
    }
}

impl FromStr for OrderType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "to" => Ok(OrderType::To),
            "from" => Ok(OrderType::From),
            other => Err(CoreError::UnknownOrderType(other.to_string())),
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fields của bảng `orders`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderField {
    Id,
    OrderNumber,
    Date,
    Type,
}

impl FieldName for OrderField {
    fn all() -> &'static [Self] {
        &[
            OrderField::Id,
            OrderField::OrderNumber,
            OrderField::Date,
            OrderField::Type,
        ]
    }

    fn column(&self) -> &'static str {
        match self {
            OrderField::Id => "id",
            OrderField::OrderNumber => "order_number",
            OrderField::Date => "date",
            OrderField::Type => "type",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            OrderField::Id => "ID",
            OrderField::OrderNumber => "Order Number",
            OrderField::Date => "Date",
            OrderField::Type => "Type",
        }
    }

    fn is_key(&self) -> bool {
        matches!(self, OrderField::Id)
    }
}

/// Order header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: Option<i64>,
    /// Số order, unique (ORD001, ...)
    pub order_number: String,
    pub date: NaiveDate,
    pub order_type: OrderType,
}

impl Default for Order {
    /// Form trống: ngày hôm nay, type đầu tiên
    fn default() -> Self {
        Self {
            id: None,
            order_number: String::new(),
            date: Local::now().date_naive(),
            order_type: OrderType::default(),
        }
    }
}

impl Order {
    /// Tạo order mới (chưa có id)
    pub fn new(order_number: &str, date: NaiveDate, order_type: OrderType) -> Self {
        Self {
            id: None,
            order_number: order_number.to_string(),
            date,
            order_type,
        }
    }
}

impl Record for Order {
    type Field = OrderField;

    const ENTITY: &'static str = "order";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn get(&self, field: OrderField) -> Value {
        match field {
            OrderField::Id => Value::from(self.id),
            OrderField::OrderNumber => Value::from(self.order_number.as_str()),
            OrderField::Date => Value::Date(self.date),
            OrderField::Type => Value::from(self.order_type.as_str()),
        }
    }

    fn set(&mut self, field: OrderField, value: Value) -> CoreResult<()> {
        match field {
            OrderField::Id => self.id = expect_id(Self::ENTITY, "id", value)?,
            OrderField::OrderNumber => self.order_number = into_text(value),
            OrderField::Date => self.date = expect_date(Self::ENTITY, "date", value)?,
            OrderField::Type => self.order_type = into_text(value).parse()?,
        }
        Ok(())
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {})",
            self.order_number,
            self.date.format("%Y-%m-%d"),
            self.order_type
        )
    }
}
