//! # Record Module
//!
//! Named-field access cho các record types. Form binding và record model
//! truy cập field qua enum key, không bao giờ qua vị trí cột.

use crate::error::{CoreError, CoreResult};
use crate::value::Value;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use std::hash::Hash;

/// Field key của một record type.
pub trait FieldName: Copy + Eq + Ord + Hash + fmt::Debug + 'static {
    /// Tất cả fields theo thứ tự cột trong bảng
    fn all() -> &'static [Self];

    /// Tên cột trong database
    fn column(&self) -> &'static str;

    /// Nhãn hiển thị (header)
    fn label(&self) -> &'static str;

    /// Field chỉ đọc (surrogate key)
    fn is_key(&self) -> bool;
}

/// Một row của bảng, truy cập theo tên field.
pub trait Record: Clone + Default + fmt::Debug + PartialEq {
    type Field: FieldName;

    /// Tên entity dùng trong messages ("item", "order", ...)
    const ENTITY: &'static str;

    /// Surrogate key; None cho row chưa được insert
    fn id(&self) -> Option<i64>;

    /// Đọc giá trị field
    fn get(&self, field: Self::Field) -> Value;

    /// Ghi giá trị field, chuyển đổi kiểu tường minh
    fn set(&mut self, field: Self::Field, value: Value) -> CoreResult<()>;

    /// Danh sách fields khác nhau giữa hai records
    fn diff(&self, other: &Self) -> Vec<Self::Field> {
        Self::Field::all()
            .iter()
            .copied()
            .filter(|f| self.get(*f) != other.get(*f))
            .collect()
    }
}

// === Conversion helpers cho Record::set ===

pub(crate) fn expect_id(
    entity: &'static str,
    field: &'static str,
    value: Value,
) -> CoreResult<Option<i64>> {
    match value {
        Value::Null => Ok(None),
        other => other
            .as_i64()
            .map(Some)
            .ok_or_else(|| CoreError::invalid_field(entity, field, "integer id", other)),
    }
}

pub(crate) fn expect_i64(entity: &'static str, field: &'static str, value: Value) -> CoreResult<i64> {
    value
        .as_i64()
        .ok_or_else(|| CoreError::invalid_field(entity, field, "integer", value))
}

pub(crate) fn expect_decimal(
    entity: &'static str,
    field: &'static str,
    value: Value,
) -> CoreResult<Decimal> {
    value
        .as_decimal()
        .ok_or_else(|| CoreError::invalid_field(entity, field, "decimal", value))
}

pub(crate) fn expect_date(
    entity: &'static str,
    field: &'static str,
    value: Value,
) -> CoreResult<NaiveDate> {
    value
        .as_date()
        .ok_or_else(|| CoreError::invalid_field(entity, field, "date (YYYY-MM-DD)", value))
}

pub(crate) fn into_text(value: Value) -> String {
    match value {
        Value::Text(s) => s,
        other => other.to_string(),
    }
}
