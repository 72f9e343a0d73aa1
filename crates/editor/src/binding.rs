//! Form binding
//!
//! Giữ giá trị đang nhập của một record, tách khỏi model. Chỉ `commit`
//! mới ghi các giá trị này vào model.

use crate::error::{EditorError, EditorResult, ValidationError};
use crate::model::RecordModel;
use std::collections::{BTreeMap, HashMap};
use wms_core::{CoreError, FieldName, Item, Record, Value};
use wms_persistence::Table;

/// Một lựa chọn của relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationEntry {
    pub key: i64,
    pub code: String,
    pub label: String,
}

/// Quan hệ key ↔ label cho field tham chiếu (vd. item_id ↔ "IT001 - Laptop")
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relation {
    name: &'static str,
    entries: Vec<RelationEntry>,
}

impl Relation {
    pub fn new(name: &'static str, entries: Vec<RelationEntry>) -> Self {
        Self { name, entries }
    }

    /// Relation tới bảng items
    pub fn items(items: &[Item]) -> Self {
        let entries = items
            .iter()
            .filter_map(|item| {
                item.id.map(|key| RelationEntry {
                    key,
                    code: item.code.clone(),
                    label: item.label(),
                })
            })
            .collect();
        Self::new("item", entries)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn entries(&self) -> &[RelationEntry] {
        &self.entries
    }

    /// Label của key
    pub fn label_of(&self, key: i64) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.label.as_str())
    }

    /// Key từ giá trị nhập: key, label hoặc code
    pub fn resolve(&self, value: &Value) -> Option<i64> {
        if let Value::Text(text) = value {
            let text = text.trim();
            if let Some(entry) = self
                .entries
                .iter()
                .find(|e| e.label == text || e.code.eq_ignore_ascii_case(text))
            {
                return Some(entry.key);
            }
        }

        let key = value.as_i64()?;
        self.entries.iter().any(|e| e.key == key).then_some(key)
    }

    /// Lọc theo chuỗi con của label, không phân biệt hoa thường
    pub fn search(&self, query: &str) -> Vec<&RelationEntry> {
        let query = query.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|e| query.is_empty() || e.label.to_lowercase().contains(&query))
            .collect()
    }
}

/// Form bind vào một row của `RecordModel`
#[derive(Debug, Clone)]
pub struct FormBinding<R: Record> {
    fields: Vec<R::Field>,
    relations: HashMap<R::Field, Relation>,
    values: BTreeMap<R::Field, Value>,
    current_row: Option<usize>,
    bound: bool,
}

impl<R: Record> FormBinding<R> {
    pub fn new(fields: &[R::Field]) -> Self {
        let mut form = Self {
            fields: fields.to_vec(),
            relations: HashMap::new(),
            values: BTreeMap::new(),
            current_row: None,
            bound: false,
        };
        form.clear();
        form
    }

    /// Gắn relation cho field
    pub fn set_relation(&mut self, field: R::Field, relation: Relation) {
        self.relations.insert(field, relation);
    }

    pub fn relation(&self, field: R::Field) -> Option<&Relation> {
        self.relations.get(&field)
    }

    pub fn fields(&self) -> &[R::Field] {
        &self.fields
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn current_row(&self) -> Option<usize> {
        self.current_row
    }

    /// Giá trị đang nhập
    pub fn value(&self, field: R::Field) -> Value {
        self.values.get(&field).cloned().unwrap_or_default()
    }

    /// Ghi giá trị vào form (chưa vào model).
    ///
    /// Field có relation nhận key, label hoặc code và luôn lưu key.
    pub fn set_value(&mut self, field: R::Field, value: Value) -> EditorResult<()> {
        if field.is_key() || !self.fields.contains(&field) {
            return Err(CoreError::ReadOnlyField {
                entity: R::ENTITY,
                field: field.column(),
            }
            .into());
        }

        let value = match self.relations.get(&field) {
            Some(relation) => match relation.resolve(&value) {
                Some(key) => Value::Integer(key),
                None => {
                    return Err(ValidationError::UnknownReference {
                        field: field.label(),
                        value: value.to_string(),
                    }
                    .into())
                }
            },
            None => value,
        };

        self.values.insert(field, value);
        Ok(())
    }

    /// Text hiển thị; field có relation hiển thị label
    pub fn display(&self, field: R::Field) -> String {
        let value = self.value(field);
        self.relations
            .get(&field)
            .and_then(|relation| value.as_i64().and_then(|key| relation.label_of(key)))
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string())
    }

    /// Form trống: giá trị mặc định, relation fields chưa chọn
    pub fn clear(&mut self) {
        let blank = R::default();
        self.values = self
            .fields
            .iter()
            .map(|f| {
                let value = if self.relations.contains_key(f) {
                    Value::Null
                } else {
                    blank.get(*f)
                };
                (*f, value)
            })
            .collect();
    }

    /// Dựng record từ `base` + giá trị form; Null được bỏ qua
    pub fn to_record(&self, base: &R) -> EditorResult<R> {
        let mut record = base.clone();
        for field in &self.fields {
            match self.values.get(field) {
                Some(Value::Null) | None => {}
                Some(value) => record.set(*field, value.clone())?,
            }
        }
        Ok(record)
    }

    fn load_from(&mut self, record: &R) {
        self.values = self.fields.iter().map(|f| (*f, record.get(*f))).collect();
    }
}

impl<R: Table> FormBinding<R> {
    /// Bind vào model, đồng bộ row hiện tại nếu có
    pub fn bind(&mut self, model: &RecordModel<R>) {
        self.bound = true;
        match self.current_row.and_then(|i| model.row(i)) {
            Some(record) => {
                let record = record.clone();
                self.load_from(&record);
            }
            None => {
                self.current_row = None;
                self.clear();
            }
        }
    }

    pub fn unbind(&mut self) {
        self.bound = false;
        self.current_row = None;
        self.clear();
    }

    /// Chuyển form sang row `index`, bỏ các giá trị chưa commit
    pub fn set_current_row(&mut self, model: &RecordModel<R>, index: usize) -> EditorResult<()> {
        let record = model.row(index).ok_or(EditorError::RowOutOfRange {
            index,
            count: model.row_count(),
        })?;
        self.load_from(record);
        self.current_row = Some(index);
        self.bound = true;
        Ok(())
    }

    /// Ghi giá trị form vào row hiện tại của model (overlay)
    pub fn commit(&self, model: &mut RecordModel<R>) -> EditorResult<()> {
        let index = self
            .current_row
            .ok_or_else(|| EditorError::selection_required(R::ENTITY, "commit"))?;
        let base = model.row(index).ok_or(EditorError::RowOutOfRange {
            index,
            count: model.row_count(),
        })?;
        let record = self.to_record(base)?;
        model.set_row(index, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RowStatus;
    use rust_decimal_macros::dec;
    use wms_core::{ItemField, OrderLine, OrderLineField};
    use wms_persistence::Database;

    const ITEM_FIELDS: &[ItemField] = &[
        ItemField::Code,
        ItemField::Description,
        ItemField::Quantity,
        ItemField::Price,
    ];

    #[test]
    fn test_edits_stay_in_form_until_commit() {
        let db = Database::open_in_memory().unwrap();
        let mut model = RecordModel::<Item>::default();
        model.load(&db).unwrap();

        let mut form = FormBinding::new(ITEM_FIELDS);
        form.set_current_row(&model, 0).unwrap();
        assert_eq!(form.value(ItemField::Code), Value::from("IT001"));

        form.set_value(ItemField::Price, Value::from("1100.50")).unwrap();
        assert_eq!(model.row(0).unwrap().price, dec!(1200.00));
        assert_eq!(model.status(0), Some(RowStatus::Clean));

        form.commit(&mut model).unwrap();
        assert_eq!(model.row(0).unwrap().price, dec!(1100.50));
        assert_eq!(model.status(0), Some(RowStatus::Updated));
    }

    #[test]
    fn test_switching_row_discards_uncommitted() {
        let db = Database::open_in_memory().unwrap();
        let mut model = RecordModel::<Item>::default();
        model.load(&db).unwrap();

        let mut form = FormBinding::new(ITEM_FIELDS);
        form.bind(&model);
        form.set_current_row(&model, 0).unwrap();
        form.set_value(ItemField::Description, Value::from("Notebook")).unwrap();
        form.set_current_row(&model, 0).unwrap();
        assert_eq!(form.value(ItemField::Description), Value::from("Laptop"));

        form.unbind();
        assert!(!form.is_bound());
        assert!(form.commit(&mut model).is_err());
    }

    #[test]
    fn test_key_field_is_read_only() {
        let mut form = FormBinding::<Item>::new(ITEM_FIELDS);
        let err = form.set_value(ItemField::Id, Value::Integer(5)).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_invalid_value_is_validation_error() {
        let form = {
            let mut form = FormBinding::<Item>::new(ITEM_FIELDS);
            form.set_value(ItemField::Quantity, Value::from("ten")).unwrap();
            form
        };
        let err = form.to_record(&Item::default()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_relation_resolves_label_and_code() {
        let db = Database::open_in_memory().unwrap();
        let items = db.load::<Item>(&()).unwrap();

        let mut form =
            FormBinding::<OrderLine>::new(&[OrderLineField::ItemId, OrderLineField::Quantity]);
        form.set_relation(OrderLineField::ItemId, Relation::items(&items));
        assert_eq!(form.value(OrderLineField::ItemId), Value::Null);

        form.set_value(OrderLineField::ItemId, Value::from("IT002 - Mouse")).unwrap();
        assert_eq!(form.value(OrderLineField::ItemId), Value::Integer(2));
        assert_eq!(form.display(OrderLineField::ItemId), "IT002 - Mouse");

        form.set_value(OrderLineField::ItemId, Value::from("it003")).unwrap();
        assert_eq!(form.value(OrderLineField::ItemId), Value::Integer(3));

        form.set_value(OrderLineField::ItemId, Value::Integer(1)).unwrap();
        assert_eq!(form.display(OrderLineField::ItemId), "IT001 - Laptop");

        let err = form
            .set_value(OrderLineField::ItemId, Value::from("IT999 - Nothing"))
            .unwrap_err();
        assert!(matches!(
            err.validation(),
            Some(ValidationError::UnknownReference { .. })
        ));
        // Giá trị cũ giữ nguyên
        assert_eq!(form.value(OrderLineField::ItemId), Value::Integer(1));
    }

    #[test]
    fn test_relation_search() {
        let items = vec![
            Item {
                id: Some(1),
                ..Item::new("IT001", "Laptop", 1, dec!(1))
            },
            Item {
                id: Some(2),
                ..Item::new("IT002", "Mouse", 1, dec!(1))
            },
        ];
        let relation = Relation::items(&items);
        assert_eq!(relation.search("mou").len(), 1);
        assert_eq!(relation.search("").len(), 2);
        assert_eq!(relation.search("it00").len(), 2);
    }
}
