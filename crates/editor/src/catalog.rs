//! Item catalog cho việc chọn item trên order lines

use crate::binding::Relation;
use crate::error::EditorResult;
use wms_core::{Item, Value};
use wms_persistence::Database;

/// Danh sách items có thể tìm kiếm
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: Vec<Item>,
}

impl ItemCatalog {
    /// Load toàn bộ items theo id
    pub fn load(db: &Database) -> EditorResult<Self> {
        let items = db.load::<Item>(&())?;
        Ok(Self { items })
    }

    pub fn reload(&mut self, db: &Database) -> EditorResult<usize> {
        self.items = db.load::<Item>(&())?;
        Ok(self.items.len())
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Item> {
        self.items.iter().find(|i| i.id == Some(id))
    }

    /// Tìm theo id, code hoặc label "IT001 - Laptop"
    pub fn resolve(&self, value: &Value) -> Option<&Item> {
        if let Value::Text(text) = value {
            let text = text.trim();
            if let Some(item) = self
                .items
                .iter()
                .find(|i| i.code.eq_ignore_ascii_case(text) || i.label() == text)
            {
                return Some(item);
            }
        }
        value.as_i64().and_then(|id| self.get(id))
    }

    /// Items có label chứa `query` (không phân biệt hoa thường)
    pub fn search(&self, query: &str) -> Vec<&Item> {
        let query = query.trim().to_lowercase();
        self.items
            .iter()
            .filter(|i| query.is_empty() || i.label().to_lowercase().contains(&query))
            .collect()
    }

    /// Mô tả item theo id hoặc code
    pub fn description_of(&self, value: &Value) -> Option<&str> {
        self.resolve(value).map(|i| i.description.as_str())
    }

    /// Relation item_id ↔ label cho form binding
    pub fn relation(&self) -> Relation {
        Relation::items(&self.items)
    }
}
