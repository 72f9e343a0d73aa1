//! Order lines editor (master/detail)
//!
//! Lines luôn thuộc một parent order. Đổi parent (load, tìm theo số,
//! prev/next) sẽ load lại lines của order đó. Navigation bị khóa khi
//! đang Adding / Editing.

use crate::binding::Relation;
use crate::catalog::ItemCatalog;
use crate::controller::RecordEditor;
use crate::error::{EditorResult, ValidationError};
use crate::schema::{EditMode, EditorSchema};
use std::ops::{Deref, DerefMut};
use tracing::info;
use wms_core::{Item, Order, OrderLine, OrderLineField};
use wms_persistence::{Database, OrderRepo};

/// Rules của order lines: item phải có trong catalog, quantity > 0,
/// order_id / order_number lấy từ parent.
#[derive(Debug, Clone, Default)]
pub struct OrderLineSchema {
    parent: Option<Order>,
    catalog: ItemCatalog,
}

impl OrderLineSchema {
    pub fn new(parent: Option<Order>, catalog: ItemCatalog) -> Self {
        Self { parent, catalog }
    }

    pub fn parent(&self) -> Option<&Order> {
        self.parent.as_ref()
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }
}

impl EditorSchema for OrderLineSchema {
    type Record = OrderLine;

    fn form_fields(&self) -> &'static [OrderLineField] {
        &[OrderLineField::ItemId, OrderLineField::Quantity]
    }

    fn relations(&self) -> Vec<(OrderLineField, Relation)> {
        vec![(OrderLineField::ItemId, self.catalog.relation())]
    }

    fn scope(&self) -> Option<i64> {
        self.parent.as_ref().and_then(|o| o.id)
    }

    fn prepare(&mut self, _mode: EditMode, candidate: &mut OrderLine) -> EditorResult<()> {
        let parent = self.parent.as_ref().ok_or(ValidationError::NoParentOrder)?;
        candidate.order_id = parent.id.ok_or(ValidationError::NoParentOrder)?;
        candidate.order_number = parent.order_number.clone();
        Ok(())
    }

    /// Không truy cập store
    fn validate(&self, _db: &Database, _mode: EditMode, candidate: &OrderLine) -> EditorResult<()> {
        if candidate.item_id <= 0 {
            return Err(ValidationError::ItemNotSelected.into());
        }
        if self.catalog.get(candidate.item_id).is_none() {
            return Err(ValidationError::UnknownReference {
                field: "Item",
                value: candidate.item_id.to_string(),
            }
            .into());
        }
        if candidate.quantity <= 0 {
            return Err(ValidationError::NotPositive { field: "Quantity" }.into());
        }
        Ok(())
    }
}

/// Editor order lines kèm context của parent order
pub struct OrderLinesEditor {
    editor: RecordEditor<OrderLineSchema>,
    orders: Vec<Order>,
}

impl OrderLinesEditor {
    /// Load danh sách orders và mở order đầu tiên
    pub fn new(db: &Database) -> EditorResult<Self> {
        let orders = db.load::<Order>(&())?;
        let catalog = ItemCatalog::load(db)?;
        let schema = OrderLineSchema::new(orders.first().cloned(), catalog);

        Ok(Self {
            editor: RecordEditor::new(schema, db)?,
            orders,
        })
    }

    /// Mở editor tại order `order_id`
    pub fn open(db: &Database, order_id: i64) -> EditorResult<Self> {
        let mut editor = Self::new(db)?;
        editor.load_order(db, order_id)?;
        Ok(editor)
    }

    /// Load lại danh sách orders (theo id) và catalog; giữ parent nếu còn
    pub fn load_orders(&mut self, db: &Database) -> EditorResult<usize> {
        self.editor.ensure_viewing("reload orders")?;
        self.orders = db.load::<Order>(&())?;

        let current = self.current_order().and_then(|o| o.id);
        let parent = current
            .and_then(|id| self.orders.iter().find(|o| o.id == Some(id)))
            .or(self.orders.first())
            .cloned();

        self.reload_catalog(db)?;
        self.editor.schema_mut().parent = parent;
        self.editor.refresh(db)?;
        Ok(self.orders.len())
    }

    /// Load lại items cho ô chọn item
    pub fn reload_catalog(&mut self, db: &Database) -> EditorResult<usize> {
        let count = self.editor.schema_mut().catalog.reload(db)?;
        let relation = self.editor.schema().catalog.relation();
        self.editor.set_relation(OrderLineField::ItemId, relation);
        Ok(count)
    }

    /// Đổi parent sang order `order_id`
    pub fn load_order(&mut self, db: &Database, order_id: i64) -> EditorResult<()> {
        self.editor.ensure_viewing("change order")?;

        let order = match self.orders.iter().find(|o| o.id == Some(order_id)) {
            Some(order) => order.clone(),
            // Có thể là order vừa được tạo
            None if order_id > 0 => {
                self.orders = db.load::<Order>(&())?;
                self.orders
                    .iter()
                    .find(|o| o.id == Some(order_id))
                    .cloned()
                    .ok_or(ValidationError::InvalidOrderId { id: order_id })?
            }
            None => return Err(ValidationError::InvalidOrderId { id: order_id }.into()),
        };

        info!(order_number = %order.order_number, "Loading order lines");
        self.editor.schema_mut().parent = Some(order);
        self.editor.refresh(db)?;
        Ok(())
    }

    /// Tìm order theo số (đã trim) rồi load
    pub fn load_order_by_number(&mut self, db: &Database, order_number: &str) -> EditorResult<()> {
        self.editor.ensure_viewing("search orders")?;

        let order_number = order_number.trim();
        if order_number.is_empty() {
            return Err(ValidationError::EmptyOrderNumber.into());
        }

        match OrderRepo::get_by_number(db.conn(), order_number)?.and_then(|o| o.id) {
            Some(id) => self.load_order(db, id),
            None => Err(ValidationError::OrderNotFound {
                order_number: order_number.to_string(),
            }
            .into()),
        }
    }

    fn current_index(&self) -> Option<usize> {
        let id = self.current_order()?.id?;
        self.orders.iter().position(|o| o.id == Some(id))
    }

    pub fn can_navigate_prev(&self) -> bool {
        self.editor.mode() == EditMode::Viewing && self.current_index().is_some_and(|i| i > 0)
    }

    pub fn can_navigate_next(&self) -> bool {
        self.editor.mode() == EditMode::Viewing
            && self
                .current_index()
                .is_some_and(|i| i + 1 < self.orders.len())
    }

    /// Order trước (theo id); false nếu đang ở order đầu
    pub fn navigate_prev(&mut self, db: &Database) -> EditorResult<bool> {
        self.editor.ensure_viewing("navigate")?;
        if !self.can_navigate_prev() {
            return Ok(false);
        }
        let target = self
            .current_index()
            .and_then(|i| self.orders.get(i - 1))
            .and_then(|o| o.id);
        match target {
            Some(id) => self.load_order(db, id).map(|_| true),
            None => Ok(false),
        }
    }

    /// Order kế tiếp (theo id); false nếu đang ở order cuối
    pub fn navigate_next(&mut self, db: &Database) -> EditorResult<bool> {
        self.editor.ensure_viewing("navigate")?;
        if !self.can_navigate_next() {
            return Ok(false);
        }
        let target = self
            .current_index()
            .and_then(|i| self.orders.get(i + 1))
            .and_then(|o| o.id);
        match target {
            Some(id) => self.load_order(db, id).map(|_| true),
            None => Ok(false),
        }
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn current_order(&self) -> Option<&Order> {
        self.editor.schema().parent()
    }

    /// "Order Lines - Order #ORD001"
    pub fn title(&self) -> String {
        match self.current_order() {
            Some(order) => format!("Order Lines - Order #{}", order.order_number),
            None => "Order Lines".to_string(),
        }
    }

    /// Items có label chứa `query`
    pub fn search_items(&self, query: &str) -> Vec<&Item> {
        self.editor.schema().catalog().search(query)
    }

    /// Chọn item cho line đang nhập: id, code hoặc label
    pub fn select_item(&mut self, item: impl Into<wms_core::Value>) -> EditorResult<()> {
        self.editor.set_field(OrderLineField::ItemId, item)
    }

    /// Mô tả của item đang chọn trên form
    pub fn item_description(&self) -> Option<String> {
        let value = self.editor.value(OrderLineField::ItemId);
        self.editor
            .schema()
            .catalog()
            .description_of(&value)
            .map(str::to_string)
    }
}

impl Deref for OrderLinesEditor {
    type Target = RecordEditor<OrderLineSchema>;

    fn deref(&self) -> &Self::Target {
        &self.editor
    }
}

impl DerefMut for OrderLinesEditor {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.editor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn open() -> (Database, OrderLinesEditor) {
        let db =
            Database::open_in_memory_with_seed_date(NaiveDate::from_ymd_opt(2026, 1, 25).unwrap())
                .unwrap();
        let editor = OrderLinesEditor::new(&db).unwrap();
        (db, editor)
    }

    #[test]
    fn test_opens_first_order() {
        let (_db, editor) = open();
        assert_eq!(editor.title(), "Order Lines - Order #ORD001");
        assert_eq!(editor.model().row_count(), 2);
        assert_eq!(editor.selected(), Some(0));
        assert_eq!(editor.display(OrderLineField::ItemId), "IT001 - Laptop");
        assert_eq!(editor.item_description().as_deref(), Some("Laptop"));
    }

    #[test]
    fn test_navigation() {
        let (db, mut editor) = open();
        assert!(!editor.can_navigate_prev());
        assert!(editor.can_navigate_next());

        assert!(editor.navigate_next(&db).unwrap());
        assert_eq!(editor.current_order().unwrap().order_number, "ORD002");
        assert_eq!(editor.model().row_count(), 1);
        assert!(!editor.can_navigate_next());
        assert!(!editor.navigate_next(&db).unwrap());

        assert!(editor.navigate_prev(&db).unwrap());
        assert_eq!(editor.current_order().unwrap().order_number, "ORD001");
    }

    #[test]
    fn test_navigation_locked_while_editing() {
        let (db, mut editor) = open();
        editor.add().unwrap();
        assert!(!editor.can_navigate_next());
        assert!(editor.navigate_next(&db).is_err());
        assert!(editor.load_order_by_number(&db, "ORD002").is_err());
        assert_eq!(editor.current_order().unwrap().order_number, "ORD001");
    }

    #[test]
    fn test_search_by_number() {
        let (db, mut editor) = open();
        editor.load_order_by_number(&db, "  ORD002 ").unwrap();
        assert_eq!(editor.title(), "Order Lines - Order #ORD002");

        let err = editor.load_order_by_number(&db, "ORD404").unwrap_err();
        assert_eq!(err.to_string(), "Order number not found.");
        let err = editor.load_order_by_number(&db, "   ").unwrap_err();
        assert_eq!(err.validation(), Some(&ValidationError::EmptyOrderNumber));

        let err = editor.load_order(&db, 99).unwrap_err();
        assert_eq!(err.to_string(), "Invalid order ID.");
        assert_eq!(editor.current_order().unwrap().order_number, "ORD002");
    }

    #[test]
    fn test_item_search_and_selection() {
        let (_db, mut editor) = open();
        assert_eq!(editor.search_items("mouse").len(), 1);

        editor.add().unwrap();
        editor.select_item("IT003").unwrap();
        assert_eq!(editor.item_description().as_deref(), Some("Keyboard"));
        editor.select_item("IT002 - Mouse").unwrap();
        assert_eq!(editor.value(OrderLineField::ItemId), wms_core::Value::Integer(2));
        assert!(editor.select_item("IT404").is_err());
    }
}
