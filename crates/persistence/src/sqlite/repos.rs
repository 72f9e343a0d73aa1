//! Repository implementations cho SQLite
//!
//! CRUD operations cho bốn bảng, luôn dùng parameter binding.

use crate::error::{PersistenceError, PersistenceResult};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::str::FromStr;
use wms_core::{Item, Order, OrderLine, OrderType, User};

// ============================================================================
// Row mapping
// ============================================================================

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: Some(row.get(0)?),
        login: row.get(1)?,
        password_hash: row.get(2)?,
    })
}

fn map_item(row: &Row<'_>) -> rusqlite::Result<Item> {
    let price: String = row.get(4)?;
    let price = Decimal::from_str(&price)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

    Ok(Item {
        id: Some(row.get(0)?),
        code: row.get(1)?,
        description: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        quantity: row.get(3)?,
        price,
    })
}

fn map_order(row: &Row<'_>) -> rusqlite::Result<Order> {
    let order_type: String = row.get(3)?;
    let order_type = OrderType::from_str(&order_type)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    Ok(Order {
        id: Some(row.get(0)?),
        order_number: row.get(1)?,
        date: row.get(2)?,
        order_type,
    })
}

fn map_order_line(row: &Row<'_>) -> rusqlite::Result<OrderLine> {
    Ok(OrderLine {
        id: Some(row.get(0)?),
        order_id: row.get(1)?,
        order_number: row.get(2)?,
        item_id: row.get(3)?,
        quantity: row.get(4)?,
    })
}

fn require_id(entity: &str, id: Option<i64>) -> PersistenceResult<i64> {
    id.ok_or_else(|| PersistenceError::not_found(entity, "<unsaved>"))
}

// ============================================================================
// User Repository
// ============================================================================

/// Repository cho users table
pub struct UserRepo;

impl UserRepo {
    const SELECT: &'static str = "SELECT id, login, password FROM users";

    /// Lấy tất cả users theo id
    pub fn get_all(conn: &Connection) -> PersistenceResult<Vec<User>> {
        let mut stmt = conn.prepare(&format!("{} ORDER BY id", Self::SELECT))?;
        let rows = stmt
            .query_map([], map_user)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Lấy user theo ID
    pub fn get_by_id(conn: &Connection, id: i64) -> PersistenceResult<User> {
        conn.query_row(&format!("{} WHERE id = ?1", Self::SELECT), params![id], map_user)
            .optional()?
            .ok_or_else(|| PersistenceError::not_found("User", id))
    }

    /// Lấy user theo login
    pub fn get_by_login(conn: &Connection, login: &str) -> PersistenceResult<Option<User>> {
        let user = conn
            .query_row(
                &format!("{} WHERE login = ?1", Self::SELECT),
                params![login],
                map_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Thêm user mới, trả về id
    pub fn insert(conn: &Connection, user: &User) -> PersistenceResult<i64> {
        conn.execute(
            "INSERT INTO users (login, password) VALUES (?1, ?2)",
            params![user.login, user.password_hash],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Cập nhật login và password hash
    pub fn update(conn: &Connection, user: &User) -> PersistenceResult<()> {
        let id = require_id("User", user.id)?;
        let rows = conn.execute(
            "UPDATE users SET login = ?1, password = ?2 WHERE id = ?3",
            params![user.login, user.password_hash, id],
        )?;

        if rows == 0 {
            return Err(PersistenceError::not_found("User", id));
        }
        Ok(())
    }

    /// Xóa user
    pub fn delete(conn: &Connection, id: i64) -> PersistenceResult<()> {
        let rows = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;

        if rows == 0 {
            return Err(PersistenceError::not_found("User", id));
        }
        Ok(())
    }

    /// Đếm users
    pub fn count(conn: &Connection) -> PersistenceResult<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }

    /// ID nhỏ nhất (admin user được bảo vệ)
    pub fn min_id(conn: &Connection) -> PersistenceResult<Option<i64>> {
        let id = conn.query_row("SELECT MIN(id) FROM users", [], |row| row.get(0))?;
        Ok(id)
    }
}

// ============================================================================
// Item Repository
// ============================================================================

/// Repository cho items table
pub struct ItemRepo;

impl ItemRepo {
    const SELECT: &'static str =
        "SELECT id, item_code, item_description, quantity, price FROM items";

    /// Lấy tất cả items theo id
    pub fn get_all(conn: &Connection) -> PersistenceResult<Vec<Item>> {
        let mut stmt = conn.prepare(&format!("{} ORDER BY id", Self::SELECT))?;
        let rows = stmt
            .query_map([], map_item)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Lấy item theo ID
    pub fn get_by_id(conn: &Connection, id: i64) -> PersistenceResult<Item> {
        conn.query_row(&format!("{} WHERE id = ?1", Self::SELECT), params![id], map_item)
            .optional()?
            .ok_or_else(|| PersistenceError::not_found("Item", id))
    }

    /// Lấy item theo code
    pub fn get_by_code(conn: &Connection, code: &str) -> PersistenceResult<Option<Item>> {
        let item = conn
            .query_row(
                &format!("{} WHERE item_code = ?1", Self::SELECT),
                params![code],
                map_item,
            )
            .optional()?;
        Ok(item)
    }

    /// Thêm item mới, trả về id
    pub fn insert(conn: &Connection, item: &Item) -> PersistenceResult<i64> {
        conn.execute(
            "INSERT INTO items (item_code, item_description, quantity, price) VALUES (?1, ?2, ?3, ?4)",
            params![item.code, item.description, item.quantity, item.price.to_string()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Cập nhật item
    pub fn update(conn: &Connection, item: &Item) -> PersistenceResult<()> {
        let id = require_id("Item", item.id)?;
        let rows = conn.execute(
            "UPDATE items SET item_code = ?1, item_description = ?2, quantity = ?3, price = ?4 WHERE id = ?5",
            params![item.code, item.description, item.quantity, item.price.to_string(), id],
        )?;

        if rows == 0 {
            return Err(PersistenceError::not_found("Item", id));
        }
        Ok(())
    }

    /// Xóa item
    pub fn delete(conn: &Connection, id: i64) -> PersistenceResult<()> {
        let rows = conn.execute("DELETE FROM items WHERE id = ?1", params![id])?;

        if rows == 0 {
            return Err(PersistenceError::not_found("Item", id));
        }
        Ok(())
    }
}

// ============================================================================
// Order Repository
// ============================================================================

/// Repository cho orders table
pub struct OrderRepo;

impl OrderRepo {
    const SELECT: &'static str = "SELECT id, order_number, date, type FROM orders";

    /// Lấy tất cả orders theo id
    pub fn get_all(conn: &Connection) -> PersistenceResult<Vec<Order>> {
        let mut stmt = conn.prepare(&format!("{} ORDER BY id", Self::SELECT))?;
        let rows = stmt
            .query_map([], map_order)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Lấy order theo ID
    pub fn get_by_id(conn: &Connection, id: i64) -> PersistenceResult<Order> {
        conn.query_row(&format!("{} WHERE id = ?1", Self::SELECT), params![id], map_order)
            .optional()?
            .ok_or_else(|| PersistenceError::not_found("Order", id))
    }

    /// Lấy order theo order number
    pub fn get_by_number(conn: &Connection, order_number: &str) -> PersistenceResult<Option<Order>> {
        let order = conn
            .query_row(
                &format!("{} WHERE order_number = ?1", Self::SELECT),
                params![order_number],
                map_order,
            )
            .optional()?;
        Ok(order)
    }

    /// Thêm order mới, trả về id
    pub fn insert(conn: &Connection, order: &Order) -> PersistenceResult<i64> {
        conn.execute(
            "INSERT INTO orders (order_number, date, type) VALUES (?1, ?2, ?3)",
            params![order.order_number, order.date, order.order_type.as_str()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Cập nhật order.
    ///
    /// Trigger `trg_orders_number_sync` ghi lại order_number trên các lines.
    pub fn update(conn: &Connection, order: &Order) -> PersistenceResult<()> {
        let id = require_id("Order", order.id)?;
        let rows = conn.execute(
            "UPDATE orders SET order_number = ?1, date = ?2, type = ?3 WHERE id = ?4",
            params![order.order_number, order.date, order.order_type.as_str(), id],
        )?;

        if rows == 0 {
            return Err(PersistenceError::not_found("Order", id));
        }
        Ok(())
    }

    /// Xóa order
    pub fn delete(conn: &Connection, id: i64) -> PersistenceResult<()> {
        let rows = conn.execute("DELETE FROM orders WHERE id = ?1", params![id])?;

        if rows == 0 {
            return Err(PersistenceError::not_found("Order", id));
        }
        Ok(())
    }
}

// ============================================================================
// Order Line Repository
// ============================================================================

/// Repository cho order_lines table.
///
/// `order_number` luôn được copy từ bảng orders khi ghi; giá trị trong
/// `OrderLine` truyền vào bị bỏ qua.
pub struct OrderLineRepo;

impl OrderLineRepo {
    const SELECT: &'static str =
        "SELECT id, order_id, order_number, item_id, quantity FROM order_lines";

    /// Lấy tất cả order lines
    pub fn get_all(conn: &Connection) -> PersistenceResult<Vec<OrderLine>> {
        let mut stmt = conn.prepare(&format!("{} ORDER BY id", Self::SELECT))?;
        let rows = stmt
            .query_map([], map_order_line)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Lấy lines của một order
    pub fn get_by_order(conn: &Connection, order_id: i64) -> PersistenceResult<Vec<OrderLine>> {
        let mut stmt = conn.prepare(&format!("{} WHERE order_id = ?1 ORDER BY id", Self::SELECT))?;
        let rows = stmt
            .query_map(params![order_id], map_order_line)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Lấy line theo ID
    pub fn get_by_id(conn: &Connection, id: i64) -> PersistenceResult<OrderLine> {
        conn.query_row(
            &format!("{} WHERE id = ?1", Self::SELECT),
            params![id],
            map_order_line,
        )
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("OrderLine", id))
    }

    /// Thêm line mới, order_number lấy từ orders
    pub fn insert(conn: &Connection, line: &OrderLine) -> PersistenceResult<i64> {
        let rows = conn.execute(
            "INSERT INTO order_lines (order_id, order_number, item_id, quantity)
             SELECT id, order_number, ?2, ?3 FROM orders WHERE id = ?1",
            params![line.order_id, line.item_id, line.quantity],
        )?;

        if rows == 0 {
            return Err(PersistenceError::not_found("Order", line.order_id));
        }
        Ok(conn.last_insert_rowid())
    }

    /// Cập nhật line, order_number lấy lại từ orders
    pub fn update(conn: &Connection, line: &OrderLine) -> PersistenceResult<()> {
        let id = require_id("OrderLine", line.id)?;
        let parent_exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM orders WHERE id = ?1)",
            params![line.order_id],
            |row| row.get(0),
        )?;
        if !parent_exists {
            return Err(PersistenceError::not_found("Order", line.order_id));
        }

        let rows = conn.execute(
            "UPDATE order_lines
             SET order_id = ?1,
                 order_number = (SELECT order_number FROM orders WHERE id = ?1),
                 item_id = ?2,
                 quantity = ?3
             WHERE id = ?4",
            params![line.order_id, line.item_id, line.quantity, id],
        )?;

        if rows == 0 {
            return Err(PersistenceError::not_found("OrderLine", id));
        }
        Ok(())
    }

    /// Xóa line
    pub fn delete(conn: &Connection, id: i64) -> PersistenceResult<()> {
        let rows = conn.execute("DELETE FROM order_lines WHERE id = ?1", params![id])?;

        if rows == 0 {
            return Err(PersistenceError::not_found("OrderLine", id));
        }
        Ok(())
    }

    /// Đếm lines tham chiếu tới item
    pub fn count_by_item(conn: &Connection, item_id: i64) -> PersistenceResult<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM order_lines WHERE item_id = ?1",
            params![item_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Đếm lines của order
    pub fn count_by_order(conn: &Connection, order_id: i64) -> PersistenceResult<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM order_lines WHERE order_id = ?1",
            params![order_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// IDs của lines có order_number khác với order cha
    pub fn inconsistent_ids(conn: &Connection) -> PersistenceResult<Vec<i64>> {
        let mut stmt = conn.prepare(
            "SELECT l.id FROM order_lines l
             LEFT JOIN orders o ON o.id = l.order_id
             WHERE o.id IS NULL OR o.order_number <> l.order_number
             ORDER BY l.id",
        )?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;
        Ok(ids)
    }

    /// Trả lỗi nếu có line không đồng bộ order_number
    pub fn verify_order_numbers(conn: &Connection) -> PersistenceResult<()> {
        let ids = Self::inconsistent_ids(conn)?;
        if ids.is_empty() {
            Ok(())
        } else {
            Err(PersistenceError::InconsistentOrderLines(ids))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::schema;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn seeded() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        schema::enable_foreign_keys(&conn).unwrap();
        schema::create_tables(&conn).unwrap();
        schema::seed_demo_data(&conn, NaiveDate::from_ymd_opt(2026, 1, 25).unwrap()).unwrap();
        conn
    }

    #[test]
    fn test_item_crud() {
        let conn = seeded();
        let id = ItemRepo::insert(&conn, &Item::new("IT004", "Monitor", 7, dec!(199.99))).unwrap();

        let item = ItemRepo::get_by_id(&conn, id).unwrap();
        assert_eq!(item.code, "IT004");
        assert_eq!(item.price, dec!(199.99));

        let mut changed = item.clone();
        changed.quantity = 8;
        ItemRepo::update(&conn, &changed).unwrap();
        assert_eq!(ItemRepo::get_by_id(&conn, id).unwrap().quantity, 8);

        ItemRepo::delete(&conn, id).unwrap();
        assert!(ItemRepo::get_by_id(&conn, id).unwrap_err().is_not_found());
        assert!(ItemRepo::delete(&conn, id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_item_code_unique() {
        let conn = seeded();
        let result = ItemRepo::insert(&conn, &Item::new("IT001", "Duplicate", 1, dec!(1)));
        assert!(result.unwrap_err().is_database_error());
    }

    #[test]
    fn test_item_referenced_by_lines() {
        let conn = seeded();
        let laptop = ItemRepo::get_by_code(&conn, "IT001").unwrap().unwrap();
        assert_eq!(OrderLineRepo::count_by_item(&conn, laptop.id.unwrap()).unwrap(), 1);

        // Foreign key chặn xóa ở tầng store
        assert!(ItemRepo::delete(&conn, laptop.id.unwrap()).is_err());
    }

    #[test]
    fn test_user_queries() {
        let conn = seeded();
        assert_eq!(UserRepo::count(&conn).unwrap(), 2);
        assert_eq!(UserRepo::min_id(&conn).unwrap(), Some(1));

        let admin = UserRepo::get_by_login(&conn, "admin").unwrap().unwrap();
        assert!(admin.verify("admin123"));
        assert!(UserRepo::get_by_login(&conn, "ghost").unwrap().is_none());
    }

    #[test]
    fn test_order_line_copies_order_number() {
        let conn = seeded();
        let order = OrderRepo::get_by_number(&conn, "ORD002").unwrap().unwrap();

        // order_number truyền vào sai, store vẫn copy từ orders
        let line = OrderLine::new(order.id.unwrap(), "WRONG", 1, 4);
        let id = OrderLineRepo::insert(&conn, &line).unwrap();
        assert_eq!(OrderLineRepo::get_by_id(&conn, id).unwrap().order_number, "ORD002");

        assert!(OrderLineRepo::insert(&conn, &OrderLine::new(99, "ORD099", 1, 1))
            .unwrap_err()
            .is_not_found());
        OrderLineRepo::verify_order_numbers(&conn).unwrap();
    }

    #[test]
    fn test_order_rename_syncs_lines() {
        let conn = seeded();
        let mut order = OrderRepo::get_by_number(&conn, "ORD001").unwrap().unwrap();
        order.order_number = "ORD001-A".to_string();
        OrderRepo::update(&conn, &order).unwrap();

        let lines = OrderLineRepo::get_by_order(&conn, order.id.unwrap()).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.order_number == "ORD001-A"));
        assert!(OrderLineRepo::inconsistent_ids(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_inconsistent_lines_detected() {
        let conn = seeded();
        conn.execute("UPDATE order_lines SET order_number = 'X' WHERE id = 3", [])
            .unwrap();
        assert_eq!(OrderLineRepo::inconsistent_ids(&conn).unwrap(), vec![3]);
        assert!(matches!(
            OrderLineRepo::verify_order_numbers(&conn),
            Err(PersistenceError::InconsistentOrderLines(_))
        ));
    }
}
