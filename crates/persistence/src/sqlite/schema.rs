//! Database schema và seed data
//!
//! Bốn bảng: users, items, orders, order_lines. Seed data chỉ được ghi
//! một lần khi store mới được tạo.

use crate::error::PersistenceResult;
use crate::sqlite::repos::{ItemRepo, OrderLineRepo, OrderRepo, UserRepo};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::{debug, info};
use wms_core::{Item, Order, OrderLine, OrderType, User};

/// Tên các bảng, theo thứ tự tạo
pub const TABLES: [&str; 4] = ["users", "items", "orders", "order_lines"];

const SCHEMA: &str = r#"
    -- Users (password = SHA-256 hex digest)
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        login TEXT UNIQUE NOT NULL,
        password TEXT NOT NULL
    );

    -- Items (price stored as decimal TEXT)
    CREATE TABLE IF NOT EXISTS items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        item_code TEXT UNIQUE NOT NULL,
        item_description TEXT NOT NULL DEFAULT '',
        quantity INTEGER NOT NULL DEFAULT 0,
        price TEXT NOT NULL DEFAULT '0'
    );

    -- Orders
    CREATE TABLE IF NOT EXISTS orders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        order_number TEXT UNIQUE NOT NULL,
        date TEXT NOT NULL,
        type TEXT NOT NULL CHECK (type IN ('to', 'from'))
    );

    -- Order lines (order_number is a copy of orders.order_number)
    CREATE TABLE IF NOT EXISTS order_lines (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        order_id INTEGER NOT NULL,
        order_number TEXT NOT NULL,
        item_id INTEGER NOT NULL,
        quantity INTEGER NOT NULL CHECK (quantity > 0),
        FOREIGN KEY (order_id) REFERENCES orders(id),
        FOREIGN KEY (item_id) REFERENCES items(id)
    );

    CREATE INDEX IF NOT EXISTS idx_order_lines_order ON order_lines(order_id);
    CREATE INDEX IF NOT EXISTS idx_order_lines_item ON order_lines(item_id);

    -- Renaming an order rewrites the copy on its lines
    CREATE TRIGGER IF NOT EXISTS trg_orders_number_sync
    AFTER UPDATE OF order_number ON orders
    BEGIN
        UPDATE order_lines SET order_number = NEW.order_number WHERE order_id = NEW.id;
    END;
"#;

/// Bật foreign key enforcement (phải chạy trên mỗi connection)
pub fn enable_foreign_keys(conn: &Connection) -> PersistenceResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(())
}

/// Store chưa có bảng nào (mới tạo hoặc rỗng)
pub fn is_empty(conn: &Connection) -> PersistenceResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count == 0)
}

/// Tạo bốn bảng và indexes
pub fn create_tables(conn: &Connection) -> PersistenceResult<()> {
    info!("Creating schema...");
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Ghi demo dataset: 2 users, 3 items, 2 orders, 3 order lines
pub fn seed_demo_data(conn: &Connection, today: NaiveDate) -> PersistenceResult<()> {
    info!("Seeding demo data...");

    // Users
    let admin_id = UserRepo::insert(conn, &User::new("admin", "admin123"))?;
    UserRepo::insert(conn, &User::new("user1", "password1"))?;
    debug!(admin_id, "seeded users");

    // Items
    let laptop = ItemRepo::insert(conn, &Item::new("IT001", "Laptop", 10, Decimal::new(120000, 2)))?;
    let mouse = ItemRepo::insert(conn, &Item::new("IT002", "Mouse", 50, Decimal::new(2500, 2)))?;
    let keyboard =
        ItemRepo::insert(conn, &Item::new("IT003", "Keyboard", 30, Decimal::new(4500, 2)))?;

    // Orders: hôm nay (to) và hôm qua (from)
    let yesterday = today.pred_opt().unwrap_or(today);
    let ord1 = OrderRepo::insert(conn, &Order::new("ORD001", today, OrderType::To))?;
    let ord2 = OrderRepo::insert(conn, &Order::new("ORD002", yesterday, OrderType::From))?;

    // Order lines
    OrderLineRepo::insert(conn, &OrderLine::new(ord1, "ORD001", laptop, 2))?; // 2 laptops
    OrderLineRepo::insert(conn, &OrderLine::new(ord1, "ORD001", mouse, 5))?; // 5 mice
    OrderLineRepo::insert(conn, &OrderLine::new(ord2, "ORD002", keyboard, 3))?; // 3 keyboards

    Ok(())
}
