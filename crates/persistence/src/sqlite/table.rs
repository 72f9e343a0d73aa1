//! Generic table access
//!
//! `Table` nối một `Record` type với repository của nó, để record model
//! load và submit mà không biết bảng cụ thể.

use crate::error::PersistenceResult;
use crate::sqlite::repos::{ItemRepo, OrderLineRepo, OrderRepo, UserRepo};
use rusqlite::Connection;
use std::fmt::Debug;
use wms_core::{Item, Order, OrderLine, Record, User};

/// Record type có bảng tương ứng trong store.
pub trait Table: Record {
    /// Bộ lọc khi load (order id cho order lines, `()` cho các bảng khác)
    type Scope: Clone + Default + Debug;

    /// Tên bảng
    const TABLE: &'static str;

    fn select(conn: &Connection, scope: &Self::Scope) -> PersistenceResult<Vec<Self>>;

    fn insert(conn: &Connection, record: &Self) -> PersistenceResult<i64>;

    fn update(conn: &Connection, record: &Self) -> PersistenceResult<()>;

    fn delete(conn: &Connection, id: i64) -> PersistenceResult<()>;

    /// Kiểm tra invariant trước khi commit batch
    fn verify(_conn: &Connection) -> PersistenceResult<()> {
        Ok(())
    }
}

impl Table for User {
    type Scope = ();
    const TABLE: &'static str = "users";

    fn select(conn: &Connection, _scope: &()) -> PersistenceResult<Vec<Self>> {
        UserRepo::get_all(conn)
    }

    fn insert(conn: &Connection, record: &Self) -> PersistenceResult<i64> {
        UserRepo::insert(conn, record)
    }

    fn update(conn: &Connection, record: &Self) -> PersistenceResult<()> {
        UserRepo::update(conn, record)
    }

    fn delete(conn: &Connection, id: i64) -> PersistenceResult<()> {
        UserRepo::delete(conn, id)
    }
}

impl Table for Item {
    type Scope = ();
    const TABLE: &'static str = "items";

    fn select(conn: &Connection, _scope: &()) -> PersistenceResult<Vec<Self>> {
        ItemRepo::get_all(conn)
    }

    fn insert(conn: &Connection, record: &Self) -> PersistenceResult<i64> {
        ItemRepo::insert(conn, record)
    }

    fn update(conn: &Connection, record: &Self) -> PersistenceResult<()> {
        ItemRepo::update(conn, record)
    }

    fn delete(conn: &Connection, id: i64) -> PersistenceResult<()> {
        ItemRepo::delete(conn, id)
    }
}

impl Table for Order {
    type Scope = ();
    const TABLE: &'static str = "orders";

    fn select(conn: &Connection, _scope: &()) -> PersistenceResult<Vec<Self>> {
        OrderRepo::get_all(conn)
    }

    fn insert(conn: &Connection, record: &Self) -> PersistenceResult<i64> {
        OrderRepo::insert(conn, record)
    }

    fn update(conn: &Connection, record: &Self) -> PersistenceResult<()> {
        OrderRepo::update(conn, record)
    }

    fn delete(conn: &Connection, id: i64) -> PersistenceResult<()> {
        OrderRepo::delete(conn, id)
    }

    fn verify(conn: &Connection) -> PersistenceResult<()> {
        OrderLineRepo::verify_order_numbers(conn)
    }
}

impl Table for OrderLine {
    /// None = tất cả lines
    type Scope = Option<i64>;
    const TABLE: &'static str = "order_lines";

    fn select(conn: &Connection, scope: &Option<i64>) -> PersistenceResult<Vec<Self>> {
        match scope {
            Some(order_id) => OrderLineRepo::get_by_order(conn, *order_id),
            None => OrderLineRepo::get_all(conn),
        }
    }

    fn insert(conn: &Connection, record: &Self) -> PersistenceResult<i64> {
        OrderLineRepo::insert(conn, record)
    }

    fn update(conn: &Connection, record: &Self) -> PersistenceResult<()> {
        OrderLineRepo::update(conn, record)
    }

    fn delete(conn: &Connection, id: i64) -> PersistenceResult<()> {
        OrderLineRepo::delete(conn, id)
    }

    fn verify(conn: &Connection) -> PersistenceResult<()> {
        OrderLineRepo::verify_order_numbers(conn)
    }
}
