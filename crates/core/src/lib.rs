//! # WMS Core
//!
//! Core domain types cho Warehouse Management System:
//! - `User`: tài khoản đăng nhập (password SHA-256)
//! - `Item`: danh mục hàng hóa
//! - `Order` / `OrderType`: order header
//! - `OrderLine`: dòng chi tiết order
//!
//! Mỗi record type cài đặt `Record` với một enum `Field` riêng, để form
//! binding và record model truy cập field theo tên.

pub mod error;
pub mod item;
pub mod order;
pub mod order_line;
pub mod record;
pub mod user;
pub mod value;

pub use error::{CoreError, CoreResult};
pub use item::{Item, ItemField};
pub use order::{Order, OrderField, OrderType};
pub use order_line::{OrderLine, OrderLineField};
pub use record::{FieldName, Record};
pub use user::{hash_password, verify_password, User, UserField};
pub use value::Value;
