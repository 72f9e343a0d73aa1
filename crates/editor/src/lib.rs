//! # WMS Editor
//!
//! Editor layer cho WMS: record model với pending overlay, form binding,
//! một state machine editor dùng chung cho items / orders / users /
//! order lines, cùng login form, SQL console và session.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wms_editor::{AutoConfirm, ItemSchema, ItemsEditor};
//! use wms_core::ItemField;
//!
//! let mut editor = ItemsEditor::new(ItemSchema, &db)?;
//! editor.add()?;
//! editor.set_field(ItemField::Code, "IT004")?;
//! editor.set_field(ItemField::Quantity, 7)?;
//! let id = editor.save(&mut db)?;
//! ```

pub mod auth;
pub mod binding;
pub mod catalog;
pub mod console;
pub mod controller;
pub mod entities;
pub mod error;
pub mod model;
pub mod schema;
pub mod session;

pub use auth::LoginForm;
pub use binding::{FormBinding, Relation, RelationEntry};
pub use catalog::ItemCatalog;
pub use console::SqlConsole;
pub use controller::{Actions, RecordEditor};
pub use entities::{
    ItemSchema, ItemsEditor, OrderLineSchema, OrderLinesEditor, OrderSchema, OrdersEditor,
    UserSchema, UsersEditor,
};
pub use error::{EditorError, EditorResult, GuardError, ValidationError};
pub use model::{RecordModel, RowStatus};
pub use schema::{AutoConfirm, Confirm, Deletion, EditMode, EditorSchema};
pub use session::Session;
