//! SQLite implementation

pub mod batch;
pub mod repos;
pub mod schema;
pub mod table;

pub use batch::{submit, BatchSummary, RowOp};
pub use repos::{ItemRepo, OrderLineRepo, OrderRepo, UserRepo};
pub use table::Table;
