//! Entity schemas cho `RecordEditor`

pub mod items;
pub mod order_lines;
pub mod orders;
pub mod users;

pub use items::{ItemSchema, ItemsEditor};
pub use order_lines::{OrderLineSchema, OrderLinesEditor};
pub use orders::{OrderSchema, OrdersEditor};
pub use users::{UserSchema, UsersEditor};
