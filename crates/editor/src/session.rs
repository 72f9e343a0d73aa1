//! Application session
//!
//! Sở hữu `Database` trong suốt vòng đời ứng dụng. Các editor chỉ được
//! mở sau khi đăng nhập thành công.

use crate::auth::LoginForm;
use crate::console::SqlConsole;
use crate::entities::{
    ItemSchema, ItemsEditor, OrderLinesEditor, OrderSchema, OrdersEditor, UserSchema, UsersEditor,
};
use crate::error::{EditorError, EditorResult};
use std::path::Path;
use tracing::info;
use wms_core::User;
use wms_persistence::Database;

/// Store + user đang đăng nhập
pub struct Session {
    db: Database,
    user: Option<User>,
}

impl Session {
    pub fn new(db: Database) -> Self {
        Self { db, user: None }
    }

    /// Mở store tại `path` (tạo + seed nếu mới)
    pub fn open<P: AsRef<Path>>(path: P) -> EditorResult<Self> {
        Ok(Self::new(Database::open(path)?))
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut Database {
        &mut self.db
    }

    /// Đăng nhập qua login form
    pub fn login(&mut self, form: &mut LoginForm) -> EditorResult<&User> {
        let user = form.attempt_login(&self.db)?;
        Ok(self.user.insert(user))
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!(login = %user.login, "User logged out");
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    fn require_login(&self) -> EditorResult<()> {
        if self.is_logged_in() {
            Ok(())
        } else {
            Err(EditorError::NotLoggedIn)
        }
    }

    // === Editors ===

    pub fn items(&self) -> EditorResult<ItemsEditor> {
        self.require_login()?;
        ItemsEditor::new(ItemSchema, &self.db)
    }

    pub fn orders(&self) -> EditorResult<OrdersEditor> {
        self.require_login()?;
        OrdersEditor::new(OrderSchema, &self.db)
    }

    pub fn users(&self) -> EditorResult<UsersEditor> {
        self.require_login()?;
        UsersEditor::new(UserSchema::default(), &self.db)
    }

    /// Order lines, mở tại `order_id` hoặc order đầu tiên
    pub fn order_lines(&self, order_id: Option<i64>) -> EditorResult<OrderLinesEditor> {
        self.require_login()?;
        match order_id {
            Some(id) => OrderLinesEditor::open(&self.db, id),
            None => OrderLinesEditor::new(&self.db),
        }
    }

    pub fn console(&self) -> EditorResult<SqlConsole> {
        self.require_login()?;
        Ok(SqlConsole::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editors_require_login() {
        let mut session = Session::new(Database::open_in_memory().unwrap());
        assert!(matches!(session.items(), Err(EditorError::NotLoggedIn)));
        assert!(session.console().is_err());

        let mut form = LoginForm::new("user1", "password1");
        let user = session.login(&mut form).unwrap();
        assert_eq!(user.login, "user1");

        assert_eq!(session.items().unwrap().model().row_count(), 3);
        assert_eq!(
            session.order_lines(Some(2)).unwrap().title(),
            "Order Lines - Order #ORD002"
        );

        session.logout();
        assert!(session.current_user().is_none());
        assert!(session.users().is_err());
    }

    #[test]
    fn test_failed_login_keeps_session_closed() {
        let mut session = Session::new(Database::open_in_memory().unwrap());
        let mut form = LoginForm::new("admin", "nope");
        assert!(session.login(&mut form).is_err());
        assert!(!session.is_logged_in());
    }
}
