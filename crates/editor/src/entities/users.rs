//! Users editor
//!
//! Password không bao giờ hiển thị trên form; actor nhập password và
//! confirmation riêng, schema hash trước khi ghi.

use crate::controller::RecordEditor;
use crate::error::{EditorError, EditorResult, GuardError, ValidationError};
use crate::schema::{EditMode, EditorSchema};
use tracing::warn;
use wms_core::{hash_password, User, UserField};
use wms_persistence::{Database, UserRepo};

/// Editor cho bảng users
pub type UsersEditor = RecordEditor<UserSchema>;

/// Rules của users + password inputs đang nhập
#[derive(Debug, Clone, Default)]
pub struct UserSchema {
    password: String,
    confirm: String,
    change_password: bool,
}

impl UserSchema {
    /// Password sẽ được ghi khi save
    pub fn changes_password(&self) -> bool {
        self.change_password
    }

    /// (password, confirmation) đang nhập
    pub fn password_inputs(&self) -> (&str, &str) {
        (&self.password, &self.confirm)
    }

    fn clear_passwords(&mut self) {
        self.password.clear();
        self.confirm.clear();
    }
}

impl EditorSchema for UserSchema {
    type Record = User;

    fn form_fields(&self) -> &'static [UserField] {
        &[UserField::Login]
    }

    fn prepare(&mut self, _mode: EditMode, candidate: &mut User) -> EditorResult<()> {
        candidate.login = candidate.login.trim().to_string();
        if !self.change_password {
            // Giữ hash cũ
            return Ok(());
        }

        if self.password.is_empty() {
            return Err(ValidationError::Required { field: "Password" }.into());
        }
        if self.password != self.confirm {
            self.clear_passwords();
            return Err(ValidationError::PasswordMismatch.into());
        }

        candidate.password_hash = hash_password(&self.password);
        Ok(())
    }

    fn validate(&self, db: &Database, _mode: EditMode, candidate: &User) -> EditorResult<()> {
        if candidate.login.is_empty() {
            return Err(ValidationError::Required { field: "Login" }.into());
        }

        if let Some(existing) = UserRepo::get_by_login(db.conn(), &candidate.login)? {
            if existing.id != candidate.id {
                return Err(ValidationError::Duplicate {
                    field: "Login",
                    value: candidate.login.clone(),
                }
                .into());
            }
        }
        Ok(())
    }

    fn check_delete(&self, db: &Database, row: &User) -> EditorResult<()> {
        if UserRepo::count(db.conn())? <= 1 {
            warn!(login = %row.login, "Refusing to delete the last user");
            return Err(GuardError::LastUser.into());
        }
        if row.id.is_some() && row.id == UserRepo::min_id(db.conn())? {
            warn!(login = %row.login, "Refusing to delete the admin user");
            return Err(GuardError::ProtectedAdmin.into());
        }
        Ok(())
    }

    fn on_begin(&mut self, mode: EditMode) {
        self.clear_passwords();
        // Add luôn cần password; Edit chỉ khi actor yêu cầu
        self.change_password = mode == EditMode::Adding;
    }

    fn on_cancel(&mut self) {
        self.clear_passwords();
        self.change_password = false;
    }

    fn on_saved(&mut self) {
        self.on_cancel();
    }
}

impl RecordEditor<UserSchema> {
    /// Bắt đầu edit user đang chọn; `change_password` là câu trả lời cho
    /// "Do you want to change the password?"
    pub fn edit_user(&mut self, change_password: bool) -> EditorResult<()> {
        self.edit()?;
        self.schema_mut().change_password = change_password;
        Ok(())
    }

    /// Nhập password + confirmation
    pub fn set_password(&mut self, password: &str, confirm: &str) -> EditorResult<()> {
        if !self.mode().is_editing() || !self.schema().change_password {
            return Err(EditorError::InvalidState {
                action: "set a password",
                state: self.mode(),
            });
        }

        let schema = self.schema_mut();
        schema.password = password.to_string();
        schema.confirm = confirm.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AutoConfirm, Deletion};

    fn editor() -> (Database, UsersEditor) {
        let db = Database::open_in_memory().unwrap();
        let editor = UsersEditor::new(UserSchema::default(), &db).unwrap();
        (db, editor)
    }

    #[test]
    fn test_add_user_hashes_password() {
        let (mut db, mut editor) = editor();
        editor.add().unwrap();
        editor.set_field(UserField::Login, "user2").unwrap();
        editor.set_password("secret", "secret").unwrap();
        editor.save(&mut db).unwrap();

        assert!(db.validate_user("user2", "secret").unwrap());
        let user = UserRepo::get_by_login(db.conn(), "user2").unwrap().unwrap();
        assert_ne!(user.password_hash, "secret");
        assert_eq!(editor.schema().password_inputs(), ("", ""));
    }

    #[test]
    fn test_add_requires_password() {
        let (mut db, mut editor) = editor();
        editor.add().unwrap();
        editor.set_field(UserField::Login, "user2").unwrap();
        let err = editor.save(&mut db).unwrap_err();
        assert_eq!(err.to_string(), "Password is required.");
    }

    #[test]
    fn test_password_mismatch_clears_inputs() {
        let (mut db, mut editor) = editor();
        editor.add().unwrap();
        editor.set_field(UserField::Login, "user2").unwrap();
        editor.set_password("secret", "secrte").unwrap();

        let err = editor.save(&mut db).unwrap_err();
        assert_eq!(err.validation(), Some(&ValidationError::PasswordMismatch));
        assert_eq!(editor.schema().password_inputs(), ("", ""));
        assert_eq!(editor.mode(), EditMode::Adding);
        assert_eq!(db.counts().unwrap().users, 2);
    }

    #[test]
    fn test_edit_login_keeps_password() {
        let (mut db, mut editor) = editor();
        editor.select_row(1).unwrap();
        editor.edit_user(false).unwrap();
        assert!(editor.set_password("x", "x").is_err());

        editor.set_field(UserField::Login, "operator").unwrap();
        editor.save(&mut db).unwrap();
        assert!(db.validate_user("operator", "password1").unwrap());
    }

    #[test]
    fn test_edit_changes_password() {
        let (mut db, mut editor) = editor();
        editor.select_row(1).unwrap();
        editor.edit_user(true).unwrap();
        editor.set_password("newpass", "newpass").unwrap();
        editor.save(&mut db).unwrap();

        assert!(db.validate_user("user1", "newpass").unwrap());
        assert!(!db.validate_user("user1", "password1").unwrap());
    }

    #[test]
    fn test_duplicate_login() {
        let (mut db, mut editor) = editor();
        editor.add().unwrap();
        editor.set_field(UserField::Login, "admin").unwrap();
        editor.set_password("x", "x").unwrap();
        let err = editor.save(&mut db).unwrap_err();
        assert!(matches!(
            err.validation(),
            Some(ValidationError::Duplicate { field: "Login", .. })
        ));
    }

    #[test]
    fn test_delete_guards() {
        let (mut db, mut editor) = editor();

        // Admin (id nhỏ nhất) không bao giờ bị xóa
        editor.select_row(0).unwrap();
        let err = editor.delete(&mut db, &mut AutoConfirm(true)).unwrap_err();
        assert_eq!(err.guard(), Some(&GuardError::ProtectedAdmin));

        // user1 xóa được khi còn >= 2 users
        editor.select_row(1).unwrap();
        let result = editor.delete(&mut db, &mut AutoConfirm(true)).unwrap();
        assert_eq!(result, Deletion::Deleted);

        // Chỉ còn một user
        editor.select_row(0).unwrap();
        let err = editor.delete(&mut db, &mut AutoConfirm(true)).unwrap_err();
        assert_eq!(err.guard(), Some(&GuardError::LastUser));
        assert_eq!(db.counts().unwrap().users, 1);
    }
}
