//! User account commands

use anyhow::{anyhow, Result};
use wms_core::UserField;
use wms_editor::{Session, UsersEditor};

use super::{report_deletion, CliConfirm};
use crate::UserAction;

/// Handle users subcommands
pub fn handle(session: &mut Session, action: UserAction) -> Result<()> {
    let mut editor = session.users()?;

    match action {
        UserAction::List => {
            println!("👤 Users ({})", editor.model().row_count());
            for user in editor.model().rows() {
                println!("   {:<4} {}", user.id.unwrap_or_default(), user.login);
            }
        }
        UserAction::Add {
            login,
            new_password,
            confirm,
        } => {
            editor.add()?;
            editor.set_field(UserField::Login, login.as_str())?;
            editor.set_password(&new_password, &confirm)?;
            editor.save(session.db_mut())?;
            println!("✅ Added user {}", login.trim());
        }
        UserAction::Update {
            login,
            new_login,
            new_password,
            confirm,
        } => {
            select_user(&mut editor, &login)?;
            editor.edit_user(new_password.is_some())?;
            if let Some(new_login) = &new_login {
                editor.set_field(UserField::Login, new_login.as_str())?;
            }
            if let Some(password) = &new_password {
                editor.set_password(password, confirm.as_deref().unwrap_or_default())?;
            }
            editor.save(session.db_mut())?;
            println!("✅ Updated user {}", new_login.as_deref().unwrap_or(&login).trim());
        }
        UserAction::Delete { login, yes } => {
            select_user(&mut editor, &login)?;
            let deletion = editor.delete(session.db_mut(), &mut CliConfirm::new(yes))?;
            report_deletion("user", &login, deletion);
        }
    }
    Ok(())
}

fn select_user(editor: &mut UsersEditor, login: &str) -> Result<()> {
    let login = login.trim();
    let index = editor
        .model()
        .position(|user| user.login == login)
        .ok_or_else(|| anyhow!("User not found: {}", login))?;
    editor.select_row(index)?;
    Ok(())
}
