//! Command handlers

pub mod items;
pub mod lines;
pub mod orders;
pub mod query;
pub mod users;

use crate::config::AppConfig;
use crate::db;
use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use wms_editor::{Confirm, Deletion, LoginForm, Session};

/// Mở store và đăng nhập bằng credentials từ config
pub fn login(config: &AppConfig) -> Result<Session> {
    let mut session = Session::new(db::open(&config.db_path)?);
    let mut form = LoginForm::new(
        config.user.as_deref().unwrap_or_default(),
        config.password.as_deref().unwrap_or_default(),
    );

    if let Err(e) = session.login(&mut form) {
        println!("❌ {}", form.status().unwrap_or("Login failed"));
        return Err(e).context("Login required (use --user/--password or WMS_USER/WMS_PASSWORD)");
    }
    Ok(session)
}

/// Xác nhận delete: `--yes` đồng ý luôn, không thì hỏi trên stdin
pub struct CliConfirm {
    assume_yes: bool,
}

impl CliConfirm {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirm for CliConfirm {
    fn confirm(&mut self, title: &str, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        print!("⚠️  {}: {} [y/N] ", title, question);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// In kết quả delete
pub fn report_deletion(entity: &str, key: &str, deletion: Deletion) {
    match deletion {
        Deletion::Deleted => println!("✅ Deleted {} {}", entity, key),
        Deletion::Declined => println!("↩️  Kept {} {}", entity, key),
    }
}
