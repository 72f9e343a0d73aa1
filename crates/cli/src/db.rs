//! Store initialization and status

use anyhow::{Context, Result};
use std::path::Path;
use wms_persistence::Database;

/// Tạo store (schema + demo data); `force` xóa file cũ trước
pub fn init_database(db_path: &Path, force: bool) -> Result<()> {
    if force && db_path.exists() {
        std::fs::remove_file(db_path).context("Failed to remove existing database")?;
        println!("🗑️  Removed existing database");
    }

    let existed = db_path.exists();
    open(db_path)?;
    if existed {
        println!("ℹ️  Existing database kept, seed skipped");
    }
    Ok(())
}

/// In số records mỗi bảng
pub fn show_status(db_path: &Path) -> Result<()> {
    if !db_path.exists() {
        println!("❌ Database not found at {:?}", db_path);
        println!("   Run 'wms init' to create the database");
        return Ok(());
    }

    let db = open(db_path)?;
    let counts = db.counts().context("Failed to count records")?;

    println!("📊 Database Status");
    println!("   Path: {:?}", db_path);
    println!();
    println!("   Users:       {}", counts.users);
    println!("   Items:       {}", counts.items);
    println!("   Orders:      {}", counts.orders);
    println!("   Order lines: {}", counts.order_lines);

    match db.verify_order_lines() {
        Ok(()) => println!("   Order numbers: ✅ consistent"),
        Err(e) => println!("   Order numbers: ⚠️  {}", e),
    }
    Ok(())
}

/// Mở store; lỗi khởi tạo được báo kèm đường dẫn
pub fn open(db_path: &Path) -> Result<Database> {
    Database::open(db_path)
        .with_context(|| format!("Failed to open database at {:?}", db_path))
}
