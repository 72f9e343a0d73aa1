//! Item catalog commands

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use wms_core::ItemField;
use wms_editor::{ItemsEditor, Session};

use super::{report_deletion, CliConfirm};
use crate::ItemAction;

/// Handle items subcommands
pub fn handle(session: &mut Session, action: ItemAction) -> Result<()> {
    let mut editor = session.items()?;

    match action {
        ItemAction::List => list_items(&editor),
        ItemAction::Add {
            code,
            description,
            quantity,
            price,
        } => {
            editor.add()?;
            editor.set_field(ItemField::Code, code.as_str())?;
            apply_fields(&mut editor, description, quantity, price)?;
            editor.save(session.db_mut())?;
            println!("✅ Added item {}", code.trim());
            Ok(())
        }
        ItemAction::Update {
            code,
            new_code,
            description,
            quantity,
            price,
        } => {
            select_item(&mut editor, &code)?;
            editor.edit()?;
            if let Some(new_code) = &new_code {
                editor.set_field(ItemField::Code, new_code.as_str())?;
            }
            apply_fields(&mut editor, description, quantity, price)?;
            editor.save(session.db_mut())?;
            println!("✅ Updated item {}", new_code.as_deref().unwrap_or(&code).trim());
            Ok(())
        }
        ItemAction::Delete { code, yes } => {
            select_item(&mut editor, &code)?;
            let deletion = editor.delete(session.db_mut(), &mut CliConfirm::new(yes))?;
            report_deletion("item", &code, deletion);
            Ok(())
        }
    }
}

fn apply_fields(
    editor: &mut ItemsEditor,
    description: Option<String>,
    quantity: Option<i64>,
    price: Option<Decimal>,
) -> Result<()> {
    if let Some(description) = description {
        editor.set_field(ItemField::Description, description)?;
    }
    if let Some(quantity) = quantity {
        editor.set_field(ItemField::Quantity, quantity)?;
    }
    if let Some(price) = price {
        editor.set_field(ItemField::Price, price)?;
    }
    Ok(())
}

fn select_item(editor: &mut ItemsEditor, code: &str) -> Result<()> {
    let code = code.trim();
    let index = editor
        .model()
        .position(|item| item.code.eq_ignore_ascii_case(code))
        .ok_or_else(|| anyhow!("Item not found: {}", code))?;
    editor.select_row(index)?;
    Ok(())
}

fn list_items(editor: &ItemsEditor) -> Result<()> {
    println!("📦 Items ({})", editor.model().row_count());
    println!(
        "   {:<4} {:<10} {:<24} {:>8} {:>12}",
        "ID", "CODE", "DESCRIPTION", "QTY", "PRICE"
    );
    for item in editor.model().rows() {
        println!(
            "   {:<4} {:<10} {:<24} {:>8} {:>12}",
            item.id.unwrap_or_default(),
            item.code,
            item.description,
            item.quantity,
            item.price
        );
    }
    Ok(())
}
