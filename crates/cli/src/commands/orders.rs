//! Order header commands

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use wms_core::OrderField;
use wms_editor::{OrdersEditor, Session};

use super::{report_deletion, CliConfirm};
use crate::{OrderAction, OrderTypeArg};

/// Handle orders subcommands
pub fn handle(session: &mut Session, action: OrderAction) -> Result<()> {
    let mut editor = session.orders()?;

    match action {
        OrderAction::List => list_orders(&editor),
        OrderAction::Add {
            number,
            date,
            r#type,
        } => {
            editor.add()?;
            editor.set_field(OrderField::OrderNumber, number.as_str())?;
            apply_fields(&mut editor, date, Some(r#type))?;
            editor.save(session.db_mut())?;
            println!("✅ Added order {}", number.trim());
            Ok(())
        }
        OrderAction::Update {
            number,
            new_number,
            date,
            r#type,
        } => {
            select_order(&mut editor, &number)?;
            editor.edit()?;
            if let Some(new_number) = &new_number {
                editor.set_field(OrderField::OrderNumber, new_number.as_str())?;
            }
            apply_fields(&mut editor, date, r#type)?;
            editor.save(session.db_mut())?;
            println!(
                "✅ Updated order {}",
                new_number.as_deref().unwrap_or(&number).trim()
            );
            Ok(())
        }
        OrderAction::Delete { number, yes } => {
            select_order(&mut editor, &number)?;
            let deletion = editor.delete(session.db_mut(), &mut CliConfirm::new(yes))?;
            report_deletion("order", &number, deletion);
            Ok(())
        }
    }
}

fn apply_fields(
    editor: &mut OrdersEditor,
    date: Option<NaiveDate>,
    order_type: Option<OrderTypeArg>,
) -> Result<()> {
    if let Some(date) = date {
        editor.set_field(OrderField::Date, date)?;
    }
    if let Some(order_type) = order_type {
        editor.set_field(OrderField::Type, order_type.to_core_type().as_str())?;
    }
    Ok(())
}

fn select_order(editor: &mut OrdersEditor, number: &str) -> Result<()> {
    let number = number.trim();
    let index = editor
        .model()
        .position(|order| order.order_number == number)
        .ok_or_else(|| anyhow!("Order number not found: {}", number))?;
    editor.select_row(index)?;
    Ok(())
}

fn list_orders(editor: &OrdersEditor) -> Result<()> {
    println!("📋 Orders ({})", editor.model().row_count());
    println!("   {:<4} {:<12} {:<12} {:<6}", "ID", "NUMBER", "DATE", "TYPE");
    for order in editor.model().rows() {
        println!(
            "   {:<4} {:<12} {:<12} {:<6}",
            order.id.unwrap_or_default(),
            order.order_number,
            order.date,
            order.order_type
        );
    }
    Ok(())
}
