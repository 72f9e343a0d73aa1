//! Order line commands (master/detail)

use anyhow::Result;
use wms_core::OrderLineField;
use wms_editor::{OrderLinesEditor, Session};

use super::{report_deletion, CliConfirm};
use crate::LineAction;

/// Handle lines subcommands
pub fn handle(session: &mut Session, action: LineAction) -> Result<()> {
    let mut editor = session.order_lines(None)?;

    match action {
        LineAction::List { order } => {
            if let Some(order) = order {
                editor.load_order_by_number(session.db(), &order)?;
            }
        }
        LineAction::Add {
            order,
            item,
            quantity,
        } => {
            editor.load_order_by_number(session.db(), &order)?;
            editor.add()?;
            editor.select_item(item)?;
            editor.set_field(OrderLineField::Quantity, quantity)?;
            let id = editor.save(session.db_mut())?;
            println!("✅ Added line {} to order {}", id.unwrap_or_default(), order.trim());
        }
        LineAction::Update {
            order,
            line_id,
            item,
            quantity,
        } => {
            editor.load_order_by_number(session.db(), &order)?;
            editor.select_id(line_id)?;
            editor.edit()?;
            if let Some(item) = item {
                editor.select_item(item)?;
            }
            if let Some(quantity) = quantity {
                editor.set_field(OrderLineField::Quantity, quantity)?;
            }
            editor.save(session.db_mut())?;
            println!("✅ Updated line {}", line_id);
        }
        LineAction::Delete {
            order,
            line_id,
            yes,
        } => {
            editor.load_order_by_number(session.db(), &order)?;
            editor.select_id(line_id)?;
            let deletion = editor.delete(session.db_mut(), &mut CliConfirm::new(yes))?;
            report_deletion("order line", &line_id.to_string(), deletion);
        }
        LineAction::Next { order } => {
            editor.load_order_by_number(session.db(), &order)?;
            if !editor.navigate_next(session.db())? {
                println!("ℹ️  Already at the last order");
            }
        }
        LineAction::Prev { order } => {
            editor.load_order_by_number(session.db(), &order)?;
            if !editor.navigate_prev(session.db())? {
                println!("ℹ️  Already at the first order");
            }
        }
    }

    print_lines(&editor);
    Ok(())
}

fn print_lines(editor: &OrderLinesEditor) {
    println!("📄 {}", editor.title());
    let Some(order) = editor.current_order() else {
        println!("   No orders");
        return;
    };
    println!("   Date: {}  Type: {}", order.date, order.order_type);
    println!("   {:<4} {:<28} {:>8}", "ID", "ITEM", "QTY");

    let catalog = editor.schema().catalog();
    for line in editor.model().rows() {
        let label = catalog
            .get(line.item_id)
            .map(|item| item.label())
            .unwrap_or_else(|| line.item_id.to_string());
        println!(
            "   {:<4} {:<28} {:>8}",
            line.id.unwrap_or_default(),
            label,
            line.quantity
        );
    }
}
