//! Read-only SQL console

use anyhow::{bail, Context, Result};
use wms_editor::Session;
use wms_persistence::QueryResult;

/// Chạy query qua SQL console rồi in bảng (hoặc JSON) kết quả
pub fn run(session: &Session, sql: &str, json: bool) -> Result<()> {
    let mut console = session.console()?;
    console.set_text(sql);

    if console.execute(session.db()).is_err() {
        bail!("{}", console.status());
    }
    if let Some(result) = console.result() {
        if json {
            let text =
                serde_json::to_string_pretty(result).context("Failed to serialize result")?;
            println!("{}", text);
            return Ok(());
        }
        print_table(result);
    }
    println!("✅ {}", console.status());
    Ok(())
}

fn print_table(result: &QueryResult) {
    let widths: Vec<usize> = result
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            result
                .rows
                .iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.to_string().chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let line = |cells: Vec<String>| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        println!("   {}", padded.join(" | "));
    };

    line(result.columns.clone());
    println!(
        "   {}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-")
    );
    for row in &result.rows {
        line(row.iter().map(|cell| cell.to_string()).collect());
    }
}
