use std::io::Write;

use owo_colors::OwoColorize;
use prodchart_core::{PageLayout, ProductionData, Report, Table};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

fn heading(w: &mut dyn Write, title: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", title.bold().cyan())
    } else {
        writeln!(w, "{}", title)
    }
}

/// One-line summary: file, page size in points and table count.
pub fn print_header(
    w: &mut dyn Write,
    file_name: &str,
    layout: &PageLayout,
    report: &Report,
    color: ColorMode,
) -> std::io::Result<()> {
    let summary = format!(
        "({:.0} x {:.0} pt, {} tables on first page)",
        layout.width,
        layout.height,
        report.tables.len()
    );
    if color.enabled() {
        writeln!(
            w,
            "{} {} {}\n",
            "INSPECT:".bold().cyan(),
            file_name.bold(),
            summary
        )
    } else {
        writeln!(w, "INSPECT: {} {}\n", file_name, summary)
    }
}

pub fn print_page_text(w: &mut dyn Write, text: &str, color: ColorMode) -> std::io::Result<()> {
    heading(w, "Page text", color)?;
    for line in text.lines() {
        writeln!(w, "  {}", line)?;
    }
    writeln!(w)
}

/// Print every table as aligned columns; empty cells show as `-`.
pub fn print_tables(w: &mut dyn Write, tables: &[Table], color: ColorMode) -> std::io::Result<()> {
    for (i, table) in tables.iter().enumerate() {
        heading(w, &format!("Table {}", i + 1), color)?;
        let widths = column_widths(table);
        for row in &table.rows {
            let cells: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(c, width)| {
                    let cell = row.get(c).and_then(|v| v.as_deref()).unwrap_or("-");
                    format!("{:<width$}", cell, width = *width)
                })
                .collect();
            writeln!(w, "  {}", cells.join(" | ").trim_end())?;
        }
        writeln!(w)?;
    }
    Ok(())
}

fn column_widths(table: &Table) -> Vec<usize> {
    let mut widths = vec![1; table.column_count()];
    for row in &table.rows {
        for (c, cell) in row.iter().enumerate() {
            if let Some(text) = cell
                && let Some(width) = widths.get_mut(c)
            {
                *width = (*width).max(text.chars().count());
            }
        }
    }
    widths
}

/// Print each entity's total and its category breakdown.
pub fn print_breakdown(
    w: &mut dyn Write,
    data: &ProductionData,
    color: ColorMode,
) -> std::io::Result<()> {
    for entity in &data.entities {
        if color.enabled() {
            writeln!(
                w,
                "{} total {}",
                entity.name.bold().green(),
                entity.total
            )?;
        } else {
            writeln!(w, "{} total {}", entity.name, entity.total)?;
        }
        if entity.items.is_empty() {
            if color.enabled() {
                writeln!(w, "  {}", "(no items)".dimmed())?;
            } else {
                writeln!(w, "  (no items)")?;
            }
        }
        for item in &entity.items {
            writeln!(
                w,
                "  {:<24} {:>12} {:>7.2}%",
                item.category, item.quantity, item.percentage
            )?;
        }
        writeln!(w)?;
    }
    Ok(())
}

pub fn print_failure(w: &mut dyn Write, message: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "FAILED:".bold().red(), message)
    } else {
        writeln!(w, "FAILED: {}", message)
    }
}
