//! Output formatting for CLI

use crate::models::{ErrorItem, FolderAnalysis, ItemInfo};
use crate::services::format::format_size;
use std::io::{self, Write};

const NAME_WIDTH: usize = 48;
const MAX_LISTED_ERRORS: usize = 5;

/// Reset ANSI color
const COLOR_RESET: &str = "\x1b[0m";

/// Get ANSI color code based on percentage
fn color_for_percentage(pct: f64) -> &'static str {
    if pct >= 30.0 {
        "\x1b[31m" // Red for >= 30%
    } else if pct >= 15.0 {
        "\x1b[33m" // Yellow for >= 15%
    } else if pct >= 5.0 {
        "\x1b[36m" // Cyan for >= 5%
    } else {
        "\x1b[90m" // Gray for < 5%
    }
}

/// Share of `total` taken by `size`, in percent
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentage(size: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }

    (size as f64 / total as f64) * 100.0
}

/// Write the analysis as a table: one row per item in `items`
///
/// Percentages are relative to the analysis total, so a `--top` subset
/// still reads against the whole directory.
pub fn write_text<W: Write>(
    out: &mut W,
    analysis: &FolderAnalysis,
    items: &[ItemInfo],
    color: bool,
) -> io::Result<()> {
    writeln!(
        out,
        "{} ({}, {} files, {} folders)",
        analysis.current_path,
        analysis.total_size_human,
        analysis.file_count,
        analysis.folder_count
    )?;
    writeln!(out)?;

    if items.is_empty() {
        writeln!(out, "No entries found.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<width$} {:>6} {:>10} {:>6}  Modified",
        "Name",
        "Type",
        "Size",
        "%",
        width = NAME_WIDTH
    )?;
    writeln!(out, "{}", "─".repeat(NAME_WIDTH + 46))?;

    for item in items {
        let pct = percentage(item.size, analysis.total_size);
        let name = if item.is_folder() {
            format!("{}/", item.name)
        } else {
            item.name.clone()
        };
        let (start, end) = if color {
            (color_for_percentage(pct), COLOR_RESET)
        } else {
            ("", "")
        };

        writeln!(
            out,
            "{start}{name:<width$}{end} {:>6} {:>10} {pct:>5.1}%  {}",
            item.item_type.as_str(),
            format_size(item.size),
            item.last_modified.format("%Y-%m-%d %H:%M"),
            width = NAME_WIDTH
        )?;
    }

    if items.len() < analysis.item_count {
        writeln!(out, "... {} more", analysis.item_count - items.len())?;
    }

    Ok(())
}

/// Write skipped entries, at most a handful of them
pub fn write_skipped<W: Write>(out: &mut W, skipped: &[ErrorItem]) -> io::Result<()> {
    if skipped.is_empty() {
        return Ok(());
    }

    writeln!(out, "Skipped entries: {}", skipped.len())?;
    for error in skipped.iter().take(MAX_LISTED_ERRORS) {
        writeln!(out, "  {} [{}]: {}", error.path, error.code, error.message)?;
    }
    if skipped.len() > MAX_LISTED_ERRORS {
        writeln!(out, "  ... and {} more", skipped.len() - MAX_LISTED_ERRORS)?;
    }

    Ok(())
}

/// Write the analysis as pretty JSON, with `items` in place of the full list
///
/// # Errors
/// Returns an I/O error if serialization or writing fails.
pub fn write_json<W: Write>(
    out: &mut W,
    analysis: &FolderAnalysis,
    items: &[ItemInfo],
) -> crate::Result<()> {
    let view = FolderAnalysis {
        items: items.to_vec(),
        ..analysis.clone()
    };

    serde_json::to_writer_pretty(&mut *out, &view).map_err(io::Error::from)?;
    writeln!(out)?;
    Ok(())
}
