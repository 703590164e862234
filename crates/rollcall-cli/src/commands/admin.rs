//! Bulk upload and promotion commands.

use std::path::Path;

use serde::Serialize;
use tabled::Tabled;

use rollcall_core::error::AppError;

use super::attendance::report;
use crate::console::Console;
use crate::output::{self, OutputFormat};

/// Failed row for table output
#[derive(Debug, Serialize, Tabled)]
struct RowErrorRow {
    /// Spreadsheet row
    row: u64,
    /// Reason
    error: String,
}

/// Upload a student spreadsheet.
pub async fn upload(console: &Console, path: &Path, format: OutputFormat) -> Result<(), AppError> {
    let response = console.uploads.upload_file(path).await?;

    if format == OutputFormat::Json {
        output::print_item(&response, format);
        return Ok(());
    }

    let summary = format!(
        "{} of {} rows imported from {}",
        response.successful_rows,
        response.total_rows,
        path.display()
    );
    if response.success && response.failed_rows == 0 {
        output::print_success(&summary);
    } else {
        output::print_warning(&summary);
    }

    let rows: Vec<RowErrorRow> = response
        .errors
        .iter()
        .map(|e| RowErrorRow {
            row: e.row,
            error: e.error.clone(),
        })
        .collect();
    if !rows.is_empty() {
        output::print_list(&rows, format, "");
    }
    Ok(())
}

/// Undo the last bulk upload.
pub async fn undo_upload(console: &Console) -> Result<(), AppError> {
    let outcome = console.uploads.undo().await?;
    report(outcome, "No bulk upload to undo");
    Ok(())
}

/// Promote every student between two levels.
pub async fn promote(console: &Console, from: &str, to: &str) -> Result<(), AppError> {
    let response = console.promotions.promote(from, to).await?;
    output::print_success(&format!(
        "{} students promoted from {from} to {to}",
        response.promoted_count
    ));
    Ok(())
}

/// Undo the last promotion.
pub async fn undo_promotion(console: &Console) -> Result<(), AppError> {
    let outcome = console.promotions.undo().await?;
    report(outcome, "No promotion to undo");
    Ok(())
}
