use crate::core::types::{FinancialData, SearchResult};
use crate::normalize::{value_text, FinancialTables, Table};
use anyhow::Result;
use std::path::Path;

pub const EXPORT_FILE_NAME: &str = "financial_data_export.csv";
pub const NOTHING_TO_EXPORT_MESSAGE: &str = "There is no financial data to export.";

/// The financial data of `result`, when it has at least one table row to export.
pub fn exportable(result: &SearchResult) -> Option<&FinancialData> {
    result
        .financial_data
        .as_ref()
        .filter(|data| FinancialTables::new(data).has_data())
}

/// Serializes every non-empty table as a CSV section: title line, header line and data
/// lines, with a blank line between sections. Cells keep their raw values; missing ones
/// are empty.
pub fn to_csv(data: &FinancialData) -> Result<String> {
    let tables = FinancialTables::new(data);
    let mut out: Vec<u8> = Vec::new();

    for table in tables.export_order().into_iter().filter(|t| !t.is_empty()) {
        if !out.is_empty() {
            out.push(b'\n');
        }
        write_section(&mut out, table)?;
    }

    Ok(String::from_utf8(out)?)
}

/// Writes the export to `path`, creating parent directories when needed.
pub fn write_csv(data: &FinancialData, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let content = to_csv(data)?;
    std::fs::write(path, content)?;
    log::debug!("Saved CSV export to {:?}", path);
    Ok(())
}

fn write_section(out: &mut Vec<u8>, table: &Table) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    writer.write_record([table.title])?;
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(
            row.iter()
                .map(|cell| cell.as_ref().map(value_text).unwrap_or_default()),
        )?;
    }
    writer.flush()?;
    Ok(())
}
