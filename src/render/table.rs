use super::heading;
use crate::core::types::FinancialData;
use crate::normalize::{FinancialTables, Table};
use colored::*;

/// The financial deep-dive: analysis text followed by every non-empty table. `None` when
/// there are no table rows at all.
pub fn financials(data: &FinancialData) -> Option<String> {
    let tables = FinancialTables::new(data);
    if !tables.has_data() {
        return None;
    }

    let mut out = heading("Financial Deep-Dive");
    out.push_str(&format!(
        "{}\n",
        "Use /export to save these tables as CSV.".dimmed()
    ));

    if let Some(analysis) = &data.financial_analysis {
        for (title, content) in [
            ("Financial Health Summary", &analysis.health_summary),
            ("Competitor Snapshot", &analysis.competitor_snapshot),
        ] {
            if !content.is_empty() {
                out.push_str(&format!("\n{}\n{}\n", title.bold(), content));
            }
        }
    }

    for table in tables.display_order().into_iter().filter(|t| !t.is_empty()) {
        out.push('\n');
        out.push_str(&self::table(table));
    }
    Some(out)
}

/// Renders a table with the label column left aligned and data columns right aligned.
pub fn table(table: &Table) -> String {
    let rows = table.display_rows();
    let columns = table
        .headers
        .len()
        .max(rows.iter().map(|r| r.len()).max().unwrap_or(0));

    let mut widths = vec![0usize; columns];
    for (i, header) in table.headers.iter().enumerate() {
        widths[i] = widths[i].max(header.chars().count());
    }
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = format!("{}\n", table.title.bold());

    let header_line = align(&table.headers, &widths);
    out.push_str(&format!("{}\n", header_line.cyan()));
    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    out.push_str(&format!("{}\n", rule.join("  ").dimmed()));

    for row in &rows {
        out.push_str(&align(row, &widths));
        out.push('\n');
    }
    out
}

fn align(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let pad = widths[i].saturating_sub(cell.chars().count());
            if i == 0 {
                format!("{}{}", cell, " ".repeat(pad))
            } else {
                format!("{}{}", " ".repeat(pad), cell)
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{FinancialAnalysis, StatementRow, Statements};
    use crate::normalize::{statement_table, INCOME_STATEMENT_TITLE};

    #[test]
    fn aligns_labels_left_and_numbers_right() {
        let rows = vec![
            StatementRow::new("Revenue").with("2023", 1500000),
            StatementRow::new("Net Income").with("2023", -20),
        ];
        let text = table(&statement_table(INCOME_STATEMENT_TITLE, &rows));
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines.contains(&"Revenue     1,500,000.00"));
        assert!(lines.contains(&"Net Income       (20.00)"));
    }

    #[test]
    fn no_tables_means_no_deep_dive() {
        let data = FinancialData {
            financial_analysis: Some(FinancialAnalysis {
                health_summary: "Solid".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(financials(&data).is_none());
    }

    #[test]
    fn deep_dive_includes_analysis_text() {
        let data = FinancialData {
            statements: Statements {
                balance_sheet: vec![StatementRow::new("Total Assets").with("2023", 10)],
                ..Default::default()
            },
            financial_analysis: Some(FinancialAnalysis {
                health_summary: "Well capitalised.".to_string(),
                competitor_snapshot: String::new(),
                key_ratios: Vec::new(),
            }),
            ..Default::default()
        };
        let text = financials(&data).unwrap();
        assert!(text.contains("Financial Health Summary"));
        assert!(text.contains("Well capitalised."));
        assert!(!text.contains("Competitor Snapshot"));
        assert!(text.contains("Statement of Financial Position Highlights"));
    }
}
