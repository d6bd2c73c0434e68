use crate::core::types::{FinancialData, StatementRow, YearlyMetric, YearlyRatio};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;

pub const NOT_AVAILABLE: &str = "N/A";

pub const KEY_METRICS_TITLE: &str = "Annual Metrics";
pub const KEY_RATIOS_TITLE: &str = "Key Financial Ratios";
pub const INCOME_STATEMENT_TITLE: &str = "Income Statement Highlights";
pub const CASHFLOW_STATEMENT_TITLE: &str = "Cash Flow Statement Highlights";
pub const BALANCE_SHEET_TITLE: &str = "Statement of Financial Position Highlights";

const KEY_METRICS_HEADERS: [&str; 6] = [
    "Year",
    "Price/Share",
    "Market Cap",
    "Shares Outstanding",
    "Dividend/Share",
    "YTD Return",
];

const KEY_RATIOS_HEADERS: [&str; 5] = [
    "Year",
    "P/E Ratio",
    "Debt-to-Equity",
    "Return on Equity",
    "EPS",
];

static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").unwrap());

/// A titled grid of raw cells. The first column is a label, every other cell is shown
/// through [`render_value`]. Absent cells stay `None` so columns keep their alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub title: &'static str,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<Value>>>,
}

impl Table {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Display strings for every row: labels verbatim, data cells formatted.
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(i, cell)| {
                        if i == 0 {
                            cell.as_ref().map(value_text).unwrap_or_default()
                        } else {
                            render_value(cell.as_ref())
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

/// Every table derived from one [`FinancialData`].
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialTables {
    pub key_metrics: Table,
    pub key_ratios: Table,
    pub income_statement: Table,
    pub cashflow_statement: Table,
    pub balance_sheet: Table,
}

impl FinancialTables {
    pub fn new(data: &FinancialData) -> Self {
        let ratios = data
            .financial_analysis
            .as_ref()
            .map(|a| a.key_ratios.as_slice())
            .unwrap_or_default();

        FinancialTables {
            key_metrics: key_metrics_table(&data.key_metrics),
            key_ratios: key_ratios_table(ratios),
            income_statement: statement_table(
                INCOME_STATEMENT_TITLE,
                &data.statements.income_statement,
            ),
            cashflow_statement: statement_table(
                CASHFLOW_STATEMENT_TITLE,
                &data.statements.cashflow_statement,
            ),
            balance_sheet: statement_table(BALANCE_SHEET_TITLE, &data.statements.balance_sheet),
        }
    }

    pub fn has_data(&self) -> bool {
        self.export_order().iter().any(|t| !t.is_empty())
    }

    /// Section order used by the CSV export.
    pub fn export_order(&self) -> [&Table; 5] {
        [
            &self.key_metrics,
            &self.key_ratios,
            &self.income_statement,
            &self.cashflow_statement,
            &self.balance_sheet,
        ]
    }

    /// Section order used on screen.
    pub fn display_order(&self) -> [&Table; 5] {
        [
            &self.key_ratios,
            &self.key_metrics,
            &self.income_statement,
            &self.cashflow_statement,
            &self.balance_sheet,
        ]
    }
}

/// Lays out statement rows with differing period keys as one table. Columns are the
/// union of all period keys, sorted in reverse so the most recent period comes first.
pub fn statement_table(title: &'static str, rows: &[StatementRow]) -> Table {
    if rows.is_empty() {
        return Table {
            title,
            headers: Vec::new(),
            rows: Vec::new(),
        };
    }

    let periods: Vec<&String> = rows
        .iter()
        .flat_map(|row| row.values.keys())
        .sorted_by(|a, b| b.cmp(a))
        .dedup()
        .collect();

    let headers = std::iter::once("Metric".to_string())
        .chain(periods.iter().map(|p| p.to_string()))
        .collect();

    let rows = rows
        .iter()
        .map(|row| {
            std::iter::once(Some(Value::String(row.metric.clone())))
                .chain(periods.iter().map(|p| row.values.get(*p).cloned()))
                .collect()
        })
        .collect();

    Table {
        title,
        headers,
        rows,
    }
}

pub fn key_metrics_table(metrics: &[YearlyMetric]) -> Table {
    let mut sorted: Vec<&YearlyMetric> = metrics.iter().collect();
    sorted.sort_by(|a, b| by_year_desc(&a.year, &b.year));

    Table {
        title: KEY_METRICS_TITLE,
        headers: KEY_METRICS_HEADERS.iter().map(|h| h.to_string()).collect(),
        rows: sorted
            .into_iter()
            .map(|m| {
                vec![
                    m.year.clone(),
                    m.price_per_share.clone(),
                    m.market_cap.clone(),
                    m.shares_outstanding.clone(),
                    m.dividend_per_share.clone(),
                    m.ytd_return.clone(),
                ]
            })
            .collect(),
    }
}

pub fn key_ratios_table(ratios: &[YearlyRatio]) -> Table {
    let mut sorted: Vec<&YearlyRatio> = ratios.iter().collect();
    sorted.sort_by(|a, b| by_year_desc(&a.year, &b.year));

    Table {
        title: KEY_RATIOS_TITLE,
        headers: KEY_RATIOS_HEADERS.iter().map(|h| h.to_string()).collect(),
        rows: sorted
            .into_iter()
            .map(|r| {
                vec![
                    r.year.clone(),
                    r.pe_ratio.clone(),
                    r.debt_to_equity.clone(),
                    r.return_on_equity.clone(),
                    r.eps.clone(),
                ]
            })
            .collect(),
    }
}

// Most recent first; years that are not numbers go last.
fn by_year_desc(a: &Option<Value>, b: &Option<Value>) -> Ordering {
    match (year_number(a), year_number(b)) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn year_number(year: &Option<Value>) -> Option<f64> {
    match year {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Formats one data cell for display.
///
/// Missing, empty and "N/A" values become `N/A`. Numbers (commas allowed) get two
/// decimals and thousands separators, negatives in accounting parentheses. Anything
/// else is returned unchanged.
pub fn render_value(value: Option<&Value>) -> String {
    let text = match value {
        None | Some(Value::Null) => return NOT_AVAILABLE.to_string(),
        Some(value) => value_text(value),
    };
    if text.is_empty() || text == NOT_AVAILABLE {
        return NOT_AVAILABLE.to_string();
    }

    match leading_number(&text.replace(',', "")).map(round_cents) {
        Some(num) if num < 0.0 => format!("({})", group_thousands(num.abs())),
        Some(num) => group_thousands(num),
        None => text,
    }
}

/// The text form of a JSON cell: strings without quotes, whole floats without a
/// trailing ".0", everything else as JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

// Half away from zero, and anything that rounds to zero loses its sign.
fn round_cents(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Parses the numeric prefix of `text`, ignoring whatever trails it ("12.5%" is 12.5).
pub(crate) fn leading_number(text: &str) -> Option<f64> {
    LEADING_NUMBER
        .find(text)
        .and_then(|m| m.as_str().trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}.{}", grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{FinancialAnalysis, Statements};
    use serde_json::json;

    #[test]
    fn render_value_formats_accounting_numbers() {
        assert_eq!(render_value(Some(&json!(-1234.5))), "(1,234.50)");
        assert_eq!(render_value(Some(&json!(1500000))), "1,500,000.00");
        assert_eq!(render_value(Some(&json!("1,234,567.891"))), "1,234,567.89");
        assert_eq!(render_value(Some(&json!("-42"))), "(42.00)");
        assert_eq!(render_value(Some(&json!(0))), "0.00");
        assert_eq!(render_value(Some(&json!(999))), "999.00");
    }

    #[test]
    fn render_value_rounds_ties_away_from_zero() {
        assert_eq!(render_value(Some(&json!(0.125))), "0.13");
        assert_eq!(render_value(Some(&json!(1234.625))), "1,234.63");
        assert_eq!(render_value(Some(&json!(-1234.625))), "(1,234.63)");
        assert_eq!(render_value(Some(&json!(-0.0))), "0.00");
        assert_eq!(render_value(Some(&json!("-0.001"))), "0.00");
    }

    #[test]
    fn value_text_drops_trailing_zero_fraction() {
        assert_eq!(value_text(&json!(1.0)), "1");
        assert_eq!(value_text(&json!(-250.0)), "-250");
        assert_eq!(value_text(&json!(2.5)), "2.5");
        assert_eq!(value_text(&json!(42)), "42");
        assert_eq!(value_text(&json!("1.0")), "1.0");
    }

    #[test]
    fn render_value_handles_missing_and_text() {
        assert_eq!(render_value(Some(&json!("N/A"))), "N/A");
        assert_eq!(render_value(None), "N/A");
        assert_eq!(render_value(Some(&Value::Null)), "N/A");
        assert_eq!(render_value(Some(&json!(""))), "N/A");
        assert_eq!(render_value(Some(&json!("abc"))), "abc");
        assert_eq!(render_value(Some(&json!("GH₵ 3.50"))), "GH₵ 3.50");
    }

    #[test]
    fn render_value_reads_numeric_prefix() {
        assert_eq!(render_value(Some(&json!("12.5%"))), "12.50");
        assert_eq!(render_value(Some(&json!("3.2x"))), "3.20");
    }

    #[test]
    fn statement_table_unions_and_sorts_periods() {
        let rows = vec![
            StatementRow::new("Revenue").with("2022", 100).with("2023", 120),
            StatementRow::new("Net Income").with("2023 H1", "(5)"),
        ];
        let table = statement_table(INCOME_STATEMENT_TITLE, &rows);

        assert_eq!(table.headers, vec!["Metric", "2023 H1", "2023", "2022"]);
        for row in &table.rows {
            assert_eq!(row.len(), table.headers.len());
        }
        assert_eq!(
            table.display_rows(),
            vec![
                vec!["Revenue", "N/A", "120.00", "100.00"],
                vec!["Net Income", "(5)", "N/A", "N/A"],
            ]
        );
    }

    #[test]
    fn statement_table_with_disjoint_keys() {
        let rows = vec![
            StatementRow::new("Total Assets").with("2021", 1),
            StatementRow::new("Total Equity").with("2020", 2),
        ];
        let table = statement_table(BALANCE_SHEET_TITLE, &rows);
        assert_eq!(table.headers, vec!["Metric", "2021", "2020"]);
        assert_eq!(table.rows[0], vec![Some(json!("Total Assets")), Some(json!(1)), None]);
        assert_eq!(table.rows[1], vec![Some(json!("Total Equity")), None, Some(json!(2))]);
    }

    #[test]
    fn empty_statement_has_no_headers() {
        let table = statement_table(CASHFLOW_STATEMENT_TITLE, &[]);
        assert!(table.is_empty());
        assert!(table.headers.is_empty());
    }

    #[test]
    fn annual_tables_sort_by_descending_year() {
        let metrics: Vec<YearlyMetric> = serde_json::from_value(json!([
            { "year": 2021, "pricePerShare": "1.10" },
            { "year": "2023", "pricePerShare": "1.30" },
            { "year": "N/A", "pricePerShare": "0.90" },
            { "year": 2022, "pricePerShare": "1.20" }
        ]))
        .unwrap();

        let table = key_metrics_table(&metrics);
        let years: Vec<String> = table.display_rows().into_iter().map(|r| r[0].clone()).collect();
        assert_eq!(years, vec!["2023", "2022", "2021", "N/A"]);
        assert_eq!(table.display_rows()[0][1], "1.30");
        assert_eq!(table.display_rows()[0][2], "N/A");
    }

    #[test]
    fn tables_report_data_presence() {
        let empty = FinancialTables::new(&FinancialData::default());
        assert!(!empty.has_data());

        let data = FinancialData {
            statements: Statements::default(),
            key_metrics: Vec::new(),
            financial_analysis: Some(FinancialAnalysis {
                key_ratios: vec![YearlyRatio {
                    year: Some(json!(2023)),
                    pe_ratio: Some(json!("8.1")),
                    ..Default::default()
                }],
                ..Default::default()
            }),
        };
        let tables = FinancialTables::new(&data);
        assert!(tables.has_data());
        assert_eq!(tables.key_ratios.headers[1], "P/E Ratio");
        assert_eq!(tables.display_order()[0].title, KEY_RATIOS_TITLE);
        assert_eq!(tables.export_order()[0].title, KEY_METRICS_TITLE);
    }
}
