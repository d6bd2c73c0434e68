use crate::core::types::StatementRow;
use crate::normalize::{leading_number, value_text};
use once_cell::sync::Lazy;
use regex::Regex;

/// Income statement line items plotted on the performance chart, in legend order.
pub const CHART_METRICS: [&str; 3] = ["Operating Income", "Profit for the year", "Net Income"];

static PERIOD_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}(?:\D|$)|Q\d\s\d{4}|H\d\s\d{4}$").unwrap());
static NON_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9.\-]+").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: &'static str,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl Chart {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Largest absolute value across all series, used to scale bars.
    pub fn max_magnitude(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter())
            .fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }
}

/// Pulls the plotted metrics out of income statement rows.
///
/// Labels are the period-like keys across all rows in ascending order. Each metric uses
/// the first row whose label contains its name (case-insensitive). Missing or
/// unreadable cells count as zero and series that are zero everywhere are left out.
pub fn extract(rows: &[StatementRow]) -> Chart {
    let mut labels: Vec<String> = rows
        .iter()
        .flat_map(|row| row.values.keys())
        .filter(|key| PERIOD_KEY.is_match(key))
        .cloned()
        .collect();
    labels.sort();
    labels.dedup();

    let series = CHART_METRICS
        .iter()
        .filter_map(|name| {
            let needle = name.to_lowercase();
            let row = rows
                .iter()
                .find(|row| row.metric.to_lowercase().contains(&needle))?;
            let values: Vec<f64> = labels
                .iter()
                .map(|label| {
                    row.values
                        .get(label)
                        .map(|v| chart_value(&value_text(v)))
                        .unwrap_or(0.0)
                })
                .collect();
            Some(Series { name: *name, values })
        })
        .filter(|series| series.values.iter().any(|v| *v != 0.0))
        .collect();

    Chart { labels, series }
}

// "(500)" is -500; currency symbols and separators are dropped before parsing.
fn chart_value(text: &str) -> f64 {
    let negative = text.contains('(') && text.contains(')');
    let digits = NON_NUMERIC.replace_all(text, "");
    match leading_number(&digits) {
        Some(num) if negative => -num,
        Some(num) => num,
        None => 0.0,
    }
}

/// Compact axis label: 1.5M, 250K, 12.
pub fn compact(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e6 {
        format!("{}M", trim_float(value / 1e6))
    } else if abs >= 1e3 {
        format!("{}K", trim_float(value / 1e3))
    } else {
        trim_float(value)
    }
}

fn trim_float(value: f64) -> String {
    let text = format!("{:.2}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parenthesized_values_are_negative() {
        let rows = vec![StatementRow::new("Net Income")
            .with("2023", "(500)")
            .with("2022", "300")];
        let chart = extract(&rows);

        assert_eq!(chart.labels, vec!["2022", "2023"]);
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].name, "Net Income");
        assert_eq!(chart.series[0].values, vec![300.0, -500.0]);
    }

    #[test]
    fn all_zero_series_are_dropped() {
        let rows = vec![
            StatementRow::new("Operating Income")
                .with("2023", "N/A")
                .with("2022", 0),
            StatementRow::new("Profit for the year")
                .with("2023", "GH₵ 1,250,000")
                .with("2022", 900),
        ];
        let chart = extract(&rows);

        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].name, "Profit for the year");
        assert_eq!(chart.series[0].values, vec![900.0, 1_250_000.0]);
    }

    #[test]
    fn metric_match_is_case_insensitive_substring() {
        let rows = vec![
            StatementRow::new("Revenue").with("2023", 10),
            StatementRow::new("NET INCOME ATTRIBUTABLE").with("2023", 4),
        ];
        let chart = extract(&rows);
        assert_eq!(chart.series[0].name, "Net Income");
        assert_eq!(chart.series[0].values, vec![4.0]);
    }

    #[test]
    fn missing_periods_count_as_zero() {
        let rows = vec![
            StatementRow::new("Operating Income").with("2023", 5),
            StatementRow::new("Net Income").with("2022", 3),
        ];
        let chart = extract(&rows);
        assert_eq!(chart.labels, vec!["2022", "2023"]);
        assert_eq!(chart.series[0].values, vec![0.0, 5.0]);
        assert_eq!(chart.series[1].values, vec![3.0, 0.0]);
        assert_eq!(chart.max_magnitude(), 5.0);
    }

    #[test]
    fn only_period_like_keys_become_labels() {
        let rows = vec![StatementRow::new("Net Income")
            .with("2023 H1", 1)
            .with("Q4 2022", 2)
            .with("20231", 3)
            .with("TTM", 4)];
        let chart = extract(&rows);
        assert_eq!(chart.labels, vec!["2023 H1", "Q4 2022"]);
    }

    #[test]
    fn no_matching_rows_gives_empty_chart() {
        let chart = extract(&[StatementRow::new("Revenue").with("2023", 1)]);
        assert!(chart.is_empty());
    }

    #[test]
    fn compact_labels() {
        assert_eq!(compact(1_500_000.0), "1.5M");
        assert_eq!(compact(-250_000.0), "-250K");
        assert_eq!(compact(12.0), "12");
    }
}
