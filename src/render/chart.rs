use super::heading;
use crate::chart::{compact, Chart};
use colored::*;

const SERIES_COLORS: [Color; 3] = [Color::Yellow, Color::BrightBlue, Color::Cyan];

/// Horizontal bar chart, one group of bars per period. Negative values are drawn with
/// a different glyph so the sign survives without color.
pub fn chart(chart: &Chart, width: usize) -> String {
    let mut out = heading("Key Performance Indicators");
    if chart.is_empty() {
        out.push_str("Not enough data to display performance chart.\n");
        return out;
    }

    let legend: Vec<String> = chart
        .series
        .iter()
        .enumerate()
        .map(|(i, s)| format!("█ {}", s.name).color(series_color(i)).to_string())
        .collect();
    out.push_str(&format!("{}\n", legend.join("   ")));

    let label_width = chart.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let bar_space = width.saturating_sub(label_width + 14).max(10);
    let max = chart.max_magnitude();

    for (j, label) in chart.labels.iter().enumerate() {
        out.push('\n');
        for (i, series) in chart.series.iter().enumerate() {
            let value = series.values[j];
            let len = bar_length(value, max, bar_space);
            let glyph = if value < 0.0 { "▒" } else { "█" };
            let prefix = if i == 0 {
                format!("{:<w$}", label, w = label_width)
            } else {
                " ".repeat(label_width)
            };
            out.push_str(&format!(
                "{} │{} {}\n",
                prefix,
                glyph.repeat(len).color(series_color(i)),
                compact(value)
            ));
        }
    }
    out
}

fn series_color(i: usize) -> Color {
    SERIES_COLORS[i % SERIES_COLORS.len()]
}

fn bar_length(value: f64, max: f64, space: usize) -> usize {
    if max <= 0.0 || value == 0.0 {
        return 0;
    }
    ((value.abs() / max) * space as f64).round().max(1.0) as usize
}
