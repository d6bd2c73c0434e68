//! Terminal presentation. Every function here is a pure mapping from data to text.

mod chart;
mod sentiment;
mod sources;
mod table;

pub use chart::chart;
pub use sentiment::{badge, sentiment, BadgeStyle};
pub use sources::{display_host, sources};
pub use table::{financials, table};

use crate::chart as chart_data;
use crate::core::types::SearchResult;
use chrono::Datelike;
use colored::*;

pub const DEFAULT_WIDTH: usize = 80;

pub const WELCOME_TITLE: &str = "Welcome to the Research Terminal";
pub const LOADING_MESSAGE: &str = "Fetching and analyzing real-time data...";
pub const EXAMPLE_QUERIES: [&str; 3] = [
    "Financial summary for Fan Milk PLC",
    "Recent news for Standard Chartered Bank",
    "Key financial ratios for Tullow Oil",
];

/// What the terminal should show, chosen from the shell's state.
#[derive(Debug, Clone, Copy)]
pub enum View<'a> {
    Welcome,
    Loading,
    /// Searched, but the last search produced nothing to show.
    Empty,
    Populated(&'a SearchResult),
}

impl<'a> View<'a> {
    pub fn select(is_loading: bool, result: Option<&'a SearchResult>, has_searched: bool) -> Self {
        if is_loading {
            return View::Loading;
        }
        if !has_searched {
            return View::Welcome;
        }
        match result {
            Some(result) => View::Populated(result),
            None => View::Empty,
        }
    }
}

pub fn view(view: &View<'_>, width: usize) -> String {
    match view {
        View::Welcome => welcome(),
        View::Loading => format!("{}\n", LOADING_MESSAGE.dimmed()),
        View::Empty => String::new(),
        View::Populated(result) => populated(result, width),
    }
}

pub fn banner() -> String {
    format!(
        "{}\n{}\n",
        "GSE Financial Research Terminal".bold(),
        "AI-Powered Insights on Ghana Stock Exchange Listed Companies".dimmed()
    )
}

pub fn footer() -> String {
    format!(
        "© {} Financial Research. Data provided for informational purposes only.",
        chrono::Local::now().year()
    )
}

fn welcome() -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", WELCOME_TITLE.bold()));
    out.push_str("Your AI-powered gateway to financial insights on the Ghana Stock Exchange.\n\n");
    out.push_str(&format!("{}\n", "Start by asking for:".bold()));
    for example in EXAMPLE_QUERIES {
        out.push_str(&format!("  {} \"{}\"\n", "›".yellow(), example));
    }
    out
}

fn heading(title: &str) -> String {
    format!("{}\n", title.yellow().bold())
}

fn populated(result: &SearchResult, width: usize) -> String {
    let mut sections: Vec<String> = Vec::new();

    if !result.summary.is_empty() {
        sections.push(format!(
            "{}{}\n",
            heading("AI-Generated Summary"),
            result.summary
        ));
    }

    if let Some(block) = result.news_sentiment.as_ref().and_then(sentiment) {
        sections.push(block);
    }

    let income = result.income_statement();
    if !income.is_empty() {
        sections.push(chart(&chart_data::extract(income), width));
    }

    if result.has_financials() {
        if let Some(block) = result.financial_data.as_ref().and_then(financials) {
            sections.push(block);
        }
    }

    if !result.sources.is_empty() {
        sections.push(sources(&result.sources));
    }

    sections.join("\n")
}
