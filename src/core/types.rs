use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use strum::{Display, EnumIter};

/// A completed research answer. Built once per search and never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub summary: String,
    pub sources: Vec<Source>,
    pub financial_data: Option<FinancialData>,
    pub news_sentiment: Option<NewsSentiment>,
}

impl SearchResult {
    pub fn income_statement(&self) -> &[StatementRow] {
        self.financial_data
            .as_ref()
            .map(|d| d.statements.income_statement.as_slice())
            .unwrap_or_default()
    }

    /// True when there is something worth showing in the financial deep-dive.
    pub fn has_financials(&self) -> bool {
        self.financial_data
            .as_ref()
            .map(|d| !d.key_metrics.is_empty() || !d.statements.income_statement.is_empty())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

impl Source {
    /// Builds a source from a grounding chunk, dropping chunks without a title or URI.
    pub fn from_chunk(title: &str, uri: &str) -> Option<Self> {
        let (title, uri) = (title.trim(), uri.trim());
        if title.is_empty() || uri.is_empty() {
            return None;
        }
        Some(Source {
            title: title.to_string(),
            uri: uri.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialData {
    #[serde(default)]
    pub statements: Statements,
    #[serde(default, deserialize_with = "lenient::list")]
    pub key_metrics: Vec<YearlyMetric>,
    #[serde(default)]
    pub financial_analysis: Option<FinancialAnalysis>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statements {
    #[serde(default, deserialize_with = "lenient::list")]
    pub income_statement: Vec<StatementRow>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub cashflow_statement: Vec<StatementRow>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub balance_sheet: Vec<StatementRow>,
}

/// One line item with a value per reporting period. Period labels ("2023", "2023 H1", ...)
/// differ from row to row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    #[serde(default, deserialize_with = "lenient::text")]
    pub metric: String,
    #[serde(flatten)]
    pub values: BTreeMap<String, Value>,
}

impl StatementRow {
    pub fn new(metric: &str) -> Self {
        StatementRow {
            metric: metric.to_string(),
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, period: &str, value: impl Into<Value>) -> Self {
        self.values.insert(period.to_string(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyMetric {
    #[serde(default)]
    pub year: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_share: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares_outstanding: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dividend_per_share: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ytd_return: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyRatio {
    #[serde(default)]
    pub year: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pe_ratio: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt_to_equity: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_on_equity: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eps: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialAnalysis {
    #[serde(default, deserialize_with = "lenient::text")]
    pub health_summary: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub competitor_snapshot: String,
    #[serde(default, deserialize_with = "lenient::list")]
    pub key_ratios: Vec<YearlyRatio>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsSentiment {
    #[serde(default, deserialize_with = "lenient::text")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient::score")]
    pub score: Option<SentimentScore>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum SentimentScore {
    Positive,
    Neutral,
    Negative,
}

impl From<&str> for SentimentScore {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => SentimentScore::Positive,
            "negative" => SentimentScore::Negative,
            // Anything the model invents is shown as neutral
            _ => SentimentScore::Neutral,
        }
    }
}

/// Deserializers that accept whatever the model produced instead of failing the whole
/// payload over one odd field.
mod lenient {
    use super::*;

    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => String::new(),
            Value::String(s) => s,
            other => other.to_string(),
        })
    }

    pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: serde::de::DeserializeOwned,
    {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => Ok(items
                .into_iter()
                .filter_map(|item| match serde_json::from_value(item) {
                    Ok(parsed) => Some(parsed),
                    Err(e) => {
                        log::warn!("Skipping malformed entry in structured data: {}", e);
                        None
                    }
                })
                .collect()),
            _ => Ok(Vec::new()),
        }
    }

    pub fn score<'de, D>(deserializer: D) -> Result<Option<SentimentScore>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(SentimentScore::from(s.as_str())),
            _ => None,
        })
    }
}
