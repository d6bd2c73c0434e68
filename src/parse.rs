use crate::core::types::{FinancialData, NewsSentiment};
use crate::prompt::{JSON_DELIMITER_END, JSON_DELIMITER_START};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Appended to the summary when the delimited block is not valid JSON.
pub const PARSE_FAILURE_NOTE: &str =
    "\n\n(Could not parse structured financial data from the response)";

/// Outcome of looking for the delimited JSON block in a response.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredData {
    /// No delimiters; the model answered in prose only.
    Absent,
    Parsed {
        financial_data: Option<FinancialData>,
        news_sentiment: Option<NewsSentiment>,
    },
    /// Delimiters were present but the block between them did not decode.
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    pub summary: String,
    pub structured: StructuredData,
}

impl ParsedResponse {
    pub fn financial_data(&self) -> Option<&FinancialData> {
        match &self.structured {
            StructuredData::Parsed { financial_data, .. } => financial_data.as_ref(),
            _ => None,
        }
    }

    pub fn news_sentiment(&self) -> Option<&NewsSentiment> {
        match &self.structured {
            StructuredData::Parsed { news_sentiment, .. } => news_sentiment.as_ref(),
            _ => None,
        }
    }

    pub fn into_parts(self) -> (String, Option<FinancialData>, Option<NewsSentiment>) {
        match self.structured {
            StructuredData::Parsed {
                financial_data,
                news_sentiment,
            } => (self.summary, financial_data, news_sentiment),
            _ => (self.summary, None, None),
        }
    }
}

/// Splits a raw model answer into its narrative and the embedded JSON block.
///
/// Never fails: a missing block leaves the whole text as the summary, and a block that
/// does not decode leaves the narrative with a note appended.
pub fn parse(raw: &str) -> ParsedResponse {
    let (start, end) = match (raw.find(JSON_DELIMITER_START), raw.find(JSON_DELIMITER_END)) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return ParsedResponse {
                summary: raw.to_string(),
                structured: StructuredData::Absent,
            }
        }
    };

    let mut summary = raw[..start].trim().to_string();
    let body = raw
        .get(start + JSON_DELIMITER_START.len()..end)
        .unwrap_or_default()
        .trim();

    match serde_json::from_str::<Value>(body) {
        Ok(json) => ParsedResponse {
            summary,
            structured: StructuredData::Parsed {
                financial_data: section(&json, "financialData"),
                news_sentiment: section(&json, "newsSentiment"),
            },
        },
        Err(e) => {
            log::warn!("Failed to parse financial data JSON: {}", e);
            summary.push_str(PARSE_FAILURE_NOTE);
            ParsedResponse {
                summary,
                structured: StructuredData::Malformed(e.to_string()),
            }
        }
    }
}

fn section<T: DeserializeOwned>(json: &Value, key: &str) -> Option<T> {
    match json.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| log::warn!("Ignoring malformed \"{}\" section: {}", key, e))
            .ok(),
    }
}
