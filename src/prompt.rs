use crate::query::Query;

pub const JSON_DELIMITER_START: &str = "---JSON_START---";
pub const JSON_DELIMITER_END: &str = "---JSON_END---";

/// Renders the analyst prompt for `query`. The wording fixes the response contract the
/// parser relies on: narrative first, then one JSON object between the two delimiters.
pub fn build(query: &Query) -> String {
    format!(
        r#"
You are an expert financial analyst. Your task is to provide a comprehensive financial overview for the query: "{query}".
Use Google Search to find the most recent and reliable data from official company reports, financial statements, and reputable news outlets.

**Output Requirements:**

1.  **Narrative Summary:** Begin with a concise, data-driven summary of the company's recent financial performance, market position, and outlook.
2.  **JSON Data:** After the summary, provide a single, well-formed JSON object enclosed between '{start}' and '{end}'. Do not include any text or markdown formatting before or after the JSON content within the delimiters.

**JSON Object Specification:**

The JSON object must contain two top-level keys: "financialData" and "newsSentiment".

-   **"financialData"**:
    -   **"statements"**: Object with arrays for "incomeStatement", "cashflowStatement", "balanceSheet".
        -   Each array item is an object with a "metric" key naming the line item, plus one key per period (e.g. "2023" or "2023 H1") holding its value.
        -   For each statement, extract key line items for the last 5 available fiscal years or half-year periods.
        -   **Prioritize these items**:
            -   **Income Statement**: 'Interest Income', 'Net Interest Income', 'Operating Income', 'Profit Before Tax', 'Profit for the year', 'Revenue', 'Net Income'.
            -   **Balance Sheet**: 'Total Assets', 'Total Liabilities', 'Total Equity', 'Cash and Cash Equivalents'.
            -   **Cash Flow**: 'Net Cash from Operating Activities', 'Net Cash from Investing Activities', 'Net Cash from Financing Activities'.
    -   **"keyMetrics"**: Array of annual objects. For each of the last 5 years, include: 'year', 'pricePerShare', 'marketCap', 'sharesOutstanding', 'dividendPerShare', 'ytdReturn'.
    -   **"financialAnalysis"**:
        -   "healthSummary": A brief text analysis of the company's financial health.
        -   "competitorSnapshot": A brief text comparison against key competitors.
        -   "keyRatios": Array of annual objects. For each of the last 5 years, include: 'year', 'peRatio', 'eps' (Earnings Per Share), 'returnOnEquity', 'debtToEquity', 'EBITDA Margin'.

-   **"newsSentiment"**:
    -   "summary": A brief summary of the prevailing market sentiment based on recent news.
    -   "score": A single string value: 'Positive', 'Neutral', or 'Negative'.

Provide 'N/A' for any missing values. Ensure all financial figures are returned as numbers or strings that can be parsed as numbers.
"#,
        query = query,
        start = JSON_DELIMITER_START,
        end = JSON_DELIMITER_END,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_query_and_contract() {
        let query = Query::new("Financials for MTN Ghana").unwrap();
        let prompt = build(&query);

        assert!(prompt.contains(r#"for the query: "Financials for MTN Ghana""#));
        assert!(prompt.contains("'---JSON_START---' and '---JSON_END---'"));
        for key in [
            "\"financialData\"",
            "\"newsSentiment\"",
            "\"statements\"",
            "\"incomeStatement\"",
            "\"cashflowStatement\"",
            "\"balanceSheet\"",
            "\"keyMetrics\"",
            "\"financialAnalysis\"",
            "\"keyRatios\"",
            "'Positive', 'Neutral', or 'Negative'",
        ] {
            assert!(prompt.contains(key), "prompt is missing {}", key);
        }
        assert!(prompt.contains("Provide 'N/A' for any missing values."));
    }
}
