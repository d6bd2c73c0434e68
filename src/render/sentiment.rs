use super::heading;
use crate::core::types::{NewsSentiment, SentimentScore};
use colored::*;

/// How a sentiment score is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BadgeStyle {
    pub label: &'static str,
    pub glyph: &'static str,
    pub color: Color,
}

pub fn badge(score: SentimentScore) -> BadgeStyle {
    match score {
        SentimentScore::Positive => BadgeStyle {
            label: "Positive",
            glyph: "▲",
            color: Color::Green,
        },
        SentimentScore::Negative => BadgeStyle {
            label: "Negative",
            glyph: "▼",
            color: Color::Red,
        },
        SentimentScore::Neutral => BadgeStyle {
            label: "Neutral",
            glyph: "■",
            color: Color::Yellow,
        },
    }
}

/// The news sentiment block, or `None` when the model gave no score.
pub fn sentiment(sentiment: &NewsSentiment) -> Option<String> {
    let style = badge(sentiment.score?);
    let mut out = heading("News Sentiment");
    out.push_str(&format!(
        "{}\n",
        format!("{} {}", style.glyph, style.label)
            .color(style.color)
            .bold()
    ));
    if !sentiment.summary.is_empty() {
        out.push_str(&format!("{}\n", sentiment.summary));
    }
    Some(out)
}
