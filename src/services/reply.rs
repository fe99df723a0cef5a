//! Reply service: canned assistant replies with optional charts.
//!
//! DESIGN
//! ======
//! There is no model behind the assistant. A reply is one of a handful of
//! canned openers; when the user text mentions a chart-ish keyword the reply
//! announces a chart and carries one, picked by topic.

#[cfg(test)]
#[path = "reply_test.rs"]
mod reply_test;

use rand::Rng;

use crate::types::{ChartColor, ChartData};

pub const CANNED_REPLIES: [&str; 8] = [
    "Great question! Let me analyze the financial data for you.",
    "I can help you with that investment decision. Here's my analysis:",
    "That's an important financial consideration. Let me break it down:",
    "Based on current market conditions, here's what I recommend:",
    "Let me show you the numbers with a detailed chart analysis:",
    "Excellent timing for this question! The market data suggests:",
    "I'll generate a visual representation to help illustrate this concept:",
    "Let me provide you with a comprehensive financial breakdown:",
];

pub const CHART_SUFFIX: &str = "\n\nHere's a chart to visualize the data:";

pub const CHART_KEYWORDS: [&str; 15] = [
    "chart",
    "graph",
    "show",
    "visualize",
    "plot",
    "display",
    "portfolio",
    "performance",
    "allocation",
    "sector",
    "trend",
    "analysis",
    "breakdown",
    "comparison",
    "growth",
];

/// Topic of a generated chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartTopic {
    Portfolio,
    Sector,
    Performance,
    Allocation,
}

impl ChartTopic {
    /// Pick a topic from the user text. Checked in priority order, portfolio
    /// is the fallback.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("sector") {
            Self::Sector
        } else if lower.contains("performance") {
            Self::Performance
        } else if lower.contains("allocation") {
            Self::Allocation
        } else {
            Self::Portfolio
        }
    }

    #[must_use]
    pub fn chart(self) -> ChartData {
        match self {
            Self::Portfolio => ChartData::single(
                &["Jan", "Feb", "Mar", "Apr", "May", "Jun"],
                &[10_000.0, 12_500.0, 11_800.0, 14_200.0, 16_500.0, 18_200.0],
                ChartColor::Growth,
            ),
            Self::Sector => ChartData::single(
                &["Tech", "Healthcare", "Finance", "Energy", "Consumer"],
                &[25.0, 18.0, 22.0, 12.0, 23.0],
                ChartColor::Indigo,
            ),
            Self::Performance => {
                ChartData::single(&["Q1", "Q2", "Q3", "Q4"], &[8.5, 12.3, 6.7, 15.2], ChartColor::Violet)
            }
            Self::Allocation => ChartData::single(
                &["Stocks", "Bonds", "Real Estate", "Commodities", "Cash"],
                &[60.0, 25.0, 8.0, 5.0, 2.0],
                ChartColor::Cyan,
            ),
        }
    }
}

/// Whether the user text asks for something a chart would illustrate.
#[must_use]
pub fn wants_chart(text: &str) -> bool {
    let lower = text.to_lowercase();
    CHART_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// A generated reply before it is stored as a message.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedReply {
    pub content: String,
    pub chart: Option<ChartData>,
}

/// Generate a reply for `user_text`.
pub fn generate(user_text: &str, rng: &mut impl Rng) -> GeneratedReply {
    let opener = CANNED_REPLIES[rng.random_range(0..CANNED_REPLIES.len())];
    if wants_chart(user_text) {
        GeneratedReply {
            content: format!("{opener}{CHART_SUFFIX}"),
            chart: Some(ChartTopic::detect(user_text).chart()),
        }
    } else {
        GeneratedReply { content: opener.to_owned(), chart: None }
    }
}
