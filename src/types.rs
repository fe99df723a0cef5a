//! Domain types shared by the mock backend, the store clients and the
//! controllers.
//!
//! DESIGN
//! ======
//! Everything here is plain data and serializes to the camelCase shape the
//! RPC layer speaks. Chart colors are a declarative descriptor
//! (`ChartColor`); the renderer resolves them to a concrete `rgba(...)`
//! string at draw time.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// =============================================================================
// CHARTS
// =============================================================================

/// Palette entry for a chart dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartColor {
    /// Green used for growth series.
    Growth,
    Indigo,
    Violet,
    Cyan,
    Emerald,
    Amber,
}

impl ChartColor {
    /// Colors a freshly added widget may be given.
    pub const WIDGET_PALETTE: [ChartColor; 5] =
        [ChartColor::Indigo, ChartColor::Violet, ChartColor::Cyan, ChartColor::Emerald, ChartColor::Amber];

    #[must_use]
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Growth => (34, 197, 94),
            Self::Indigo => (99, 102, 241),
            Self::Violet => (139, 92, 246),
            Self::Cyan => (6, 182, 212),
            Self::Emerald => (16, 185, 129),
            Self::Amber => (245, 158, 11),
        }
    }

    /// CSS-style color string at the given opacity (clamped to `[0, 1]`).
    #[must_use]
    pub fn rgba(self, opacity: f64) -> String {
        let (r, g, b) = self.rgb();
        format!("rgba({r}, {g}, {b}, {})", opacity.clamp(0.0, 1.0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataset {
    pub data: Vec<f64>,
    pub color: ChartColor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

impl ChartData {
    /// Single-series chart. Convenience for seed data and reply charts.
    #[must_use]
    pub fn single(labels: &[&str], data: &[f64], color: ChartColor) -> Self {
        Self {
            labels: labels.iter().map(|l| (*l).to_owned()).collect(),
            datasets: vec![ChartDataset { data: data.to_vec(), color }],
        }
    }
}

// =============================================================================
// CONVERSATIONS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub content: String,
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_data: Option<ChartData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Content of the most recent user message, if any.
    #[must_use]
    pub fn last_user_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}

// =============================================================================
// DASHBOARDS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    #[default]
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    pub data: ChartData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub id: String,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub widgets: Vec<Widget>,
}
