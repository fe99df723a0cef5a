//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor and is
//! also the in-process implementation of the store traits. It holds the mock
//! conversation and dashboard tables. Nothing is persisted: a restart returns
//! to the seed data.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::services::seed;
use crate::types::{Conversation, Dashboard};

// =============================================================================
// ID SEQUENCE
// =============================================================================

/// Monotonic string id source. Ids are never reused, even after deletes.
#[derive(Debug, Clone)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    /// Start after the largest numeric id in `existing`.
    #[must_use]
    pub fn after<'a>(existing: impl IntoIterator<Item = &'a str>) -> Self {
        let max = existing
            .into_iter()
            .filter_map(|id| id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self { next: max + 1 }
    }

    pub fn mint(&mut self) -> String {
        let id = self.next;
        self.next += 1;
        id.to_string()
    }
}

// =============================================================================
// CONVERSATION STATE
// =============================================================================

/// Mock conversation table. Insertion order is list order.
#[derive(Debug, Clone)]
pub struct ConversationState {
    pub conversations: Vec<Conversation>,
    pub ids: IdSequence,
}

impl ConversationState {
    #[must_use]
    pub fn new(conversations: Vec<Conversation>) -> Self {
        let ids = IdSequence::after(
            conversations
                .iter()
                .flat_map(|c| std::iter::once(c.id.as_str()).chain(c.messages.iter().map(|m| m.id.as_str()))),
        );
        Self { conversations, ids }
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| c.id == id)
    }
}

// =============================================================================
// DASHBOARD STATE
// =============================================================================

/// Mock dashboard table. Insertion order is list order.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub dashboards: Vec<Dashboard>,
    pub ids: IdSequence,
}

impl DashboardState {
    #[must_use]
    pub fn new(dashboards: Vec<Dashboard>) -> Self {
        let ids = IdSequence::after(
            dashboards
                .iter()
                .flat_map(|d| std::iter::once(d.id.as_str()).chain(d.widgets.iter().map(|w| w.id.as_str()))),
        );
        Self { dashboards, ids }
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Dashboard> {
        self.dashboards.iter().find(|d| d.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Dashboard> {
        self.dashboards.iter_mut().find(|d| d.id == id)
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub conversations: Arc<RwLock<ConversationState>>,
    pub dashboards: Arc<RwLock<DashboardState>>,
}

impl AppState {
    #[must_use]
    pub fn new(conversations: Vec<Conversation>, dashboards: Vec<Dashboard>) -> Self {
        Self {
            conversations: Arc::new(RwLock::new(ConversationState::new(conversations))),
            dashboards: Arc::new(RwLock::new(DashboardState::new(dashboards))),
        }
    }

    /// State populated with the canned mock data.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(seed::conversations(), seed::dashboards())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_sequence_starts_after_largest_numeric_id() {
        let mut ids = IdSequence::after(["1", "7", "abc", "3"]);
        assert_eq!(ids.mint(), "8");
        assert_eq!(ids.mint(), "9");
    }

    #[test]
    fn id_sequence_on_empty_starts_at_one() {
        let mut ids = IdSequence::after(std::iter::empty());
        assert_eq!(ids.mint(), "1");
    }

    #[test]
    fn seeded_ids_never_collide_with_seed_messages() {
        let state = ConversationState::new(seed::conversations());
        let mut ids = state.ids.clone();
        let fresh = ids.mint();
        let clash = state
            .conversations
            .iter()
            .any(|c| c.id == fresh || c.messages.iter().any(|m| m.id == fresh));
        assert!(!clash);
    }

    #[test]
    fn default_state_is_empty() {
        let state = AppState::default();
        assert!(state.conversations.try_read().unwrap().conversations.is_empty());
        assert!(state.dashboards.try_read().unwrap().dashboards.is_empty());
    }
}
