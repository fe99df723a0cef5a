//! Thinking/reveal sequencer: one chat turn from submission to cleanup.
//!
//! ARCHITECTURE
//! ============
//! Each turn runs as its own spawned task. The task walks the turn through
//! `Pending → Thinking → Revealing → Done`, sleeping between phases and
//! emitting [`RevealEvent`]s on an unbounded channel. The rendering side
//! folds those events into its view; it never calls back into the task.
//!
//! DESIGN
//! ======
//! - Every sleep and the reply request race a cancel signal. A cancelled
//!   turn stops where it is and emits nothing further.
//! - Dropping the [`TurnHandle`] cancels the turn.
//! - A failed reply request ends the turn with a single error completion.
//!   No reveal happens and nothing is retried.
//! - Reveal grows the text one `char` at a time, so multi-byte replies
//!   never split a code point.

#[cfg(test)]
#[path = "reveal_test.rs"]
mod reveal_test;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::store::{MessageStore, StoreError};
use crate::types::{Conversation, Message};

// =============================================================================
// TIMINGS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTimings {
    /// Submission acknowledged → placeholder visible.
    pub thinking_delay: Duration,
    /// Placeholder visible → reply requested.
    pub reply_delay: Duration,
    /// One character per tick.
    pub tick: Duration,
    /// Fully revealed → refresh.
    pub settle_delay: Duration,
    /// Refresh → turn completed.
    pub cleanup_delay: Duration,
}

impl Default for RevealTimings {
    fn default() -> Self {
        Self {
            thinking_delay: Duration::from_millis(800),
            reply_delay: Duration::from_millis(1500),
            tick: Duration::from_millis(30),
            settle_delay: Duration::from_millis(500),
            cleanup_delay: Duration::from_millis(100),
        }
    }
}

// =============================================================================
// TURN
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TurnPhase {
    Pending,
    Thinking,
    Revealing,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("turn cannot move from {from:?} to {to:?}")]
    Backward { from: TurnPhase, to: TurnPhase },
    #[error("reply arrived while turn was {0:?}")]
    UnexpectedReply(TurnPhase),
}

/// Bookkeeping for one turn. Pure state, no timers.
#[derive(Debug, Clone)]
pub struct ThinkingTurn {
    id: Uuid,
    conversation_id: String,
    user_text: String,
    phase: TurnPhase,
    full_text: Option<String>,
    revealed: String,
    ticks: usize,
}

impl ThinkingTurn {
    #[must_use]
    pub fn new(conversation_id: impl Into<String>, user_text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            conversation_id: conversation_id.into(),
            user_text: user_text.into(),
            phase: TurnPhase::Pending,
            full_text: None,
            revealed: String::new(),
            ticks: 0,
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    #[must_use]
    pub fn user_text(&self) -> &str {
        &self.user_text
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    #[must_use]
    pub fn full_text(&self) -> Option<&str> {
        self.full_text.as_deref()
    }

    #[must_use]
    pub fn revealed_text(&self) -> &str {
        &self.revealed
    }

    /// Move to a later phase. Phases may be skipped but never revisited.
    ///
    /// # Errors
    ///
    /// Returns [`TurnError::Backward`] when `phase` is not after the current one.
    pub fn advance_to(&mut self, phase: TurnPhase) -> Result<(), TurnError> {
        if phase <= self.phase {
            return Err(TurnError::Backward { from: self.phase, to: phase });
        }
        self.phase = phase;
        Ok(())
    }

    /// Record the reply and start revealing.
    ///
    /// # Errors
    ///
    /// Returns [`TurnError::UnexpectedReply`] unless the turn is thinking.
    pub fn set_reply(&mut self, text: impl Into<String>) -> Result<(), TurnError> {
        if self.phase != TurnPhase::Thinking {
            return Err(TurnError::UnexpectedReply(self.phase));
        }
        self.full_text = Some(text.into());
        self.phase = TurnPhase::Revealing;
        Ok(())
    }

    /// Extend the revealed prefix by one character and return it.
    ///
    /// Returns `None` once the whole reply has been emitted. An empty reply
    /// yields one empty prefix.
    pub fn reveal_next(&mut self) -> Option<&str> {
        let full = self.full_text.as_deref()?;
        if self.revealed.len() == full.len() && self.ticks > 0 {
            return None;
        }
        if let Some(ch) = full[self.revealed.len()..].chars().next() {
            self.revealed.push(ch);
        }
        self.ticks += 1;
        Some(&self.revealed)
    }

    #[must_use]
    pub fn is_fully_revealed(&self) -> bool {
        self.full_text
            .as_deref()
            .is_some_and(|full| full.len() == self.revealed.len())
    }
}

// =============================================================================
// EVENTS
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Reply fully revealed; the stored assistant message.
    Revealed(Message),
    /// Reply request failed.
    Failed(StoreError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RevealEvent {
    PlaceholderShown { turn_id: Uuid },
    ReplyRequested { turn_id: Uuid },
    TextRevealed { turn_id: Uuid, prefix: String },
    /// Fresh copy of the conversation after the reply landed.
    ConversationRefreshed { turn_id: Uuid, conversation: Conversation },
    TurnCompleted { turn_id: Uuid, outcome: TurnOutcome },
}

impl RevealEvent {
    #[must_use]
    pub fn turn_id(&self) -> Uuid {
        match self {
            Self::PlaceholderShown { turn_id }
            | Self::ReplyRequested { turn_id }
            | Self::TextRevealed { turn_id, .. }
            | Self::ConversationRefreshed { turn_id, .. }
            | Self::TurnCompleted { turn_id, .. } => *turn_id,
        }
    }
}

// =============================================================================
// SEQUENCER
// =============================================================================

/// Control handle for a running turn.
pub struct TurnHandle {
    id: Uuid,
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl TurnHandle {
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Stop the turn. Events already queued stay in the channel; receivers
    /// drop them by turn id.
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the turn task to exit.
    pub async fn join(self) {
        let Self { cancel, task, .. } = self;
        if let Err(e) = task.await {
            warn!(error = %e, "reveal task aborted");
        }
        drop(cancel);
    }
}

#[derive(Clone)]
pub struct RevealSequencer {
    store: Arc<dyn MessageStore>,
    timings: RevealTimings,
    events: mpsc::UnboundedSender<RevealEvent>,
}

impl RevealSequencer {
    #[must_use]
    pub fn new(
        store: Arc<dyn MessageStore>,
        timings: RevealTimings,
        events: mpsc::UnboundedSender<RevealEvent>,
    ) -> Self {
        Self { store, timings, events }
    }

    #[must_use]
    pub fn timings(&self) -> RevealTimings {
        self.timings
    }

    /// Start a turn for a user message the store has already accepted.
    #[must_use = "dropping the handle cancels the turn"]
    pub fn start(&self, conversation_id: &str, user_text: &str) -> TurnHandle {
        let turn = ThinkingTurn::new(conversation_id, user_text);
        let id = turn.id();
        let (cancel, cancelled) = watch::channel(false);
        let run = TurnRun { turn, cancelled, sequencer: self.clone() };
        let task = tokio::spawn(run.run());
        info!(turn_id = %id, %conversation_id, "turn started");
        TurnHandle { id, cancel, task }
    }
}

/// Signals a cancelled turn or a closed event channel.
struct Stopped;

struct TurnRun {
    turn: ThinkingTurn,
    cancelled: watch::Receiver<bool>,
    sequencer: RevealSequencer,
}

impl TurnRun {
    async fn run(mut self) {
        let id = self.turn.id();
        if self.drive().await.is_err() {
            info!(turn_id = %id, phase = ?self.turn.phase(), "turn stopped");
        }
    }

    async fn drive(&mut self) -> Result<(), Stopped> {
        let timings = self.sequencer.timings;
        let turn_id = self.turn.id();

        self.pause(timings.thinking_delay).await?;
        self.advance(TurnPhase::Thinking);
        self.emit(RevealEvent::PlaceholderShown { turn_id })?;

        self.pause(timings.reply_delay).await?;
        self.emit(RevealEvent::ReplyRequested { turn_id })?;
        let reply = {
            let store = Arc::clone(&self.sequencer.store);
            let conversation_id = self.turn.conversation_id().to_owned();
            let user_text = self.turn.user_text().to_owned();
            self.race(async move { store.request_reply(&conversation_id, &user_text).await })
                .await?
        };

        let message = match reply {
            Ok(message) => message,
            Err(err) => {
                warn!(%turn_id, error = %err, "reply request failed");
                self.advance(TurnPhase::Done);
                return self.emit(RevealEvent::TurnCompleted { turn_id, outcome: TurnOutcome::Failed(err) });
            }
        };

        if let Err(e) = self.turn.set_reply(message.content.clone()) {
            warn!(%turn_id, error = %e, "reply rejected by turn");
        }
        while let Some(prefix) = self.turn.reveal_next().map(str::to_owned) {
            self.pause(timings.tick).await?;
            self.emit(RevealEvent::TextRevealed { turn_id, prefix })?;
        }

        self.pause(timings.settle_delay).await?;
        let refreshed = {
            let store = Arc::clone(&self.sequencer.store);
            let conversation_id = self.turn.conversation_id().to_owned();
            self.race(async move { store.get_conversation(&conversation_id).await })
                .await?
        };
        match refreshed {
            Ok(conversation) => self.emit(RevealEvent::ConversationRefreshed { turn_id, conversation })?,
            Err(err) => warn!(%turn_id, error = %err, "conversation refresh failed"),
        }

        self.pause(timings.cleanup_delay).await?;
        self.advance(TurnPhase::Done);
        info!(%turn_id, chars = self.turn.revealed_text().chars().count(), "turn completed");
        self.emit(RevealEvent::TurnCompleted { turn_id, outcome: TurnOutcome::Revealed(message) })
    }

    fn advance(&mut self, phase: TurnPhase) {
        if let Err(e) = self.turn.advance_to(phase) {
            warn!(turn_id = %self.turn.id(), error = %e, "phase transition skipped");
        }
    }

    fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }

    fn emit(&self, event: RevealEvent) -> Result<(), Stopped> {
        if self.is_cancelled() {
            return Err(Stopped);
        }
        self.sequencer.events.send(event).map_err(|_| Stopped)
    }

    async fn pause(&mut self, duration: Duration) -> Result<(), Stopped> {
        self.race(tokio::time::sleep(duration)).await
    }

    /// Run `fut` unless the turn is cancelled first.
    async fn race<F: Future>(&mut self, fut: F) -> Result<F::Output, Stopped> {
        if self.is_cancelled() {
            return Err(Stopped);
        }
        tokio::select! {
            biased;
            // Err means the handle was dropped; both cases stop the turn.
            _ = self.cancelled.changed() => Err(Stopped),
            out = fut => Ok(out),
        }
    }
}
