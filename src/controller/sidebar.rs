//! Sidebar gesture controller.
//!
//! DESIGN
//! ======
//! One horizontal offset in `[0, W]` plus a logical open flag. Drag updates
//! move the offset live once the gesture reads as a deliberate horizontal
//! swipe. A drag end decides between a snap back, a revert to the current
//! state, or a transition to the other state, and starts a settle animation.
//!
//! The open flag flips when a transition is issued, not when the animation
//! lands, so offset and flag disagree while a settle is in flight.

#[cfg(test)]
#[path = "sidebar_test.rs"]
mod sidebar_test;

use std::time::Duration;

use tracing::debug;

use super::animation::SettleAnimation;

/// Minimum horizontal travel before a drag counts as a swipe.
pub const SWIPE_MIN_DISTANCE: f64 = 30.0;
/// Horizontal travel must exceed vertical travel by this factor.
pub const SWIPE_AXIS_RATIO: f64 = 3.0;
/// Travel that commits a gesture without a fling.
pub const COMMIT_DISTANCE: f64 = 60.0;
/// Velocity (px/s) that commits a gesture regardless of travel.
pub const FLING_VELOCITY: f64 = 300.0;
pub const SNAP_BACK_DURATION: Duration = Duration::from_millis(200);
/// Duration of open/close requested by buttons rather than gestures.
pub const PROGRAMMATIC_DURATION: Duration = Duration::from_millis(300);

pub const DEFAULT_SIDEBAR_WIDTH: f64 = 300.0;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SidebarConfig {
    /// Fully-open width `W` in pixels.
    pub width: f64,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self { width: DEFAULT_SIDEBAR_WIDTH }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SidebarState {
    pub offset: f64,
    pub is_open: bool,
}

/// Cumulative translation since gesture start.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragUpdate {
    pub translation_x: f64,
    pub translation_y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragEnd {
    pub translation_x: f64,
    pub translation_y: f64,
    pub velocity_x: f64,
}

/// Why a settle was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleKind {
    /// Gesture was too small or not horizontal.
    SnapBack,
    /// Gesture committed but fell short of the threshold.
    Revert,
    /// Gesture flipped open/closed.
    Transition,
    /// Open/close requested directly.
    Programmatic,
}

/// Animate the offset to `target` over `duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettleCommand {
    pub target: f64,
    pub duration: Duration,
    pub open: bool,
    pub kind: SettleKind,
}

// =============================================================================
// GESTURE MATH
// =============================================================================

/// Whether a translation reads as an intentional horizontal swipe.
#[must_use]
pub fn is_horizontal_swipe(translation_x: f64, translation_y: f64) -> bool {
    let dx = translation_x.abs();
    dx > SWIPE_AXIS_RATIO * translation_y.abs() && dx > SWIPE_MIN_DISTANCE
}

/// Settle duration for a state change: `max(150, 400 - |v|/8)` ms.
#[must_use]
pub fn transition_duration(velocity_x: f64) -> Duration {
    millis((400.0 - velocity_x.abs() / 8.0).max(150.0))
}

/// Settle duration for falling back open: `max(100, 300 - |v|/10)` ms.
#[must_use]
pub fn revert_duration(velocity_x: f64) -> Duration {
    millis((300.0 - velocity_x.abs() / 10.0).max(100.0))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn millis(ms: f64) -> Duration {
    Duration::from_millis(ms.round() as u64)
}

// =============================================================================
// CONTROLLER
// =============================================================================

#[derive(Debug, Clone)]
pub struct SidebarGestureController {
    width: f64,
    state: SidebarState,
    animation: Option<SettleAnimation>,
}

impl SidebarGestureController {
    #[must_use]
    pub fn new(config: SidebarConfig) -> Self {
        Self { width: config.width, state: SidebarState { offset: 0.0, is_open: false }, animation: None }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn state(&self) -> SidebarState {
        self.state
    }

    #[must_use]
    pub fn offset(&self) -> f64 {
        self.state.offset
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Apply a live drag sample. Returns the new offset when it moved.
    ///
    /// A sample that moves the offset interrupts any settle in flight.
    pub fn drag_update(&mut self, update: DragUpdate) -> Option<f64> {
        let DragUpdate { translation_x: tx, translation_y: ty } = update;
        if !is_horizontal_swipe(tx, ty) {
            return None;
        }
        let offset = if self.state.is_open && tx < 0.0 {
            (self.width + tx).max(0.0)
        } else if !self.state.is_open && tx > 0.0 {
            tx.min(self.width)
        } else {
            return None;
        };
        self.animation = None;
        self.state.offset = offset;
        Some(offset)
    }

    /// Decide where the sidebar rests after a gesture and start settling.
    pub fn drag_end(&mut self, end: DragEnd) -> SettleCommand {
        let DragEnd { translation_x: tx, translation_y: ty, velocity_x: vx } = end;
        let committed = is_horizontal_swipe(tx, ty) && (tx.abs() > COMMIT_DISTANCE || vx.abs() > FLING_VELOCITY);

        let command = if !committed {
            self.rest_command(self.state.is_open, SNAP_BACK_DURATION, SettleKind::SnapBack)
        } else if self.state.is_open {
            if tx < -self.width / 3.0 || vx < -FLING_VELOCITY {
                self.rest_command(false, transition_duration(vx), SettleKind::Transition)
            } else {
                self.rest_command(true, revert_duration(vx), SettleKind::Revert)
            }
        } else if tx > self.width / 3.0 || vx > FLING_VELOCITY {
            self.rest_command(true, transition_duration(vx), SettleKind::Transition)
        } else {
            self.rest_command(false, SNAP_BACK_DURATION, SettleKind::Revert)
        };

        debug!(tx, vx, target = command.target, kind = ?command.kind, "sidebar drag end");
        self.settle(command);
        command
    }

    pub fn open(&mut self) -> SettleCommand {
        let command = self.rest_command(true, PROGRAMMATIC_DURATION, SettleKind::Programmatic);
        self.settle(command);
        command
    }

    pub fn close(&mut self) -> SettleCommand {
        let command = self.rest_command(false, PROGRAMMATIC_DURATION, SettleKind::Programmatic);
        self.settle(command);
        command
    }

    pub fn toggle(&mut self) -> SettleCommand {
        if self.state.is_open { self.close() } else { self.open() }
    }

    /// Advance the settle animation by `delta` and return the offset.
    pub fn tick(&mut self, delta: Duration) -> f64 {
        if let Some(animation) = self.animation.as_mut() {
            self.state.offset = animation.advance(delta).clamp(0.0, self.width);
            if animation.is_finished() {
                self.animation = None;
            }
        }
        self.state.offset
    }

    fn rest_command(&self, open: bool, duration: Duration, kind: SettleKind) -> SettleCommand {
        SettleCommand { target: if open { self.width } else { 0.0 }, duration, open, kind }
    }

    fn settle(&mut self, command: SettleCommand) {
        self.state.is_open = command.open;
        self.animation = Some(SettleAnimation::new(self.state.offset, command.target, command.duration));
    }
}
