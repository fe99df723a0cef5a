//! Interaction controllers layered under the rendering surface.
//!
//! ARCHITECTURE
//! ============
//! - `sidebar`: drag gestures → sidebar offset and settle commands.
//! - `reveal`: one chat turn → placeholder, reply request, typewriter reveal.
//! - `chat` / `dashboard`: screen sessions wiring the controllers to stores.
//! - `ui`: the shared UI state container and its actions.
//!
//! Nothing here renders. Callers feed input in and draw what comes out.

pub mod animation;
pub mod chat;
pub mod dashboard;
pub mod reveal;
pub mod sidebar;
pub mod ui;
