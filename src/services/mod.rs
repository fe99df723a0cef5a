//! Domain services behind the mock RPC routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the in-memory tables so route handlers and the
//! in-process store adapter stay focused on protocol translation.

pub mod conversation;
pub mod dashboard;
pub mod reply;
pub mod seed;
