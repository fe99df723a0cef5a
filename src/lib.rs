//! finchat: financial assistant chat and dashboard core.
//!
//! The crate has two halves. `controller` holds the client-side interaction
//! logic (sidebar gestures, the thinking/reveal sequencer, chat and
//! dashboard sessions). `routes` + `services` serve the in-memory mock
//! backend those sessions talk to, either in-process through `AppState` or
//! over HTTP through `client::RpcClient`.

pub mod client;
pub mod config;
pub mod controller;
pub mod routes;
pub mod rpc;
pub mod services;
pub mod state;
pub mod store;
pub mod types;
