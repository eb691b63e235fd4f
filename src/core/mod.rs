//! # Core Widget Logic
//!
//! This module contains the chat widget's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Widget (state)       │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No UI. No sockets.     │
//!                    └───────────┬─────────────┘
//!                                │
//!                 ┌──────────────┴──────────────┐
//!                 ▼                             ▼
//!          ┌────────────┐                ┌────────────┐
//!          │    TUI     │                │ Transport  │
//!          │  Adapter   │                │ (reqwest)  │
//!          │ (ratatui)  │                │            │
//!          └────────────┘                └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `Widget` struct, one per widget instance
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`conversation`]: The append-only turn log sent as history
//! - [`transcript`]: What the panel displays
//! - [`exchange`]: Bridges a transport's chunks into actions
//! - [`config`]: Settings and their override hierarchy

pub mod action;
pub mod config;
pub mod conversation;
pub mod exchange;
pub mod state;
pub mod transcript;
