//! # Connector Layer
//!
//! External integrations implementing the application ports:
//! - Answer generation (Gemini over HTTP, mock for offline use)
//! - Suggestions (static corpus)
//! - Command wiring and the terminal front-end

pub mod adapter;
pub mod api;
pub mod tui;

pub use adapter::*;
pub use api::*;
