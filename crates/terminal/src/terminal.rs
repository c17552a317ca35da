//! Terminal session management.
//!
//! PTY-backed shell sessions and the dispatch contract used to hand stored
//! command text to them. This crate contains no rendering; session output
//! is pumped straight to the host stdout.

mod session;

pub use session::{default_shell, payload, CommandSink, TerminalSession};
