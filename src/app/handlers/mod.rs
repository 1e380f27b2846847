//! Event handlers for the application
//!
//! Focused handler methods for completion and timer events, extracted from
//! the event loop for better organization and testability.

mod mailbox;
mod terminal;

// Handler methods are implemented directly on App
