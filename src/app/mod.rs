//! Terminal front end: application state, event reader, and input handling.

pub mod event;
pub mod handler;
pub mod state;
