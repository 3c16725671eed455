//! Core engine – narrative model, scroll progress, galleries, guided tour.
//!
//! Nothing in this module depends on any TUI, HTTP or rendering crate.
//! All state is plain data owned by a single [`engine::JourneyEngine`].

pub mod active_index;
pub mod arbiter;
pub mod autoscroll;
pub mod engine;
pub mod gallery;
pub mod narrative;
pub mod progress;
pub mod viewport;
