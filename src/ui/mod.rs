//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer takes the *core* engine state and turns it into cells on the
//! terminal.  No engine state is mutated here.

pub mod layout;
pub mod page;
pub mod rail;
pub mod theme;
