//! Domain layer: pure advisory logic with no I/O.

pub mod advisory;
pub mod checklist;
pub mod foundation;
pub mod session;
