//! Application layer: orchestration of the pure engine over the ports.

mod prompts;
mod service;

pub use prompts::{PromptError, PromptSet};
pub use service::{AdvisoryError, AdvisoryService};
