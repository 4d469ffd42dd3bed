//! Session aggregate: one user's ongoing advisory conversation.

mod aggregate;
mod turn;

pub use aggregate::Session;
pub use turn::{Turn, TurnRole};
