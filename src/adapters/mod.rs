//! Adapters: concrete implementations of the ports.

pub mod ai;
pub mod checklist;
pub mod http;
pub mod persistence;
pub mod retrieval;
