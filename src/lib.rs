//! Stack Sherpa - Advisory Dialogue Engine
//!
//! This crate interviews a user across a pillar-grouped checklist of
//! architecture questions and produces a knowledge-grounded technology
//! stack recommendation through conversational AI guidance.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
