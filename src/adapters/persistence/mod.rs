//! Session persistence adapters.

mod memory;
mod postgres;

pub use memory::InMemorySessionStore;
pub use postgres::PostgresSessionStore;
