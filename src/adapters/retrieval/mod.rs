//! Knowledge retrieval adapters.

mod embedded_index;
mod noop;

pub use embedded_index::{EmbeddedIndex, IndexError};
pub use noop::NoopRetriever;
