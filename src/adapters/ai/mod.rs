//! AI provider adapters.

mod mock;
mod openai;

pub use mock::{MockAiProvider, MockResponse};
pub use openai::{OpenAiClient, OpenAiConfig};
