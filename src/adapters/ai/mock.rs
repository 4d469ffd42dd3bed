//! Mock AI provider for testing.
//!
//! Returns pre-configured responses in order, records every request for
//! verification, and can inject errors to exercise failure handling.
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAiProvider::new()
//!     .with_response(r#"{"pillars": {...}}"#);
//!
//! let response = provider.complete(request).await?;
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{AiError, AiProvider, CompletionRequest, CompletionResponse, TokenUsage};

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a successful completion with this content.
    Success(String),
    /// Return an upstream failure.
    Unavailable(String),
    /// Return a timeout.
    Timeout,
}

/// Mock AI provider for tests.
#[derive(Debug, Clone, Default)]
pub struct MockAiProvider {
    /// Pre-configured responses, consumed in order.
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Requests seen, for verification.
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockAiProvider {
    /// Creates a new mock provider with no queued responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockResponse::Success(content.into()));
        self
    }

    /// Queues an error response.
    pub fn with_error(self, response: MockResponse) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// Requests received so far.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AiError> {
        self.calls.lock().unwrap().push(request);

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(MockResponse::Success(content)) => Ok(CompletionResponse {
                content,
                model: "mock-model".to_string(),
                usage: TokenUsage::new(10, 20),
            }),
            Some(MockResponse::Unavailable(message)) => Err(AiError::unavailable(message)),
            Some(MockResponse::Timeout) => Err(AiError::Timeout { timeout_secs: 30 }),
            None => Err(AiError::unavailable("mock provider has no queued response")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MessageRole;

    #[tokio::test]
    async fn returns_queued_responses_in_order() {
        let provider = MockAiProvider::new()
            .with_response("first")
            .with_response("second");

        let a = provider.complete(CompletionRequest::new()).await.unwrap();
        let b = provider.complete(CompletionRequest::new()).await.unwrap();
        assert_eq!(a.content, "first");
        assert_eq!(b.content, "second");
    }

    #[tokio::test]
    async fn injects_errors() {
        let provider =
            MockAiProvider::new().with_error(MockResponse::Unavailable("down".to_string()));
        let result = provider.complete(CompletionRequest::new()).await;
        assert!(matches!(result, Err(AiError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn records_requests_for_verification() {
        let provider = MockAiProvider::new().with_response("ok");
        let request = CompletionRequest::new().with_message(MessageRole::User, "hello");
        provider.complete(request).await.unwrap();

        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.calls()[0].messages[0].content, "hello");
    }

    #[tokio::test]
    async fn empty_queue_reports_unavailable() {
        let provider = MockAiProvider::new();
        let result = provider.complete(CompletionRequest::new()).await;
        assert!(matches!(result, Err(AiError::Unavailable { .. })));
    }
}
