//! Mock AI Provider for testing.
//!
//! Configurable mock implementation of the AIProvider port, allowing tests
//! to run without calling the real API.
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new().with_response("✔ Puntajes revisados");
//! let response = provider.complete(request).await?;
//! assert_eq!(response.content, "✔ Puntajes revisados");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a successful completion.
    Success(String),
    /// Return an error.
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

/// Mock AI provider for testing.
///
/// Returns queued responses in order; when the queue is empty, a generic
/// success. Records every request for verification.
#[derive(Debug, Clone, Default)]
pub struct MockAIProvider {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockAIProvider {
    /// Creates a new mock provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.responses
            .lock()
            .expect("mock lock poisoned")
            .push_back(MockResponse::Success(content.into()));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: MockError) -> Self {
        self.responses
            .lock()
            .expect("mock lock poisoned")
            .push_back(MockResponse::Error(error));
        self
    }

    /// Number of completed calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("mock lock poisoned").len()
    }

    /// Recorded requests, in call order.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().expect("mock lock poisoned").clone()
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        self.calls
            .lock()
            .expect("mock lock poisoned")
            .push(request);

        let next = self
            .responses
            .lock()
            .expect("mock lock poisoned")
            .pop_front();

        match next {
            Some(MockResponse::Success(content)) => Ok(CompletionResponse {
                content,
                model: "mock-model".to_string(),
            }),
            Some(MockResponse::Error(err)) => Err(err.into()),
            None => Ok(CompletionResponse {
                content: "mock response".to_string(),
                model: "mock-model".to_string(),
            }),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", "mock-model")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MessageRole;

    #[tokio::test]
    async fn responses_are_consumed_in_order() {
        let provider = MockAIProvider::new()
            .with_response("first")
            .with_error(MockError::RateLimited { retry_after_secs: 5 });

        let req = CompletionRequest::new().with_message(MessageRole::User, "hola");
        let first = provider.complete(req.clone()).await.unwrap();
        assert_eq!(first.content, "first");

        let err = provider.complete(req).await.unwrap_err();
        assert!(matches!(err, AIError::RateLimited { .. }));
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn empty_queue_returns_generic_success() {
        let provider = MockAIProvider::new();
        let req = CompletionRequest::new().with_message(MessageRole::User, "hola");
        let response = provider.complete(req).await.unwrap();
        assert_eq!(response.content, "mock response");
    }
}
