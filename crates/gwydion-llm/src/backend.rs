//! The backend trait and a deterministic mock implementation.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{LlmError, Result};
use crate::types::{CompletionRequest, CompletionResponse};

/// Trait for language-model providers.
///
/// The controller blocks on each `complete` round-trip; this is the only
/// suspension point in a decision.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Execute a completion request and return the full response.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Check if the backend is available and properly configured.
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

/// A backend that can be shared across tasks.
pub type SharedBackend = Arc<dyn LlmBackend>;

// ─────────────────────────────────────────────────────────────────────────────
// Mock Backend
// ─────────────────────────────────────────────────────────────────────────────

/// A mock backend for testing purposes.
///
/// Returns pre-configured responses in order and records every request,
/// which makes controller loop tests fully deterministic. Requesting more
/// completions than responses queued is an error.
#[derive(Debug)]
pub struct MockBackend {
    name: String,
    responses: Mutex<Vec<CompletionResponse>>,
    request_log: Mutex<Vec<CompletionRequest>>,
}

impl MockBackend {
    /// Create a mock with the given responses, returned in order.
    pub fn new(responses: Vec<CompletionResponse>) -> Self {
        Self {
            name: "mock".to_string(),
            responses: Mutex::new(responses),
            request_log: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that answers every prompt with queued text snippets.
    pub fn with_texts(texts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::new(
            texts
                .into_iter()
                .map(|t| CompletionResponse::new(t))
                .collect(),
        )
    }

    /// Create a mock with a single text response.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::with_texts([text.into()])
    }

    /// All requests made to this backend so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.request_log.lock().unwrap().clone()
    }

    /// Number of requests made.
    pub fn request_count(&self) -> usize {
        self.request_log.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmBackend for MockBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.request_log.lock().unwrap().push(request);

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(LlmError::Backend(
                "MockBackend: no more responses available".to_string(),
            ));
        }
        Ok(responses.remove(0))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_backend_single_response() {
        let backend = MockBackend::with_text("Hello!");

        let response = backend
            .complete(CompletionRequest::new("Hi"))
            .await
            .unwrap();

        assert_eq!(response.text, "Hello!");
        assert_eq!(backend.request_count(), 1);
        assert_eq!(backend.requests()[0].prompt, "Hi");
    }

    #[tokio::test]
    async fn test_mock_backend_responses_in_order() {
        let backend = MockBackend::with_texts(["First", "Second"]);

        let r1 = backend.complete(CompletionRequest::new("1")).await.unwrap();
        let r2 = backend.complete(CompletionRequest::new("2")).await.unwrap();

        assert_eq!(r1.text, "First");
        assert_eq!(r2.text, "Second");
        assert_eq!(backend.request_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_backend_exhausted() {
        let backend = MockBackend::new(vec![]);
        let result = backend.complete(CompletionRequest::new("Hi")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_mock_backend_health_check() {
        let backend = MockBackend::with_text("ok");
        assert!(backend.health_check().await.is_ok());
        assert_eq!(backend.name(), "mock");
    }
}
