//! Request and response types for the completion boundary.

use serde::{Deserialize, Serialize};

/// A completion request: one prompt plus sampling knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The fully rendered prompt.
    pub prompt: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl CompletionRequest {
    /// Create a request with default sampling (200 tokens, temperature 0.7).
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: 200,
            temperature: 0.7,
        }
    }

    /// Set the token budget.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// A completion response: the model's free-form text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub text: String,
}

impl CompletionResponse {
    /// Wrap response text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = CompletionRequest::new("hello");
        assert_eq!(request.prompt, "hello");
        assert_eq!(request.max_tokens, 200);
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_request_builders() {
        let request = CompletionRequest::new("hi")
            .with_max_tokens(50)
            .with_temperature(0.0);
        assert_eq!(request.max_tokens, 50);
        assert_eq!(request.temperature, 0.0);
    }
}
