/*!
 * Provider implementations for translation backends.
 *
 * - Anthropic: Anthropic messages API client
 * - Mock: scripted in-memory provider for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all LLM providers
///
/// Defines the interface that provider implementations must follow so the
/// translation service can drive any of them interchangeably.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Build a request carrying a system prompt and one user message
    fn build_request(&self, system: &str, user: &str) -> Self::Request;

    /// Complete a request using this provider
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Extract the generated text from a provider response
    fn extract_text(response: &Self::Response) -> String;
}

pub mod anthropic;
pub mod mock;

pub use anthropic::Anthropic;
pub use mock::{MockBehavior, MockProvider};
