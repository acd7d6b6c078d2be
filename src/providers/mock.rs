/*!
 * Scripted in-memory provider for tests.
 *
 * Parses the `[N]` markers out of the user prompt and produces a valid
 * JSON response for exactly those cues, so the full pipeline can run
 * without a network. Behaviors model the provider failure modes the
 * service must survive.
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Scripted behaviors for the mock provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// Every call succeeds with a well-formed response
    Working,

    /// Every call fails with a retryable connection error
    Failing,

    /// Every `fail_every`-th call fails (1-based), others succeed
    Intermittent { fail_every: usize },

    /// Responses drop the last requested line
    CountMismatch,

    /// Responses are not valid JSON
    Malformed,

    /// Responses succeed after a delay
    Slow { delay_ms: u64 },
}

/// A request captured by the mock
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub system: String,
    pub user: String,
}

/// Mock provider with a scripted behavior and a shared call counter
#[derive(Debug, Clone)]
pub struct MockProvider {
    behavior: MockBehavior,
    calls: Arc<AtomicUsize>,
}

impl MockProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Total calls made to `complete` across clones
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Cue indices the prompt asks to translate, in prompt order.
    ///
    /// Context lines precede the "Translate these lines:" marker and are
    /// ignored; without the marker every `[N]` line counts.
    fn requested_indices(user: &str) -> Vec<usize> {
        let body = match user.find("Translate these lines:") {
            Some(pos) => &user[pos..],
            None => user,
        };
        body.lines()
            .filter_map(|line| {
                let line = line.trim();
                let rest = line.strip_prefix('[')?;
                let close = rest.find(']')?;
                rest[..close].parse::<usize>().ok()
            })
            .collect()
    }

    /// Build a well-formed JSON response echoing the requested indices
    fn respond(indices: &[usize]) -> String {
        let lines: Vec<String> = indices
            .iter()
            .map(|i| format!("{{\"index\": {}, \"text\": \"translated {}\"}}", i, i))
            .collect();
        format!("[{}]", lines.join(", "))
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = MockRequest;
    type Response = String;

    fn build_request(&self, system: &str, user: &str) -> MockRequest {
        MockRequest {
            system: system.to_string(),
            user: user.to_string(),
        }
    }

    async fn complete(&self, request: MockRequest) -> Result<String, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let mut indices = Self::requested_indices(&request.user);

        match self.behavior {
            MockBehavior::Working => Ok(Self::respond(&indices)),
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "mock connection refused".to_string(),
            )),
            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && call % fail_every == 0 {
                    Err(ProviderError::ConnectionError(format!(
                        "mock transient failure on call {}",
                        call
                    )))
                } else {
                    Ok(Self::respond(&indices))
                }
            }
            MockBehavior::CountMismatch => {
                indices.pop();
                Ok(Self::respond(&indices))
            }
            MockBehavior::Malformed => Ok("this is not json".to_string()),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
                Ok(Self::respond(&indices))
            }
        }
    }

    fn extract_text(response: &String) -> String {
        response.clone()
    }
}
