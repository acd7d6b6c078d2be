/*!
 * Per-window translation with retry.
 */

use std::collections::HashMap;
use std::time::Duration;
use log::{debug, warn};

use crate::errors::{ProviderError, TranslationError};
use crate::glossary::Glossary;
use crate::providers::Provider;
use crate::translation::document::{DocumentEntry, SubtitleDocument};
use crate::translation::planner::Window;
use crate::translation::prompts::{PromptBuilder, TranslatedLine, strip_code_fences};

/// Retry policy for transient provider failures
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure
    pub retry_count: usize,

    /// Initial backoff, doubled per attempt
    pub retry_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_count: 3,
            retry_backoff_ms: 1000,
        }
    }
}

/// Translated texts for one window's core cues
#[derive(Debug, Clone)]
pub struct WindowTranslation {
    /// Position of the window in the plan
    pub window_index: usize,

    /// (cue id, translated text) for each core cue, in cue order
    pub translations: Vec<(usize, String)>,
}

// @struct: TranslationService
// Drives one provider call per window, retrying transient failures
#[derive(Debug)]
pub struct TranslationService<P: Provider> {
    provider: P,
    retry: RetryPolicy,
}

impl<P: Provider> TranslationService<P> {
    pub fn new(provider: P, retry: RetryPolicy) -> Self {
        Self { provider, retry }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Translate one window's core cues.
    ///
    /// Transient provider errors are retried with exponential backoff;
    /// a response that cannot be mapped one-to-one onto the requested
    /// cues fails the window without retrying.
    pub async fn translate_window(
        &self,
        document: &SubtitleDocument,
        window: &Window,
        window_index: usize,
        glossary: &Glossary,
    ) -> Result<WindowTranslation, TranslationError> {
        let context: Vec<&DocumentEntry> = document.entries[window.range.start..window.core.start]
            .iter()
            .collect();
        let core: Vec<&DocumentEntry> = document.entries[window.core.clone()].iter().collect();

        let full: Vec<&DocumentEntry> = document.entries[window.range.clone()].iter().collect();
        let glossary_block = PromptBuilder::glossary_block(glossary, &full);
        let system = PromptBuilder::system_prompt(window.phase, &glossary_block);
        let user = PromptBuilder::user_prompt(&context, &core);

        let text = self.complete_with_retry(&system, &user, window_index).await?;
        Self::map_response(&text, &core, window_index)
    }

    /// Issue the provider call, retrying retryable errors up to the
    /// configured attempt count
    async fn complete_with_retry(
        &self,
        system: &str,
        user: &str,
        window_index: usize,
    ) -> Result<String, TranslationError> {
        let mut backoff = self.retry.retry_backoff_ms;
        let mut attempt = 0;

        loop {
            let request = self.provider.build_request(system, user);
            match self.provider.complete(request).await {
                Ok(response) => return Ok(P::extract_text(&response)),
                Err(e) if e.is_retryable() && attempt < self.retry.retry_count => {
                    attempt += 1;
                    warn!(
                        "Window {} attempt {} failed ({}), retrying in {}ms",
                        window_index, attempt, e, backoff
                    );
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                    backoff = backoff.saturating_mul(2);
                }
                Err(e) => return Err(TranslationError::Provider(e)),
            }
        }
    }

    /// Parse the response and map translated lines back onto core cues
    /// one-to-one
    fn map_response(
        text: &str,
        core: &[&DocumentEntry],
        window_index: usize,
    ) -> Result<WindowTranslation, TranslationError> {
        let payload = strip_code_fences(text);
        let lines: Vec<TranslatedLine> = serde_json::from_str(payload).map_err(|e| {
            TranslationError::Provider(ProviderError::ParseError(format!(
                "Window {} response is not a valid JSON array: {}",
                window_index, e
            )))
        })?;

        if lines.len() != core.len() {
            return Err(TranslationError::CountMismatch {
                window: window_index,
                expected: core.len(),
                actual: lines.len(),
            });
        }

        let mut by_index: HashMap<usize, String> = HashMap::with_capacity(lines.len());
        for line in lines {
            if by_index.insert(line.index, line.text).is_some() {
                return Err(TranslationError::UnknownIndex {
                    window: window_index,
                    index: line.index,
                });
            }
        }

        let mut translations = Vec::with_capacity(core.len());
        for entry in core {
            if let Some(text) = by_index.remove(&entry.id) {
                translations.push((entry.id, text));
            }
        }
        // Any index left over names a cue outside this window
        if let Some((&index, _)) = by_index.iter().next() {
            return Err(TranslationError::UnknownIndex {
                window: window_index,
                index,
            });
        }

        debug!(
            "Window {} translated {} cues",
            window_index,
            translations.len()
        );
        Ok(WindowTranslation {
            window_index,
            translations,
        })
    }
}
