/*!
 * Concurrent translation of a window plan.
 *
 * Windows are independent once the planner has fixed phase labels, so
 * they are driven through a bounded worker pool purely for throughput;
 * results are merged by cue id, never by completion order.
 */

use std::sync::Arc;
use futures::StreamExt;
use log::{error, info};
use tokio::sync::Semaphore;

use crate::errors::TranslationError;
use crate::glossary::Glossary;
use crate::providers::Provider;
use crate::translation::document::SubtitleDocument;
use crate::translation::planner::Window;
use crate::translation::service::{TranslationService, WindowTranslation};

/// Results of translating a full window plan
#[derive(Debug)]
pub struct BatchOutcome {
    /// Successful windows, ordered by window index
    pub successes: Vec<WindowTranslation>,

    /// Failed windows with their final error, ordered by window index
    pub failures: Vec<(usize, TranslationError)>,
}

// @struct: BatchTranslator
#[derive(Debug)]
pub struct BatchTranslator<P: Provider> {
    service: TranslationService<P>,
    concurrent_requests: usize,
}

impl<P: Provider> BatchTranslator<P> {
    pub fn new(service: TranslationService<P>, concurrent_requests: usize) -> Self {
        Self {
            service,
            concurrent_requests: concurrent_requests.max(1),
        }
    }

    pub fn service(&self) -> &TranslationService<P> {
        &self.service
    }

    /// Translate every window, at most `concurrent_requests` in flight.
    ///
    /// A failed window never aborts the batch; its error is collected so
    /// the other windows' results can still be kept.
    pub async fn translate_all(
        &self,
        document: &SubtitleDocument,
        windows: &[Window],
        glossary: &Glossary,
    ) -> BatchOutcome {
        let semaphore = Arc::new(Semaphore::new(self.concurrent_requests));

        let mut results: Vec<(usize, Result<WindowTranslation, TranslationError>)> =
            futures::stream::iter(windows.iter().enumerate().map(|(index, window)| {
                let semaphore = Arc::clone(&semaphore);
                async move {
                    // Semaphore errors only on close, which never happens here
                    let _permit = semaphore.acquire().await;
                    let result = self
                        .service
                        .translate_window(document, window, index, glossary)
                        .await;
                    (index, result)
                }
            }))
            .buffer_unordered(self.concurrent_requests)
            .collect()
            .await;

        results.sort_by_key(|(index, _)| *index);

        let mut successes = Vec::new();
        let mut failures = Vec::new();
        for (index, result) in results {
            match result {
                Ok(translation) => successes.push(translation),
                Err(e) => {
                    error!("Window {} failed: {}", index, e);
                    failures.push((index, e));
                }
            }
        }

        info!(
            "Translated {}/{} windows",
            successes.len(),
            windows.len()
        );
        BatchOutcome {
            successes,
            failures,
        }
    }
}
