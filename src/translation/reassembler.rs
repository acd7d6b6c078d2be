/*!
 * Reassembly of window results onto the document.
 *
 * Only core-range translations are kept; overlap-region output from a
 * window is discarded in favor of the neighboring window's core
 * assignment. Timing and identifiers are never touched.
 */

use log::{debug, warn};

use crate::translation::document::SubtitleDocument;
use crate::translation::service::WindowTranslation;

/// Outcome of merging window results onto a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReassemblyReport {
    /// Cues that received a translation
    pub translated_cues: usize,

    /// Indices of windows whose results were missing
    pub failed_windows: Vec<usize>,
}

/// Merges translated windows back into the document by cue id
#[derive(Debug, Clone, Default)]
pub struct Reassembler;

impl Reassembler {
    /// Write each successful window's core translations onto the
    /// document. A cue's `translated_text`, once set, is never
    /// overwritten; cues of failed windows keep their original text.
    pub fn merge(
        document: &mut SubtitleDocument,
        window_count: usize,
        results: &[WindowTranslation],
    ) -> ReassemblyReport {
        let mut translated_cues = 0;

        for result in results {
            for (cue_id, text) in &result.translations {
                let Some(entry) = document.entries.iter_mut().find(|e| e.id == *cue_id) else {
                    warn!(
                        "Window {} returned unknown cue id {}",
                        result.window_index, cue_id
                    );
                    continue;
                };
                if entry.translated_text.is_none() {
                    entry.translated_text = Some(text.clone());
                    translated_cues += 1;
                }
            }
        }

        let succeeded: Vec<usize> = results.iter().map(|r| r.window_index).collect();
        let failed_windows: Vec<usize> = (0..window_count)
            .filter(|i| !succeeded.contains(i))
            .collect();

        if !failed_windows.is_empty() {
            warn!(
                "{} of {} windows failed; their cues keep the original text",
                failed_windows.len(),
                window_count
            );
        }
        debug!("Reassembled {} translated cues", translated_cues);

        ReassemblyReport {
            translated_cues,
            failed_windows,
        }
    }
}
