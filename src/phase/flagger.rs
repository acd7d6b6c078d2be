/*!
 * Ambiguity flagging.
 *
 * Ambiguous terms never influence boundary scoring; they are checked per
 * cue against the local context window and flagged when nothing nearby
 * resolves them.
 */

use log::debug;

use crate::phase::lexicon::{PhaseLexicon, TermMatches};
use crate::phase::{FlagReason, ReviewFlag};
use crate::subtitle_processor::SubtitleEntry;

// @struct: FlaggerConfig
#[derive(Debug, Clone, Copy)]
pub struct FlaggerConfig {
    /// Cues before and after a cue that count as its local context
    pub context_radius: usize,
}

impl Default for FlaggerConfig {
    fn default() -> Self {
        Self { context_radius: 2 }
    }
}

/// Flags cues whose ambiguous terms have no disambiguating context nearby
#[derive(Debug, Clone, Default)]
pub struct AmbiguityFlagger {
    config: FlaggerConfig,
}

impl AmbiguityFlagger {
    pub fn new(config: FlaggerConfig) -> Self {
        Self { config }
    }

    /// Produce AMBIGUOUS_TERM_NO_CONTEXT flags for a cue sequence.
    ///
    /// One flag per distinct ambiguous term per cue. A cue's own text
    /// counts as part of its context window, so an ambiguous term sharing
    /// a cue with a strong keyword is resolved silently.
    pub fn flag(&self, entries: &[SubtitleEntry], lexicon: &PhaseLexicon) -> Vec<ReviewFlag> {
        let matches: Vec<TermMatches> = entries.iter().map(|e| lexicon.scan(&e.text)).collect();

        let mut flags = Vec::new();
        for (i, m) in matches.iter().enumerate() {
            if m.ambiguous_terms.is_empty() {
                continue;
            }

            let lo = i.saturating_sub(self.config.context_radius);
            let hi = (i + self.config.context_radius + 1).min(matches.len());
            let resolved = matches[lo..hi].iter().any(TermMatches::has_strong_signal);
            if resolved {
                continue;
            }

            for term in &m.ambiguous_terms {
                flags.push(ReviewFlag {
                    cue_index: entries[i].seq_num,
                    timestamp: SubtitleEntry::format_timestamp(entries[i].start_time_ms),
                    matched_term: term.clone(),
                    reason: FlagReason::AmbiguousTermNoContext,
                    original_text: entries[i].text.clone(),
                });
            }
        }

        debug!(
            "Ambiguity flagger raised {} flags over {} cues",
            flags.len(),
            entries.len()
        );
        flags
    }
}
