/*!
 * Phase boundary detection.
 *
 * Three passes, each a fallback for the previous: explicit transition
 * phrases, cumulative keyword score, whole-document keyword density.
 */

use log::{debug, info};

use crate::phase::lexicon::PhaseLexicon;
use crate::phase::{ConfidenceSource, FlagReason, PhaseBoundary, ReviewFlag};
use crate::subtitle_processor::SubtitleEntry;

// @struct: DetectorConfig
// Tuning knobs for boundary detection
#[derive(Debug, Clone, Copy)]
pub struct DetectorConfig {
    /// Cues the cumulative score must stay non-negative for after a crossing
    pub lookahead: usize,

    /// Paint-keyword density above which a boundary-less document is
    /// treated as all paint
    pub density_threshold: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            lookahead: 8,
            density_threshold: 0.3,
        }
    }
}

/// Locates the sketch-to-paint boundary in a cue sequence
#[derive(Debug, Clone, Default)]
pub struct PhaseBoundaryDetector {
    config: DetectorConfig,
}

impl PhaseBoundaryDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Detect the phase boundary for an ordered cue sequence.
    ///
    /// Returns the boundary and any PHASE_BOUNDARY_UNCERTAIN flags raised
    /// by a contradictory density-fallback outcome. Deterministic for
    /// identical input and lexicon.
    pub fn detect(
        &self,
        entries: &[SubtitleEntry],
        lexicon: &PhaseLexicon,
    ) -> (PhaseBoundary, Vec<ReviewFlag>) {
        let matches: Vec<_> = entries.iter().map(|e| lexicon.scan(&e.text)).collect();

        // Pass 1: explicit transition phrase, definitive
        for (i, m) in matches.iter().enumerate() {
            if let Some(phrase) = m.transitions.first() {
                let boundary = PhaseBoundary {
                    boundary_cue_index: Some(entries[i].seq_num),
                    confidence_source: ConfidenceSource::ExplicitTransition,
                };
                info!(
                    "Phase boundary at cue {} via transition phrase '{}'",
                    entries[i].seq_num, phrase
                );
                return (boundary, Vec::new());
            }
        }

        // Pass 2: cumulative keyword score crossing into a sustained
        // positive region
        if let Some(i) = self.find_score_crossing(&matches) {
            let boundary = PhaseBoundary {
                boundary_cue_index: Some(entries[i].seq_num),
                confidence_source: ConfidenceSource::KeywordScore,
            };
            info!(
                "Phase boundary at cue {} via cumulative keyword score",
                entries[i].seq_num
            );
            return (boundary, Vec::new());
        }

        // Pass 3: density fallback over the whole document
        let paint_cues = matches.iter().filter(|m| m.paint_count > 0).count();
        let density = paint_cues as f64 / entries.len().max(1) as f64;
        let is_paint = density > self.config.density_threshold;
        debug!(
            "Density fallback: {}/{} cues with paint terms ({:.2})",
            paint_cues,
            entries.len(),
            density
        );

        let boundary = PhaseBoundary {
            boundary_cue_index: if is_paint { Some(1) } else { None },
            confidence_source: ConfidenceSource::DensityFallback,
        };

        // A fallback verdict contradicted by opposite-phase keywords gets
        // one flag on the first contradicting cue
        let mut flags = Vec::new();
        let contradiction = entries.iter().zip(&matches).find_map(|(entry, m)| {
            if is_paint && m.sketch_count > 0 {
                Some((entry, lexicon.first_sketch_term(&entry.text)))
            } else if !is_paint && m.paint_count > 0 {
                Some((entry, lexicon.first_paint_term(&entry.text)))
            } else {
                None
            }
        });
        if let Some((entry, term)) = contradiction {
            flags.push(ReviewFlag {
                cue_index: entry.seq_num,
                timestamp: SubtitleEntry::format_timestamp(entry.start_time_ms),
                matched_term: term.unwrap_or_default(),
                reason: FlagReason::PhaseBoundaryUncertain,
                original_text: entry.text.clone(),
            });
        }

        (boundary, flags)
    }

    /// First index where the cumulative score goes from non-positive to
    /// positive and stays non-negative for the lookahead window.
    fn find_score_crossing(&self, matches: &[crate::phase::lexicon::TermMatches]) -> Option<usize> {
        let scores: Vec<i64> = matches
            .iter()
            .map(|m| m.paint_count as i64 - m.sketch_count as i64)
            .collect();

        let mut cumulative: Vec<i64> = Vec::with_capacity(scores.len());
        let mut running = 0;
        for s in &scores {
            running += s;
            cumulative.push(running);
        }

        for i in 0..cumulative.len() {
            let before = if i == 0 { 0 } else { cumulative[i - 1] };
            if before <= 0 && cumulative[i] > 0 {
                let end = (i + 1 + self.config.lookahead).min(cumulative.len());
                if cumulative[i + 1..end].iter().all(|&c| c >= 0) {
                    return Some(i);
                }
            }
        }

        None
    }
}
