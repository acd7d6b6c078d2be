/*!
 * Window planning.
 *
 * Cuts the cue sequence into translation windows: fixed-size core ranges
 * that partition the sequence, each extended backward by a few overlap
 * cues for continuity context. Windows never mix phases; a core range
 * straddling the phase boundary is split at the boundary.
 */

use std::ops::Range;
use log::debug;

use crate::errors::TranslationError;
use crate::phase::{PhaseBoundary, PhaseLabel};
use crate::translation::document::SubtitleDocument;

// @struct: PlannerConfig
#[derive(Debug, Clone, Copy)]
pub struct PlannerConfig {
    /// Core cues per window
    pub batch_size: usize,

    /// Context cues carried from the preceding window
    pub overlap: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            batch_size: 35,
            overlap: 5,
        }
    }
}

// @struct: Window
// One translation unit over 0-based entry positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    /// Full range sent to the translator, context included
    pub range: Range<usize>,

    /// Subrange whose translations are kept in final output
    pub core: Range<usize>,

    /// Phase label for every core cue in this window
    pub phase: PhaseLabel,
}

/// Plans translation windows over a document
#[derive(Debug, Clone, Default)]
pub struct BatchPlanner {
    config: PlannerConfig,
}

impl BatchPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Plan windows and stamp each entry with its phase label.
    ///
    /// Core ranges partition `[0, len)`; a core straddling the boundary is
    /// split so no window carries a mixed label. Full ranges reach back
    /// `overlap` positions, clamped at zero.
    pub fn plan(
        &self,
        document: &mut SubtitleDocument,
        boundary: &PhaseBoundary,
    ) -> Result<Vec<Window>, TranslationError> {
        if self.config.batch_size < 1 {
            return Err(TranslationError::InvalidPlan(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if self.config.overlap >= self.config.batch_size {
            return Err(TranslationError::InvalidPlan(format!(
                "overlap ({}) must be smaller than batch_size ({})",
                self.config.overlap, self.config.batch_size
            )));
        }

        let len = document.entries.len();
        for entry in &mut document.entries {
            entry.phase = boundary.phase_of(entry.id);
        }

        // Boundary as a 0-based split position within the sequence
        let split = boundary
            .boundary_cue_index
            .and_then(|b| document.entries.iter().position(|e| e.id == b))
            .filter(|&p| p > 0 && p < len);

        let mut windows = Vec::new();
        let mut start = 0;
        while start < len {
            let end = (start + self.config.batch_size).min(len);
            let mut cores: Vec<Range<usize>> = Vec::new();
            match split {
                Some(p) if p > start && p < end => {
                    cores.push(start..p);
                    cores.push(p..end);
                }
                _ => cores.push(start..end),
            }

            for core in cores {
                let range_start = core.start.saturating_sub(self.config.overlap);
                // A core never mixes phases, so the first cue's label is
                // the window's label
                let phase = document.entries[core.start].phase;
                windows.push(Window {
                    range: range_start..core.end,
                    core,
                    phase,
                });
            }

            start = end;
        }

        debug!(
            "Planned {} windows over {} cues (batch_size={}, overlap={})",
            windows.len(),
            len,
            self.config.batch_size,
            self.config.overlap
        );
        Ok(windows)
    }
}
