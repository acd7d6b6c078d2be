/*!
 * Human-readable review log assembly.
 */

use crate::phase::{PhaseBoundary, ReviewFlag};

/// Builds the plain-text review report for one document
#[derive(Debug, Clone, Default)]
pub struct ReviewLogBuilder {
    flags: Vec<ReviewFlag>,
}

impl ReviewLogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add flags from any pipeline stage
    pub fn add_flags(&mut self, flags: impl IntoIterator<Item = ReviewFlag>) {
        self.flags.extend(flags);
    }

    /// Number of flags collected so far
    pub fn flag_count(&self) -> usize {
        self.flags.len()
    }

    /// Render the report: a boundary summary line, then one entry per
    /// flag ordered by cue index and term. Valid (summary only) when no
    /// flags were collected.
    pub fn build(&self, boundary: &PhaseBoundary) -> String {
        let mut lines = Vec::new();

        let boundary_desc = match boundary.boundary_cue_index {
            Some(idx) => format!("cue {}", idx),
            None => "none (whole document sketch phase)".to_string(),
        };
        lines.push(format!(
            "Phase boundary: {} (source: {})",
            boundary_desc, boundary.confidence_source
        ));
        lines.push(format!("Flags: {}", self.flags.len()));

        let mut ordered: Vec<&ReviewFlag> = self.flags.iter().collect();
        ordered.sort_by(|a, b| {
            a.cue_index
                .cmp(&b.cue_index)
                .then_with(|| a.matched_term.cmp(&b.matched_term))
        });

        for flag in ordered {
            lines.push(String::new());
            lines.push(format!(
                "[{}] cue {} @ {} - term '{}'",
                flag.reason, flag.cue_index, flag.timestamp, flag.matched_term
            ));
            lines.push(format!("  text: {}", flag.original_text));
        }

        lines.push(String::new());
        lines.join("\n")
    }
}
