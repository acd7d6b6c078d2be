/*!
 * Phase analysis for watercolor lesson subtitles.
 *
 * A lesson document has two phases: a sketch phase (pencil underdrawing)
 * followed by a paint phase (watercolor application). The polysemous verb
 * 画 must render differently in each, so the pipeline locates the phase
 * boundary before translation and flags the cues it cannot resolve.
 */

pub mod detector;
pub mod flagger;
pub mod lexicon;
pub mod review;

pub use detector::{DetectorConfig, PhaseBoundaryDetector};
pub use flagger::{AmbiguityFlagger, FlaggerConfig};
pub use lexicon::{PhaseLexicon, TermKind};
pub use review::ReviewLogBuilder;

/// Which phase of the lesson a cue belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhaseLabel {
    /// No phase assigned yet; the planner replaces this on every cue
    #[default]
    Unresolved,

    /// Pencil underdrawing phase
    Sketch,

    /// Watercolor application phase
    Paint,
}

impl std::fmt::Display for PhaseLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhaseLabel::Unresolved => write!(f, "unresolved"),
            PhaseLabel::Sketch => write!(f, "sketch"),
            PhaseLabel::Paint => write!(f, "paint"),
        }
    }
}

/// How the boundary decision was reached, strongest evidence first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceSource {
    /// An explicit transition phrase was found
    ExplicitTransition,

    /// The cumulative keyword score crossed and stayed positive
    KeywordScore,

    /// Whole-document keyword density decided a single-phase document
    DensityFallback,
}

impl std::fmt::Display for ConfidenceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfidenceSource::ExplicitTransition => write!(f, "EXPLICIT_TRANSITION"),
            ConfidenceSource::KeywordScore => write!(f, "KEYWORD_SCORE"),
            ConfidenceSource::DensityFallback => write!(f, "DENSITY_FALLBACK"),
        }
    }
}

/// Result of phase boundary detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseBoundary {
    /// 1-based index of the first paint-phase cue, `None` when the whole
    /// document is sketch phase
    pub boundary_cue_index: Option<usize>,

    /// Which detection pass produced the decision
    pub confidence_source: ConfidenceSource,
}

impl PhaseBoundary {
    /// Phase label for a cue by its 1-based index
    pub fn phase_of(&self, cue_index: usize) -> PhaseLabel {
        match self.boundary_cue_index {
            Some(b) if cue_index >= b => PhaseLabel::Paint,
            _ => PhaseLabel::Sketch,
        }
    }
}

/// Why a cue was flagged for human review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagReason {
    /// An ambiguous term appeared with no disambiguating terms nearby
    AmbiguousTermNoContext,

    /// Boundary evidence was contradictory or weak
    PhaseBoundaryUncertain,
}

impl std::fmt::Display for FlagReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlagReason::AmbiguousTermNoContext => write!(f, "AMBIGUOUS_TERM_NO_CONTEXT"),
            FlagReason::PhaseBoundaryUncertain => write!(f, "PHASE_BOUNDARY_UNCERTAIN"),
        }
    }
}

/// A review flag pointing a human at a cue that needs checking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewFlag {
    /// 1-based cue index
    pub cue_index: usize,

    /// Formatted start timestamp of the cue
    pub timestamp: String,

    /// The term (or transition phrase) that triggered the flag; empty for
    /// document-level flags
    pub matched_term: String,

    /// Why the cue was flagged
    pub reason: FlagReason,

    /// Original cue text, carried for the review log
    pub original_text: String,
}
