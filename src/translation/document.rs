/*!
 * In-memory document model the pipeline operates on.
 *
 * Parsed SRT entries are lifted into `DocumentEntry` values that carry
 * phase labels, review flags, and (eventually) the translated text;
 * timing and identifiers pass through untouched.
 */

use crate::phase::{PhaseLabel, ReviewFlag};
use crate::subtitle_processor::{SubtitleCollection, SubtitleEntry};

/// Start and end time of a cue in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timecode {
    pub start_ms: u64,
    pub end_ms: u64,
}

// @struct: DocumentEntry
// One cue as the pipeline sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    /// 1-based cue index from the source file
    pub id: usize,

    /// Timing, never modified by translation
    pub timecode: Timecode,

    /// Source-language text
    pub original_text: String,

    /// Target-language text, set once by the reassembler
    pub translated_text: Option<String>,

    /// Phase label assigned by the planner
    pub phase: PhaseLabel,

    /// Review flags attached to this cue
    pub flags: Vec<ReviewFlag>,
}

/// A whole subtitle document moving through the pipeline
#[derive(Debug, Clone, Default)]
pub struct SubtitleDocument {
    pub entries: Vec<DocumentEntry>,
}

impl SubtitleDocument {
    /// Lift a parsed collection into the pipeline model
    pub fn from_collection(collection: &SubtitleCollection) -> Self {
        let entries = collection
            .entries
            .iter()
            .map(|e| DocumentEntry {
                id: e.seq_num,
                timecode: Timecode {
                    start_ms: e.start_time_ms,
                    end_ms: e.end_time_ms,
                },
                original_text: e.text.clone(),
                translated_text: None,
                phase: PhaseLabel::default(),
                flags: Vec::new(),
            })
            .collect();
        Self { entries }
    }

    /// Attach review flags to their cues by id
    pub fn attach_flags(&mut self, flags: &[ReviewFlag]) {
        for flag in flags {
            if let Some(entry) = self.entries.iter_mut().find(|e| e.id == flag.cue_index) {
                entry.flags.push(flag.clone());
            }
        }
    }

    /// Number of cues that received a translation
    pub fn translated_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.translated_text.is_some())
            .count()
    }

    /// Lower the document back into SRT entries, using the translated
    /// text where present and falling back to the original
    pub fn to_entries(&self) -> Vec<SubtitleEntry> {
        self.entries
            .iter()
            .map(|e| {
                let text = e
                    .translated_text
                    .clone()
                    .unwrap_or_else(|| e.original_text.clone());
                SubtitleEntry::new(e.id, e.timecode.start_ms, e.timecode.end_ms, text)
            })
            .collect()
    }
}
