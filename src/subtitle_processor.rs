use std::fmt;
use std::path::PathBuf;
use regex::Regex;
use once_cell::sync::Lazy;
use log::debug;

use crate::errors::SubtitleError;

// @module: SRT parsing, validation and formatting

// @const: SRT timestamp regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}:\d{2}:\d{2},\d{3}) --> (\d{2}:\d{2}:\d{2},\d{3})$").unwrap()
});

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Sequence number (1-based, contiguous)
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Subtitle text
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text,
        }
    }

    // @creates: Validated subtitle entry
    // @validates: Time range and non-empty text
    pub fn new_validated(
        seq_num: usize,
        start_time_ms: u64,
        end_time_ms: u64,
        text: String,
    ) -> Result<Self, SubtitleError> {
        if seq_num == 0 {
            return Err(SubtitleError::MalformedInput {
                cue_index: seq_num,
                reason: "cue index must be positive".to_string(),
            });
        }

        if end_time_ms <= start_time_ms {
            return Err(SubtitleError::MalformedInput {
                cue_index: seq_num,
                reason: format!(
                    "end time {} must be after start time {}",
                    Self::format_timestamp(end_time_ms),
                    Self::format_timestamp(start_time_ms)
                ),
            });
        }

        let trimmed_text = text.trim();
        if trimmed_text.is_empty() {
            return Err(SubtitleError::MalformedInput {
                cue_index: seq_num,
                reason: "empty subtitle text".to_string(),
            });
        }

        Ok(SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text: trimmed_text.to_string(),
        })
    }

    /// Parse an SRT timestamp (HH:MM:SS,mmm) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Option<u64> {
        let parts: Vec<&str> = timestamp.split(&[':', ','][..]).collect();
        if parts.len() != 4 {
            return None;
        }

        let hours: u64 = parts[0].parse().ok()?;
        let minutes: u64 = parts[1].parse().ok()?;
        let seconds: u64 = parts[2].parse().ok()?;
        let millis: u64 = parts[3].parse().ok()?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return None;
        }

        Some(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_time_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Collection of subtitle entries with their source file
#[derive(Debug, Clone)]
pub struct SubtitleCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// List of subtitle entries
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Create a new subtitle collection
    pub fn new(source_file: PathBuf, entries: Vec<SubtitleEntry>) -> Self {
        SubtitleCollection {
            source_file,
            entries,
        }
    }

    /// Parse SRT format string into subtitle entries.
    ///
    /// Strict: a block missing its index line, missing or unparseable
    /// timecodes, an empty text body, a non-positive index, or a cue index
    /// that breaks the contiguous 1,2,3,... sequence is a fatal
    /// `MalformedInput` error carrying the offending cue index. Timing and
    /// identifiers are what the translation output is rebuilt on, so a
    /// document that cannot be validated is rejected whole.
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>, SubtitleError> {
        let normalized = content.replace("\r\n", "\n");
        let mut entries: Vec<SubtitleEntry> = Vec::new();

        // State variables for parsing
        let mut current_seq_num: Option<usize> = None;
        let mut current_start_time_ms: Option<u64> = None;
        let mut current_end_time_ms: Option<u64> = None;
        let mut current_text = String::new();

        let finalize = |seq_num: Option<usize>,
                        start_ms: Option<u64>,
                        end_ms: Option<u64>,
                        text: &str,
                        entries: &mut Vec<SubtitleEntry>|
         -> Result<(), SubtitleError> {
            let expected = entries.len() + 1;
            let seq_num = seq_num.ok_or(SubtitleError::MalformedInput {
                cue_index: expected,
                reason: "cue block has no index line".to_string(),
            })?;
            let (start_ms, end_ms) = match (start_ms, end_ms) {
                (Some(s), Some(e)) => (s, e),
                _ => {
                    return Err(SubtitleError::MalformedInput {
                        cue_index: seq_num,
                        reason: "cue block has no timecode line".to_string(),
                    });
                }
            };
            if seq_num != expected {
                return Err(SubtitleError::MalformedInput {
                    cue_index: seq_num,
                    reason: format!("cue index {} breaks sequence, expected {}", seq_num, expected),
                });
            }
            let entry = SubtitleEntry::new_validated(seq_num, start_ms, end_ms, text.to_string())?;
            entries.push(entry);
            Ok(())
        };

        for line in normalized.lines() {
            let trimmed = line.trim();

            // A blank line closes the current block
            if trimmed.is_empty() {
                if current_seq_num.is_some()
                    || current_start_time_ms.is_some()
                    || !current_text.is_empty()
                {
                    finalize(
                        current_seq_num,
                        current_start_time_ms,
                        current_end_time_ms,
                        &current_text,
                        &mut entries,
                    )?;
                    current_seq_num = None;
                    current_start_time_ms = None;
                    current_end_time_ms = None;
                    current_text.clear();
                }
                continue;
            }

            // Index line starts a new block
            if current_seq_num.is_none() && current_text.is_empty() {
                if let Ok(num) = trimmed.parse::<usize>() {
                    current_seq_num = Some(num);
                    continue;
                }
                return Err(SubtitleError::MalformedInput {
                    cue_index: entries.len() + 1,
                    reason: format!("expected cue index line, found: {}", trimmed),
                });
            }

            // Timecode line follows the index line
            if current_seq_num.is_some() && current_start_time_ms.is_none() {
                let parsed = TIMESTAMP_REGEX.captures(trimmed).and_then(|caps| {
                    let at = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or("");
                    SubtitleEntry::parse_timestamp(at(1))
                        .zip(SubtitleEntry::parse_timestamp(at(2)))
                });
                match parsed {
                    Some((start_ms, end_ms)) => {
                        current_start_time_ms = Some(start_ms);
                        current_end_time_ms = Some(end_ms);
                        continue;
                    }
                    None => {
                        return Err(SubtitleError::MalformedInput {
                            cue_index: current_seq_num.unwrap_or(entries.len() + 1),
                            reason: format!("unparseable timecode line: {}", trimmed),
                        });
                    }
                }
            }

            // Everything else is subtitle text
            if !current_text.is_empty() {
                current_text.push('\n');
            }
            current_text.push_str(trimmed);
        }

        // Close the last block if the file has no trailing blank line
        if current_seq_num.is_some() || !current_text.is_empty() {
            finalize(
                current_seq_num,
                current_start_time_ms,
                current_end_time_ms,
                &current_text,
                &mut entries,
            )?;
        }

        if entries.is_empty() {
            return Err(SubtitleError::Empty);
        }

        debug!("Parsed {} subtitle entries", entries.len());
        Ok(entries)
    }

    /// Render the collection back to an SRT-format string.
    ///
    /// Indices and timecodes are emitted exactly as held by the entries;
    /// only the text of each block varies between the input and the
    /// translated output.
    pub fn to_srt_string(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.to_string());
        }
        out
    }

}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
