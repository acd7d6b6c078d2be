/*!
 * Terminology glossary loading and prompt formatting.
 *
 * The glossary is a CSV file with a header row naming the source-term and
 * target-term columns (`Chinese`/`English` in the reference files, matched
 * case-insensitively), plus optional `Category` and `Notes` columns.
 * Duplicate source terms are a load-time error - a conflict must surface
 * before any translation work starts.
 */

use std::collections::HashMap;
use std::path::Path;
use log::{debug, warn};

use crate::errors::GlossaryError;

/// A single glossary entry mapping a Chinese term to its English rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlossaryEntry {
    /// Source term (Chinese)
    pub source_term: String,

    /// Target term (English)
    pub target_term: String,

    /// Optional grouping category, empty if absent
    pub category: String,

    /// Optional usage notes, empty if absent
    pub notes: String,
}

/// Loaded glossary with unique source terms
#[derive(Debug, Clone, Default)]
pub struct Glossary {
    /// Entries in file order
    pub entries: Vec<GlossaryEntry>,
}

/// Column layout discovered from the header row
struct HeaderMap {
    source: usize,
    target: usize,
    category: Option<usize>,
    notes: Option<usize>,
}

impl Glossary {
    /// Create an empty glossary
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a glossary from a CSV file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GlossaryError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let glossary = Self::parse_csv(&content)?;
        debug!(
            "Loaded {} glossary entries from {}",
            glossary.entries.len(),
            path.as_ref().display()
        );
        Ok(glossary)
    }

    /// Parse CSV content into a glossary.
    ///
    /// Rows with an empty source or target are skipped with a warning; a
    /// duplicate source term is fatal and reported with its line number.
    pub fn parse_csv(content: &str) -> Result<Self, GlossaryError> {
        let mut rows = Vec::new();
        for (line_no, line) in content.replace("\r\n", "\n").lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields = split_csv_line(line, line_no + 1)?;
            rows.push((line_no + 1, fields));
        }

        let mut iter = rows.into_iter();
        let Some((_, header)) = iter.next() else {
            return Err(GlossaryError::MissingColumn("source term".to_string()));
        };
        let header_map = Self::map_header(&header)?;

        let mut entries: Vec<GlossaryEntry> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for (line, fields) in iter {
            let field = |idx: Option<usize>| -> String {
                idx.and_then(|i| fields.get(i))
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default()
            };

            let source_term = field(Some(header_map.source));
            let target_term = field(Some(header_map.target));

            if source_term.is_empty() || target_term.is_empty() {
                warn!("Skipping glossary row at line {} with empty term", line);
                continue;
            }

            if seen.insert(source_term.clone(), line).is_some() {
                return Err(GlossaryError::DuplicateTerm {
                    term: source_term,
                    line,
                });
            }

            entries.push(GlossaryEntry {
                source_term,
                target_term,
                category: field(header_map.category),
                notes: field(header_map.notes),
            });
        }

        Ok(Self { entries })
    }

    /// Map header column names to indices, case-insensitively.
    /// `Chinese`/`source_term` name the source column, `English`/`target_term`
    /// the target column.
    fn map_header(header: &[String]) -> Result<HeaderMap, GlossaryError> {
        let find = |names: &[&str]| -> Option<usize> {
            header.iter().position(|h| {
                let h = h.trim().to_lowercase();
                names.iter().any(|n| h == *n)
            })
        };

        let source = find(&["chinese", "source_term", "source"])
            .ok_or_else(|| GlossaryError::MissingColumn("source term (Chinese)".to_string()))?;
        let target = find(&["english", "target_term", "target"])
            .ok_or_else(|| GlossaryError::MissingColumn("target term (English)".to_string()))?;

        Ok(HeaderMap {
            source,
            target,
            category: find(&["category"]),
            notes: find(&["notes"]),
        })
    }

    /// Whether the glossary has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose source term appears in the given text.
    ///
    /// A translation window only carries the entries it can actually use,
    /// to bound prompt size.
    pub fn applicable_to<'a>(&'a self, text: &str) -> Vec<&'a GlossaryEntry> {
        self.entries
            .iter()
            .filter(|e| text.contains(&e.source_term))
            .collect()
    }

    /// Format entries as a readable glossary block for the LLM prompt,
    /// grouped by category. Returns an empty string for no entries.
    pub fn format_for_prompt(entries: &[&GlossaryEntry]) -> String {
        if entries.is_empty() {
            return String::new();
        }

        let mut lines = vec![
            "## Required Terminology Glossary".to_string(),
            String::new(),
            "Use these exact translations when the Chinese term appears:".to_string(),
            String::new(),
        ];

        // Group by category, preserving first-seen category order
        let mut order: Vec<&str> = Vec::new();
        let mut by_category: HashMap<&str, Vec<&GlossaryEntry>> = HashMap::new();
        for &entry in entries {
            let cat = if entry.category.is_empty() {
                "General"
            } else {
                entry.category.as_str()
            };
            if !by_category.contains_key(cat) {
                order.push(cat);
            }
            by_category.entry(cat).or_default().push(entry);
        }

        for cat in order {
            lines.push(format!("### {}", cat));
            for entry in &by_category[cat] {
                let mut line = format!("- {} -> {}", entry.source_term, entry.target_term);
                if !entry.notes.is_empty() {
                    line.push_str(&format!("  ({})", entry.notes));
                }
                lines.push(line);
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }
}

/// Split one CSV line into fields, honoring quoted fields with embedded
/// commas and doubled-quote escapes.
fn split_csv_line(line: &str, line_no: usize) -> Result<Vec<String>, GlossaryError> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            '"' => {
                return Err(GlossaryError::MalformedRow {
                    line: line_no,
                    reason: "quote inside unquoted field".to_string(),
                });
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(GlossaryError::MalformedRow {
            line: line_no,
            reason: "unterminated quoted field".to_string(),
        });
    }

    fields.push(field);
    Ok(fields)
}
