/*!
 * Phase lexicon: the term sets that drive boundary detection and
 * ambiguity flagging.
 *
 * Ships with a built-in set for watercolor lessons; a JSON file can
 * replace any of the four lists wholesale.
 */

use std::path::Path;
use anyhow::{Context, Result};
use serde::Deserialize;

/// Which list a matched term came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    /// Explicit phase-transition phrase
    Transition,

    /// Paint-phase keyword
    Paint,

    /// Sketch-phase keyword
    Sketch,

    /// Polysemous term needing local context
    Ambiguous,
}

/// Term counts found in one cue's text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermMatches {
    /// Matched transition phrases
    pub transitions: Vec<String>,

    /// Number of paint keyword occurrences
    pub paint_count: usize,

    /// Number of sketch keyword occurrences
    pub sketch_count: usize,

    /// Distinct ambiguous terms present
    pub ambiguous_terms: Vec<String>,
}

impl TermMatches {
    /// Whether the cue carries any unambiguous phase signal
    pub fn has_strong_signal(&self) -> bool {
        self.paint_count > 0 || self.sketch_count > 0 || !self.transitions.is_empty()
    }
}

// @struct: PhaseLexicon
// The four term lists used by phase analysis
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PhaseLexicon {
    /// Phrases that explicitly announce the switch to painting
    pub transition_phrases: Vec<String>,

    /// Keywords indicating the paint phase
    pub paint_terms: Vec<String>,

    /// Keywords indicating the sketch phase
    pub sketch_terms: Vec<String>,

    /// Polysemous terms that need surrounding context
    pub ambiguous_terms: Vec<String>,
}

impl Default for PhaseLexicon {
    fn default() -> Self {
        let list = |terms: &[&str]| terms.iter().map(|t| t.to_string()).collect();
        Self {
            transition_phrases: list(&[
                "开始上色",
                "开始涂色",
                "可以上色",
                "现在上色",
                "线稿完成",
                "铅笔稿完成",
                "拿起毛笔",
            ]),
            paint_terms: list(&[
                "颜料", "颜色", "调色", "毛笔", "水彩", "渲染", "晕染", "上色", "涂抹", "涂色",
                "洗掉", "刷", "染", "调和", "蘸", "铺色", "铺底", "叠加", "叠色", "湿画", "干画",
            ]),
            sketch_terms: list(&[
                "铅笔", "橡皮", "轮廓", "构图", "比例", "线条", "线稿", "起稿", "起形", "草稿",
                "草图", "勾勒", "勾线",
            ]),
            ambiguous_terms: list(&["画", "笔"]),
        }
    }
}

impl PhaseLexicon {
    /// Load a lexicon from a JSON file; missing lists keep the defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lexicon file: {}", path.display()))?;
        let lexicon: PhaseLexicon = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse lexicon file: {}", path.display()))?;
        Ok(lexicon)
    }

    /// Scan a cue's text for term matches.
    ///
    /// Matching is longest-first at each position so a keyword containing
    /// an ambiguous term (毛笔 contains 笔) consumes it and the embedded
    /// term is not also counted.
    pub fn scan(&self, text: &str) -> TermMatches {
        let mut terms: Vec<(&str, TermKind)> = Vec::new();
        for t in &self.transition_phrases {
            terms.push((t, TermKind::Transition));
        }
        for t in &self.paint_terms {
            terms.push((t, TermKind::Paint));
        }
        for t in &self.sketch_terms {
            terms.push((t, TermKind::Sketch));
        }
        for t in &self.ambiguous_terms {
            terms.push((t, TermKind::Ambiguous));
        }
        // Longest term wins at any given position
        terms.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let mut matches = TermMatches::default();
        let mut pos = 0;
        while pos < text.len() {
            let rest = &text[pos..];
            let hit = terms.iter().find(|(term, _)| rest.starts_with(*term));
            match hit {
                Some((term, kind)) => {
                    match kind {
                        TermKind::Transition => matches.transitions.push(term.to_string()),
                        TermKind::Paint => matches.paint_count += 1,
                        TermKind::Sketch => matches.sketch_count += 1,
                        TermKind::Ambiguous => {
                            if !matches.ambiguous_terms.iter().any(|t| t == term) {
                                matches.ambiguous_terms.push(term.to_string());
                            }
                        }
                    }
                    pos += term.len();
                }
                None => {
                    // Advance one character (not one byte)
                    pos += rest.chars().next().map_or(1, char::len_utf8);
                }
            }
        }

        matches
    }

    /// First paint keyword occurring in the text, in text order
    pub fn first_paint_term(&self, text: &str) -> Option<String> {
        Self::first_of(&self.paint_terms, text)
    }

    /// First sketch keyword occurring in the text, in text order
    pub fn first_sketch_term(&self, text: &str) -> Option<String> {
        Self::first_of(&self.sketch_terms, text)
    }

    fn first_of(terms: &[String], text: &str) -> Option<String> {
        terms
            .iter()
            .filter_map(|t| text.find(t.as_str()).map(|pos| (pos, t)))
            .min_by_key(|(pos, _)| *pos)
            .map(|(_, t)| t.clone())
    }
}
