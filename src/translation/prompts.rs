/*!
 * Prompt construction for translation windows.
 *
 * Deterministic: identical inputs produce identical prompts. The system
 * prompt carries the domain briefing, the phase-conditioned rule for the
 * polysemous verb 画, the glossary block, and the strict JSON response
 * contract; the user message lists the window's cues as `[N] text` lines.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::glossary::{Glossary, GlossaryEntry};
use crate::phase::PhaseLabel;
use crate::translation::document::DocumentEntry;

/// Matches a Markdown code fence wrapper around a JSON payload
static CODE_FENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*```(?:json)?\s*(.*?)\s*```\s*$").unwrap_or_else(|e| {
        panic!("Invalid code fence regex pattern: {}", e);
    })
});

/// One translated line as returned by the model
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TranslatedLine {
    /// Cue index the text belongs to
    pub index: usize,

    /// Translated text
    pub text: String,
}

/// Builds system and user prompts for a window
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    /// System prompt for a window with the given phase label
    pub fn system_prompt(phase: PhaseLabel, glossary_block: &str) -> String {
        let hua_rule = match phase {
            PhaseLabel::Sketch | PhaseLabel::Unresolved => {
                "These subtitles are from the SKETCH phase of the lesson (pencil \
                 underdrawing). Render the verb 画 as \"sketch\" or \"draw\", never \
                 \"paint\". 笔 alone refers to the pencil."
            }
            PhaseLabel::Paint => {
                "These subtitles are from the PAINT phase of the lesson (watercolor \
                 application). Render the verb 画 as \"paint\", never \"sketch\" or \
                 \"draw\". 笔 alone refers to the brush."
            }
        };

        let mut prompt = format!(
            "You are a professional subtitle translator specializing in Chinese \
             watercolor painting lessons. Translate the numbered Chinese subtitle \
             lines below into natural, concise English suitable for subtitles.\n\n\
             {}\n\n\
             Rules:\n\
             - Translate every numbered line; do not merge, split, or reorder lines.\n\
             - Keep each translation short enough to read as a subtitle.\n\
             - Preserve the instructional tone of an art teacher.\n\
             - Lines before the first numbered line you are asked for are context \
             only; translate only the requested lines.",
            hua_rule
        );

        if !glossary_block.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(glossary_block);
        }

        prompt.push_str(
            "\n\nRespond with ONLY a JSON array, no prose and no code fences, one \
             object per requested line:\n\
             [{\"index\": N, \"text\": \"translated text\"}]",
        );

        prompt
    }

    /// User message: context cues first, then the cues to translate,
    /// each as a `[N] text` line.
    pub fn user_prompt(context: &[&DocumentEntry], to_translate: &[&DocumentEntry]) -> String {
        let mut lines = Vec::new();

        if !context.is_empty() {
            lines.push("Context (already translated, for continuity only):".to_string());
            for entry in context {
                lines.push(format!("[{}] {}", entry.id, entry.original_text));
            }
            lines.push(String::new());
        }

        lines.push("Translate these lines:".to_string());
        for entry in to_translate {
            lines.push(format!("[{}] {}", entry.id, entry.original_text));
        }

        lines.join("\n")
    }

    /// Glossary block for a window: entries whose source term appears in
    /// any of the window's cue texts
    pub fn glossary_block(glossary: &Glossary, entries: &[&DocumentEntry]) -> String {
        let combined: String = entries
            .iter()
            .map(|e| e.original_text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let applicable: Vec<&GlossaryEntry> = glossary.applicable_to(&combined);
        Glossary::format_for_prompt(&applicable)
    }
}

/// Strip a Markdown code fence wrapper, if present, from a model response
pub fn strip_code_fences(response: &str) -> &str {
    match CODE_FENCE_REGEX.captures(response) {
        Some(caps) => caps.get(1).map_or(response, |m| m.as_str()),
        None => response.trim(),
    }
}
