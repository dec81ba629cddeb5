use serde::{Deserialize, Serialize};

use crate::types::HypothesisWord;

/// Word-level output of a recognizer, as emitted inside a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsrWord {
    pub word: String,
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub probability: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsrSegment {
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub words: Vec<AsrWord>,
}

/// Lower-case and strip everything but alphanumerics and apostrophes.
///
/// Curly apostrophes fold to `'`. Punctuation-only input yields an empty
/// string, which the aligner treats as a silence placeholder.
pub fn normalize_word(raw: &str) -> String {
    raw.chars()
        .map(|c| if c == '\u{2019}' || c == '\u{2018}' { '\'' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '\'')
        .flat_map(char::to_lowercase)
        .collect::<String>()
        .trim_matches('\'')
        .to_string()
}

/// Flatten recognizer segments into the ordered hypothesis word stream.
pub fn flatten_segments(segments: &[AsrSegment]) -> Vec<HypothesisWord> {
    segments
        .iter()
        .flat_map(|segment| segment.words.iter())
        .map(|w| HypothesisWord {
            normalized_text: normalize_word(&w.word),
            raw_text: w.word.trim().to_string(),
            start_time: w.start,
            end_time: w.end.max(w.start),
            confidence: w.probability,
        })
        .collect()
}
