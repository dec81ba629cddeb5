use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub type SpeakerId = u32;
pub type UtteranceId = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceWord {
    pub normalized_text: String,
    pub raw_text: String,
    pub speaker_id: SpeakerId,
    pub utterance_id: UtteranceId,
    pub position_in_utterance: usize,
}

/// One recognized word. An empty `normalized_text` is a silence placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesisWord {
    pub normalized_text: String,
    #[serde(default)]
    pub raw_text: String,
    pub start_time: f64,
    pub end_time: f64,
    #[serde(default)]
    pub confidence: Option<f32>,
}

impl HypothesisWord {
    pub fn is_silence(&self) -> bool {
        self.normalized_text.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentRecord {
    pub ref_index: usize,
    pub hyp_index: Option<usize>,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    /// Shingle similarity on the 0-100 scale. Stays `None` for unmatched words.
    pub score: Option<f64>,
}

impl AlignmentRecord {
    pub fn unmatched(ref_index: usize) -> Self {
        Self {
            ref_index,
            hyp_index: None,
            start_time: None,
            end_time: None,
            score: None,
        }
    }

    pub fn is_timed(&self) -> bool {
        self.start_time.is_some() && self.end_time.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    #[serde(default)]
    pub utterance_id: Option<UtteranceId>,
    #[serde(default)]
    pub word_offset: Option<usize>,
    pub text: String,
    #[serde(default)]
    pub start_time: Option<f64>,
    #[serde(default)]
    pub end_time: Option<f64>,
    #[serde(default)]
    pub is_inline: bool,
    /// Utterance this standalone cue sits after in the source transcript.
    #[serde(default)]
    pub follows_utterance: Option<UtteranceId>,
}

impl Cue {
    pub fn is_standalone(&self) -> bool {
        !self.is_inline || self.utterance_id.is_none()
    }
}

/// Reference word after alignment, carrying a concrete time span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedWord {
    pub text: String,
    pub normalized_text: String,
    pub speaker_id: SpeakerId,
    pub utterance_id: UtteranceId,
    pub position_in_utterance: usize,
    pub start_time: f64,
    pub end_time: f64,
    /// True only when the aligner matched this word to a hypothesis word.
    pub aligned: bool,
    pub confidence: Option<f64>,
}

/// Token inside an utterance unit: a spoken word or a spliced inline cue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitToken {
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Speech,
    Cue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtteranceUnit {
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
    pub kind: UnitKind,
    /// Empty for standalone cues.
    pub tokens: Vec<UnitToken>,
    pub speaker_id: Option<SpeakerId>,
    pub speaker_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleChunk {
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
    pub speaker_id: Option<SpeakerId>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub speaker_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: UnitKind,
}

impl SubtitleChunk {
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineInput {
    pub reference_words: Vec<ReferenceWord>,
    #[serde(default)]
    pub hypothesis_words: Vec<HypothesisWord>,
    #[serde(default)]
    pub cues: Vec<Cue>,
    #[serde(default)]
    pub speaker_names: BTreeMap<SpeakerId, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    pub records: Vec<AlignmentRecord>,
    pub units: Vec<UtteranceUnit>,
    pub chunks: Vec<SubtitleChunk>,
}
