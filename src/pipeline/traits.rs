use std::collections::BTreeMap;
use std::path::Path;

use crate::error::PipelineError;
use crate::types::{
    AlignmentRecord, Cue, HypothesisWord, ReferenceWord, SpeakerId, SubtitleChunk, TimedWord,
    UtteranceUnit,
};

pub trait SequenceAligner: Send + Sync {
    fn align(
        &self,
        reference: &[ReferenceWord],
        hypothesis: &[HypothesisWord],
    ) -> Vec<AlignmentRecord>;
}

pub trait TimingInterpolator: Send + Sync {
    fn interpolate(&self, records: &mut [AlignmentRecord]);
}

pub trait CueReintegrator: Send + Sync {
    fn reintegrate(
        &self,
        words: &[TimedWord],
        cues: &[Cue],
        speaker_names: &BTreeMap<SpeakerId, String>,
    ) -> Result<Vec<UtteranceUnit>, PipelineError>;
}

pub trait SubtitleChunker: Send + Sync {
    fn chunk(&self, unit: &UtteranceUnit) -> Vec<SubtitleChunk>;
}

pub trait TimingNormalizer: Send + Sync {
    fn normalize(&self, chunks: Vec<SubtitleChunk>) -> Vec<SubtitleChunk>;
}

/// Speech recognizer producing the hypothesis word stream for an audio file.
pub trait HypothesisSource: Send + Sync {
    fn transcribe(&self, audio_path: &Path) -> Result<Vec<HypothesisWord>, PipelineError>;
}
