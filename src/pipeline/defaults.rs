use std::collections::BTreeMap;

use crate::alignment::interpolation::interpolate_missing_times;
use crate::alignment::sequence::align_sequences;
use crate::captions::{chunk_unit, normalize_timings, reintegrate_cues};
use crate::config::{AlignerConfig, ChunkerConfig, CueConfig, NormalizerConfig};
use crate::error::PipelineError;
use crate::pipeline::traits::{
    CueReintegrator, SequenceAligner, SubtitleChunker, TimingInterpolator, TimingNormalizer,
};
use crate::types::{
    AlignmentRecord, Cue, HypothesisWord, ReferenceWord, SpeakerId, SubtitleChunk, TimedWord,
    UtteranceUnit,
};

pub struct WindowedFuzzyAligner {
    pub config: AlignerConfig,
}

impl SequenceAligner for WindowedFuzzyAligner {
    fn align(
        &self,
        reference: &[ReferenceWord],
        hypothesis: &[HypothesisWord],
    ) -> Vec<AlignmentRecord> {
        align_sequences(reference, hypothesis, &self.config)
    }
}

pub struct LinearGapInterpolator;

impl TimingInterpolator for LinearGapInterpolator {
    fn interpolate(&self, records: &mut [AlignmentRecord]) {
        interpolate_missing_times(records);
    }
}

pub struct AnchoredCueReintegrator {
    pub config: CueConfig,
}

impl CueReintegrator for AnchoredCueReintegrator {
    fn reintegrate(
        &self,
        words: &[TimedWord],
        cues: &[Cue],
        speaker_names: &BTreeMap<SpeakerId, String>,
    ) -> Result<Vec<UtteranceUnit>, PipelineError> {
        reintegrate_cues(words, cues, speaker_names, &self.config)
    }
}

pub struct GreedySubtitleChunker {
    pub config: ChunkerConfig,
}

impl SubtitleChunker for GreedySubtitleChunker {
    fn chunk(&self, unit: &UtteranceUnit) -> Vec<SubtitleChunk> {
        chunk_unit(unit, &self.config)
    }
}

pub struct LegibilityNormalizer {
    pub config: NormalizerConfig,
}

impl TimingNormalizer for LegibilityNormalizer {
    fn normalize(&self, chunks: Vec<SubtitleChunk>) -> Vec<SubtitleChunk> {
        normalize_timings(chunks, &self.config)
    }
}
