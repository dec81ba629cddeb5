use std::path::Path;

use crate::alignment::interpolation::apply_timings;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::pipeline::traits::{
    CueReintegrator, HypothesisSource, SequenceAligner, SubtitleChunker, TimingInterpolator,
    TimingNormalizer,
};
use crate::types::{PipelineInput, PipelineOutput};

pub struct CaptionPipeline {
    config: PipelineConfig,
    sequence_aligner: Box<dyn SequenceAligner>,
    interpolator: Box<dyn TimingInterpolator>,
    reintegrator: Box<dyn CueReintegrator>,
    chunker: Box<dyn SubtitleChunker>,
    normalizer: Box<dyn TimingNormalizer>,
}

pub(crate) struct CaptionPipelineParts {
    pub config: PipelineConfig,
    pub sequence_aligner: Box<dyn SequenceAligner>,
    pub interpolator: Box<dyn TimingInterpolator>,
    pub reintegrator: Box<dyn CueReintegrator>,
    pub chunker: Box<dyn SubtitleChunker>,
    pub normalizer: Box<dyn TimingNormalizer>,
}

impl CaptionPipeline {
    pub(crate) fn from_parts(parts: CaptionPipelineParts) -> Self {
        Self {
            config: parts.config,
            sequence_aligner: parts.sequence_aligner,
            interpolator: parts.interpolator,
            reintegrator: parts.reintegrator,
            chunker: parts.chunker,
            normalizer: parts.normalizer,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run(&self, input: &PipelineInput) -> Result<PipelineOutput, PipelineError> {
        validate_hypothesis(input)?;

        let mut records = self
            .sequence_aligner
            .align(&input.reference_words, &input.hypothesis_words);
        if records.len() != input.reference_words.len() {
            return Err(PipelineError::invalid_input(format!(
                "aligner returned {} records for {} reference words",
                records.len(),
                input.reference_words.len()
            )));
        }
        let matched = records.iter().filter(|r| r.hyp_index.is_some()).count();

        self.interpolator.interpolate(&mut records);
        let timed_words = apply_timings(&input.reference_words, &records)?;

        let units = self
            .reintegrator
            .reintegrate(&timed_words, &input.cues, &input.speaker_names)?;

        let mut chunks = units
            .iter()
            .flat_map(|unit| self.chunker.chunk(unit))
            .collect::<Vec<_>>();
        // Overlapping utterances can interleave; keep chunks ordered by start.
        chunks.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        let chunks = self.normalizer.normalize(chunks);

        tracing::info!(
            reference_words = input.reference_words.len(),
            hypothesis_words = input.hypothesis_words.len(),
            matched,
            cues = input.cues.len(),
            units = units.len(),
            chunks = chunks.len(),
            "pipeline: captions built"
        );

        Ok(PipelineOutput {
            records,
            units,
            chunks,
        })
    }

    /// Recognize `audio_path` with `source`, then run on the resulting hypothesis.
    ///
    /// Any hypothesis words already present in `input` are replaced.
    pub fn run_with_source(
        &self,
        source: &dyn HypothesisSource,
        audio_path: &Path,
        input: &PipelineInput,
    ) -> Result<PipelineOutput, PipelineError> {
        let hypothesis_words = source.transcribe(audio_path)?;
        tracing::debug!(
            audio = %audio_path.display(),
            words = hypothesis_words.len(),
            "pipeline: hypothesis received from source"
        );
        let input = PipelineInput {
            hypothesis_words,
            ..input.clone()
        };
        self.run(&input)
    }
}

fn validate_hypothesis(input: &PipelineInput) -> Result<(), PipelineError> {
    for (i, word) in input.hypothesis_words.iter().enumerate() {
        if !word.start_time.is_finite() || !word.end_time.is_finite() {
            return Err(PipelineError::invalid_input(format!(
                "hypothesis word {i} ({:?}) has non-finite timing",
                word.raw_text
            )));
        }
        if word.end_time < word.start_time {
            return Err(PipelineError::invalid_input(format!(
                "hypothesis word {i} ({:?}) ends at {} before it starts at {}",
                word.raw_text, word.end_time, word.start_time
            )));
        }
    }
    Ok(())
}
