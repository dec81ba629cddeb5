use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::pipeline::defaults::{
    AnchoredCueReintegrator, GreedySubtitleChunker, LegibilityNormalizer, LinearGapInterpolator,
    WindowedFuzzyAligner,
};
use crate::pipeline::runtime::{CaptionPipeline, CaptionPipelineParts};
use crate::pipeline::traits::{
    CueReintegrator, SequenceAligner, SubtitleChunker, TimingInterpolator, TimingNormalizer,
};

pub struct CaptionPipelineBuilder {
    config: PipelineConfig,
    sequence_aligner: Option<Box<dyn SequenceAligner>>,
    interpolator: Option<Box<dyn TimingInterpolator>>,
    reintegrator: Option<Box<dyn CueReintegrator>>,
    chunker: Option<Box<dyn SubtitleChunker>>,
    normalizer: Option<Box<dyn TimingNormalizer>>,
}

impl CaptionPipelineBuilder {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            sequence_aligner: None,
            interpolator: None,
            reintegrator: None,
            chunker: None,
            normalizer: None,
        }
    }

    pub fn with_sequence_aligner(mut self, sequence_aligner: Box<dyn SequenceAligner>) -> Self {
        self.sequence_aligner = Some(sequence_aligner);
        self
    }

    pub fn with_interpolator(mut self, interpolator: Box<dyn TimingInterpolator>) -> Self {
        self.interpolator = Some(interpolator);
        self
    }

    pub fn with_reintegrator(mut self, reintegrator: Box<dyn CueReintegrator>) -> Self {
        self.reintegrator = Some(reintegrator);
        self
    }

    pub fn with_chunker(mut self, chunker: Box<dyn SubtitleChunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    pub fn with_normalizer(mut self, normalizer: Box<dyn TimingNormalizer>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn build(self) -> Result<CaptionPipeline, PipelineError> {
        self.config.validate()?;
        let config = self.config;

        Ok(CaptionPipeline::from_parts(CaptionPipelineParts {
            sequence_aligner: self.sequence_aligner.unwrap_or_else(|| {
                Box::new(WindowedFuzzyAligner {
                    config: config.aligner.clone(),
                })
            }),
            interpolator: self
                .interpolator
                .unwrap_or_else(|| Box::new(LinearGapInterpolator)),
            reintegrator: self.reintegrator.unwrap_or_else(|| {
                Box::new(AnchoredCueReintegrator {
                    config: config.cues.clone(),
                })
            }),
            chunker: self.chunker.unwrap_or_else(|| {
                Box::new(GreedySubtitleChunker {
                    config: config.chunker.clone(),
                })
            }),
            normalizer: self.normalizer.unwrap_or_else(|| {
                Box::new(LegibilityNormalizer {
                    config: config.normalizer.clone(),
                })
            }),
            config,
        }))
    }
}
