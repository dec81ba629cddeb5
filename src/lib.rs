pub mod alignment;
pub mod captions;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

pub use alignment::hypothesis::{flatten_segments, normalize_word, AsrSegment, AsrWord};
pub use alignment::report::{summarize, AlignmentSummary};
pub use config::{AlignerConfig, ChunkerConfig, CueConfig, NormalizerConfig, PipelineConfig};
pub use error::PipelineError;
pub use pipeline::builder::CaptionPipelineBuilder;
pub use pipeline::model_registry::{ModelKey, ModelRegistry};
pub use pipeline::runtime::CaptionPipeline;
pub use pipeline::traits::{
    CueReintegrator, HypothesisSource, SequenceAligner, SubtitleChunker, TimingInterpolator,
    TimingNormalizer,
};
pub use types::{
    AlignmentRecord, Cue, HypothesisWord, PipelineInput, PipelineOutput, ReferenceWord,
    SpeakerId, SubtitleChunk, TimedWord, UnitKind, UnitToken, UtteranceId, UtteranceUnit,
};
