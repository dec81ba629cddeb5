use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignerConfig {
    /// Number of consecutive words joined into one shingle.
    pub seq_len: usize,
    pub initial_window: usize,
    /// Upper bound on the search radius, counted from the hypothesis cursor.
    pub max_window: usize,
    /// Minimum similarity on the 0-100 scale for a position to become a candidate.
    pub match_threshold: f64,
}

impl AlignerConfig {
    pub const DEFAULT_SEQ_LEN: usize = 2;
    pub const DEFAULT_INITIAL_WINDOW: usize = 5;
    pub const DEFAULT_MAX_WINDOW: usize = 12;
    pub const DEFAULT_MATCH_THRESHOLD: f64 = 70.0;
    pub const WINDOW_GROWTH: usize = 2;
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            seq_len: Self::DEFAULT_SEQ_LEN,
            initial_window: Self::DEFAULT_INITIAL_WINDOW,
            max_window: Self::DEFAULT_MAX_WINDOW,
            match_threshold: Self::DEFAULT_MATCH_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CueConfig {
    pub min_display_time: f64,
    pub max_display_time: f64,
}

impl CueConfig {
    pub const DEFAULT_MIN_DISPLAY_TIME: f64 = 2.0;
    pub const DEFAULT_MAX_DISPLAY_TIME: f64 = 6.0;
}

impl Default for CueConfig {
    fn default() -> Self {
        Self {
            min_display_time: Self::DEFAULT_MIN_DISPLAY_TIME,
            max_display_time: Self::DEFAULT_MAX_DISPLAY_TIME,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    pub max_words: usize,
    pub min_duration: f64,
    pub max_duration: f64,
}

impl ChunkerConfig {
    pub const DEFAULT_MAX_WORDS: usize = 15;
    pub const DEFAULT_MIN_DURATION: f64 = 2.0;
    pub const DEFAULT_MAX_DURATION: f64 = 6.0;
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_words: Self::DEFAULT_MAX_WORDS,
            min_duration: Self::DEFAULT_MIN_DURATION,
            max_duration: Self::DEFAULT_MAX_DURATION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    pub post_padding: f64,
    pub absolute_floor: f64,
    /// Floor applied instead of `absolute_floor` when a chunk has more than one word.
    pub multi_word_floor: f64,
    pub seconds_per_word: f64,
}

impl NormalizerConfig {
    pub const DEFAULT_POST_PADDING: f64 = 0.25;
    pub const DEFAULT_ABSOLUTE_FLOOR: f64 = 1.0;
    pub const DEFAULT_MULTI_WORD_FLOOR: f64 = 1.5;
    pub const DEFAULT_SECONDS_PER_WORD: f64 = 0.33;
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            post_padding: Self::DEFAULT_POST_PADDING,
            absolute_floor: Self::DEFAULT_ABSOLUTE_FLOOR,
            multi_word_floor: Self::DEFAULT_MULTI_WORD_FLOOR,
            seconds_per_word: Self::DEFAULT_SECONDS_PER_WORD,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub aligner: AlignerConfig,
    pub cues: CueConfig,
    pub chunker: ChunkerConfig,
    pub normalizer: NormalizerConfig,
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::io("read pipeline config", e))?;
        let config: Self = serde_json::from_str(&data)
            .map_err(|e| PipelineError::json("parse pipeline config", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        let aligner = &self.aligner;
        if aligner.seq_len == 0 {
            return Err(PipelineError::invalid_config("aligner.seq_len must be >= 1"));
        }
        if aligner.initial_window == 0 {
            return Err(PipelineError::invalid_config(
                "aligner.initial_window must be >= 1",
            ));
        }
        if aligner.max_window < aligner.initial_window {
            return Err(PipelineError::invalid_config(format!(
                "aligner.max_window ({}) must be >= aligner.initial_window ({})",
                aligner.max_window, aligner.initial_window
            )));
        }
        if !(0.0..=100.0).contains(&aligner.match_threshold) {
            return Err(PipelineError::invalid_config(format!(
                "aligner.match_threshold must be within 0..=100, got {}",
                aligner.match_threshold
            )));
        }

        check_bounds(
            "cues.min_display_time",
            self.cues.min_display_time,
            "cues.max_display_time",
            self.cues.max_display_time,
        )?;

        if self.chunker.max_words == 0 {
            return Err(PipelineError::invalid_config("chunker.max_words must be >= 1"));
        }
        check_bounds(
            "chunker.min_duration",
            self.chunker.min_duration,
            "chunker.max_duration",
            self.chunker.max_duration,
        )?;

        let normalizer = &self.normalizer;
        for (name, value) in [
            ("normalizer.post_padding", normalizer.post_padding),
            ("normalizer.absolute_floor", normalizer.absolute_floor),
            ("normalizer.multi_word_floor", normalizer.multi_word_floor),
            ("normalizer.seconds_per_word", normalizer.seconds_per_word),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PipelineError::invalid_config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

fn check_bounds(
    min_name: &str,
    min: f64,
    max_name: &str,
    max: f64,
) -> Result<(), PipelineError> {
    if !min.is_finite() || min < 0.0 {
        return Err(PipelineError::invalid_config(format!(
            "{min_name} must be a non-negative number, got {min}"
        )));
    }
    if !max.is_finite() || max < min {
        return Err(PipelineError::invalid_config(format!(
            "{max_name} ({max}) must be >= {min_name} ({min})"
        )));
    }
    Ok(())
}
