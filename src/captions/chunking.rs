use crate::config::ChunkerConfig;
use crate::types::{SubtitleChunk, UtteranceUnit};

/// Split one utterance unit into caption chunks.
///
/// Chunks never cross unit boundaries. A unit without tokens (a standalone
/// cue) passes through as a single chunk with its own span.
pub fn chunk_unit(unit: &UtteranceUnit, config: &ChunkerConfig) -> Vec<SubtitleChunk> {
    let tokens = &unit.tokens;
    if tokens.is_empty() {
        return vec![SubtitleChunk {
            text: unit.text.clone(),
            start_time: unit.start_time,
            end_time: unit.end_time,
            speaker_id: unit.speaker_id,
            speaker_name: unit.speaker_name.clone(),
            kind: unit.kind,
        }];
    }

    let max_words = config.max_words.max(1);
    let mut chunks = Vec::new();
    let mut start_idx = 0usize;
    while start_idx < tokens.len() {
        let mut end_idx = (start_idx + max_words).min(tokens.len());
        let chunk_start = tokens[start_idx].start_time;
        let mut chunk_end = tokens[end_idx - 1].end_time;
        let mut duration = chunk_end - chunk_start;

        while duration < config.min_duration && end_idx < tokens.len() {
            end_idx += 1;
            chunk_end = tokens[end_idx - 1].end_time;
            duration = chunk_end - chunk_start;
            if duration >= config.max_duration {
                break;
            }
        }

        if duration > config.max_duration {
            chunk_end = chunk_start + config.max_duration;
        }

        let text = tokens[start_idx..end_idx]
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        chunks.push(SubtitleChunk {
            text,
            start_time: chunk_start,
            end_time: chunk_end.max(chunk_start),
            speaker_id: unit.speaker_id,
            speaker_name: unit.speaker_name.clone(),
            kind: unit.kind,
        });

        start_idx = end_idx;
    }

    tracing::trace!(
        tokens = tokens.len(),
        chunks = chunks.len(),
        "chunker: split utterance"
    );
    chunks
}
