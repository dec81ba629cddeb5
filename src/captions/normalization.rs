use crate::config::NormalizerConfig;
use crate::types::{SubtitleChunk, UnitKind};

/// Minimum on-screen duration for a chunk with `word_count` words.
pub fn min_display_duration(word_count: usize, config: &NormalizerConfig) -> f64 {
    let floor = if word_count > 1 {
        config.absolute_floor.max(config.multi_word_floor)
    } else {
        config.absolute_floor
    };
    floor.max(word_count as f64 * config.seconds_per_word)
}

/// Enforce duration floors and post-padding on chunks sorted by start time.
///
/// Padding is clamped so a speech chunk does not run into the next chunk when
/// both belong to the same speaker. Only the immediately preceding chunk is
/// compared, and the duration floor is never clamped. Order is preserved.
pub fn normalize_timings(
    chunks: Vec<SubtitleChunk>,
    config: &NormalizerConfig,
) -> Vec<SubtitleChunk> {
    let mut normalized: Vec<SubtitleChunk> = Vec::with_capacity(chunks.len());
    let mut prev_floor_end = 0.0f64;

    for mut chunk in chunks {
        let floor = min_display_duration(chunk.word_count(), config);
        let floor_end = if chunk.duration() < floor {
            chunk.start_time + floor
        } else {
            chunk.end_time
        };
        let padded_end = floor_end + config.post_padding;

        if let Some(prev) = normalized.last_mut() {
            if blocks_padding(prev, &chunk) && prev.end_time > chunk.start_time {
                let clamped = prev_floor_end.max(chunk.start_time);
                tracing::trace!(
                    prev_end = prev.end_time,
                    clamped,
                    next_start = chunk.start_time,
                    "normalizer: clamped padding against same-speaker chunk"
                );
                prev.end_time = clamped;
            }
        }

        chunk.end_time = floor_end.max(padded_end);
        prev_floor_end = floor_end;
        normalized.push(chunk);
    }

    normalized
}

/// Cue chunks never block, and are never blocked by, padding.
fn blocks_padding(prev: &SubtitleChunk, next: &SubtitleChunk) -> bool {
    prev.kind == UnitKind::Speech
        && next.kind == UnitKind::Speech
        && prev.speaker_id == next.speaker_id
}
