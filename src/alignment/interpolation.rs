use crate::error::PipelineError;
use crate::types::{AlignmentRecord, ReferenceWord, TimedWord};

/// Duration given to a word extrapolated from a single neighbor, in seconds.
pub const FALLBACK_WORD_DURATION_SEC: f64 = 0.2;

/// Fill every missing `start_time`/`end_time` in place.
///
/// Gaps between two matched records are spread evenly: with anchors at `p` and
/// `q`, `delta = (start[q] - end[p]) / (q - p)` and record `i` spans
/// `end[p] + delta * (i - p) .. end[p] + delta * (i - p + 1)`. Runs after the
/// last anchor chain forward in [`FALLBACK_WORD_DURATION_SEC`] steps. Before the
/// first anchor, the first record ends at the anchor start with a fallback
/// span and the rest of the run sits at that start. Scores are never touched.
pub fn interpolate_missing_times(records: &mut [AlignmentRecord]) {
    let n = records.len();
    let anchors: Vec<usize> = (0..n).filter(|&i| records[i].is_timed()).collect();
    let (Some(&first), Some(&last)) = (anchors.first(), anchors.last()) else {
        if n > 0 {
            tracing::warn!(
                records = n,
                "interpolator: no matched anchors, defaulting timings from zero"
            );
        }
        fill_forward(records, 0, 0.0);
        return;
    };

    // Only the first leading word gets a fallback span; the rest collapse onto
    // the anchor start.
    let anchor_start = records[first].start_time.unwrap_or(0.0);
    for (i, record) in records[..first].iter_mut().enumerate() {
        let start = if i == 0 {
            (anchor_start - FALLBACK_WORD_DURATION_SEC).max(0.0)
        } else {
            anchor_start
        };
        record.start_time = Some(start);
        record.end_time = Some(anchor_start);
    }

    for pair in anchors.windows(2) {
        let (prev_idx, next_idx) = (pair[0], pair[1]);
        if next_idx - prev_idx < 2 {
            continue;
        }
        let prev_end = records[prev_idx].end_time.unwrap_or(0.0);
        let next_start = records[next_idx].start_time.unwrap_or(prev_end);
        let gap = (next_start - prev_end).max(0.0);
        let delta = gap / (next_idx - prev_idx) as f64;
        for i in prev_idx + 1..next_idx {
            let offset = (i - prev_idx) as f64;
            records[i].start_time = Some(prev_end + delta * offset);
            records[i].end_time = Some(prev_end + delta * (offset + 1.0));
        }
    }

    let prev_end = records[last].end_time.unwrap_or(0.0);
    fill_forward(records, last + 1, prev_end);

    tracing::debug!(
        filled = n - anchors.len(),
        total = n,
        "interpolator: synthesized timings for unmatched words"
    );
}

fn fill_forward(records: &mut [AlignmentRecord], from: usize, mut prev_end: f64) {
    for record in records.iter_mut().skip(from) {
        record.start_time = Some(prev_end);
        record.end_time = Some(prev_end + FALLBACK_WORD_DURATION_SEC);
        prev_end += FALLBACK_WORD_DURATION_SEC;
    }
}

/// Attach interpolated timings to the reference words they belong to.
pub fn apply_timings(
    reference: &[ReferenceWord],
    records: &[AlignmentRecord],
) -> Result<Vec<TimedWord>, PipelineError> {
    if reference.len() != records.len() {
        return Err(PipelineError::invalid_input(format!(
            "alignment produced {} records for {} reference words",
            records.len(),
            reference.len()
        )));
    }

    reference
        .iter()
        .zip(records)
        .enumerate()
        .map(|(i, (word, record))| {
            if record.ref_index != i {
                return Err(PipelineError::invalid_input(format!(
                    "alignment record {i} carries ref_index {}",
                    record.ref_index
                )));
            }
            let (Some(start_time), Some(end_time)) = (record.start_time, record.end_time) else {
                return Err(PipelineError::invalid_input(format!(
                    "alignment record {i} has no timing after interpolation"
                )));
            };
            Ok(TimedWord {
                text: word.raw_text.clone(),
                normalized_text: word.normalized_text.clone(),
                speaker_id: word.speaker_id,
                utterance_id: word.utterance_id,
                position_in_utterance: word.position_in_utterance,
                start_time,
                end_time,
                aligned: record.hyp_index.is_some(),
                confidence: record.score,
            })
        })
        .collect()
}
